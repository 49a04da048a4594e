use std::path::{Path, PathBuf};

use futures::StreamExt;
use futures::future::BoxFuture;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::collaborators::FileDownloader;
use crate::error::DownloadError;

/// Streams a remote file to disk, removing partial output on failure.
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<PathBuf, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| DownloadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let result = write_stream(response, dest).await;
        if result.is_err() {
            let _ = fs::remove_file(dest).await;
        }
        let written = result?;
        debug!(url, path = %dest.display(), bytes = written, "download complete");
        Ok(dest.to_path_buf())
    }
}

async fn write_stream(response: reqwest::Response, dest: &Path) -> Result<u64, DownloadError> {
    let io_err = |source| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(dest).await.map_err(io_err)?;
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

impl FileDownloader for HttpDownloader {
    fn download<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>> {
        Box::pin(self.fetch_to(url, dest))
    }
}
