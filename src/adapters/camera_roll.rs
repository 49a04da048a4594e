use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use tokio::fs;
use tracing::info;

use crate::collaborators::CameraRollWriter;
use crate::error::WriteError;

/// A photo library backed by a plain directory.
pub struct DirectoryCameraRoll {
    library_dir: PathBuf,
}

impl DirectoryCameraRoll {
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
        }
    }

    pub fn library_dir(&self) -> &Path {
        &self.library_dir
    }

    async fn persist(&self, local: &Path) -> Result<(), WriteError> {
        let probe_path = local.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || probe_dimensions(&probe_path))
            .await
            .map_err(|err| WriteError::NotAnImage {
                path: local.to_path_buf(),
                reason: err.to_string(),
            })??;

        let io_err = |source| WriteError::Io {
            path: local.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.library_dir).await.map_err(io_err)?;
        let name = local.file_name().ok_or_else(|| WriteError::NotAnImage {
            path: local.to_path_buf(),
            reason: "path has no file name".to_string(),
        })?;
        let target = self.library_dir.join(name);
        fs::copy(local, &target).await.map_err(io_err)?;
        info!(path = %target.display(), width, height, "added to photo library");
        Ok(())
    }
}

// Reads only the header; enough to reject HTML error pages and truncated downloads.
fn probe_dimensions(path: &Path) -> Result<(u32, u32), WriteError> {
    let not_an_image = |reason: String| WriteError::NotAnImage {
        path: path.to_path_buf(),
        reason,
    };
    image::ImageReader::open(path)
        .map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|err| not_an_image(err.to_string()))?
        .into_dimensions()
        .map_err(|err| not_an_image(err.to_string()))
}

impl CameraRollWriter for DirectoryCameraRoll {
    fn save<'a>(&'a self, local: &'a Path) -> BoxFuture<'a, Result<(), WriteError>> {
        Box::pin(self.persist(local))
    }
}
