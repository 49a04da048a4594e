use futures::future::BoxFuture;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::collaborators::PhotoFeed;
use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::events::ImageRecord;

const USER_AGENT: &str = concat!("wallpaper-carousel/", env!("CARGO_PKG_VERSION"));

/// Random-photo endpoint of the Unsplash API.
pub struct UnsplashFeed {
    client: reqwest::Client,
    api_base: String,
    access_key: String,
}

impl UnsplashFeed {
    pub fn new(cfg: &FeedConfig, access_key: String) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            access_key,
        })
    }

    pub fn random_url(&self, count: usize) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &format!("{}/photos/random", self.api_base),
            &[
                ("count", count.to_string()),
                ("client_id", self.access_key.clone()),
            ],
        )
        .map_err(|err| FetchError::Other(format!("invalid feed url: {err}")))
    }

    async fn fetch(&self, count: usize) -> Result<Vec<ImageRecord>, FetchError> {
        let url = self.random_url(count)?;
        debug!(count, base = %self.api_base, "fetching random photos");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        parse_batch(&bytes)
    }
}

impl PhotoFeed for UnsplashFeed {
    fn fetch_random(&self, count: usize) -> BoxFuture<'_, Result<Vec<ImageRecord>, FetchError>> {
        Box::pin(self.fetch(count))
    }
}

/// Decode a `photos/random?count=N` body. With `count` set the API always returns an array.
pub fn parse_batch(body: &[u8]) -> Result<Vec<ImageRecord>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
