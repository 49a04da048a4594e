pub mod camera_roll;
pub mod download;
pub mod permission;
pub mod terminal;
pub mod unsplash;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::actions::Collaborators;
use crate::config::{ACCESS_KEY_ENV, Configuration};

/// Wire the concrete services for a terminal session.
pub fn build(cfg: &Configuration) -> Result<Collaborators> {
    let access_key = cfg.feed.resolved_access_key().ok_or_else(|| {
        anyhow!("no API access key: set feed.access-key or {ACCESS_KEY_ENV}")
    })?;
    let feed = unsplash::UnsplashFeed::new(&cfg.feed, access_key)
        .context("failed to build photo feed client")?;
    let download_client = reqwest::Client::builder()
        .connect_timeout(cfg.feed.request_timeout)
        .build()
        .context("failed to build download client")?;

    Ok(Collaborators {
        feed: Arc::new(feed),
        permission: Arc::new(permission::ConfiguredPermission::new(cfg.permission)),
        downloader: Arc::new(download::HttpDownloader::new(download_client)),
        camera_roll: Arc::new(camera_roll::DirectoryCameraRoll::new(
            cfg.storage.photo_library_dir.clone(),
        )),
        share_sheet: Arc::new(terminal::TerminalShareSheet),
        notifier: Arc::new(terminal::TerminalNotifier),
    })
}
