//! Contracts for the platform services the gallery calls into but does not own.
//!
//! Every call is asynchronous and object safe so the session can hold the
//! services as `Arc<dyn ..>` and run them off the event loop.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use crate::error::{DownloadError, FetchError, ShareError, WriteError};
use crate::events::ImageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user closed the sheet without picking a target.
    Dismissed,
}

pub trait PhotoFeed: Send + Sync {
    fn fetch_random(&self, count: usize) -> BoxFuture<'_, Result<Vec<ImageRecord>, FetchError>>;
}

pub trait PermissionBroker: Send + Sync {
    fn query(&self) -> BoxFuture<'_, Permission>;
    fn request(&self) -> BoxFuture<'_, Permission>;
}

pub trait FileDownloader: Send + Sync {
    fn download<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>>;
}

pub trait CameraRollWriter: Send + Sync {
    fn save<'a>(&'a self, local: &'a Path) -> BoxFuture<'a, Result<(), WriteError>>;
}

pub trait ShareSheet: Send + Sync {
    fn share<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<ShareOutcome, ShareError>>;
}

/// User-facing alerts.
pub trait Notifier: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}
