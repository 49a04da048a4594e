#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use wallpaper_carousel::actions::Collaborators;
use wallpaper_carousel::collaborators::{
    CameraRollWriter, FileDownloader, Notifier, Permission, PermissionBroker, PhotoFeed,
    ShareOutcome, ShareSheet,
};
use wallpaper_carousel::error::{DownloadError, FetchError, ShareError, WriteError};
use wallpaper_carousel::events::ImageRecord;

pub fn records(prefix: &str, n: usize) -> Vec<ImageRecord> {
    (0..n)
        .map(|i| {
            let id = format!("{prefix}{i}");
            ImageRecord::new(
                id.clone(),
                format!("https://images.test/{id}/full"),
                format!("https://images.test/{id}/regular"),
            )
        })
        .collect()
}

struct Scripted {
    delay: Duration,
    result: Result<Vec<ImageRecord>, String>,
}

/// Feed answering from a queue of scripted responses, in call order.
#[derive(Default)]
pub struct FakeFeed {
    script: Mutex<VecDeque<Scripted>>,
    pub requested: Mutex<Vec<usize>>,
}

impl FakeFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, delay: Duration, images: Vec<ImageRecord>) {
        self.script.lock().unwrap().push_back(Scripted {
            delay,
            result: Ok(images),
        });
    }

    pub fn fail(&self, delay: Duration, reason: &str) {
        self.script.lock().unwrap().push_back(Scripted {
            delay,
            result: Err(reason.to_string()),
        });
    }

    pub fn calls(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

impl PhotoFeed for FakeFeed {
    fn fetch_random(&self, count: usize) -> BoxFuture<'_, Result<Vec<ImageRecord>, FetchError>> {
        self.requested.lock().unwrap().push(count);
        let next = self.script.lock().unwrap().pop_front();
        Box::pin(async move {
            let Some(Scripted { delay, result }) = next else {
                return Err(FetchError::Other("no scripted response".into()));
            };
            tokio::time::sleep(delay).await;
            result.map_err(FetchError::Other)
        })
    }
}

pub struct FakePermission {
    pub current: Mutex<Permission>,
    /// Answer given to `request`.
    pub on_request: Permission,
    pub requests: Mutex<usize>,
}

impl FakePermission {
    pub fn new(current: Permission, on_request: Permission) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(current),
            on_request,
            requests: Mutex::new(0),
        })
    }

    pub fn request_count(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

impl PermissionBroker for FakePermission {
    fn query(&self) -> BoxFuture<'_, Permission> {
        let current = *self.current.lock().unwrap();
        Box::pin(async move { current })
    }

    fn request(&self) -> BoxFuture<'_, Permission> {
        *self.requests.lock().unwrap() += 1;
        *self.current.lock().unwrap() = self.on_request;
        let answer = self.on_request;
        Box::pin(async move { answer })
    }
}

#[derive(Default)]
pub struct FakeDownloader {
    pub calls: Mutex<Vec<(String, PathBuf)>>,
    pub fail: bool,
}

impl FakeDownloader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl FileDownloader for FakeDownloader {
    fn download<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(DownloadError::Status { status: 404 })
            } else {
                Ok(dest.to_path_buf())
            }
        })
    }
}

#[derive(Default)]
pub struct FakeCameraRoll {
    /// Every path handed to `save`, including rejected ones.
    pub saved: Mutex<Vec<PathBuf>>,
    pub fail: bool,
}

impl FakeCameraRoll {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn saved(&self) -> Vec<PathBuf> {
        self.saved.lock().unwrap().clone()
    }
}

impl CameraRollWriter for FakeCameraRoll {
    fn save<'a>(&'a self, local: &'a Path) -> BoxFuture<'a, Result<(), WriteError>> {
        self.saved.lock().unwrap().push(local.to_path_buf());
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(WriteError::NotAnImage {
                    path: local.to_path_buf(),
                    reason: "unsupported format".into(),
                })
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Default)]
pub struct FakeShareSheet {
    pub messages: Mutex<Vec<String>>,
    pub unavailable: bool,
    /// Close the sheet without picking a target.
    pub dismiss: bool,
}

impl FakeShareSheet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            unavailable: true,
            ..Self::default()
        })
    }

    pub fn dismissing() -> Arc<Self> {
        Arc::new(Self {
            dismiss: true,
            ..Self::default()
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ShareSheet for FakeShareSheet {
    fn share<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<ShareOutcome, ShareError>> {
        self.messages.lock().unwrap().push(message.to_string());
        let (unavailable, dismiss) = (self.unavailable, self.dismiss);
        Box::pin(async move {
            if unavailable {
                Err(ShareError::Unavailable("no targets".into()))
            } else if dismiss {
                Ok(ShareOutcome::Dismissed)
            } else {
                Ok(ShareOutcome::Shared)
            }
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Handles on every fake so tests can inspect them after handing out `Collaborators`.
pub struct Fakes {
    pub feed: Arc<FakeFeed>,
    pub permission: Arc<FakePermission>,
    pub downloader: Arc<FakeDownloader>,
    pub camera_roll: Arc<FakeCameraRoll>,
    pub share_sheet: Arc<FakeShareSheet>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Fakes {
    pub fn new(permission: Arc<FakePermission>) -> Self {
        Self {
            feed: FakeFeed::new(),
            permission,
            downloader: FakeDownloader::new(),
            camera_roll: FakeCameraRoll::new(),
            share_sheet: FakeShareSheet::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn granted() -> Self {
        Self::new(FakePermission::new(Permission::Granted, Permission::Granted))
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            feed: self.feed.clone(),
            permission: self.permission.clone(),
            downloader: self.downloader.clone(),
            camera_roll: self.camera_roll.clone(),
            share_sheet: self.share_sheet.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
