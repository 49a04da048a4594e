use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collaborators::{
    CameraRollWriter, FileDownloader, Notifier, Permission, PermissionBroker, PhotoFeed,
    ShareOutcome, ShareSheet,
};
use crate::config::AboutConfig;
use crate::error::FetchError;
use crate::events::ImageRecord;
use crate::gallery::{FetchTicket, Gallery};

pub const SAVED_MESSAGE: &str = "Saved to photos";
pub const PERMISSION_REQUIRED_MESSAGE: &str = "Requires camera roll permission";
const SAVE_TITLE: &str = "Save";

/// The platform services behind the toolbar actions.
#[derive(Clone)]
pub struct Collaborators {
    pub feed: Arc<dyn PhotoFeed>,
    pub permission: Arc<dyn PermissionBroker>,
    pub downloader: Arc<dyn FileDownloader>,
    pub camera_roll: Arc<dyn CameraRollWriter>,
    pub share_sheet: Arc<dyn ShareSheet>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    PermissionDenied,
    Failed,
}

/// Issue a new batch request. The returned future performs the I/O and hands
/// back the ticket so the caller can apply the result to the gallery.
pub fn refresh(
    gallery: &mut Gallery,
    feed: Arc<dyn PhotoFeed>,
) -> impl Future<Output = (FetchTicket, Result<Vec<ImageRecord>, FetchError>)> + Send + use<> {
    let ticket = gallery.begin_fetch();
    async move {
        let result = feed.fetch_random(ticket.count).await;
        (ticket, result)
    }
}

pub fn share_message(prefix: &str, image: &ImageRecord) -> String {
    format!("{prefix}{}", image.full_url)
}

/// Open the share sheet for the image's full-resolution URL. Failures are logged only.
pub async fn share(
    sheet: &dyn ShareSheet,
    prefix: &str,
    image: &ImageRecord,
) -> Option<ShareOutcome> {
    let message = share_message(prefix, image);
    match sheet.share(&message).await {
        Ok(outcome) => {
            debug!(id = %image.id, ?outcome, "share sheet closed");
            Some(outcome)
        }
        Err(err) => {
            warn!(id = %image.id, error = %err, "share failed");
            None
        }
    }
}

/// Where a downloaded image is staged before it is handed to the camera roll.
///
/// `None` unless the id is non-empty and limited to `[A-Za-z0-9_-]`, so the
/// result always stays inside `download_dir`.
pub fn download_path(download_dir: &Path, image: &ImageRecord) -> Option<PathBuf> {
    let id = image.id.as_str();
    let safe = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    safe.then(|| download_dir.join(format!("{id}.jpg")))
}

/// Permission first; nothing is downloaded or written unless access is granted.
pub async fn save_to_device(
    services: &Collaborators,
    download_dir: &Path,
    image: &ImageRecord,
) -> SaveOutcome {
    let mut permission = services.permission.query().await;
    if permission != Permission::Granted {
        permission = services.permission.request().await;
    }
    if permission != Permission::Granted {
        info!(id = %image.id, "save blocked: camera roll permission denied");
        services.notifier.alert(SAVE_TITLE, PERMISSION_REQUIRED_MESSAGE);
        return SaveOutcome::PermissionDenied;
    }

    let Some(dest) = download_path(download_dir, image) else {
        warn!(id = %image.id, "refusing to save: id is not a safe file name");
        return SaveOutcome::Failed;
    };
    let local = match services.downloader.download(&image.regular_url, &dest).await {
        Ok(local) => local,
        Err(err) => {
            warn!(id = %image.id, url = %image.regular_url, error = %err, "download failed");
            return SaveOutcome::Failed;
        }
    };

    if let Err(err) = services.camera_roll.save(&local).await {
        warn!(id = %image.id, path = %local.display(), error = %err, "camera roll write failed");
        return SaveOutcome::Failed;
    }

    info!(id = %image.id, path = %local.display(), "image saved");
    services.notifier.alert(SAVE_TITLE, SAVED_MESSAGE);
    SaveOutcome::Saved(local)
}

pub fn show_info(notifier: &dyn Notifier, about: &AboutConfig) {
    notifier.alert(&about.title, &about.message);
}
