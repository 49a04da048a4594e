use std::path::PathBuf;

use thiserror::Error;

/// Errors from projecting the gallery state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// The requested position is not in the current image sequence.
    #[error("image index {index} out of range for {len} images")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Photo feed failures. Recovered by leaving the prior gallery state in place.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure reaching the feed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The feed rejected the API credential.
    #[error("feed rejected credentials ({status})")]
    Unauthorized { status: u16 },

    /// Any other non-success HTTP status.
    #[error("feed returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON array of photos.
    #[error("malformed feed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-HTTP feed failure (used by in-process feeds).
    #[error("{0}")]
    Other(String),
}

/// Failures materializing a remote image on local storage.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("download returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures persisting a local file into the photo library.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The downloaded file does not decode as an image.
    #[error("{path} is not a readable image: {reason}")]
    NotAnImage { path: PathBuf, reason: String },

    #[error("failed to copy {path} into the library: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Share sheet failures. A user dismissal is not an error.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share sheet unavailable: {0}")]
    Unavailable(String),
}
