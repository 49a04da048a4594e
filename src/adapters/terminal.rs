use futures::future::{self, BoxFuture};
use tracing::info;

use crate::collaborators::{Notifier, ShareOutcome, ShareSheet};
use crate::error::ShareError;

/// Prints the share payload for the user to copy.
pub struct TerminalShareSheet;

impl ShareSheet for TerminalShareSheet {
    fn share<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<ShareOutcome, ShareError>> {
        info!(message, "sharing");
        println!("share> {message}");
        Box::pin(future::ready(Ok(ShareOutcome::Shared)))
    }
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, title: &str, message: &str) {
        info!(title, "alert");
        println!("[{title}] {message}");
    }
}
