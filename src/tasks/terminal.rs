use std::io::BufRead;
use std::thread;

use anyhow::Result;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::GalleryCommand;
use crate::focus::TOOLBAR_HEIGHT;
use crate::gallery::GalleryView;

/// Read line commands from stdin on a plain thread so a pending read never
/// holds up runtime shutdown. EOF drops the sender, which unmounts the session.
pub fn spawn_stdin_reader(tx: mpsc::Sender<GalleryCommand>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(cmd) = GalleryCommand::parse(&line) else {
                println!("commands: tap next prev refresh share save info status quit");
                continue;
            };
            if tx.blocking_send(cmd).is_err() {
                break;
            }
        }
        info!("stdin closed");
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    loading: bool,
    len: usize,
    page: usize,
    focused: bool,
    id: Option<String>,
    toolbar_offset: Option<f32>,
}

impl Snapshot {
    fn of(view: &GalleryView) -> Self {
        // Only resting toolbar positions are worth printing.
        let offset = view.toolbar_offset;
        let toolbar_offset = (offset == 0.0 || offset == -TOOLBAR_HEIGHT).then_some(offset);
        Self {
            loading: view.loading,
            len: view.images.len(),
            page: view.page,
            focused: view.focused,
            id: view.displayed().map(|image| image.id.clone()),
            toolbar_offset,
        }
    }
}

/// Text rendering of the gallery view: one line whenever something visible settles.
pub async fn render(
    mut views: watch::Receiver<GalleryView>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut last: Option<Snapshot> = None;
    loop {
        let snapshot = Snapshot::of(&views.borrow_and_update());
        if snapshot.toolbar_offset.is_some() && last.as_ref() != Some(&snapshot) {
            print_snapshot(&snapshot);
            last = Some(snapshot);
        }
        select! {
            _ = cancel.cancelled() => break,
            changed = views.changed() => {
                if changed.is_err() {
                    debug!("view publisher gone");
                    break;
                }
            }
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    if snapshot.loading {
        println!("loading…");
        return;
    }
    let toolbar = if snapshot.toolbar_offset == Some(0.0) {
        "toolbar shown"
    } else {
        "toolbar hidden"
    };
    match &snapshot.id {
        Some(id) => println!(
            "[{}/{}] {id} ({}, {toolbar})",
            snapshot.page + 1,
            snapshot.len,
            if snapshot.focused { "focused" } else { "browsing" },
        ),
        None => println!("no images ({toolbar})"),
    }
}
