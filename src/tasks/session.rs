use anyhow::Result;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{self, Collaborators, SaveOutcome};
use crate::collaborators::ShareOutcome;
use crate::config::Configuration;
use crate::error::FetchError;
use crate::events::{GalleryCommand, ImageRecord};
use crate::gallery::{FetchTicket, Gallery, GalleryView};
use crate::tasks::animator::Animator;

#[derive(Debug)]
enum ActionReport {
    Shared {
        id: String,
        outcome: Option<ShareOutcome>,
    },
    Saved {
        id: String,
        outcome: SaveOutcome,
    },
}

type FetchResult = (FetchTicket, Result<Vec<ImageRecord>, FetchError>);

/// The screen's event loop. Owns the gallery for its whole lifetime.
///
/// Rules:
/// - Mounting issues the first fetch; the state is dropped when the loop exits.
/// - Fetches, shares and saves run as spawned tasks; the loop never awaits I/O inline.
/// - Fetch results are applied in arrival order (see `FetchOrdering`).
/// - Toolbar commands are ignored while focused; swipes are ignored while focused.
/// - Every state change is published on `view_tx`.
/// - Exits on cancellation, `Quit`, or when the command sender is dropped.
pub async fn run(
    cfg: Configuration,
    services: Collaborators,
    mut commands: mpsc::Receiver<GalleryCommand>,
    view_tx: watch::Sender<GalleryView>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut gallery = Gallery::new(cfg.feed.fetch_count, cfg.feed.fetch_ordering, cfg.animation);
    let (mut animator, mut frames) =
        Animator::new(cfg.animation, gallery.focus().value(), cancel.child_token());
    let mut fetches: JoinSet<FetchResult> = JoinSet::new();
    let mut jobs: JoinSet<ActionReport> = JoinSet::new();

    fetches.spawn(actions::refresh(&mut gallery, services.feed.clone()));
    view_tx.send_replace(gallery.view());

    loop {
        select! {
            _ = cancel.cancelled() => break,

            maybe_cmd = commands.recv() => {
                let Some(cmd) = maybe_cmd else {
                    debug!("command channel closed; unmounting");
                    break;
                };
                if cmd == GalleryCommand::Quit {
                    info!("quit requested");
                    break;
                }
                handle_command(
                    cmd,
                    &cfg,
                    &services,
                    &mut gallery,
                    &mut animator,
                    &mut fetches,
                    &mut jobs,
                );
            }

            Some(joined) = fetches.join_next() => {
                match joined {
                    Ok((ticket, result)) => {
                        gallery.complete_fetch(ticket, result);
                    }
                    Err(err) => warn!("fetch task failed: {err}"),
                }
            }

            Some(joined) = jobs.join_next() => {
                match joined {
                    Ok(report) => log_report(&report),
                    Err(err) => warn!("action task failed: {err}"),
                }
            }

            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = *frames.borrow_and_update();
                gallery.focus_mut().sync_frame(frame.value, frame.velocity);
            }
        }

        view_tx.send_replace(gallery.view());
    }

    animator.stop();
    // Pending work belongs to this screen and goes with it.
    fetches.shutdown().await;
    jobs.shutdown().await;
    debug!("session ended");
    Ok(())
}

fn handle_command(
    cmd: GalleryCommand,
    cfg: &Configuration,
    services: &Collaborators,
    gallery: &mut Gallery,
    animator: &mut Animator,
    fetches: &mut JoinSet<FetchResult>,
    jobs: &mut JoinSet<ActionReport>,
) {
    let toolbar_visible = gallery.focus().mode().toolbar_visible();
    match cmd {
        GalleryCommand::Tap => {
            if gallery.is_loading() {
                debug!("tap ignored while loading");
                return;
            }
            let change = gallery.toggle_focus();
            animator.retarget(change.to.target_scale());
        }
        GalleryCommand::Swipe(direction) => {
            if !gallery.swipe(direction) {
                debug!(?direction, page = gallery.page(), "swipe ignored");
            }
        }
        GalleryCommand::Refresh | GalleryCommand::Share | GalleryCommand::Save | GalleryCommand::Info
            if !toolbar_visible =>
        {
            debug!(command = ?cmd, "toolbar hidden; command ignored");
        }
        GalleryCommand::Refresh => {
            fetches.spawn(actions::refresh(gallery, services.feed.clone()));
        }
        GalleryCommand::Share => {
            let Some(image) = displayed(gallery) else {
                return;
            };
            let sheet = services.share_sheet.clone();
            let prefix = cfg.share_prefix.clone();
            jobs.spawn(async move {
                let outcome = actions::share(sheet.as_ref(), &prefix, &image).await;
                ActionReport::Shared {
                    id: image.id,
                    outcome,
                }
            });
        }
        GalleryCommand::Save => {
            let Some(image) = displayed(gallery) else {
                return;
            };
            let services = services.clone();
            let download_dir = cfg.storage.download_dir.clone();
            jobs.spawn(async move {
                let outcome = actions::save_to_device(&services, &download_dir, &image).await;
                ActionReport::Saved {
                    id: image.id,
                    outcome,
                }
            });
        }
        GalleryCommand::Info => {
            actions::show_info(services.notifier.as_ref(), &cfg.about);
        }
        GalleryCommand::Status => {
            let view = gallery.view();
            info!(
                loading = view.loading,
                images = view.images.len(),
                page = view.page,
                focused = view.focused,
                value = view.animation_value,
                toolbar_offset = view.toolbar_offset,
                id = view.displayed().map(|image| image.id.as_str()),
                "gallery status"
            );
        }
        GalleryCommand::Quit => {}
    }
}

fn displayed(gallery: &Gallery) -> Option<ImageRecord> {
    match gallery.displayed() {
        Ok(image) => Some(image.clone()),
        Err(err) => {
            debug!("no image on screen: {err}");
            None
        }
    }
}

fn log_report(report: &ActionReport) {
    match report {
        ActionReport::Shared { id, outcome } => debug!(%id, ?outcome, "share finished"),
        ActionReport::Saved { id, outcome } => debug!(%id, ?outcome, "save finished"),
    }
}
