//! Binary entrypoint for the wallpaper carousel.
//!
//! Delegates all logic to the library crate; the terminal stands in for the
//! rendering surface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use wallpaper_carousel::actions::Collaborators;
use wallpaper_carousel::config::Configuration;
use wallpaper_carousel::events::GalleryCommand;
use wallpaper_carousel::gallery::Gallery;
use wallpaper_carousel::tasks::{session, terminal};
use wallpaper_carousel::{actions, adapters};

#[derive(Debug, Parser)]
#[command(
    name = "wallpaper-carousel",
    version,
    about = "Browse, share and save random wallpapers"
)]
struct Cli {
    /// Path to YAML config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of images fetched per batch
    #[arg(long, value_name = "N")]
    count: Option<usize>,

    /// Fetch one batch, print the image ids and exit
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive(format!("wallpaper_carousel={level}").parse()?)
        .add_directive("reqwest=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(count) = cli.count {
        cfg.feed.fetch_count = count;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    tracing::debug!("configuration: {cfg:#?}");

    let services = adapters::build(&cfg)?;

    if cli.dry_run {
        return run_dry_run(&cfg, &services).await;
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let (command_tx, command_rx) = mpsc::channel::<GalleryCommand>(16); // Terminal -> Session
    let (view_tx, view_rx) = watch::channel(
        Gallery::new(cfg.feed.fetch_count, cfg.feed.fetch_ordering, cfg.animation).view(),
    ); // Session -> Terminal

    terminal::spawn_stdin_reader(command_tx);
    let renderer = tokio::spawn(terminal::render(view_rx, cancel.clone()));

    let result = session::run(cfg, services, command_rx, view_tx, cancel.clone())
        .await
        .context("session failed");
    cancel.cancel();
    match renderer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("renderer error: {e:?}"),
        Err(e) => tracing::error!("join error: {e}"),
    }
    result
}

async fn run_dry_run(cfg: &Configuration, services: &Collaborators) -> Result<()> {
    let mut gallery = Gallery::new(cfg.feed.fetch_count, cfg.feed.fetch_ordering, cfg.animation);
    let (ticket, result) = actions::refresh(&mut gallery, services.feed.clone()).await;
    let images = result.context("photo feed request failed")?;
    gallery.complete_fetch(ticket, Ok(images));

    println!("# dry run\n# requested: {}\n# received: {}\n", ticket.count, gallery.len());
    for (idx, image) in gallery.images().iter().enumerate() {
        println!("  {:>4}: {}  {}", idx + 1, image.id, image.regular_url);
    }
    Ok(())
}
