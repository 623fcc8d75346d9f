use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use overlay_atlas::config::RuntimePaths;
use overlay_atlas::report::{build_report, render_text};
use overlay_atlas::FileSource;
use overlay_core::{load_overlays, Atlas, AtlasConfig, LatLng, LoadedOverlays, MapView};
use std::time::Duration;
use tokio::sync::oneshot;

use crate::app::{handle_input, App};
use crate::terminal::AtlasTerminal;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Loads every overlay, computes the nearby view once and prints it.
pub async fn run_headless(
    config: &AtlasConfig,
    paths: &RuntimePaths,
    center: Option<LatLng>,
    json: bool,
) -> Result<()> {
    let source = FileSource::new(&paths.overlay_dir);
    let loaded = load_overlays(&source, &config.overlay_files).await;

    let mut map = MapView::new(center.unwrap_or_else(|| config.center()), config.map_zoom);
    let atlas = Atlas::from_loaded(loaded, &config.active_flags(), &mut map, Utc::now());
    let report = build_report(&atlas, &map);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}

/// Starts the overlay load in the background and hands back the receiver the
/// event loop polls.
pub fn spawn_loader(config: &AtlasConfig, paths: &RuntimePaths) -> oneshot::Receiver<LoadedOverlays> {
    let (tx, rx) = oneshot::channel();
    let source = FileSource::new(&paths.overlay_dir);
    let files = config.overlay_files.clone();

    tokio::spawn(async move {
        let loaded = load_overlays(&source, &files).await;
        let _ = tx.send(loaded);
    });

    rx
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut AtlasTerminal,
    app: &mut App,
    mut loader: oneshot::Receiver<LoadedOverlays>,
) -> Result<()> {
    loop {
        app.update();

        if app.is_loading() {
            match loader.try_recv() {
                Ok(loaded) => app.finish_loading(loaded),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    app.finish_loading(LoadedOverlays::default());
                    app.status_message = "Error: overlay loader stopped unexpectedly".to_string();
                }
            }
        }

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    let _ = terminal.draw(|f| ui::ui(app, f));
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let the loader task make progress between frames.
        tokio::task::yield_now().await;
    }
    Ok(())
}
