use log::{debug, error, info};
use thiserror::Error;

use crate::domain::{Overlay, OverlayFile, Poi};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid overlay json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Where overlay files come from: the filesystem, an HTTP origin, memory.
#[allow(async_fn_in_trait)]
pub trait OverlaySource {
    async fn fetch(&self, file: &str) -> Result<OverlayFile, SourceError>;
}

#[derive(Debug)]
pub struct LoadFailure {
    pub file: String,
    pub error: SourceError,
}

/// Result of a batch load: every overlay that parsed, plus the flat POI list.
#[derive(Debug, Default)]
pub struct LoadedOverlays {
    pub overlays: Vec<Overlay>,
    pub pois: Vec<Poi>,
    pub failures: Vec<LoadFailure>,
}

impl LoadedOverlays {
    /// Re-aligns flags given per configured file with the overlays that
    /// actually loaded.
    pub fn active_flags(&self, configured: &[bool]) -> Vec<bool> {
        self.overlays
            .iter()
            .map(|overlay| configured.get(overlay.source_index).copied().unwrap_or(false))
            .collect()
    }

    pub fn last_failure(&self) -> Option<&LoadFailure> {
        self.failures.last()
    }
}

/// Fetches each file in turn; a file that fails is logged and skipped.
pub async fn load_overlays<S: OverlaySource>(source: &S, files: &[String]) -> LoadedOverlays {
    let mut loaded = LoadedOverlays::default();

    for (source_index, file) in files.iter().enumerate() {
        match source.fetch(file).await {
            Ok(data) => {
                let overlay = Overlay::from_file(data, source_index);
                debug!(
                    "loaded overlay {} from {file} ({} points)",
                    overlay.name,
                    overlay.points.len()
                );
                loaded.pois.extend(overlay.points.iter().cloned());
                loaded.overlays.push(overlay);
            }
            Err(e) => {
                error!("Failed to load {file}: {e}");
                loaded.failures.push(LoadFailure {
                    file: file.clone(),
                    error: e,
                });
            }
        }
    }

    info!(
        "loaded {} of {} overlays, {} points",
        loaded.overlays.len(),
        files.len(),
        loaded.pois.len()
    );

    loaded
}
