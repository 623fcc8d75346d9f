use std::collections::BTreeSet;

use log::debug;
use thiserror::Error;

use crate::domain::Overlay;
use crate::map::{Marker, MarkerLayer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("overlay index {index} out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Shown { markers: usize },
    Hidden { markers: usize },
}

/// Which overlays are visible. Indices are positions in the loaded overlay list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    active: BTreeSet<usize>,
}

impl OverlayState {
    /// Builds the active set from per-overlay flags, ignoring flags past
    /// `overlay_count`.
    pub fn from_flags(flags: &[bool], overlay_count: usize) -> Self {
        let active = flags
            .iter()
            .take(overlay_count)
            .enumerate()
            .filter_map(|(index, active)| active.then_some(index))
            .collect();
        Self { active }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.contains(&index)
    }

    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Puts markers on the map for every overlay already marked active.
    pub fn show_active<L: MarkerLayer>(&self, overlays: &[Overlay], layer: &mut L) {
        for index in &self.active {
            if let Some(overlay) = overlays.get(*index) {
                add_markers(*index, overlay, layer);
            }
        }
    }

    pub fn toggle<L: MarkerLayer>(
        &mut self,
        index: usize,
        overlays: &[Overlay],
        layer: &mut L,
    ) -> Result<ToggleOutcome, ToggleError> {
        let Some(overlay) = overlays.get(index) else {
            return Err(ToggleError::OutOfRange {
                index,
                len: overlays.len(),
            });
        };

        if self.active.remove(&index) {
            let markers = layer.remove_markers_for(index);
            debug!("hid overlay {} ({markers} markers)", overlay.name);
            Ok(ToggleOutcome::Hidden { markers })
        } else {
            self.active.insert(index);
            let markers = add_markers(index, overlay, layer);
            debug!("showed overlay {} ({markers} markers)", overlay.name);
            Ok(ToggleOutcome::Shown { markers })
        }
    }
}

fn add_markers<L: MarkerLayer>(index: usize, overlay: &Overlay, layer: &mut L) -> usize {
    for poi in &overlay.points {
        layer.add_marker(Marker::for_poi(poi, index));
    }
    overlay.points.len()
}
