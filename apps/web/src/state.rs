use overlay_core::{Atlas, AtlasConfig, LoadedOverlays, MapView, Panel, SidebarModel, ToggleOutcome};

use crate::fetch::console_error;

const PAN_STEP: f64 = 0.1;

/// Everything the page shows, shared between the fetch task, key handler and
/// draw loop.
#[derive(Debug, Default)]
pub struct WebState {
    pub config: Option<AtlasConfig>,
    pub map: Option<MapView>,
    pub atlas: Option<Atlas>,
    pub sidebar: SidebarModel,
    pub focus: Option<Panel>,
    selections: [usize; Panel::ALL.len()],
    pub show_popup: bool,
    pub show_help: bool,
    pub status: String,
}

impl WebState {
    pub fn new() -> Self {
        Self {
            status: "Loading config.json...".to_string(),
            ..Self::default()
        }
    }

    pub fn set_config(&mut self, config: AtlasConfig) {
        self.map = Some(MapView::new(config.center(), config.map_zoom));
        self.status = format!("Loading {} overlays...", config.overlay_files.len());
        self.config = Some(config);
    }

    pub fn fail_config(&mut self, message: &str) {
        console_error(&format!("Failed to load config: {message}"));
        self.status = format!("Error: failed to load config: {message}");
    }

    pub fn finish_loading(&mut self, loaded: LoadedOverlays) {
        let (Some(config), Some(map)) = (self.config.as_ref(), self.map.as_mut()) else {
            return;
        };

        for failure in &loaded.failures {
            console_error(&format!("Failed to load {}: {}", failure.file, failure.error));
        }

        self.status = format!(
            "Loaded {} overlays ({} points){}",
            loaded.overlays.len(),
            loaded.pois.len(),
            if loaded.failures.is_empty() {
                String::new()
            } else {
                format!(", {} failed", loaded.failures.len())
            }
        );

        let flags = config.active_flags();
        self.atlas = Some(Atlas::from_loaded(loaded, &flags, map, chrono::Utc::now()));
        self.focus = Some(Panel::Overlays);
        self.rebuild_sidebar();
    }

    fn refresh(&mut self) {
        let (Some(atlas), Some(map)) = (self.atlas.as_mut(), self.map.as_ref()) else {
            return;
        };
        if atlas.refresh_nearby(map, chrono::Utc::now()) {
            self.rebuild_sidebar();
        }
    }

    fn rebuild_sidebar(&mut self) {
        if let (Some(atlas), Some(map)) = (self.atlas.as_ref(), self.map.as_ref()) {
            self.sidebar = atlas.sidebar(map);
        }
        for (slot, panel) in Panel::ALL.into_iter().enumerate() {
            let len = self.sidebar.len(panel);
            self.selections[slot] = self.selections[slot].min(len.saturating_sub(1));
        }
    }

    pub fn selected(&self, panel: Panel) -> usize {
        self.selections[slot(panel)]
    }

    pub fn move_selection(&mut self, forward: bool) {
        let Some(panel) = self.focus else {
            return;
        };
        let len = self.sidebar.len(panel);
        if len == 0 {
            return;
        }
        let current = self.selected(panel);
        self.selections[slot(panel)] = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
    }

    /// Jumps to the first (`last == false`) or last row of the focused panel.
    pub fn select_edge(&mut self, last: bool) {
        let Some(panel) = self.focus else {
            return;
        };
        let len = self.sidebar.len(panel);
        self.selections[slot(panel)] = if last { len.saturating_sub(1) } else { 0 };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.map(Panel::next);
    }

    pub fn pan(&mut self, lat_steps: f64, lng_steps: f64) {
        if let Some(map) = self.map.as_mut() {
            map.pan(lat_steps * PAN_STEP, lng_steps * PAN_STEP);
        }
        self.refresh();
    }

    pub fn zoom(&mut self, zoom_in: bool) {
        let changed = self
            .map
            .as_mut()
            .is_some_and(|map| if zoom_in { map.zoom_in() } else { map.zoom_out() });
        if changed {
            self.refresh();
        }
    }

    pub fn toggle_selected_overlay(&mut self) {
        let index = self.selected(Panel::Overlays);
        let (Some(atlas), Some(map)) = (self.atlas.as_mut(), self.map.as_mut()) else {
            return;
        };
        self.status = match atlas.toggle(index, map) {
            Ok(outcome) => {
                let name = atlas
                    .overlays()
                    .get(index)
                    .map_or("overlay", |overlay| overlay.name.as_str());
                match outcome {
                    ToggleOutcome::Shown { markers } => format!("Showing {name} ({markers} markers)"),
                    ToggleOutcome::Hidden { markers } => format!("Hid {name} ({markers} markers)"),
                }
            }
            Err(e) => format!("Error: {e}"),
        };
        self.rebuild_sidebar();
    }

    pub fn activate(&mut self) {
        match self.focus {
            Some(Panel::Overlays) => self.toggle_selected_overlay(),
            Some(panel) => {
                let target = self
                    .sidebar
                    .poi_entry(panel, self.selected(panel))
                    .map(|entry| entry.target);
                if let (Some(target), Some(map)) = (target, self.map.as_mut()) {
                    Atlas::navigate(target, map);
                    self.refresh();
                }
            }
            None => {}
        }
    }
}

const fn slot(panel: Panel) -> usize {
    match panel {
        Panel::Overlays => 0,
        Panel::Geo => 1,
        Panel::Chrono => 2,
        Panel::Recent => 3,
        Panel::Map => 4,
    }
}
