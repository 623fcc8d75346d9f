use chrono::Utc;
use overlay_core::{
    Atlas, AtlasConfig, LoadedOverlays, MapView, Panel, SidebarModel, ToggleOutcome,
};
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

const THROBBER_TICK: Duration = Duration::from_millis(120);
/// Fraction of the visible span moved per arrow key press.
pub const PAN_STEP: f64 = 0.1;

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: AtlasConfig,
    pub map: MapView,
    pub atlas: Option<Atlas>,
    pub sidebar: SidebarModel,
    pub focus: Panel,
    selections: [usize; Panel::ALL.len()],
    pub show_help: bool,
    pub show_popup: bool,
    pub status_message: String,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
}

impl App {
    pub fn new(config: AtlasConfig) -> Self {
        let map = MapView::new(config.center(), config.map_zoom);
        Self {
            running: true,
            config,
            map,
            atlas: None,
            sidebar: SidebarModel::default(),
            focus: Panel::Overlays,
            selections: [0; Panel::ALL.len()],
            show_help: false,
            show_popup: false,
            status_message: "Loading overlays...".to_string(),
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
        }
    }

    pub const fn is_loading(&self) -> bool {
        self.atlas.is_none()
    }

    /// Advances the loading spinner.
    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_frame) >= THROBBER_TICK {
            self.last_frame = now;
            if self.is_loading() {
                self.throbber.calc_next();
            }
        }
    }

    /// Installs the result of the overlay batch load and renders the first
    /// sidebar.
    pub fn finish_loading(&mut self, loaded: LoadedOverlays) {
        let overlay_count = loaded.overlays.len();
        let poi_count = loaded.pois.len();
        let failures = loaded.failures.len();

        self.status_message = match loaded.last_failure() {
            Some(last) => format!(
                "Loaded {overlay_count} overlays ({poi_count} points), {failures} failed. Last: {}: {}",
                last.file, last.error
            ),
            None => format!("Loaded {overlay_count} overlays ({poi_count} points)"),
        };

        let atlas = Atlas::from_loaded(
            loaded,
            &self.config.active_flags(),
            &mut self.map,
            Utc::now(),
        );
        self.atlas = Some(atlas);
        self.rebuild_sidebar();
    }

    /// Recomputes the nearby view after a pan or zoom. Cheap when the view
    /// has not changed.
    pub fn refresh(&mut self) {
        let Some(atlas) = self.atlas.as_mut() else {
            return;
        };
        if atlas.refresh_nearby(&self.map, Utc::now()) {
            self.rebuild_sidebar();
        }
    }

    fn rebuild_sidebar(&mut self) {
        if let Some(atlas) = &self.atlas {
            self.sidebar = atlas.sidebar(&self.map);
        }
        for panel in Panel::ALL {
            let len = self.sidebar.len(panel);
            let selected = &mut self.selections[panel_slot(panel)];
            *selected = (*selected).min(len.saturating_sub(1));
        }
    }

    pub const fn selected(&self, panel: Panel) -> usize {
        self.selections[panel_slot(panel)]
    }

    pub fn set_selected(&mut self, panel: Panel, index: usize) {
        self.selections[panel_slot(panel)] = index;
    }

    pub fn pan(&mut self, lat_steps: f64, lng_steps: f64) {
        self.map.pan(lat_steps * PAN_STEP, lng_steps * PAN_STEP);
        self.refresh();
    }

    pub fn zoom_in(&mut self) {
        if self.map.zoom_in() {
            self.refresh();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.map.zoom_out() {
            self.refresh();
        }
    }

    /// Toggles the overlay under the cursor in the overlay list.
    pub fn toggle_selected_overlay(&mut self) {
        let index = self.selected(Panel::Overlays);
        let Some(atlas) = self.atlas.as_mut() else {
            return;
        };

        match atlas.toggle(index, &mut self.map) {
            Ok(outcome) => {
                let name = atlas
                    .overlays()
                    .get(index)
                    .map_or("overlay", |overlay| overlay.name.as_str());
                self.status_message = match outcome {
                    ToggleOutcome::Shown { markers } => format!("Showing {name} ({markers} markers)"),
                    ToggleOutcome::Hidden { markers } => format!("Hid {name} ({markers} markers)"),
                };
            }
            Err(e) => {
                self.status_message = format!("Error: {e}");
            }
        }
        self.rebuild_sidebar();
    }

    /// Flies the map to the POI selected in the focused nearby panel.
    pub fn navigate_selected(&mut self) {
        let Some(entry) = self.sidebar.poi_entry(self.focus, self.selected(self.focus)) else {
            return;
        };
        let caption = entry.caption.clone();
        Atlas::navigate(entry.target, &mut self.map);
        self.status_message = format!("Centered on {caption}");
        self.refresh();
    }
}

const fn panel_slot(panel: Panel) -> usize {
    match panel {
        Panel::Overlays => 0,
        Panel::Geo => 1,
        Panel::Chrono => 2,
        Panel::Recent => 3,
        Panel::Map => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::{LatLng, MarkerLayer, Overlay, OverlayFile};

    fn config() -> AtlasConfig {
        AtlasConfig {
            overlay_files: vec!["a.json".into(), "b.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![true, false],
        }
    }

    fn loaded() -> LoadedOverlays {
        let a = OverlayFile::from_json_str(
            r#"{"name":"A","points":[
                {"latitude":10,"longitude":10,"caption":"X","description":"d","images":[],"creationTime":"2024-01-01"},
                {"latitude":10.2,"longitude":10,"caption":"Y","description":"d","images":[],"creationTime":"2024-02-01"}
            ]}"#,
        )
        .unwrap();
        let b = OverlayFile::from_json_str(
            r#"{"name":"B","points":[
                {"latitude":-30,"longitude":150,"caption":"Z","description":"far","images":[],"creationTime":"2023-01-01"}
            ]}"#,
        )
        .unwrap();
        let overlays = vec![Overlay::from_file(a, 0), Overlay::from_file(b, 1)];
        LoadedOverlays {
            pois: overlays.iter().flat_map(|o| o.points.clone()).collect(),
            overlays,
            failures: Vec::new(),
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(config());
        app.finish_loading(loaded());
        app
    }

    #[test]
    fn starts_loading_then_renders_sidebar() {
        let mut app = App::new(config());
        assert!(app.is_loading());

        app.finish_loading(loaded());
        assert!(!app.is_loading());
        assert_eq!(app.status_message, "Loaded 2 overlays (3 points)");
        assert_eq!(app.sidebar.overlays.len(), 2);
        assert_eq!(app.sidebar.geo.len(), 2);
        assert_eq!(app.sidebar.recent.as_ref().map(|e| e.caption.as_str()), Some("Y"));
        assert_eq!(app.map.marker_count_for(0), 2);
    }

    #[test]
    fn toggling_selected_overlay_updates_markers_and_status() {
        let mut app = loaded_app();
        app.set_selected(Panel::Overlays, 1);

        app.toggle_selected_overlay();
        assert_eq!(app.map.marker_count_for(1), 1);
        assert_eq!(app.status_message, "Showing B (1 markers)");
        assert!(app.sidebar.overlays[1].checked);

        app.toggle_selected_overlay();
        assert_eq!(app.map.marker_count_for(1), 0);
        assert!(!app.sidebar.overlays[1].checked);
    }

    #[test]
    fn navigating_recenters_and_recomputes() {
        let mut app = loaded_app();
        app.focus = Panel::Recent;

        app.navigate_selected();
        assert_eq!(app.map.center(), LatLng::new(10.2, 10.0));
        assert_eq!(app.status_message, "Centered on Y");
        assert_eq!(app.map.zoom(), 5);
    }

    #[test]
    fn panning_away_empties_geo_and_clamps_selection() {
        let mut app = loaded_app();
        app.set_selected(Panel::Geo, 1);

        for _ in 0..20 {
            app.pan(0.0, 1.0);
        }
        assert!(app.sidebar.geo.is_empty());
        assert_eq!(app.selected(Panel::Geo), 0);
    }

    #[test]
    fn actions_before_load_are_ignored() {
        let mut app = App::new(config());
        app.toggle_selected_overlay();
        app.navigate_selected();
        app.pan(1.0, 0.0);
        assert!(app.map.markers().is_empty());
        assert!(app.sidebar.overlays.is_empty());
    }
}
