use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::{Overlay, Poi};
use crate::geo::LatLng;
use crate::loader::{LoadFailure, LoadedOverlays};
use crate::map::{MapView, Popup};
use crate::nearby::{compute_nearby, NearbyView};
use crate::overlays::{OverlayState, ToggleError, ToggleOutcome};
use crate::sidebar::SidebarModel;

/// Application state for one session: the loaded overlays, the flat POI list,
/// what is visible, and the last nearby view.
///
/// The map is owned by the front end and passed in, so the same controller
/// drives both the terminal and the browser build.
#[derive(Debug, Default)]
pub struct Atlas {
    overlays: Vec<Overlay>,
    pois: Vec<Poi>,
    state: OverlayState,
    failures: Vec<LoadFailure>,
    nearby: NearbyView,
    computed_for: Option<u64>,
}

impl Atlas {
    /// Takes ownership of a finished load, draws markers for the overlays
    /// flagged active and computes the first nearby view.
    ///
    /// `configured_flags` are aligned with the configured file list, not with
    /// the overlays that loaded.
    pub fn from_loaded(
        loaded: LoadedOverlays,
        configured_flags: &[bool],
        map: &mut MapView,
        now: DateTime<Utc>,
    ) -> Self {
        let flags = loaded.active_flags(configured_flags);
        let state = OverlayState::from_flags(&flags, loaded.overlays.len());
        state.show_active(&loaded.overlays, map);

        let mut atlas = Self {
            overlays: loaded.overlays,
            pois: loaded.pois,
            state,
            failures: loaded.failures,
            nearby: NearbyView::default(),
            computed_for: None,
        };
        atlas.refresh_nearby(map, now);
        atlas
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub const fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub const fn nearby(&self) -> &NearbyView {
        &self.nearby
    }

    /// Flips one overlay's visibility. The POI list is never touched.
    pub fn toggle(
        &mut self,
        index: usize,
        map: &mut MapView,
    ) -> Result<ToggleOutcome, ToggleError> {
        self.state.toggle(index, &self.overlays, map)
    }

    /// Recomputes the nearby view if the map moved since the last compute.
    /// Returns whether a recompute happened.
    pub fn refresh_nearby(&mut self, map: &MapView, now: DateTime<Utc>) -> bool {
        if self.computed_for == Some(map.generation()) {
            return false;
        }

        self.nearby = compute_nearby(&self.pois, map.center(), now);
        self.computed_for = Some(map.generation());
        debug!(
            "nearby recomputed at generation {}: {} geo, {} chrono",
            map.generation(),
            self.nearby.geo.len(),
            self.nearby.chrono.len()
        );
        true
    }

    pub fn sidebar(&self, map: &MapView) -> SidebarModel {
        SidebarModel::build(&self.overlays, &self.state, &self.pois, &self.nearby, map)
    }

    /// Re-centers the map on a POI, keeping the zoom.
    pub fn navigate(target: LatLng, map: &mut MapView) {
        map.fly_to(target);
    }

    pub fn popup_at_center(map: &MapView) -> Option<&Popup> {
        map.nearest_marker(map.center())
            .map(|marker| &marker.popup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AtlasConfig;
    use crate::loader::load_overlays;
    use crate::loader::tests::{overlay_json, MemorySource};
    use crate::map::MarkerLayer;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).single().unwrap()
    }

    async fn start(config: &AtlasConfig, source: &MemorySource) -> (Atlas, MapView) {
        let loaded = load_overlays(source, &config.overlay_files).await;
        let mut map = MapView::new(config.center(), config.map_zoom);
        let atlas = Atlas::from_loaded(loaded, &config.active_flags(), &mut map, now());
        (atlas, map)
    }

    #[tokio::test]
    async fn single_overlay_scenario() {
        let config = AtlasConfig::from_json_str(
            r#"{"overlayFiles":["a.json"],"mapCenter":[10,10],"mapZoom":5,"overlayActive":[true]}"#,
        )
        .unwrap();
        let source = MemorySource::default().with(
            "a.json",
            r#"{"name":"A","points":[{"latitude":10,"longitude":10,"caption":"X","description":"d","images":[],"creationTime":"2024-01-01"}]}"#,
        );

        let (atlas, map) = start(&config, &source).await;
        let sidebar = atlas.sidebar(&map);

        assert_eq!(sidebar.geo.len(), 1);
        assert_eq!(sidebar.geo[0].caption, "X");
        assert_eq!(sidebar.geo[0].detail, "Distance: 0.00 km");
        assert!(sidebar.chrono.is_empty());
        assert_eq!(sidebar.recent.map(|entry| entry.caption), Some("X".to_string()));
        assert!(sidebar.overlays[0].checked);
        assert_eq!(map.marker_count_for(0), 1);
    }

    #[tokio::test]
    async fn polar_poi_is_nearby_when_centered_on() {
        let config = AtlasConfig::from_json_str(
            r#"{"overlayFiles":["a.json"],"mapCenter":[88,0],"mapZoom":5,"overlayActive":[true]}"#,
        )
        .unwrap();
        let source = MemorySource::default().with(
            "a.json",
            r#"{"name":"A","points":[
                {"latitude":88,"longitude":0,"caption":"Pole","description":"d","images":[],"creationTime":"2024-01-01"},
                {"latitude":-89.9,"longitude":139.27,"caption":"Station","description":"d","images":[],"creationTime":"2024-01-02"}
            ]}"#,
        );

        let (mut atlas, mut map) = start(&config, &source).await;
        assert_eq!(map.center(), LatLng::new(88.0, 0.0));
        let sidebar = atlas.sidebar(&map);
        assert_eq!(sidebar.geo.len(), 1);
        assert_eq!(sidebar.geo[0].caption, "Pole");
        assert_eq!(sidebar.geo[0].detail, "Distance: 0.00 km");

        let station = atlas.sidebar(&map).recent.unwrap().target;
        Atlas::navigate(station, &mut map);
        assert!(atlas.refresh_nearby(&map, now()));
        assert_eq!(map.center(), LatLng::new(-89.9, 139.27));
        let sidebar = atlas.sidebar(&map);
        assert_eq!(sidebar.geo.len(), 1);
        assert_eq!(sidebar.geo[0].caption, "Station");
    }

    #[tokio::test]
    async fn failed_file_takes_its_flag_with_it() {
        let config = AtlasConfig {
            overlay_files: vec!["a.json".into(), "missing.json".into(), "c.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![false, false, true],
        };
        let source = MemorySource::default()
            .with("a.json", &overlay_json("A", &["a"]))
            .with("c.json", &overlay_json("C", &["c1", "c2"]));

        let (atlas, map) = start(&config, &source).await;

        assert_eq!(atlas.overlays().len(), 2);
        assert_eq!(atlas.failures().len(), 1);
        assert!(!atlas.state().is_active(0));
        assert!(atlas.state().is_active(1));
        assert_eq!(map.marker_count_for(1), 2);
        assert_eq!(map.markers().len(), 2);
    }

    #[tokio::test]
    async fn hidden_overlays_stay_nearby_eligible() {
        let config = AtlasConfig {
            overlay_files: vec!["a.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![true],
        };
        let source = MemorySource::default().with("a.json", &overlay_json("A", &["a1", "a2"]));
        let (mut atlas, mut map) = start(&config, &source).await;

        let outcome = atlas.toggle(0, &mut map).unwrap();
        assert_eq!(outcome, ToggleOutcome::Hidden { markers: 2 });
        assert_eq!(map.markers().len(), 0);
        assert_eq!(atlas.pois().len(), 2);
        assert_eq!(atlas.sidebar(&map).geo.len(), 2);

        atlas.toggle(0, &mut map).unwrap();
        assert_eq!(map.marker_count_for(0), 2);

        assert_eq!(
            atlas.toggle(5, &mut map),
            Err(ToggleError::OutOfRange { index: 5, len: 1 })
        );
    }

    #[tokio::test]
    async fn refresh_only_after_view_change() {
        let config = AtlasConfig {
            overlay_files: vec!["a.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![false],
        };
        let source = MemorySource::default().with("a.json", &overlay_json("A", &["a"]));
        let (mut atlas, mut map) = start(&config, &source).await;

        assert!(!atlas.refresh_nearby(&map, now()));
        assert_eq!(atlas.nearby().geo.len(), 1);

        Atlas::navigate(LatLng::new(40.0, -70.0), &mut map);
        assert!(atlas.refresh_nearby(&map, now()));
        assert!(atlas.nearby().geo.is_empty());
        assert_eq!(atlas.nearby().center, Some(LatLng::new(40.0, -70.0)));
    }

    #[tokio::test]
    async fn popup_at_center_reads_nearest_marker() {
        let config = AtlasConfig {
            overlay_files: vec!["a.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![true],
        };
        let source = MemorySource::default().with("a.json", &overlay_json("A", &["only"]));
        let (_atlas, map) = start(&config, &source).await;

        let popup = Atlas::popup_at_center(&map).unwrap();
        assert_eq!(popup.caption, "only");

        let empty = MapView::new(LatLng::new(0.0, 0.0), 3);
        assert!(Atlas::popup_at_center(&empty).is_none());
    }

    #[test]
    fn empty_atlas_has_no_recent() {
        let mut map = MapView::new(LatLng::new(0.0, 0.0), 3);
        let atlas = Atlas::from_loaded(LoadedOverlays::default(), &[], &mut map, now());
        assert_eq!(atlas.nearby().most_recent, None);
        assert!(atlas.sidebar(&map).recent.is_none());
    }
}
