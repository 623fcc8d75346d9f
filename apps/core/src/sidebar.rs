use crate::domain::{Overlay, Poi};
use crate::geo::LatLng;
use crate::map::MarkerLayer;
use crate::nearby::NearbyView;
use crate::overlays::OverlayState;

/// Sidebar sections, in focus order. `Map` is the map canvas itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Overlays,
    Geo,
    Chrono,
    Recent,
    Map,
}

impl Panel {
    pub const ALL: [Self; 5] = [Self::Overlays, Self::Geo, Self::Chrono, Self::Recent, Self::Map];

    pub const fn next(self) -> Self {
        match self {
            Self::Overlays => Self::Geo,
            Self::Geo => Self::Chrono,
            Self::Chrono => Self::Recent,
            Self::Recent => Self::Map,
            Self::Map => Self::Overlays,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Overlays => "Overlays",
            Self::Geo => "Geographical Nearby",
            Self::Chrono => "Chronological Nearby",
            Self::Recent => "Most Recent",
            Self::Map => "Map",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub index: usize,
    pub name: String,
    pub checked: bool,
    pub markers: usize,
}

/// A clickable POI summary; activating it re-centers the map on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiEntry {
    pub caption: String,
    pub description: String,
    pub detail: String,
    pub overlay: String,
    pub target: LatLng,
}

impl PoiEntry {
    fn new(poi: &Poi, detail: String) -> Self {
        Self {
            caption: poi.caption.clone(),
            description: poi.description.clone(),
            detail,
            overlay: poi.overlay.clone(),
            target: poi.position(),
        }
    }
}

/// Everything the sidebar shows, rebuilt from scratch on each render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarModel {
    pub overlays: Vec<OverlayEntry>,
    pub geo: Vec<PoiEntry>,
    pub chrono: Vec<PoiEntry>,
    pub recent: Option<PoiEntry>,
}

impl SidebarModel {
    pub fn build<L: MarkerLayer>(
        overlays: &[Overlay],
        state: &OverlayState,
        pois: &[Poi],
        view: &NearbyView,
        layer: &L,
    ) -> Self {
        let overlay_entries = overlays
            .iter()
            .enumerate()
            .map(|(index, overlay)| OverlayEntry {
                index,
                name: overlay.name.clone(),
                checked: state.is_active(index),
                markers: layer.marker_count_for(index),
            })
            .collect();

        let geo = view
            .geo
            .iter()
            .filter_map(|hit| {
                pois.get(hit.poi).map(|poi| {
                    PoiEntry::new(poi, format!("Distance: {:.2} km", hit.distance_km))
                })
            })
            .collect();

        let chrono = view
            .chrono
            .iter()
            .filter_map(|index| pois.get(*index))
            .map(|poi| {
                let time = poi
                    .display_time
                    .as_deref()
                    .or(poi.timestamp.as_deref())
                    .unwrap_or("-");
                PoiEntry::new(poi, format!("Time: {time}"))
            })
            .collect();

        let recent = view
            .most_recent
            .and_then(|index| pois.get(index))
            .map(|poi| PoiEntry::new(poi, format!("Created: {}", poi.creation_time)));

        Self {
            overlays: overlay_entries,
            geo,
            chrono,
            recent,
        }
    }

    /// Number of selectable rows in `panel`.
    pub fn len(&self, panel: Panel) -> usize {
        match panel {
            Panel::Overlays => self.overlays.len(),
            Panel::Geo => self.geo.len(),
            Panel::Chrono => self.chrono.len(),
            Panel::Recent => usize::from(self.recent.is_some()),
            Panel::Map => 0,
        }
    }

    pub fn poi_entry(&self, panel: Panel, selected: usize) -> Option<&PoiEntry> {
        match panel {
            Panel::Geo => self.geo.get(selected),
            Panel::Chrono => self.chrono.get(selected),
            Panel::Recent => self.recent.as_ref(),
            Panel::Overlays | Panel::Map => None,
        }
    }
}
