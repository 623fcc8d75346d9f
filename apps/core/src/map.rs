//! In-process map surface: view state plus the markers drawn on it.
//!
//! Front ends draw a [`MapView`] onto a canvas; the overlay state manager only
//! talks to it through [`MarkerLayer`].

use crate::domain::Poi;
use crate::geo::LatLng;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;
/// Drawing stops short of the poles; the view center itself may go to ±90.
const MAX_DRAW_LATITUDE: f64 = 85.0;

/// Content bound to a marker, shown when the marker is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub caption: String,
    pub description: String,
    pub display_time: Option<String>,
    pub images: Vec<String>,
}

impl Popup {
    pub fn from_poi(poi: &Poi) -> Self {
        Self {
            caption: poi.caption.clone(),
            description: poi.description.clone(),
            display_time: poi.display_time.clone(),
            images: poi.images.clone(),
        }
    }

    /// Body lines below the caption. The image section only appears when
    /// there is at least one image.
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = vec![self.description.clone()];
        if let Some(time) = &self.display_time {
            lines.push(format!("Time: {time}"));
        }
        if !self.images.is_empty() {
            lines.push("Images:".to_string());
            lines.extend(self.images.iter().map(|image| format!("  [img] {image}")));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub overlay_index: usize,
    pub position: LatLng,
    pub popup: Popup,
}

impl Marker {
    pub fn for_poi(poi: &Poi, overlay_index: usize) -> Self {
        Self {
            overlay_index,
            position: poi.position(),
            popup: Popup::from_poi(poi),
        }
    }
}

/// The part of a map the overlay state manager needs.
pub trait MarkerLayer {
    fn add_marker(&mut self, marker: Marker);

    /// Removes every marker tagged with `overlay_index`, returning how many went.
    fn remove_markers_for(&mut self, overlay_index: usize) -> usize;

    fn marker_count_for(&self, overlay_index: usize) -> usize;
}

/// Geographic extent of the visible map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Longitudes are compared modulo 360, so a view straddling the
    /// antimeridian still contains points on both sides of it.
    pub fn contains(&self, position: LatLng) -> bool {
        (self.south..=self.north).contains(&position.lat)
            && self.wrap_lng(position.lng) <= self.east
    }

    /// Shifts `lng` by whole turns into `[west, west + 360)`, the frame the
    /// canvas x axis uses.
    pub fn wrap_lng(&self, lng: f64) -> f64 {
        self.west + (lng - self.west).rem_euclid(360.0)
    }
}

#[derive(Debug, Clone)]
pub struct MapView {
    center: LatLng,
    zoom: u8,
    markers: Vec<Marker>,
    generation: u64,
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center: normalize(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            markers: Vec::new(),
            generation: 0,
        }
    }

    pub const fn center(&self) -> LatLng {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Bumped on every view change; stands in for the map's `moveend` event.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Width of the visible area in degrees of longitude.
    pub fn span_degrees(&self) -> f64 {
        360.0 / f64::from(1_u32 << (self.zoom - MIN_ZOOM))
    }

    /// Moves the center by a fraction of the visible span on each axis.
    pub fn pan(&mut self, lat_fraction: f64, lng_fraction: f64) {
        let span = self.span_degrees();
        let target = LatLng::new(
            lat_fraction.mul_add(span / 2.0, self.center.lat),
            lng_fraction.mul_add(span, self.center.lng),
        );
        self.set_view(target, self.zoom);
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom.saturating_add(1))
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom.saturating_sub(1))
    }

    fn set_zoom(&mut self, zoom: u8) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return false;
        }
        self.set_view(self.center, zoom);
        true
    }

    /// Re-centers on `target`, keeping the current zoom.
    pub fn fly_to(&mut self, target: LatLng) {
        self.set_view(target, self.zoom);
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = normalize(center);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.generation += 1;
    }

    /// Visible extent for a viewport whose width is `aspect` times its height.
    pub fn bounds(&self, aspect: f64) -> Bounds {
        let width = self.span_degrees();
        let height = (width / aspect.max(0.1)).min(180.0);
        let lat = self.center.lat.clamp(-MAX_DRAW_LATITUDE, MAX_DRAW_LATITUDE);
        Bounds {
            south: lat - height / 2.0,
            west: self.center.lng - width / 2.0,
            north: lat + height / 2.0,
            east: self.center.lng + width / 2.0,
        }
    }

    pub fn nearest_marker(&self, position: LatLng) -> Option<&Marker> {
        self.markers.iter().min_by(|a, b| {
            a.position
                .distance_to(position)
                .total_cmp(&b.position.distance_to(position))
        })
    }
}

impl MarkerLayer for MapView {
    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn remove_markers_for(&mut self, overlay_index: usize) -> usize {
        let before = self.markers.len();
        self.markers
            .retain(|marker| marker.overlay_index != overlay_index);
        before - self.markers.len()
    }

    fn marker_count_for(&self, overlay_index: usize) -> usize {
        self.markers
            .iter()
            .filter(|marker| marker.overlay_index == overlay_index)
            .count()
    }
}

fn normalize(position: LatLng) -> LatLng {
    LatLng::new(
        position.lat.clamp(-90.0, 90.0),
        (position.lng + 180.0).rem_euclid(360.0) - 180.0,
    )
}
