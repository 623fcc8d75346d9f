use overlay_core::sidebar::PoiEntry;
use overlay_core::{Atlas, MapView, MarkerLayer, Poi};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlessReport {
    pub center: [f64; 2],
    pub zoom: u8,
    pub overlays: Vec<ReportOverlay>,
    pub geo_nearby: Vec<ReportPoi>,
    pub chrono_nearby: Vec<ReportPoi>,
    pub most_recent: Option<ReportPoi>,
    pub failures: Vec<ReportFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOverlay {
    pub name: String,
    pub active: bool,
    pub points: usize,
    pub markers: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPoi {
    #[serde(flatten)]
    pub poi: Poi,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Same text the sidebar shows under the caption.
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct ReportFailure {
    pub file: String,
    pub error: String,
}

pub fn build_report(atlas: &Atlas, map: &MapView) -> HeadlessReport {
    let pois = atlas.pois();
    let nearby = atlas.nearby();
    let sidebar = atlas.sidebar(map);

    let report_poi = |index: usize, distance_km: Option<f64>, entry: &PoiEntry| {
        pois.get(index).map(|poi| ReportPoi {
            poi: poi.clone(),
            distance_km,
            detail: entry.detail.clone(),
        })
    };

    let overlays = atlas
        .overlays()
        .iter()
        .enumerate()
        .map(|(index, overlay)| ReportOverlay {
            name: overlay.name.clone(),
            active: atlas.state().is_active(index),
            points: overlay.points.len(),
            markers: map.marker_count_for(index),
        })
        .collect();

    HeadlessReport {
        center: [map.center().lat, map.center().lng],
        zoom: map.zoom(),
        overlays,
        geo_nearby: nearby
            .geo
            .iter()
            .zip(&sidebar.geo)
            .filter_map(|(hit, entry)| report_poi(hit.poi, Some(hit.distance_km), entry))
            .collect(),
        chrono_nearby: nearby
            .chrono
            .iter()
            .zip(&sidebar.chrono)
            .filter_map(|(index, entry)| report_poi(*index, None, entry))
            .collect(),
        most_recent: nearby
            .most_recent
            .zip(sidebar.recent.as_ref())
            .and_then(|(index, entry)| report_poi(index, None, entry)),
        failures: atlas
            .failures()
            .iter()
            .map(|failure| ReportFailure {
                file: failure.file.clone(),
                error: failure.error.to_string(),
            })
            .collect(),
    }
}

pub fn render_text(report: &HeadlessReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nOverlay Atlas");
    let _ = writeln!(out, "=============");
    let _ = writeln!(
        out,
        "Center: {:.4}, {:.4}  Zoom: {}",
        report.center[0], report.center[1], report.zoom
    );

    let _ = writeln!(out, "\nOverlays:");
    for overlay in &report.overlays {
        let mark = if overlay.active { "x" } else { " " };
        let _ = writeln!(
            out,
            "- [{mark}] {} ({} points, {} markers)",
            overlay.name, overlay.points, overlay.markers
        );
    }

    let _ = writeln!(out, "\nGeographical Nearby:");
    for entry in &report.geo_nearby {
        let _ = writeln!(
            out,
            "- {} | {} | {}",
            entry.poi.caption, entry.poi.overlay, entry.detail
        );
    }

    let _ = writeln!(out, "\nChronological Nearby:");
    for entry in &report.chrono_nearby {
        let _ = writeln!(
            out,
            "- {} | {} | {}",
            entry.poi.caption, entry.poi.overlay, entry.detail
        );
    }

    let _ = writeln!(out, "\nMost Recent:");
    match &report.most_recent {
        Some(entry) => {
            let _ = writeln!(out, "- {} | {}", entry.poi.caption, entry.detail);
        }
        None => {
            let _ = writeln!(out, "- (no points loaded)");
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "\nFailed overlays:");
        for failure in &report.failures {
            let _ = writeln!(out, "- {}: {}", failure.file, failure.error);
        }
    }

    out
}
