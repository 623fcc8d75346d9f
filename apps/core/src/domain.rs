use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// One entry of an overlay file, before it is tagged with its overlay.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub caption: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub display_time: Option<String>,
    pub timestamp: Option<String>,
    pub creation_time: String,
}

/// Contents of a single overlay file.
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayFile {
    pub name: String,
    pub points: Vec<PoiRecord>,
}

impl OverlayFile {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A point of interest tagged with the overlay it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub caption: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub images: Vec<String>,
    pub display_time: Option<String>,
    pub timestamp: Option<String>,
    pub creation_time: String,
    pub overlay: String,
    #[serde(skip)]
    timestamp_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    created_at: Option<DateTime<Utc>>,
}

impl Poi {
    pub fn from_record(record: PoiRecord, overlay: &str) -> Self {
        let timestamp_at = record.timestamp.as_deref().and_then(parse_datetime);
        let created_at = parse_datetime(&record.creation_time);

        Self {
            caption: record.caption,
            description: record.description,
            latitude: record.latitude,
            longitude: record.longitude,
            images: record.images,
            display_time: record.display_time,
            timestamp: record.timestamp,
            creation_time: record.creation_time,
            overlay: overlay.to_string(),
            timestamp_at,
            created_at,
        }
    }

    pub const fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Parsed `timestamp`, `None` when absent or unparseable.
    pub const fn timestamp_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_at
    }

    /// Parsed `creationTime`, `None` when unparseable.
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// A named collection of POIs loaded from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub name: String,
    pub points: Vec<Poi>,
    /// Position of the originating file in the configured file list.
    pub source_index: usize,
}

impl Overlay {
    pub fn from_file(file: OverlayFile, source_index: usize) -> Self {
        let points = file
            .points
            .into_iter()
            .map(|record| Poi::from_record(record, &file.name))
            .collect();

        Self {
            name: file.name,
            points,
            source_index,
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the datetime strings found in overlay files.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and bare dates (UTC
/// midnight).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
