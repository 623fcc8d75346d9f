use chrono::{DateTime, Utc};

use crate::domain::Poi;
use crate::geo::LatLng;

/// POIs closer than this to the map center are geographically nearby.
pub const GEO_RADIUS_KM: f64 = 50.0;
/// POIs whose timestamp is within this window of now are chronologically nearby.
pub const CHRONO_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoHit {
    /// Index into the aggregated POI list.
    pub poi: usize,
    pub distance_km: f64,
}

/// Derived views over the aggregated POIs. All indices point into the slice
/// the view was computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyView {
    pub center: Option<LatLng>,
    pub geo: Vec<GeoHit>,
    pub chrono: Vec<usize>,
    pub most_recent: Option<usize>,
}

pub fn compute_nearby(pois: &[Poi], center: LatLng, now: DateTime<Utc>) -> NearbyView {
    NearbyView {
        center: Some(center),
        geo: geo_nearby(pois, center),
        chrono: chrono_nearby(pois, now),
        most_recent: most_recent(pois),
    }
}

pub fn geo_nearby(pois: &[Poi], center: LatLng) -> Vec<GeoHit> {
    pois.iter()
        .enumerate()
        .filter_map(|(index, poi)| {
            let distance_km = center.distance_to(poi.position());
            (distance_km < GEO_RADIUS_KM).then_some(GeoHit {
                poi: index,
                distance_km,
            })
        })
        .collect()
}

pub fn chrono_nearby(pois: &[Poi], now: DateTime<Utc>) -> Vec<usize> {
    pois.iter()
        .enumerate()
        .filter(|(_, poi)| {
            poi.timestamp_at().is_some_and(|timestamp| {
                (now - timestamp).num_milliseconds().abs() < CHRONO_WINDOW_MS
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// Index of the POI with the latest creation time. Ties keep the first one
/// seen; unparseable creation times never beat a parsed one.
pub fn most_recent(pois: &[Poi]) -> Option<usize> {
    let mut best: Option<(usize, Option<DateTime<Utc>>)> = None;

    for (index, poi) in pois.iter().enumerate() {
        let created = poi.created_at();
        match best {
            Some((_, best_created)) if created <= best_created => {}
            _ => best = Some((index, created)),
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PoiRecord;
    use chrono::{Duration, TimeZone};

    fn poi(caption: &str, lat: f64, lng: f64) -> PoiRecord {
        PoiRecord {
            latitude: lat,
            longitude: lng,
            caption: caption.to_string(),
            description: "d".to_string(),
            images: Vec::new(),
            display_time: None,
            timestamp: None,
            creation_time: "2024-01-01".to_string(),
        }
    }

    fn tag(records: Vec<PoiRecord>) -> Vec<Poi> {
        records
            .into_iter()
            .map(|record| Poi::from_record(record, "A"))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn poi_at_center_is_nearby_with_zero_distance() {
        let pois = tag(vec![poi("X", 10.0, 10.0)]);
        let view = compute_nearby(&pois, LatLng::new(10.0, 10.0), now());

        assert_eq!(view.geo.len(), 1);
        assert_eq!(view.geo[0].poi, 0);
        assert_eq!(format!("{:.2}", view.geo[0].distance_km), "0.00");
    }

    #[test]
    fn geo_radius_is_strict_and_keeps_order() {
        // 0.4 degrees of latitude is ~44.5 km, 0.5 is ~55.6 km.
        let pois = tag(vec![
            poi("far", 0.5, 0.0),
            poi("near-b", 0.4, 0.0),
            poi("center", 0.0, 0.0),
            poi("near-a", -0.4, 0.0),
        ]);

        let hits: Vec<_> = geo_nearby(&pois, LatLng::new(0.0, 0.0))
            .into_iter()
            .map(|hit| pois[hit.poi].caption.as_str())
            .collect();
        assert_eq!(hits, vec!["near-b", "center", "near-a"]);
    }

    #[test]
    fn chrono_window_is_thirty_days_either_side() {
        let stamp = |days: i64| (now() - Duration::days(days)).to_rfc3339();
        let mut records = vec![
            poi("29-before", 0.0, 0.0),
            poi("31-before", 0.0, 0.0),
            poi("29-after", 0.0, 0.0),
            poi("none", 0.0, 0.0),
            poi("garbage", 0.0, 0.0),
        ];
        records[0].timestamp = Some(stamp(29));
        records[1].timestamp = Some(stamp(31));
        records[2].timestamp = Some(stamp(-29));
        records[4].timestamp = Some("not a date".to_string());
        let pois = tag(records);

        let hits: Vec<_> = chrono_nearby(&pois, now())
            .into_iter()
            .map(|index| pois[index].caption.as_str())
            .collect();
        assert_eq!(hits, vec!["29-before", "29-after"]);
    }

    #[test]
    fn exactly_thirty_days_is_excluded() {
        let mut record = poi("edge", 0.0, 0.0);
        record.timestamp = Some((now() - Duration::days(30)).to_rfc3339());
        assert!(chrono_nearby(&tag(vec![record]), now()).is_empty());
    }

    #[test]
    fn most_recent_picks_latest_creation_time() {
        let mut records = vec![poi("jan", 0.0, 0.0), poi("jun", 0.0, 0.0), poi("mar", 0.0, 0.0)];
        records[0].creation_time = "2024-01-01".to_string();
        records[1].creation_time = "2024-06-01".to_string();
        records[2].creation_time = "2024-03-01".to_string();
        let pois = tag(records);

        assert_eq!(most_recent(&pois), Some(1));
    }

    #[test]
    fn most_recent_tie_keeps_first_seen() {
        let pois = tag(vec![poi("first", 0.0, 0.0), poi("second", 0.0, 0.0)]);
        assert_eq!(most_recent(&pois), Some(0));
    }

    #[test]
    fn unparseable_creation_time_never_wins() {
        let mut records = vec![poi("bad", 0.0, 0.0), poi("good", 0.0, 0.0)];
        records[0].creation_time = "someday".to_string();
        let pois = tag(records);
        assert_eq!(most_recent(&pois), Some(1));
    }

    #[test]
    fn empty_collection_has_no_most_recent() {
        let view = compute_nearby(&[], LatLng::new(0.0, 0.0), now());
        assert!(view.geo.is_empty());
        assert!(view.chrono.is_empty());
        assert_eq!(view.most_recent, None);
    }
}
