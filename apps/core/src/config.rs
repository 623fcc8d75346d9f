use serde::Deserialize;
use thiserror::Error;

use crate::geo::LatLng;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch configuration: {0}")]
    Fetch(String),
}

/// Startup configuration, read once from `config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasConfig {
    pub overlay_files: Vec<String>,
    pub map_center: [f64; 2],
    pub map_zoom: u8,
    /// One flag per entry of `overlay_files`.
    #[serde(default)]
    pub overlay_active: Vec<bool>,
}

impl AtlasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn center(&self) -> LatLng {
        self.map_center.into()
    }

    /// Activation flags aligned with `overlay_files`; missing flags are `false`
    /// and surplus flags are dropped.
    pub fn active_flags(&self) -> Vec<bool> {
        (0..self.overlay_files.len())
            .map(|index| self.overlay_active.get(index).copied().unwrap_or(false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_config() {
        let config = AtlasConfig::from_json_str(
            r#"{"overlayFiles":["a.json","b.json"],"mapCenter":[10,10],"mapZoom":5,"overlayActive":[true,false]}"#,
        )
        .unwrap();

        assert_eq!(config.overlay_files, vec!["a.json", "b.json"]);
        assert_eq!(config.center(), LatLng::new(10.0, 10.0));
        assert_eq!(config.map_zoom, 5);
        assert_eq!(config.active_flags(), vec![true, false]);
    }

    #[test]
    fn active_flags_pad_and_truncate() {
        let mut config = AtlasConfig {
            overlay_files: vec!["a".into(), "b".into(), "c".into()],
            map_center: [0.0, 0.0],
            map_zoom: 3,
            overlay_active: vec![true],
        };
        assert_eq!(config.active_flags(), vec![true, false, false]);

        config.overlay_active = vec![false, true, true, true, true];
        assert_eq!(config.active_flags(), vec![false, true, true]);
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let error = AtlasConfig::from_json_str(r#"{"overlayFiles":[]}"#).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
