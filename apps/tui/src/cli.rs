use clap::{CommandFactory, Parser};
use overlay_core::LatLng;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "overlay_atlas", version, about = "POI overlay map browser")]
pub struct CliArgs {
    /// Path to config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Directory holding the overlay files
    #[arg(long = "overlay-dir", value_name = "PATH")]
    pub overlay_dir: Option<String>,

    /// Print the nearby view and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Map center for headless output, as LAT,LON
    #[arg(long, value_name = "LAT,LON", value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<LatLng>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(config) = &self.config {
            std::env::set_var("ATLAS_CONFIG", config);
        }
        if let Some(dir) = &self.overlay_dir {
            std::env::set_var("ATLAS_OVERLAY_DIR", dir);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CenterError {
    #[error("expected LAT,LON, got {0}")]
    Format(String),
    #[error("invalid latitude {0}: {1}")]
    Latitude(String, ParseFloatError),
    #[error("invalid longitude {0}: {1}")]
    Longitude(String, ParseFloatError),
}

fn parse_center(value: &str) -> Result<LatLng, CenterError> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| CenterError::Format(value.to_string()))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| CenterError::Latitude(lat.to_string(), e))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| CenterError::Longitude(lon.to_string(), e))?;
    Ok(LatLng::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_center_pair() {
        assert_eq!(parse_center("10.5, -3"), Ok(LatLng::new(10.5, -3.0)));
        assert_eq!(
            parse_center("10.5"),
            Err(CenterError::Format("10.5".to_string()))
        );
        assert!(matches!(
            parse_center("north,south"),
            Err(CenterError::Latitude(lat, _)) if lat == "north"
        ));
    }

    #[test]
    fn parses_full_command_line() {
        let args = CliArgs::parse_from([
            "overlay_atlas",
            "--config",
            "demo/config.json",
            "--headless",
            "--json",
            "--center",
            "-33.9,151.2",
        ]);

        assert_eq!(args.config.as_deref(), Some("demo/config.json"));
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.center, Some(LatLng::new(-33.9, 151.2)));
        assert!(!args.debug);
    }

    #[test]
    fn help_mentions_flags() {
        let help = CliArgs::help_text();
        assert!(help.contains("--overlay-dir"));
        assert!(help.contains("--headless"));
    }
}
