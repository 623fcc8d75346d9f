use dotenv::dotenv;
use overlay_core::{AtlasConfig, ConfigError};
use std::env;
use std::path::{Path, PathBuf};

/// Where the configuration and overlay files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub config_path: PathBuf,
    pub overlay_dir: PathBuf,
}

/// Resolves runtime paths from the environment.
///
/// `ATLAS_CONFIG` defaults to `config.json`; `ATLAS_OVERLAY_DIR` defaults to
/// the `overlays` directory next to the configuration file.
pub fn init_runtime_paths() -> RuntimePaths {
    // Load environment variables from .env file
    dotenv().ok();

    let config_path =
        env::var("ATLAS_CONFIG").map_or_else(|_| PathBuf::from("config.json"), PathBuf::from);

    let overlay_dir = env::var("ATLAS_OVERLAY_DIR")
        .map_or_else(|_| default_overlay_dir(&config_path), PathBuf::from);

    RuntimePaths {
        config_path,
        overlay_dir,
    }
}

fn default_overlay_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("overlays")
}

/// Reads and parses the configuration file.
pub async fn load_config(path: &Path) -> Result<AtlasConfig, ConfigError> {
    let json = tokio::fs::read_to_string(path).await?;
    AtlasConfig::from_json_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn overlay_dir_sits_next_to_config() {
        assert_eq!(
            default_overlay_dir(Path::new("/srv/atlas/config.json")),
            PathBuf::from("/srv/atlas/overlays")
        );
        assert_eq!(
            default_overlay_dir(Path::new("config.json")),
            PathBuf::from("overlays")
        );
    }

    #[tokio::test]
    async fn loads_config_from_disk() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"overlayFiles":["a.json"],"mapCenter":[10,10],"mapZoom":5,"overlayActive":[true]}}"#
        )?;

        let config = load_config(file.path()).await?;
        assert_eq!(config.overlay_files, vec!["a.json"]);
        assert_eq!(config.map_zoom, 5);

        Ok(())
    }

    #[tokio::test]
    async fn missing_config_is_an_io_error() {
        let error = load_config(Path::new("/definitely/not/here/config.json"))
            .await
            .unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
