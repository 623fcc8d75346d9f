use overlay_core::{OverlayFile, OverlaySource, SourceError};
use std::path::PathBuf;

/// Reads overlay files from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OverlaySource for FileSource {
    async fn fetch(&self, file: &str) -> Result<OverlayFile, SourceError> {
        let json = tokio::fs::read_to_string(self.dir.join(file)).await?;
        Ok(OverlayFile::from_json_str(&json)?)
    }
}
