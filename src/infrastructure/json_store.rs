use crate::application::engine::BatchSnapshot;
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Loads and saves batch snapshots as JSON files.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the snapshot. A missing file is a fresh batch, not an error.
    pub fn load(&self) -> Result<Option<BatchSnapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn save(&self, snapshot: &BatchSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
