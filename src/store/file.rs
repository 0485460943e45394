use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// Whole-file JSON document: read whole, write whole
pub struct JsonFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl JsonFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let temp_path = Self::build_temp_path(&path);
        Self { path, temp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet
    pub fn load<T: for<'de> Deserialize<'de>>(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {}. First 200 chars: {}",
                self.path.display(),
                json.chars().take(200).collect::<String>()
            )
        })?;

        debug!("Loaded data from {}", self.path.display());
        Ok(Some(data))
    }

    /// Serialize, write to a sibling temp file, then rename over the target
    pub fn save<T: Serialize>(&self, data: &T) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::persistence(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::persistence(&self.path, e))?;
        }

        fs::write(&self.temp_path, json).map_err(|e| StoreError::persistence(&self.path, e))?;
        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&self.temp_path);
            StoreError::persistence(&self.path, e)
        })?;

        info!("Saved leaderboard to {}", self.path.display());
        Ok(())
    }

    fn build_temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }
}
