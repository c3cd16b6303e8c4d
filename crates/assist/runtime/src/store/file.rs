//! File-based ConfigStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use assist_core::TargetingConfig;

use super::{ConfigStore, Result, StoreError};
use crate::records::ItemId;

const PREFIX: &str = "targeting_";
const SUFFIX: &str = ".json";

/// One pretty-printed JSON file per item under `base_dir`.
///
/// Writes go to a temp file first and are renamed into place, so a reader
/// never sees a half-written config.
pub struct FileConfigStore {
    base_dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn config_path(&self, item: &ItemId) -> Result<PathBuf> {
        let key = item.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && key != "."
            && key != "..";
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(format!("{PREFIX}{key}{SUFFIX}")))
    }
}

impl ConfigStore for FileConfigStore {
    fn save(&self, item: &ItemId, config: &TargetingConfig) -> Result<()> {
        let path = self.config_path(item)?;
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&temp_path, json)?;

        // Atomic rename
        if let Err(err) = fs::rename(&temp_path, &path) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(err.into());
        }

        tracing::debug!("Saved targeting config: {}", path.display());
        Ok(())
    }

    fn load(&self, item: &ItemId) -> Result<Option<TargetingConfig>> {
        let path = self.config_path(item)?;

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let config: TargetingConfig = serde_json::from_str(&json)?;

        tracing::debug!(item = %item, target_type = %config.target_type, "Loaded targeting config");
        Ok(Some(config))
    }

    fn delete(&self, item: &ItemId) -> Result<()> {
        let path = self.config_path(item)?;

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Deleted targeting config: {}", path.display());
        }

        Ok(())
    }

    fn list(&self) -> Result<Vec<ItemId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix(PREFIX)
                    .and_then(|s| s.strip_suffix(SUFFIX))
            {
                ids.push(ItemId::new(id));
            }
        }

        ids.sort();
        Ok(ids)
    }
}
