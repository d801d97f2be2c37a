//! User settings for hisab
//!
//! A small persisted record for preferences that are not part of the ledger
//! data itself.

use serde::{Deserialize, Serialize};

use super::paths::HisabPaths;
use crate::error::{HisabError, HisabResult};

fn default_schema_version() -> u32 {
    1
}

fn default_backup_file_name() -> String {
    "accounts_backup.csv".to_string()
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// File name used for the fixed-name Drive backup snapshot
    #[serde(default = "default_backup_file_name")]
    pub backup_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_file_name: default_backup_file_name(),
        }
    }
}

impl Settings {
    /// Load settings from disk, creating the file with defaults if absent
    pub fn load_or_create(paths: &HisabPaths) -> HisabResult<Self> {
        let path = paths.settings_file();

        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| HisabError::Io(format!("Failed to read settings: {}", e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| HisabError::Json(format!("Failed to parse settings: {}", e)))
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HisabPaths) -> HisabResult<()> {
        paths.ensure_directories()?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HisabError::Json(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(paths.settings_file(), json)
            .map_err(|e| HisabError::Io(format!("Failed to write settings: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.backup_file_name, "accounts_backup.csv");
        assert!(paths.settings_file().exists());
    }

    #[test]
    fn test_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::load_or_create(&paths).unwrap();
        settings.backup_file_name = "ledger.csv".to_string();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backup_file_name, "ledger.csv");
    }
}
