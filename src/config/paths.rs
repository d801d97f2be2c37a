//! Path management for hisab
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `HISAB_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/hisab` or `~/.config/hisab`
//! 3. Windows: `%APPDATA%\hisab`

use std::path::PathBuf;

use crate::error::HisabError;

/// Manages all paths used by hisab
#[derive(Debug, Clone)]
pub struct HisabPaths {
    /// Base directory for all hisab data
    base_dir: PathBuf,
}

impl HisabPaths {
    /// Create a new HisabPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, HisabError> {
        let base_dir = if let Ok(custom) = std::env::var("HISAB_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create HisabPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/hisab/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the export directory (~/.config/hisab/exports/)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to entries.json (the entry store)
    pub fn entries_file(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Get the path to heads.json (the category registry)
    pub fn heads_file(&self) -> PathBuf {
        self.data_dir().join("heads.json")
    }

    /// Get the path to sync_meta.json (last-backup bookkeeping)
    pub fn sync_meta_file(&self) -> PathBuf {
        self.data_dir().join("sync_meta.json")
    }

    /// Get the path to drive.json (Drive credentials and cached token)
    pub fn drive_config_file(&self) -> PathBuf {
        self.data_dir().join("drive.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), HisabError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| HisabError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| HisabError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| HisabError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, HisabError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("hisab"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, HisabError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| HisabError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("hisab"))
}
