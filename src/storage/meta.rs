//! Single-record stores: sync metadata and Drive configuration
//!
//! Each holds one small record under its own JSON file, mirroring the
//! repository load/save shape used for the entry store.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{HisabError, HisabResult};
use crate::models::{DriveConfig, SyncMeta};

use super::file_io::{read_json, write_json_atomic};

/// Repository for the last-backup bookkeeping record
pub struct SyncMetaRepository {
    path: PathBuf,
    loaded: AtomicBool,
    data: RwLock<SyncMeta>,
}

impl SyncMetaRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded: AtomicBool::new(false),
            data: RwLock::new(SyncMeta::default()),
        }
    }

    fn ensure_loaded(&self) -> HisabResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(HisabError::NotInitialized("sync metadata"))
        }
    }

    pub fn load(&self) -> HisabResult<()> {
        let file_data: SyncMeta = read_json(&self.path)?;
        *self.write_lock()? = file_data;
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    pub fn save(&self) -> HisabResult<()> {
        self.ensure_loaded()?;
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get the current record
    pub fn get(&self) -> HisabResult<SyncMeta> {
        self.ensure_loaded()?;
        Ok(self.read_lock()?.clone())
    }

    /// Replace the record
    pub fn set(&self, meta: SyncMeta) -> HisabResult<()> {
        self.ensure_loaded()?;
        *self.write_lock()? = meta;
        Ok(())
    }

    fn read_lock(&self) -> HisabResult<std::sync::RwLockReadGuard<'_, SyncMeta>> {
        self.data
            .read()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> HisabResult<std::sync::RwLockWriteGuard<'_, SyncMeta>> {
        self.data
            .write()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

/// Repository for the Drive credential record
pub struct DriveConfigRepository {
    path: PathBuf,
    loaded: AtomicBool,
    data: RwLock<DriveConfig>,
}

impl DriveConfigRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded: AtomicBool::new(false),
            data: RwLock::new(DriveConfig::default()),
        }
    }

    fn ensure_loaded(&self) -> HisabResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(HisabError::NotInitialized("drive configuration"))
        }
    }

    pub fn load(&self) -> HisabResult<()> {
        let file_data: DriveConfig = read_json(&self.path)?;
        *self.write_lock()? = file_data;
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    pub fn save(&self) -> HisabResult<()> {
        self.ensure_loaded()?;
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get the current configuration record
    pub fn get(&self) -> HisabResult<DriveConfig> {
        self.ensure_loaded()?;
        Ok(self.read_lock()?.clone())
    }

    /// Replace the configuration record
    pub fn set(&self, config: DriveConfig) -> HisabResult<()> {
        self.ensure_loaded()?;
        *self.write_lock()? = config;
        Ok(())
    }

    fn read_lock(&self) -> HisabResult<std::sync::RwLockReadGuard<'_, DriveConfig>> {
        self.data
            .read()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> HisabResult<std::sync::RwLockWriteGuard<'_, DriveConfig>> {
        self.data
            .write()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sync_meta_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sync_meta.json");

        let repo = SyncMetaRepository::new(path.clone());
        repo.load().unwrap();

        let mut meta = repo.get().unwrap();
        meta.record("accounts_backup.csv", 7);
        repo.set(meta).unwrap();
        repo.save().unwrap();

        let reopened = SyncMetaRepository::new(path);
        reopened.load().unwrap();
        let loaded = reopened.get().unwrap();
        assert_eq!(loaded.last_backup_entries, 7);
        assert_eq!(
            loaded.last_backup_file.as_deref(),
            Some("accounts_backup.csv")
        );
    }

    #[test]
    fn test_drive_config_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("drive.json");

        let repo = DriveConfigRepository::new(path.clone());
        repo.load().unwrap();

        let config = DriveConfig::new("id", "secret", "folder").unwrap();
        repo.set(config).unwrap();
        repo.save().unwrap();

        let reopened = DriveConfigRepository::new(path);
        reopened.load().unwrap();
        assert_eq!(reopened.get().unwrap().client_id, "id");
    }

    #[test]
    fn test_fails_before_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SyncMetaRepository::new(temp_dir.path().join("sync_meta.json"));
        assert!(matches!(repo.get(), Err(HisabError::NotInitialized(_))));

        let repo = DriveConfigRepository::new(temp_dir.path().join("drive.json"));
        assert!(matches!(repo.get(), Err(HisabError::NotInitialized(_))));
    }
}
