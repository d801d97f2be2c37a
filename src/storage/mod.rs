//! Storage layer for hisab
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The `Storage` value is constructed once at startup, loaded
//! explicitly, and passed by reference to every component that needs it;
//! repositories fail fast if accessed before loading completes.

pub mod entries;
pub mod file_io;
pub mod heads;
pub mod meta;

pub use entries::{EntryRepository, RemovalResult};
pub use file_io::{read_json, write_json_atomic};
pub use heads::HeadRepository;
pub use meta::{DriveConfigRepository, SyncMetaRepository};

use crate::config::paths::HisabPaths;
use crate::error::HisabError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: HisabPaths,
    pub entries: EntryRepository,
    pub heads: HeadRepository,
    pub sync_meta: SyncMetaRepository,
    pub drive: DriveConfigRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: HisabPaths) -> Result<Self, HisabError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            entries: EntryRepository::new(paths.entries_file()),
            heads: HeadRepository::new(paths.heads_file()),
            sync_meta: SyncMetaRepository::new(paths.sync_meta_file()),
            drive: DriveConfigRepository::new(paths.drive_config_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &HisabPaths {
        &self.paths
    }

    /// Load all data from disk (the explicit open step)
    pub fn load_all(&mut self) -> Result<(), HisabError> {
        self.entries.load()?;
        self.heads.load()?;
        self.sync_meta.load()?;
        self.drive.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), HisabError> {
        self.entries.save()?;
        self.heads.save()?;
        self.sync_meta.save()?;
        self.drive.save()?;
        Ok(())
    }
}
