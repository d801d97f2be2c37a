//! Category head registry for JSON storage
//!
//! Two independent ordered label lists (main heads, sub heads), unique by
//! insertion. Entries reference heads by plain string; heads are never
//! cascade-validated against stored entries.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{HisabError, HisabResult};

use super::file_io::{read_json, write_json_atomic};

/// Serializable head registry data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct HeadData {
    main_heads: Vec<String>,
    sub_heads: Vec<String>,
}

/// Repository for the two head label lists
pub struct HeadRepository {
    path: PathBuf,
    loaded: AtomicBool,
    data: RwLock<HeadData>,
}

impl HeadRepository {
    /// Create a new head repository (not yet loaded)
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded: AtomicBool::new(false),
            data: RwLock::new(HeadData::default()),
        }
    }

    fn ensure_loaded(&self) -> HisabResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(HisabError::NotInitialized("heads"))
        }
    }

    /// Load the registry from disk
    pub fn load(&self) -> HisabResult<()> {
        let file_data: HeadData = read_json(&self.path)?;
        let mut data = self.write_lock()?;
        *data = file_data;
        drop(data);
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Save the registry to disk
    pub fn save(&self) -> HisabResult<()> {
        self.ensure_loaded()?;
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Append a main head if not already present; returns whether it was added
    pub fn add_main_head(&self, head: &str) -> HisabResult<bool> {
        self.ensure_loaded()?;
        let mut data = self.write_lock()?;
        Ok(push_unique(&mut data.main_heads, head))
    }

    /// Append a sub head if not already present; returns whether it was added
    pub fn add_sub_head(&self, head: &str) -> HisabResult<bool> {
        self.ensure_loaded()?;
        let mut data = self.write_lock()?;
        Ok(push_unique(&mut data.sub_heads, head))
    }

    /// The main head list in insertion order
    pub fn main_heads(&self) -> HisabResult<Vec<String>> {
        self.ensure_loaded()?;
        Ok(self.read_lock()?.main_heads.clone())
    }

    /// The sub head list in insertion order
    pub fn sub_heads(&self) -> HisabResult<Vec<String>> {
        self.ensure_loaded()?;
        Ok(self.read_lock()?.sub_heads.clone())
    }

    fn read_lock(&self) -> HisabResult<std::sync::RwLockReadGuard<'_, HeadData>> {
        self.data
            .read()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> HisabResult<std::sync::RwLockWriteGuard<'_, HeadData>> {
        self.data
            .write()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn push_unique(list: &mut Vec<String>, head: &str) -> bool {
    if list.iter().any(|existing| existing == head) {
        false
    } else {
        list.push(head.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_repo() -> (TempDir, HeadRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = HeadRepository::new(temp_dir.path().join("heads.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_fails_before_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = HeadRepository::new(temp_dir.path().join("heads.json"));
        assert!(matches!(
            repo.main_heads(),
            Err(HisabError::NotInitialized("heads"))
        ));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (_temp, repo) = test_repo();
        assert!(repo.add_main_head("Income").unwrap());
        assert!(repo.add_main_head("Food").unwrap());
        assert!(repo.add_main_head("Travel").unwrap());

        assert_eq!(repo.main_heads().unwrap(), vec!["Income", "Food", "Travel"]);
    }

    #[test]
    fn test_duplicates_not_added() {
        let (_temp, repo) = test_repo();
        assert!(repo.add_sub_head("Job").unwrap());
        assert!(!repo.add_sub_head("Job").unwrap());
        assert_eq!(repo.sub_heads().unwrap(), vec!["Job"]);
    }

    #[test]
    fn test_lists_are_independent() {
        let (_temp, repo) = test_repo();
        repo.add_main_head("Income").unwrap();
        repo.add_sub_head("Income").unwrap();

        assert_eq!(repo.main_heads().unwrap(), vec!["Income"]);
        assert_eq!(repo.sub_heads().unwrap(), vec!["Income"]);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("heads.json");

        let repo = HeadRepository::new(path.clone());
        repo.load().unwrap();
        repo.add_main_head("Income").unwrap();
        repo.add_sub_head("Job").unwrap();
        repo.save().unwrap();

        let reopened = HeadRepository::new(path);
        reopened.load().unwrap();
        assert_eq!(reopened.main_heads().unwrap(), vec!["Income"]);
        assert_eq!(reopened.sub_heads().unwrap(), vec!["Job"]);
    }
}
