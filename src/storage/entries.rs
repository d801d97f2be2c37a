//! Entry repository for JSON storage
//!
//! Manages loading and saving diary entries to entries.json, with secondary
//! indexes by date, main head, and sync remark.
//!
//! Every accessor fails fast with `HisabError::NotInitialized` until `load()`
//! has completed; storage must be opened before use.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{HisabError, HisabResult};
use crate::models::{Entry, EntryId, SyncRemark};

use super::file_io::{read_json, write_json_atomic};

/// Serializable entry data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<Entry>,
}

/// Outcome of one id in a bulk removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalResult {
    pub id: EntryId,
    pub removed: bool,
}

/// Repository for entry persistence with indexing
pub struct EntryRepository {
    path: PathBuf,
    loaded: AtomicBool,
    data: RwLock<HashMap<EntryId, Entry>>,
    /// Index: date -> entry ids
    by_date: RwLock<HashMap<NaiveDate, Vec<EntryId>>>,
    /// Index: main head -> entry ids
    by_main_head: RwLock<HashMap<String, Vec<EntryId>>>,
    /// Index: sync remark -> entry ids
    by_remark: RwLock<HashMap<SyncRemark, Vec<EntryId>>>,
}

impl EntryRepository {
    /// Create a new entry repository (not yet loaded)
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded: AtomicBool::new(false),
            data: RwLock::new(HashMap::new()),
            by_date: RwLock::new(HashMap::new()),
            by_main_head: RwLock::new(HashMap::new()),
            by_remark: RwLock::new(HashMap::new()),
        }
    }

    fn ensure_loaded(&self) -> HisabResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(HisabError::NotInitialized("entries"))
        }
    }

    /// Load entries from disk and build indexes
    pub fn load(&self) -> HisabResult<()> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self.write_lock(&self.data)?;
        let mut by_date = self.write_lock(&self.by_date)?;
        let mut by_main_head = self.write_lock(&self.by_main_head)?;
        let mut by_remark = self.write_lock(&self.by_remark)?;

        data.clear();
        by_date.clear();
        by_main_head.clear();
        by_remark.clear();

        for entry in file_data.entries {
            let id = entry.id.clone();
            by_date.entry(entry.date).or_default().push(id.clone());
            by_main_head
                .entry(entry.main_head.clone())
                .or_default()
                .push(id.clone());
            by_remark.entry(entry.remark).or_default().push(id.clone());
            data.insert(id, entry);
        }

        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> HisabResult<()> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = EntryData { entries };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert or fully overwrite the record keyed by its id
    ///
    /// Returns the stored record.
    pub fn put(&self, entry: Entry) -> HisabResult<Entry> {
        self.ensure_loaded()?;
        let mut data = self.write_lock(&self.data)?;
        let mut by_date = self.write_lock(&self.by_date)?;
        let mut by_main_head = self.write_lock(&self.by_main_head)?;
        let mut by_remark = self.write_lock(&self.by_remark)?;

        // Overwrite drops the previous record's index positions first
        if let Some(old) = data.remove(&entry.id) {
            remove_from_index(&mut by_date, &old.date, &old.id);
            remove_from_index(&mut by_main_head, &old.main_head, &old.id);
            remove_from_index(&mut by_remark, &old.remark, &old.id);
        }

        let id = entry.id.clone();
        by_date.entry(entry.date).or_default().push(id.clone());
        by_main_head
            .entry(entry.main_head.clone())
            .or_default()
            .push(id.clone());
        by_remark.entry(entry.remark).or_default().push(id.clone());
        data.insert(id, entry.clone());

        Ok(entry)
    }

    /// Get an entry by id
    pub fn get(&self, id: &EntryId) -> HisabResult<Option<Entry>> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        Ok(data.get(id).cloned())
    }

    /// Get all entries (storage order is not meaningful; callers sort)
    pub fn get_all(&self) -> HisabResult<Vec<Entry>> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        Ok(data.values().cloned().collect())
    }

    /// Get all entries for a given date
    pub fn get_by_date(&self, date: NaiveDate) -> HisabResult<Vec<Entry>> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        let by_date = self.read_lock(&self.by_date)?;
        Ok(collect_ids(&data, by_date.get(&date)))
    }

    /// Get all entries under a main head
    pub fn get_by_main_head(&self, head: &str) -> HisabResult<Vec<Entry>> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        let by_main_head = self.read_lock(&self.by_main_head)?;
        Ok(collect_ids(&data, by_main_head.get(head)))
    }

    /// Get all entries carrying a given sync remark
    pub fn get_by_remark(&self, remark: SyncRemark) -> HisabResult<Vec<Entry>> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        let by_remark = self.read_lock(&self.by_remark)?;
        Ok(collect_ids(&data, by_remark.get(&remark)))
    }

    /// Irrecoverably remove an entry; returns whether it existed
    pub fn remove(&self, id: &EntryId) -> HisabResult<bool> {
        self.ensure_loaded()?;
        let mut data = self.write_lock(&self.data)?;
        let mut by_date = self.write_lock(&self.by_date)?;
        let mut by_main_head = self.write_lock(&self.by_main_head)?;
        let mut by_remark = self.write_lock(&self.by_remark)?;

        match data.remove(id) {
            Some(old) => {
                remove_from_index(&mut by_date, &old.date, &old.id);
                remove_from_index(&mut by_main_head, &old.main_head, &old.id);
                remove_from_index(&mut by_remark, &old.remark, &old.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a batch of ids one at a time, reporting per-id success
    ///
    /// Never fails atomically: a missing id is reported, not an error.
    pub fn remove_many(&self, ids: &[EntryId]) -> HisabResult<Vec<RemovalResult>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let removed = self.remove(id)?;
            results.push(RemovalResult {
                id: id.clone(),
                removed,
            });
        }
        Ok(results)
    }

    /// Number of stored entries (including soft-deleted)
    pub fn count(&self) -> HisabResult<usize> {
        self.ensure_loaded()?;
        let data = self.read_lock(&self.data)?;
        Ok(data.len())
    }

    /// Destructive wipe of every record and index
    pub fn clear(&self) -> HisabResult<()> {
        self.ensure_loaded()?;
        let mut data = self.write_lock(&self.data)?;
        let mut by_date = self.write_lock(&self.by_date)?;
        let mut by_main_head = self.write_lock(&self.by_main_head)?;
        let mut by_remark = self.write_lock(&self.by_remark)?;

        data.clear();
        by_date.clear();
        by_main_head.clear();
        by_remark.clear();
        Ok(())
    }

    fn read_lock<'a, T>(
        &self,
        lock: &'a RwLock<T>,
    ) -> HisabResult<std::sync::RwLockReadGuard<'a, T>> {
        lock.read()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock<'a, T>(
        &self,
        lock: &'a RwLock<T>,
    ) -> HisabResult<std::sync::RwLockWriteGuard<'a, T>> {
        lock.write()
            .map_err(|e| HisabError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn collect_ids(data: &HashMap<EntryId, Entry>, ids: Option<&Vec<EntryId>>) -> Vec<Entry> {
    ids.map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
        .unwrap_or_default()
}

fn remove_from_index<K: std::hash::Hash + Eq>(
    index: &mut HashMap<K, Vec<EntryId>>,
    key: &K,
    id: &EntryId,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|existing| existing != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}
