//! Sync status tracking
//!
//! Maintains the per-entry sync lifecycle on top of the entry store:
//! `new -> edited` on change, `new|edited -> synced` on acknowledged upload,
//! `any -> deleted` on soft delete. Bulk marking is idempotent and reports
//! ids it could not transition instead of failing.

use crate::error::HisabResult;
use crate::models::{Entry, EntryId, SyncMeta, SyncRemark};
use crate::storage::Storage;

/// Service for sync-status transitions and backup bookkeeping
pub struct SyncService<'a> {
    storage: &'a Storage,
}

/// Outcome of a bulk `mark_synced` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncMarkReport {
    /// Ids transitioned to `synced` by this call
    pub updated: Vec<EntryId>,
    /// Ids that were already `synced` (no-op, not an error)
    pub already_synced: Vec<EntryId>,
    /// Soft-deleted ids left untouched
    pub skipped_deleted: Vec<EntryId>,
    /// Ids not present in the store
    pub missing: Vec<EntryId>,
}

impl<'a> SyncService<'a> {
    /// Create a new sync service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Mark a batch of entries as acknowledged by the remote backup
    ///
    /// Processes ids sequentially, one write at a time. Re-marking an
    /// already-synced id is a no-op; `deleted` stays terminal.
    pub fn mark_synced(&self, ids: &[EntryId]) -> HisabResult<SyncMarkReport> {
        let mut report = SyncMarkReport::default();

        for id in ids {
            match self.storage.entries.get(id)? {
                None => report.missing.push(id.clone()),
                Some(entry) if entry.is_deleted() => report.skipped_deleted.push(id.clone()),
                Some(entry) if entry.synced && !entry.is_pending_sync() => {
                    report.already_synced.push(id.clone())
                }
                Some(mut entry) => {
                    entry.mark_synced();
                    self.storage.entries.put(entry)?;
                    report.updated.push(id.clone());
                }
            }
        }

        Ok(report)
    }

    /// Active entries still awaiting a remote push (remark new or edited)
    pub fn pending(&self) -> HisabResult<Vec<Entry>> {
        let mut entries = self.storage.entries.get_by_remark(SyncRemark::New)?;
        entries.extend(self.storage.entries.get_by_remark(SyncRemark::Edited)?);
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(entries)
    }

    /// The current last-backup bookkeeping record
    pub fn meta(&self) -> HisabResult<SyncMeta> {
        self.storage.sync_meta.get()
    }

    /// Record a successful backup upload
    pub fn record_backup(&self, file_name: &str, entry_count: usize) -> HisabResult<SyncMeta> {
        let mut meta = self.storage.sync_meta.get()?;
        meta.record(file_name, entry_count);
        self.storage.sync_meta.set(meta.clone())?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HisabPaths;
    use crate::models::{Money, SyncRemark};
    use crate::services::{CreateEntryInput, EntryService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_entry(storage: &Storage, cents: i64) -> Entry {
        EntryService::new(storage)
            .create(CreateEntryInput {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                description: None,
                amount: Money::from_cents(cents),
                main_head: "Income".to_string(),
                sub_head: None,
            })
            .unwrap()
    }

    #[test]
    fn test_mark_synced_transitions_and_is_idempotent() {
        let (_temp, storage) = create_test_storage();
        let service = SyncService::new(&storage);
        let entry = add_entry(&storage, 100);

        let first = service.mark_synced(&[entry.id.clone()]).unwrap();
        assert_eq!(first.updated, vec![entry.id.clone()]);

        let stored = storage.entries.get(&entry.id).unwrap().unwrap();
        assert!(stored.synced);
        assert_eq!(stored.remark, SyncRemark::Synced);

        // Second call is a no-op, not an error
        let second = service.mark_synced(&[entry.id.clone()]).unwrap();
        assert!(second.updated.is_empty());
        assert_eq!(second.already_synced, vec![entry.id.clone()]);

        let unchanged = storage.entries.get(&entry.id).unwrap().unwrap();
        assert_eq!(unchanged.remark, SyncRemark::Synced);
        assert_eq!(unchanged.updated_at, stored.updated_at);
    }

    #[test]
    fn test_mark_synced_reports_missing() {
        let (_temp, storage) = create_test_storage();
        let service = SyncService::new(&storage);
        let entry = add_entry(&storage, 100);

        let missing = EntryId::from("nope");
        let report = service
            .mark_synced(&[entry.id.clone(), missing.clone()])
            .unwrap();
        assert_eq!(report.updated, vec![entry.id]);
        assert_eq!(report.missing, vec![missing]);
    }

    #[test]
    fn test_mark_synced_skips_deleted() {
        let (_temp, storage) = create_test_storage();
        let service = SyncService::new(&storage);
        let entry = add_entry(&storage, 100);
        EntryService::new(&storage).soft_delete(&entry.id).unwrap();

        let report = service.mark_synced(&[entry.id.clone()]).unwrap();
        assert_eq!(report.skipped_deleted, vec![entry.id.clone()]);

        let stored = storage.entries.get(&entry.id).unwrap().unwrap();
        assert_eq!(stored.remark, SyncRemark::Deleted);
    }

    #[test]
    fn test_edited_entry_is_pending_again() {
        let (_temp, storage) = create_test_storage();
        let service = SyncService::new(&storage);
        let entry_service = EntryService::new(&storage);
        let entry = add_entry(&storage, 100);

        service.mark_synced(&[entry.id.clone()]).unwrap();
        assert!(service.pending().unwrap().is_empty());

        entry_service
            .update(
                &entry.id,
                crate::services::UpdateEntryInput {
                    amount: Some(Money::from_cents(200)),
                    ..Default::default()
                },
            )
            .unwrap();

        let pending = service.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].remark, SyncRemark::Edited);

        // An edited entry can be re-marked synced
        let report = service.mark_synced(&[entry.id.clone()]).unwrap();
        assert_eq!(report.updated, vec![entry.id]);
    }

    #[test]
    fn test_record_backup_updates_meta() {
        let (_temp, storage) = create_test_storage();
        let service = SyncService::new(&storage);

        let meta = service.record_backup("accounts_backup.csv", 3).unwrap();
        assert_eq!(meta.last_backup_entries, 3);

        let loaded = service.meta().unwrap();
        assert_eq!(loaded.last_backup_file.as_deref(), Some("accounts_backup.csv"));
    }
}
