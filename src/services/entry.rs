//! Entry service
//!
//! Business logic for diary entries: creation, edits, soft and permanent
//! deletion, filtering, and ledger statistics.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{HisabError, HisabResult};
use crate::models::{Entry, EntryId, Money, SyncRemark};
use crate::storage::{RemovalResult, Storage};

/// Service for entry management
pub struct EntryService<'a> {
    storage: &'a Storage,
}

/// Income/expense discriminator for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl std::str::FromStr for EntryKind {
    type Err = HisabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(HisabError::Validation(format!(
                "Unknown entry kind: '{}'. Use income or expense",
                other
            ))),
        }
    }
}

/// Options for filtering entries
///
/// Soft-deleted entries are excluded unless `include_deleted` is set.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by main head
    pub main_head: Option<String>,
    /// Filter by sub head
    pub sub_head: Option<String>,
    /// Filter by amount sign
    pub kind: Option<EntryKind>,
    /// Filter by date range start (inclusive)
    pub from: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub to: Option<NaiveDate>,
    /// Filter by sync remark
    pub remark: Option<SyncRemark>,
    /// Include soft-deleted entries
    pub include_deleted: bool,
}

impl EntryFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by main head
    pub fn main_head(mut self, head: impl Into<String>) -> Self {
        self.main_head = Some(head.into());
        self
    }

    /// Filter by sub head
    pub fn sub_head(mut self, head: impl Into<String>) -> Self {
        self.sub_head = Some(head.into());
        self
    }

    /// Filter by amount sign
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range (inclusive)
    pub fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Filter by sync remark
    pub fn remark(mut self, remark: SyncRemark) -> Self {
        self.remark = Some(remark);
        self
    }

    /// Include soft-deleted entries
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    fn matches(&self, entry: &Entry) -> bool {
        if !self.include_deleted && entry.is_deleted() {
            return false;
        }
        if let Some(head) = &self.main_head {
            if &entry.main_head != head {
                return false;
            }
        }
        if let Some(head) = &self.sub_head {
            if &entry.sub_head != head {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            let matches_kind = match kind {
                EntryKind::Income => entry.is_income(),
                EntryKind::Expense => entry.is_expense(),
            };
            if !matches_kind {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.date > to {
                return false;
            }
        }
        if let Some(remark) = self.remark {
            if entry.remark != remark {
                return false;
            }
        }
        true
    }
}

/// Input for creating a new entry
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: Money,
    pub main_head: String,
    pub sub_head: Option<String>,
}

/// Field changes for an existing entry (None = leave unchanged)
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryInput {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub main_head: Option<String>,
    pub sub_head: Option<String>,
}

impl UpdateEntryInput {
    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.main_head.is_none()
            && self.sub_head.is_none()
    }
}

/// Aggregate ledger statistics
#[derive(Debug, Clone, Default)]
pub struct LedgerStats {
    /// Every stored entry, soft-deleted included
    pub total_entries: usize,
    /// Entries not soft-deleted
    pub active_entries: usize,
    /// Soft-deleted entries awaiting purge
    pub deleted_entries: usize,
    /// Active entries with remark new or edited
    pub pending_sync: usize,
    /// Sum of positive amounts over active entries
    pub total_income: Money,
    /// Absolute sum of negative amounts over active entries
    pub total_expense: Money,
    /// Active entry count per main head
    pub by_main_head: HashMap<String, usize>,
}

impl<'a> EntryService<'a> {
    /// Create a new entry service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new entry with remark `new`
    pub fn create(&self, input: CreateEntryInput) -> HisabResult<Entry> {
        let main_head = input.main_head.trim();
        if main_head.is_empty() {
            return Err(HisabError::Validation("Main head is required".into()));
        }

        // The stored count disambiguates same-millisecond bulk inserts
        let index = self.storage.entries.count()? as u32;
        let entry = Entry::new(
            index,
            input.date,
            input.description.unwrap_or_default().trim().to_string(),
            input.amount,
            main_head,
            input
                .sub_head
                .unwrap_or_default()
                .trim()
                .to_string(),
        );

        self.storage.entries.put(entry)
    }

    /// Find an entry by its id string
    pub fn find(&self, id: &str) -> HisabResult<Option<Entry>> {
        self.storage.entries.get(&EntryId::from(id))
    }

    /// Apply field changes; tags the entry `edited`
    pub fn update(&self, id: &EntryId, changes: UpdateEntryInput) -> HisabResult<Entry> {
        let mut entry = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| HisabError::entry_not_found(id.to_string()))?;

        if entry.is_deleted() {
            return Err(HisabError::Validation(format!(
                "Entry {} is deleted; purge or leave it",
                id
            )));
        }

        if changes.is_empty() {
            return Ok(entry);
        }

        if let Some(date) = changes.date {
            entry.date = date;
        }
        if let Some(description) = changes.description {
            entry.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            entry.amount = amount;
        }
        if let Some(main_head) = changes.main_head {
            let main_head = main_head.trim();
            if main_head.is_empty() {
                return Err(HisabError::Validation("Main head cannot be empty".into()));
            }
            entry.main_head = main_head.to_string();
        }
        if let Some(sub_head) = changes.sub_head {
            entry.sub_head = sub_head.trim().to_string();
        }

        entry.mark_edited();
        self.storage.entries.put(entry)
    }

    /// Soft delete: tag the entry `deleted`, keep the record
    pub fn soft_delete(&self, id: &EntryId) -> HisabResult<Entry> {
        let mut entry = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| HisabError::entry_not_found(id.to_string()))?;

        if !entry.is_deleted() {
            entry.mark_deleted();
            entry = self.storage.entries.put(entry)?;
        }
        Ok(entry)
    }

    /// Permanently remove one entry
    pub fn purge(&self, id: &EntryId) -> HisabResult<()> {
        if self.storage.entries.remove(id)? {
            Ok(())
        } else {
            Err(HisabError::entry_not_found(id.to_string()))
        }
    }

    /// Permanently remove a batch, one id at a time, with per-id results
    pub fn purge_many(&self, ids: &[EntryId]) -> HisabResult<Vec<RemovalResult>> {
        self.storage.entries.remove_many(ids)
    }

    /// List entries matching a filter, newest first
    pub fn filter(&self, filter: &EntryFilter) -> HisabResult<Vec<Entry>> {
        let mut entries: Vec<_> = self
            .storage
            .entries
            .get_all()?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(entries)
    }

    /// Aggregate statistics over the whole store
    pub fn stats(&self) -> HisabResult<LedgerStats> {
        let mut stats = LedgerStats::default();

        for entry in self.storage.entries.get_all()? {
            stats.total_entries += 1;

            if entry.is_deleted() {
                stats.deleted_entries += 1;
                continue;
            }

            stats.active_entries += 1;
            if entry.is_pending_sync() {
                stats.pending_sync += 1;
            }
            if entry.amount.is_expense() {
                stats.total_expense += entry.amount.abs();
            } else {
                stats.total_income += entry.amount;
            }
            *stats.by_main_head.entry(entry.main_head).or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Destructive wipe of the whole entry store (CLI confirms first)
    pub fn clear_all(&self) -> HisabResult<()> {
        self.storage.entries.clear()
    }
}
