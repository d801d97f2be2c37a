//! Entry model
//!
//! Represents a single diary entry (income or expense) classified under a
//! main/sub head pair, together with its remote-sync lifecycle tag.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Display format for entry dates (day-month-year)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Unique identifier for an entry
///
/// Derived from the creation instant down to milliseconds, plus a
/// caller-supplied index so same-millisecond bulk inserts stay unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate an id for the current instant
    pub fn generate(index: u32) -> Self {
        Self::generate_at(Utc::now(), index)
    }

    /// Generate an id for a given instant (used by bulk import)
    pub fn generate_at(at: DateTime<Utc>, index: u32) -> Self {
        Self(format!("{}-{}", at.format("%Y%m%d%H%M%S%3f"), index))
    }

    /// Wrap an existing id string (e.g. from CSV import)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Fine-grained sync lifecycle tag for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncRemark {
    /// Persisted locally, never pushed to the remote backup
    #[default]
    New,
    /// Modified since the last successful push
    Edited,
    /// Remote push acknowledged
    Synced,
    /// Soft-deleted; retained in storage until purged
    Deleted,
}

impl SyncRemark {
    /// Entries that still need a remote push
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::New | Self::Edited)
    }
}

impl fmt::Display for SyncRemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Edited => write!(f, "edited"),
            Self::Synced => write!(f, "synced"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// A diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, immutable once assigned
    pub id: EntryId,

    /// Entry date (displayed day-month-year)
    pub date: NaiveDate,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Signed amount; income >= 0, expense < 0
    pub amount: Money,

    /// Main head label (plain string reference into the registry)
    pub main_head: String,

    /// Sub head label
    #[serde(default)]
    pub sub_head: String,

    /// Has this entry been pushed to the remote backup at least once
    #[serde(default)]
    pub synced: bool,

    /// Sync lifecycle tag
    #[serde(default)]
    pub remark: SyncRemark,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last modified
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry with a generated id and `new` remark
    pub fn new(
        index: u32,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        main_head: impl Into<String>,
        sub_head: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::generate(index),
            date,
            description: description.into(),
            amount,
            main_head: main_head.into(),
            sub_head: sub_head.into(),
            synced: false,
            remark: SyncRemark::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this entry is an income entry
    pub fn is_income(&self) -> bool {
        self.amount.is_income()
    }

    /// Check if this entry is an expense entry
    pub fn is_expense(&self) -> bool {
        self.amount.is_expense()
    }

    /// Check if this entry is soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.remark == SyncRemark::Deleted
    }

    /// Check if this entry still needs a remote push
    pub fn is_pending_sync(&self) -> bool {
        self.remark.is_pending()
    }

    /// Tag the entry as edited after a field change
    pub fn mark_edited(&mut self) {
        self.remark = SyncRemark::Edited;
        self.updated_at = Utc::now();
    }

    /// Tag the entry as acknowledged by the remote backup
    pub fn mark_synced(&mut self) {
        self.synced = true;
        self.remark = SyncRemark::Synced;
        self.updated_at = Utc::now();
    }

    /// Soft delete: keep the record, tag it deleted
    pub fn mark_deleted(&mut self) {
        self.remark = SyncRemark::Deleted;
        self.updated_at = Utc::now();
    }

    /// The entry date in display format
    pub fn date_display(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} / {} {}",
            self.date.format(DATE_FORMAT),
            self.main_head,
            self.sub_head,
            self.amount
        )
    }
}
