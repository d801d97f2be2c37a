//! Core data models for hisab
//!
//! Defines the entry record, its sync lifecycle tag, the money type, and the
//! Drive sync configuration records.

pub mod drive;
pub mod entry;
pub mod money;

pub use drive::{DriveConfig, DriveState, SyncMeta};
pub use entry::{Entry, EntryId, SyncRemark, DATE_FORMAT};
pub use money::{Money, MoneyParseError};
