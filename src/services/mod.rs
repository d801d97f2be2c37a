//! Service layer for hisab
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, the sync-status lifecycle, and aggregates.

pub mod entry;
pub mod heads;
pub mod sync;

pub use entry::{
    CreateEntryInput, EntryFilter, EntryKind, EntryService, LedgerStats, UpdateEntryInput,
};
pub use heads::{HeadKind, HeadService};
pub use sync::{SyncMarkReport, SyncService};
