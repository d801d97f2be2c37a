//! Terminal display formatting

pub mod entry;
pub mod stats;

pub use entry::{format_entry_details, format_entry_register, format_entry_row};
pub use stats::format_stats;
