//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod drive;
pub mod entry;
pub mod heads;

pub use backup::{handle_backup_command, BackupCommands};
pub use drive::{handle_drive_command, DriveCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use heads::{handle_head_command, HeadCommands};
