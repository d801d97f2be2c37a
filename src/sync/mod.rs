//! Remote backup sync (Google Drive)

pub mod drive;

pub use drive::{ConnectSession, DriveClient, SyncOutcome};
