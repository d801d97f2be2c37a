//! Drive sync configuration and backup bookkeeping records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HisabError, HisabResult};

/// Google Drive sync configuration
///
/// A validated record replacing the original ad hoc credential bag. The
/// interactive consent flow is the installed-app loopback variant, so the
/// third credential is the OAuth client secret.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveConfig {
    /// OAuth client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: String,

    /// Target Drive folder id for backups
    #[serde(default)]
    pub folder_id: String,

    /// Cached access token from the last consent flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// When the cached token was obtained (no refresh flow; expired tokens
    /// require re-connecting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_obtained_at: Option<DateTime<Utc>>,
}

/// Position in the Drive client state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveState {
    /// No credentials stored
    Unconfigured,
    /// Credentials stored, no access token yet
    Configured,
    /// Access token cached from a consent flow
    Connected,
}

impl std::fmt::Display for DriveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Configured => write!(f, "configured"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

impl DriveConfig {
    /// Create a configuration from credentials, validating each field
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> HisabResult<Self> {
        let config = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            folder_id: folder_id.into(),
            access_token: None,
            token_obtained_at: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fail fast if any credential is missing
    pub fn validate(&self) -> HisabResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(HisabError::Validation("Drive client id is required".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(HisabError::Validation(
                "Drive client secret is required".into(),
            ));
        }
        if self.folder_id.trim().is_empty() {
            return Err(HisabError::Validation("Drive folder id is required".into()));
        }
        Ok(())
    }

    /// Where this configuration sits in the client state machine
    pub fn state(&self) -> DriveState {
        if self.validate().is_err() {
            DriveState::Unconfigured
        } else if self.access_token.is_none() {
            DriveState::Configured
        } else {
            DriveState::Connected
        }
    }

    /// Cache a freshly obtained access token
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
        self.token_obtained_at = Some(Utc::now());
    }

    /// Drop the cached token (forces a re-connect)
    pub fn clear_token(&mut self) {
        self.access_token = None;
        self.token_obtained_at = None;
    }
}

/// Last-backup bookkeeping, kept alongside the entry collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncMeta {
    /// When the last successful backup completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_at: Option<DateTime<Utc>>,

    /// File name of the last uploaded snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_file: Option<String>,

    /// Number of entries in the last snapshot
    #[serde(default)]
    pub last_backup_entries: usize,
}

impl SyncMeta {
    /// Record a successful backup
    pub fn record(&mut self, file_name: impl Into<String>, entry_count: usize) {
        self.last_backup_at = Some(Utc::now());
        self.last_backup_file = Some(file_name.into());
        self.last_backup_entries = entry_count;
    }
}
