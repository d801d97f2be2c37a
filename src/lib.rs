//! hisab - command-line personal accounts diary
//!
//! This library provides the core functionality for the hisab accounts diary:
//! a local ledger of income/expense entries classified under user-defined
//! main/sub heads, persisted as JSON files, exportable as CSV, and optionally
//! pushed to a Google Drive folder.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (entries, money, sync records)
//! - `storage`: JSON file storage layer with fail-fast initialization
//! - `services`: Business logic (entries, heads, sync lifecycle)
//! - `export`: CSV bridge
//! - `sync`: Google Drive client
//! - `display`: Terminal formatting
//! - `cli`: Command handlers

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod sync;

pub use error::{HisabError, HisabResult};
