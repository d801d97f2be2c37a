//! Configuration and path management

pub mod paths;
pub mod settings;

pub use paths::HisabPaths;
pub use settings::Settings;
