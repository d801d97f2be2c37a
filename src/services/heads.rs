//! Head registry service
//!
//! Validation and mutation helpers over the two category label lists.

use crate::error::{HisabError, HisabResult};
use crate::storage::Storage;

/// Which of the two registry lists a head belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadKind {
    Main,
    Sub,
}

impl std::fmt::Display for HeadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Sub => write!(f, "sub"),
        }
    }
}

/// Service for the category head registry
pub struct HeadService<'a> {
    storage: &'a Storage,
}

impl<'a> HeadService<'a> {
    /// Create a new head service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a head label to one of the lists
    ///
    /// Labels are trimmed; empty labels and duplicates are rejected.
    pub fn add(&self, kind: HeadKind, label: &str) -> HisabResult<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(HisabError::Validation("Head label cannot be empty".into()));
        }

        let added = match kind {
            HeadKind::Main => self.storage.heads.add_main_head(label)?,
            HeadKind::Sub => self.storage.heads.add_sub_head(label)?,
        };

        if added {
            Ok(label.to_string())
        } else {
            Err(HisabError::duplicate_head(label))
        }
    }

    /// List one of the registry's label lists in insertion order
    pub fn list(&self, kind: HeadKind) -> HisabResult<Vec<String>> {
        match kind {
            HeadKind::Main => self.storage.heads.main_heads(),
            HeadKind::Sub => self.storage.heads.sub_heads(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HisabPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_and_list() {
        let (_temp, storage) = create_test_storage();
        let service = HeadService::new(&storage);

        service.add(HeadKind::Main, "Income").unwrap();
        service.add(HeadKind::Main, " Food ").unwrap();
        service.add(HeadKind::Sub, "Job").unwrap();

        assert_eq!(service.list(HeadKind::Main).unwrap(), vec!["Income", "Food"]);
        assert_eq!(service.list(HeadKind::Sub).unwrap(), vec!["Job"]);
    }

    #[test]
    fn test_rejects_empty_label() {
        let (_temp, storage) = create_test_storage();
        let service = HeadService::new(&storage);
        assert!(matches!(
            service.add(HeadKind::Main, "   "),
            Err(HisabError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate() {
        let (_temp, storage) = create_test_storage();
        let service = HeadService::new(&storage);
        service.add(HeadKind::Sub, "Job").unwrap();
        assert!(matches!(
            service.add(HeadKind::Sub, "Job"),
            Err(HisabError::Duplicate { .. })
        ));
    }
}
