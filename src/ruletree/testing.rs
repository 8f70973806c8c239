use std::cell::RefCell;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

use super::metadata::{MetadataError, MetadataOps};
use super::ruleset::RuleSet;
use super::sync::SyncOptions;

#[fixture]
pub fn dest() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Synchronization settings pointing at `dest`, in apply mode
pub fn options(dest: &Path) -> SyncOptions {
    SyncOptions {
        dest: dest.to_path_buf(),
        owner: "root".to_string(),
        group: "root".to_string(),
        mode: 0o644,
        name: "test".to_string(),
        check: false,
    }
}

/// Parses an inline YAML document into a validated rule set
pub fn ruleset(yaml: &str) -> RuleSet {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    RuleSet::from_value(&doc).unwrap()
}

/// One recorded metadata application
#[derive(Debug, PartialEq)]
pub enum MetadataCall {
    Ownership(PathBuf, String, String),
    Permissions(PathBuf, u32),
}

/// Metadata double collecting applications instead of performing them
#[derive(Default)]
pub struct RecordingMetadata {
    pub calls: RefCell<Vec<MetadataCall>>,
}

impl MetadataOps for RecordingMetadata {
    fn set_ownership(&self, path: &Path, owner: &str, group: &str) -> Result<(), MetadataError> {
        self.calls.borrow_mut().push(MetadataCall::Ownership(
            path.to_path_buf(),
            owner.to_string(),
            group.to_string(),
        ));
        Ok(())
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        self.calls
            .borrow_mut()
            .push(MetadataCall::Permissions(path.to_path_buf(), mode));
        Ok(())
    }
}

/// Metadata double failing every ownership change
pub struct FailingMetadata;

impl MetadataOps for FailingMetadata {
    fn set_ownership(&self, _path: &Path, owner: &str, _group: &str) -> Result<(), MetadataError> {
        Err(MetadataError::UnknownUser(owner.to_string()))
    }

    fn set_permissions(&self, _path: &Path, _mode: u32) -> Result<(), MetadataError> {
        Ok(())
    }
}
