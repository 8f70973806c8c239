use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::metadata::MetadataError;

/// Errors raised while loading the rules document or synchronizing the
/// rule-tree onto disk. All of them are terminal for the invocation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed rules input. `context` names the offending part of the
    /// document, e.g. `filter->INPUT`.
    #[error("invalid input for {context}: {message}")]
    Input { context: String, message: String },

    /// Directory creation, read or write failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Ownership/permission enforcement failure.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl SyncError {
    pub fn input(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::SyncError;
    use assert2::check;

    #[test]
    fn test_input_error_names_the_offending_chain() {
        let err = SyncError::input("filter->INPUT", "missing 'rule' in entry");

        check!(err.to_string() == "invalid input for filter->INPUT: missing 'rule' in entry");
    }

    #[test]
    fn test_io_error_carries_the_path() {
        let err = SyncError::io(
            "/etc/firewall/rules.d/filter",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );

        check!(err.to_string().contains("/etc/firewall/rules.d/filter"));
    }
}
