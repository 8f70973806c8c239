use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Group, Uid, User};
use thiserror::Error;
use tracing::debug;

/// Errors raised while applying ownership or permissions
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("account lookup for '{name}' failed: {source}")]
    Lookup { name: String, source: nix::Error },

    #[error("cannot change ownership of {path}: {source}")]
    Chown { path: PathBuf, source: nix::Error },

    #[error("cannot change permissions of {path}: {source}")]
    Chmod {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Abstraction over the ownership and permission syscalls, so
/// synchronization can run against a recording double in tests.
pub trait MetadataOps {
    fn set_ownership(&self, path: &Path, owner: &str, group: &str) -> Result<(), MetadataError>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), MetadataError>;
}

/// Production [MetadataOps] backed by chown(2) and chmod(2)
pub struct UnixMetadata;

impl MetadataOps for UnixMetadata {
    fn set_ownership(&self, path: &Path, owner: &str, group: &str) -> Result<(), MetadataError> {
        let uid = resolve_user(owner)?;
        let gid = resolve_group(group)?;

        debug!("chown {}:{} {}", owner, group, path.display());

        nix::unistd::chown(path, Some(uid), Some(gid)).map_err(|e| MetadataError::Chown {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<(), MetadataError> {
        debug!("chmod {:o} {}", mode, path.display());

        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
            MetadataError::Chmod {
                path: path.to_path_buf(),
                source: e,
            }
        })
    }
}

/// Resolves an owner name to a uid, accepting a numeric id for accounts
/// missing from the user database.
fn resolve_user(name: &str) -> Result<Uid, MetadataError> {
    match User::from_name(name) {
        Ok(Some(user)) => Ok(user.uid),
        Ok(None) => match name.parse::<u32>() {
            Ok(raw) => Ok(Uid::from_raw(raw)),
            Err(_) => Err(MetadataError::UnknownUser(name.to_string())),
        },
        Err(e) => Err(MetadataError::Lookup {
            name: name.to_string(),
            source: e,
        }),
    }
}

/// Group counterpart of [resolve_user]
fn resolve_group(name: &str) -> Result<Gid, MetadataError> {
    match Group::from_name(name) {
        Ok(Some(group)) => Ok(group.gid),
        Ok(None) => match name.parse::<u32>() {
            Ok(raw) => Ok(Gid::from_raw(raw)),
            Err(_) => Err(MetadataError::UnknownGroup(name.to_string())),
        },
        Err(e) => Err(MetadataError::Lookup {
            name: name.to_string(),
            source: e,
        }),
    }
}
