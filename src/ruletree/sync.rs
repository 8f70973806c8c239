//! Materialization of the rule-tree onto the filesystem
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::SyncError;
use super::metadata::MetadataOps;
use super::ruleset::RuleSet;
use super::tree::{render_lines, rule_file_name, RuleTree};

/// Mode applied to created chain directories
pub const DIR_MODE: u32 = 0o755;

/// Settings of one synchronization run
#[derive(Clone, Debug)]
pub struct SyncOptions {
    /// Root of the managed tree, e.g. `/etc/firewall/rules.d`
    pub dest: PathBuf,
    pub owner: String,
    pub group: String,
    /// Mode applied to rule files
    pub mode: u32,
    /// Logical name embedded in every file name
    pub name: String,
    /// Preview only: report what would change, touch nothing
    pub check: bool,
}

/// Synchronizes the declared rules onto the destination tree.
///
/// Returns whether anything changed (or would change, in check mode): a
/// missing chain directory, or a rule file created or rewritten because its
/// content was stale. Ownership and permissions are reapplied on every
/// non-check run and never count as a change by themselves.
pub fn synchronize(
    rules: &RuleSet,
    opts: &SyncOptions,
    meta: &dyn MetadataOps,
) -> Result<bool, SyncError> {
    let tree = RuleTree::build(rules);

    let mut changed = false;

    // Iterate all tables
    for (table, chains) in tree.tables.iter() {
        // Iterate chains in each table
        for (chain, buckets) in chains.iter() {
            let dir = opts.dest.join(table).join(chain);

            if sync_dir(&dir, opts, meta)? {
                changed = true;
            }

            // Iterate priority buckets in each chain, lowest first
            for (priority, lines) in buckets.iter() {
                let path = dir.join(rule_file_name(*priority, &opts.name));
                let content = render_lines(lines);

                if sync_file(&path, &content, opts, meta)? {
                    changed = true;
                }
            }
        }
    }

    Ok(changed)
}

/// Ensures one chain directory exists and carries the right metadata.
/// Returns whether it had to be created.
fn sync_dir(dir: &Path, opts: &SyncOptions, meta: &dyn MetadataOps) -> Result<bool, SyncError> {
    let missing = !dir.is_dir();

    if missing {
        if opts.check {
            debug!("would create {}", dir.display());
            return Ok(true);
        }

        info!("creating {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
    }

    if !opts.check {
        meta.set_ownership(dir, &opts.owner, &opts.group)?;
        meta.set_permissions(dir, DIR_MODE)?;
    }

    Ok(missing)
}

/// Ensures one rule file holds exactly `content`. Returns whether the file
/// was created or rewritten.
fn sync_file(
    path: &Path,
    content: &str,
    opts: &SyncOptions,
    meta: &dyn MetadataOps,
) -> Result<bool, SyncError> {
    let current = read_current(path)?;
    let stale = current.as_deref() != Some(content);

    if opts.check {
        if stale {
            debug!("would write {}", path.display());
        }
        return Ok(stale);
    }

    if stale {
        info!("writing {}", path.display());
        fs::write(path, content).map_err(|e| SyncError::io(path, e))?;
    }

    meta.set_ownership(path, &opts.owner, &opts.group)?;
    meta.set_permissions(path, opts.mode)?;

    Ok(stale)
}

/// Current content of a rule file, `None` when it does not exist yet
fn read_current(path: &Path) -> Result<Option<String>, SyncError> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::io(path, e)),
    }
}
