use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::info;

use super::entries::RuleEntry;
use super::error::SyncError;
use super::utils::valid_path_segment;

/// Type alias for the chains of one table
pub type Chains = IndexMap<String, Vec<RuleEntry>>;

/// The validated rules document: tables, their chains, and the declared
/// entries of each chain, all in document order.
#[derive(Debug, Default)]
pub struct RuleSet {
    pub tables: IndexMap<String, Chains>,
}

impl RuleSet {
    /// Loads and validates a rules document from a YAML file.
    pub fn load(path: &Path) -> Result<RuleSet, SyncError> {
        info!("loading rules document: {}", path.display());

        let data = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;

        let doc: Value = serde_yaml::from_str(&data)
            .map_err(|e| SyncError::input("rules document", e.to_string()))?;

        RuleSet::from_value(&doc)
    }

    /// Builds a validated [RuleSet] out of a loosely-typed YAML value.
    ///
    /// The whole document is checked before anything is returned, so a later
    /// synchronization never starts from a partially-valid input. Every shape
    /// error names the offending table or table->chain.
    pub fn from_value(doc: &Value) -> Result<RuleSet, SyncError> {
        let Some(table_values) = doc.as_mapping() else {
            return Err(SyncError::input(
                "rules document",
                "expected a mapping of tables",
            ));
        };

        let mut tables = IndexMap::new();

        for (table_key, chains_value) in table_values.iter() {
            let table = key_as_segment(table_key, "table", "rules document")?;

            let Some(chain_values) = chains_value.as_mapping() else {
                return Err(SyncError::input(
                    format!("table '{}'", &table),
                    "expected a mapping of chains",
                ));
            };

            let mut chains = Chains::new();

            for (chain_key, entry_values) in chain_values.iter() {
                let chain = key_as_segment(chain_key, "chain", &format!("table '{}'", &table))?;
                let context = format!("{}->{}", &table, &chain);

                let Some(items) = entry_values.as_sequence() else {
                    return Err(SyncError::input(
                        context,
                        "rules must be a sequence of rule entries",
                    ));
                };

                let mut entries = Vec::with_capacity(items.len());

                for item in items.iter() {
                    if !item.is_mapping() {
                        return Err(SyncError::input(
                            context,
                            "each rule entry must be a mapping",
                        ));
                    }

                    let entry: RuleEntry = serde_yaml::from_value(item.clone())
                        .map_err(|e| SyncError::input(&context, e.to_string()))?;

                    if entry.rule.is_empty() {
                        return Err(SyncError::input(&context, "empty 'rule' in entry"));
                    }

                    entries.push(entry);
                }

                chains.insert(chain, entries);
            }

            tables.insert(table, chains);
        }

        Ok(RuleSet { tables })
    }
}

/// Extracts a mapping key destined to become a directory name, rejecting
/// non-string and path-hostile keys.
fn key_as_segment(key: &Value, kind: &str, context: &str) -> Result<String, SyncError> {
    let Some(name) = key.as_str() else {
        return Err(SyncError::input(
            context,
            format!("{} names must be strings", kind),
        ));
    };

    if !valid_path_segment(name) {
        return Err(SyncError::input(
            context,
            format!("{} name {:?} is not usable as a path segment", kind, name),
        ));
    }

    Ok(name.to_string())
}
