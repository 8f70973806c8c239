use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::ruleset::RuleSet;

/// Type alias for the priority buckets of one chain
pub(crate) type Buckets = BTreeMap<i64, Vec<String>>;

/// Rendered rule lines grouped by table, chain and priority. Tables and
/// chains keep document order; buckets within a chain sort by priority.
#[derive(Debug, Default)]
pub struct RuleTree {
    pub tables: IndexMap<String, IndexMap<String, Buckets>>,
}

impl RuleTree {
    /// Groups every entry of a validated [RuleSet] into its
    /// (table, chain, priority) bucket.
    ///
    /// An entry claims its bucket even when it expands to zero lines, so the
    /// bucket file ends up holding a single newline. Chains without entries
    /// claim nothing and leave no trace on disk.
    pub fn build(rules: &RuleSet) -> RuleTree {
        let mut tables = IndexMap::new();

        for (table, chains) in rules.tables.iter() {
            let mut grouped: IndexMap<String, Buckets> = IndexMap::new();

            for (chain, entries) in chains.iter() {
                if entries.is_empty() {
                    continue;
                }

                let buckets = grouped.entry(chain.clone()).or_default();

                for entry in entries.iter() {
                    buckets
                        .entry(entry.priority)
                        .or_default()
                        .extend(entry.lines());
                }
            }

            if !grouped.is_empty() {
                tables.insert(table.clone(), grouped);
            }
        }

        RuleTree { tables }
    }
}

/// Renders the lines of one bucket into file content
pub fn render_lines(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// File name of one priority bucket, `NN-<name>.rules`
pub fn rule_file_name(priority: i64, name: &str) -> String {
    format!("{:02}-{}.rules", priority, name)
}
