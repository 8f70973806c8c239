use serde::Deserialize;

/// Priority assigned to entries that don't specify one.
pub const DEFAULT_PRIORITY: i64 = 50;

/// One declarative firewall rule entry, as it appears in the rules document.
/// The `rule` text itself is opaque; it is emitted verbatim.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuleEntry {
    pub rule: String,

    /// Rendered as a leading `# <comment>` line when non-empty.
    pub comment: Option<String>,

    /// Groups entries into output files and orders them by filename prefix.
    #[serde(default = "default_priority")]
    pub priority: i64,

    /// When present, the entry expands into one rule line per interface,
    /// each prefixed with an `-i <iface>` selector.
    pub interfaces: Option<Vec<String>>,
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

impl RuleEntry {
    /// Expands the entry into the literal lines it contributes to its
    /// (table, chain, priority) group: the comment line first, then one rule
    /// line per interface in list order, or the bare rule text when no
    /// interface list is given.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(comment) = self.comment.as_deref() {
            if !comment.is_empty() {
                lines.push(format!("# {}", comment));
            }
        }

        match self.interfaces {
            Some(ref interfaces) => {
                for iface in interfaces.iter() {
                    lines.push(format!("-i {} {}", iface, &self.rule));
                }
            }
            None => lines.push(self.rule.clone()),
        }

        lines
    }
}

#[cfg(test)]
mod tests {

    use super::{RuleEntry, DEFAULT_PRIORITY};
    use assert2::check;
    use rstest::rstest;

    fn entry(yaml: &str) -> RuleEntry {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let e = entry("rule: -j ACCEPT");

        check!(e.rule == "-j ACCEPT");
        check!(e.comment == None);
        check!(e.priority == DEFAULT_PRIORITY);
        check!(e.interfaces == None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let e = entry("{rule: -j ACCEPT, state: present}");

        check!(e.rule == "-j ACCEPT");
    }

    #[test]
    fn test_plain_rule_expands_to_itself() {
        let e = entry("rule: -p tcp --dport 22 -j ACCEPT");

        check!(e.lines() == vec!["-p tcp --dport 22 -j ACCEPT".to_string()]);
    }

    #[test]
    fn test_comment_precedes_rule_line() {
        let e = entry("{rule: -j ACCEPT, comment: allow everything}");

        check!(e.lines() == vec!["# allow everything".to_string(), "-j ACCEPT".to_string()]);
    }

    #[test]
    fn test_empty_comment_is_skipped() {
        let e = entry("{rule: -j ACCEPT, comment: ''}");

        check!(e.lines() == vec!["-j ACCEPT".to_string()]);
    }

    #[test]
    fn test_interface_expansion() {
        let e = entry(
            "{rule: -p tcp --dport 80 -j ACCEPT, comment: c, interfaces: [eth0, eth1]}",
        );

        check!(
            e.lines()
                == vec![
                    "# c".to_string(),
                    "-i eth0 -p tcp --dport 80 -j ACCEPT".to_string(),
                    "-i eth1 -p tcp --dport 80 -j ACCEPT".to_string(),
                ]
        );
    }

    #[test]
    fn test_empty_interface_list_yields_no_rule_lines() {
        let e = entry("{rule: -j ACCEPT, comment: c, interfaces: []}");

        check!(e.lines() == vec!["# c".to_string()]);

        let e = entry("{rule: -j ACCEPT, interfaces: []}");

        check!(e.lines().is_empty());
    }

    #[rstest]
    #[case("rule: [nested]")]
    #[case("{rule: -j ACCEPT, interfaces: eth0}")]
    #[case("{rule: -j ACCEPT, priority: soon}")]
    #[case("{rule: -j ACCEPT, comment: [a, b]}")]
    fn test_malformed_entries_fail_to_decode(#[case] yaml: &str) {
        let res: Result<RuleEntry, _> = serde_yaml::from_str(yaml);
        check!(res.is_err());
    }
}
