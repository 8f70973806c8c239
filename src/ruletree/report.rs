use serde::Serialize;

/// Result of a run, reported on stdout as a single JSON object. Successful
/// runs carry `changed`, failed runs carry `failed` and `msg`.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Report {
    /// Successful run; `changed` tells whether the tree was touched
    pub fn changed(changed: bool) -> Self {
        Report {
            changed: Some(changed),
            failed: None,
            msg: None,
        }
    }

    /// Failed run, with the reason
    pub fn failed(msg: impl Into<String>) -> Self {
        Report {
            changed: None,
            failed: Some(true),
            msg: Some(msg.into()),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
