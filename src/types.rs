use crate::error::AmendError;
use crate::frontmatter::is_valid_key;
use serde::Serialize;

/// Frontmatter keys written by the dedicated flags
pub mod keys {
    pub const TYPE: &str = "type";
    pub const PRIORITY: &str = "priority";
    pub const ASSIGNEE: &str = "assignee";
    pub const EXTERNAL_REF: &str = "external-ref";
    pub const PARENT: &str = "parent";
    pub const TAGS: &str = "tags";
}

/// A `KEY=VALUE` pair from `--set` or `--append`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyValue {
    type Err = AmendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(AmendError::Usage(format!(
                "expected KEY=VALUE, got '{}'",
                s
            )));
        };

        let key = key.trim();
        if !is_valid_key(key) {
            return Err(AmendError::Usage(format!(
                "invalid field name '{}': use lowercase letters, digits, '-' or '_'",
                key
            )));
        }

        Ok(KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Everything one invocation asks to change on a single ticket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmendRequest {
    /// Full or partial ticket identifier
    pub id: String,
    /// Text appended to the body
    pub description: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub external_ref: Option<String>,
    /// Full or partial identifier of the parent ticket
    pub parent: Option<String>,
    /// Comma-separated tags to add
    pub tags: Option<String>,
    pub set: Vec<KeyValue>,
    pub append: Vec<KeyValue>,
}

impl AmendRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// True when no flag asked for any change
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.issue_type.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.external_ref.is_none()
            && self.parent.is_none()
            && self.tags.is_none()
            && self.set.is_empty()
            && self.append.is_empty()
    }
}

/// A mutation that was applied to a ticket, reported back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    /// Field value overwritten (or added)
    Replace { key: String, value: String },
    /// List field after new entries were merged in
    Append { key: String, value: String },
    /// Text appended to the body
    Body { text: String },
}
