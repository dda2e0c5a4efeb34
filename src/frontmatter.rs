//! Line-oriented frontmatter editing.
//!
//! Only `key: value` lines are understood. Everything else between the two
//! `---` markers is kept verbatim, and fields that are never touched are
//! written back exactly as they were read.

use crate::error::{AmendError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

pub const DELIMITER: &str = "---";

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z][a-z0-9_-]*):(?: (.*))?$").expect("regex")
});

static KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("regex"));

/// Whether `key` can be written as a field and read back as one
pub fn is_valid_key(key: &str) -> bool {
    KEY.is_match(key)
}

/// One line of the frontmatter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Field {
        key: String,
        value: String,
        /// Original text, dropped once the value is replaced
        raw: Option<String>,
    },
    Opaque(String),
}

impl Line {
    fn parse(line: &str) -> Self {
        match FIELD_LINE.captures(line) {
            Some(caps) => Line::Field {
                key: caps[1].to_string(),
                value: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
                raw: Some(line.to_string()),
            },
            None => Line::Opaque(line.to_string()),
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Line::Field {
                raw: Some(raw), ..
            } => out.push_str(raw),
            Line::Field {
                key,
                value,
                raw: None,
            } => {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(value);
            }
            Line::Opaque(text) => out.push_str(text),
        }
    }
}

/// A ticket file split into frontmatter lines and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    body: String,
    /// Whether a newline followed the closing marker
    closing_newline: bool,
}

impl Document {
    /// Read and parse a ticket file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| AmendError::io("read", path, e))?;
        Self::parse(&content).ok_or_else(|| AmendError::InvalidFrontmatter {
            path: path.to_path_buf(),
        })
    }

    /// Split `content` at its frontmatter markers. Returns `None` when the
    /// file does not open with `---` or never closes the block.
    pub fn parse(content: &str) -> Option<Self> {
        let rest = content.strip_prefix("---\n")?;

        let (header, body, closing_newline) = if let Some(body) = rest.strip_prefix("---\n") {
            ("", body, true)
        } else if rest == DELIMITER {
            ("", "", false)
        } else if let Some(pos) = rest.find("\n---\n") {
            (&rest[..pos], &rest[pos + 5..], true)
        } else if let Some(header) = rest.strip_suffix("\n---") {
            (header, "", false)
        } else {
            return None;
        };

        let lines = if header.is_empty() {
            Vec::new()
        } else {
            header.split('\n').map(Line::parse).collect()
        };

        Some(Self {
            lines,
            body: body.to_string(),
            closing_newline,
        })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Value of the first field named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Field { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Overwrite the first field named `key` in place, or add it at the end
    /// of the block.
    pub fn set(&mut self, key: &str, new_value: &str) {
        let existing = self.lines.iter_mut().find_map(|line| match line {
            Line::Field { key: k, value, raw } if k.as_str() == key => Some((value, raw)),
            _ => None,
        });

        match existing {
            Some((value, raw)) => {
                *value = new_value.to_string();
                *raw = None;
            }
            None => self.lines.push(Line::Field {
                key: key.to_string(),
                value: new_value.to_string(),
                raw: None,
            }),
        }
    }

    /// Merge comma-separated `input` into the list field `key`, skipping
    /// entries already present. Returns the encoded list that was stored.
    pub fn append_list(&mut self, key: &str, input: &str) -> String {
        let mut items = parse_list(self.get(key).unwrap_or_default());
        for item in parse_list(input) {
            if !items.contains(&item) {
                items.push(item);
            }
        }

        let encoded = encode_list(&items);
        self.set(key, &encoded);
        encoded
    }

    /// Append `text` to the body as a new paragraph
    pub fn append_body(&mut self, text: &str) {
        let trimmed = self.body.trim_end().len();
        self.body.truncate(trimmed);
        self.body.push_str("\n\n");
        self.body.push_str(text);
        self.body.push('\n');
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64 * (self.lines.len() + 2));
        out.push_str(DELIMITER);
        out.push('\n');
        for line in &self.lines {
            line.render(&mut out);
            out.push('\n');
        }
        out.push_str(DELIMITER);
        if self.closing_newline {
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }
}

/// Parse `[a, b]` (or bare `a, b`) into unique, trimmed, non-empty items in
/// first-seen order.
pub fn parse_list(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    let mut items: Vec<String> = Vec::new();
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

pub fn encode_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}
