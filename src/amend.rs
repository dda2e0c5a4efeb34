//! Applies an [`AmendRequest`] to a ticket file.

use crate::config::Settings;
use crate::error::{AmendError, Result};
use crate::frontmatter::Document;
use crate::locator::TicketStore;
use crate::types::{keys, AmendRequest, Change};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of amending one ticket
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: String,
    pub path: PathBuf,
    pub changes: Vec<Change>,
    /// False for a dry run
    pub written: bool,
    /// Amended file content, kept only for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Resolve the tickets directory from `settings`, amend the ticket, and
/// write it back unless `dry_run` is set.
pub fn run(settings: &Settings, request: &AmendRequest, dry_run: bool) -> Result<Report> {
    let store = TicketStore::locate(settings.tickets_dir.as_deref(), &settings.cwd)?;
    let amended = amend(&store, request)?;

    if dry_run {
        return Ok(Report {
            id: amended.id,
            path: amended.path,
            changes: amended.changes,
            written: false,
            document: Some(amended.content),
        });
    }

    fs::write(&amended.path, &amended.content)
        .map_err(|e| AmendError::io("write", &amended.path, e))?;
    info!(id = %amended.id, changes = amended.changes.len(), "ticket amended");

    Ok(Report {
        id: amended.id,
        path: amended.path,
        changes: amended.changes,
        written: true,
        document: None,
    })
}

/// A ticket after mutation, not yet written
#[derive(Debug, Clone)]
pub struct Amended {
    pub id: String,
    pub path: PathBuf,
    pub changes: Vec<Change>,
    pub content: String,
}

/// Load the requested ticket from `store` and apply every mutation in
/// `request`, in a fixed order: type, priority, assignee, external-ref,
/// parent, tags, `--set` pairs, `--append` pairs, then the description.
pub fn amend(store: &TicketStore, request: &AmendRequest) -> Result<Amended> {
    let ticket = store.resolve(&request.id)?;
    let mut doc = Document::load(&ticket.path)?;
    let mut changes = Vec::new();

    let scalars = [
        (keys::TYPE, &request.issue_type),
        (keys::PRIORITY, &request.priority),
        (keys::ASSIGNEE, &request.assignee),
        (keys::EXTERNAL_REF, &request.external_ref),
    ];
    for (key, value) in scalars {
        if let Some(value) = value {
            replace(&mut doc, &mut changes, key, value)?;
        }
    }

    if let Some(parent) = &request.parent {
        let parent = store.resolve(parent)?;
        replace(&mut doc, &mut changes, keys::PARENT, &parent.id)?;
    }

    if let Some(tags) = &request.tags {
        append(&mut doc, &mut changes, keys::TAGS, tags)?;
    }

    for kv in &request.set {
        replace(&mut doc, &mut changes, &kv.key, &kv.value)?;
    }

    for kv in &request.append {
        append(&mut doc, &mut changes, &kv.key, &kv.value)?;
    }

    if let Some(text) = &request.description {
        doc.append_body(text);
        debug!(bytes = text.len(), "appended to body");
        changes.push(Change::Body { text: text.clone() });
    }

    if changes.is_empty() {
        return Err(AmendError::NothingToAmend(ticket.id));
    }

    Ok(Amended {
        id: ticket.id,
        path: ticket.path,
        changes,
        content: doc.render(),
    })
}

fn replace(doc: &mut Document, changes: &mut Vec<Change>, key: &str, value: &str) -> Result<()> {
    ensure_single_line(key, value)?;
    doc.set(key, value);
    debug!(key, value, "replaced field");
    changes.push(Change::Replace {
        key: key.to_string(),
        value: value.to_string(),
    });
    Ok(())
}

fn append(doc: &mut Document, changes: &mut Vec<Change>, key: &str, input: &str) -> Result<()> {
    ensure_single_line(key, input)?;
    let stored = doc.append_list(key, input);
    debug!(key, value = %stored, "appended to list field");
    changes.push(Change::Append {
        key: key.to_string(),
        value: stored,
    });
    Ok(())
}

/// Field values live on one frontmatter line
fn ensure_single_line(key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(AmendError::Usage(format!(
            "value for '{}' must not contain line breaks",
            key
        )));
    }
    Ok(())
}
