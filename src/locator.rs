use crate::error::{AmendError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the directory that holds ticket files
pub const TICKETS_DIR_NAME: &str = ".tickets";

const TICKET_EXT: &str = ".md";

/// A ticket identifier resolved to its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTicket {
    pub id: String,
    pub path: PathBuf,
}

/// The directory of ticket files an invocation works against
#[derive(Debug, Clone)]
pub struct TicketStore {
    dir: PathBuf,
}

impl TicketStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Use `override_dir` when given, otherwise search upward from `start`
    pub fn locate(override_dir: Option<&Path>, start: &Path) -> Result<Self> {
        let dir = match override_dir {
            Some(dir) => {
                debug!(dir = %dir.display(), "using tickets directory override");
                dir.to_path_buf()
            }
            None => {
                let dir = find_tickets_dir(start)?;
                debug!(dir = %dir.display(), "discovered tickets directory");
                dir
            }
        };
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a full or partial identifier to exactly one ticket
    pub fn resolve(&self, id: &str) -> Result<ResolvedTicket> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AmendError::MissingIdentifier);
        }
        // Identifiers name files inside the store, never paths
        if id.chars().any(std::path::is_separator) {
            return Err(AmendError::NotFound(id.to_string()));
        }

        let exact = self.dir.join(format!("{}{}", id, TICKET_EXT));
        if exact.is_file() {
            debug!(id, "exact ticket match");
            return Ok(ResolvedTicket {
                id: id.to_string(),
                path: exact,
            });
        }

        let mut matches: Vec<String> = self
            .ticket_ids()?
            .into_iter()
            .filter(|candidate| candidate.contains(id))
            .collect();

        match matches.len() {
            0 => Err(AmendError::NotFound(id.to_string())),
            1 => {
                let full = matches.remove(0);
                debug!(input = id, id = %full, "partial ticket match");
                Ok(ResolvedTicket {
                    path: self.dir.join(format!("{}{}", full, TICKET_EXT)),
                    id: full,
                })
            }
            _ => {
                matches.sort();
                Err(AmendError::Ambiguous {
                    input: id.to_string(),
                    candidates: matches,
                })
            }
        }
    }

    /// Identifiers of every ticket file in the directory
    fn ticket_ids(&self) -> Result<Vec<String>> {
        let read_dir_err = |source: std::io::Error| AmendError::ReadDir {
            path: self.dir.clone(),
            source,
        };

        let entries = fs::read_dir(&self.dir).map_err(read_dir_err)?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(read_dir_err)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(name = ?entry.file_name(), "skipping non-UTF-8 file name");
                continue;
            };

            if let Some(id) = name.strip_suffix(TICKET_EXT) {
                if entry.path().is_file() {
                    ids.push(id.to_string());
                }
            }
        }

        Ok(ids)
    }
}

/// Walk from `start` up to the filesystem root looking for `.tickets`
pub fn find_tickets_dir(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let tickets_dir = current.join(TICKETS_DIR_NAME);
        if tickets_dir.is_dir() {
            return Ok(tickets_dir);
        }

        if !current.pop() {
            return Err(AmendError::NoTicketsDir {
                start: start.to_path_buf(),
            });
        }
    }
}
