use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AmendError> = std::result::Result<T, E>;

/// Every way an amend run can fail
#[derive(Debug, Error)]
pub enum AmendError {
    #[error("{0}")]
    Usage(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("missing ticket identifier")]
    MissingIdentifier,

    #[error("no .tickets directory found (searched upward from {})", start.display())]
    NoTicketsDir { start: PathBuf },

    #[error("ticket not found: {0}")]
    NotFound(String),

    #[error("ambiguous ticket id '{input}': matches {}", candidates.join(", "))]
    Ambiguous {
        input: String,
        candidates: Vec<String>,
    },

    #[error("invalid frontmatter in {}", path.display())]
    InvalidFrontmatter { path: PathBuf },

    #[error("nothing to amend for {0}")]
    NothingToAmend(String),

    #[error("failed to read tickets directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AmendError {
    /// Process exit status for this error. Every failure currently maps to 1.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        AmendError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
