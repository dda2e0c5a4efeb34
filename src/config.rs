use crate::error::{AmendError, Result};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the tickets directory directly
pub const TICKETS_DIR_ENV: &str = "TICKETS_DIR";

/// Environment variable holding a tracing filter (e.g. `debug`)
pub const LOG_ENV: &str = "TICKET_AMEND_LOG";

/// Process-level settings, read once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit tickets directory; skips the upward search when set
    pub tickets_dir: Option<PathBuf>,
    /// Where the upward search starts
    pub cwd: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let cwd = env::current_dir()
            .map_err(|e| AmendError::io("determine", "current directory", e))?;
        Ok(Self::from_vars(env::var_os(TICKETS_DIR_ENV), cwd))
    }

    /// Build settings from raw values. An empty override counts as unset.
    pub fn from_vars(tickets_dir: Option<OsString>, cwd: PathBuf) -> Self {
        Self {
            tickets_dir: tickets_dir.filter(|v| !v.is_empty()).map(PathBuf::from),
            cwd,
        }
    }
}
