//! ticket-amend library
//!
//! This module exposes the pieces the binary wires together so they can be
//! exercised directly from tests without spawning a process.

pub mod amend;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod locator;
pub mod types;
