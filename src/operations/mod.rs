//! Business logic for the CLI commands
//!
//! `commands/*` are thin wrappers; the pipeline orchestration lives here.

pub mod clean;
pub mod scan;
