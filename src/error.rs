//! Error types and handling for Unidup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The decision engine itself has no fatal error path: data errors (unparsable
//! versions or dates) and oracle failures are recovered locally with documented
//! fallbacks. The variants below cover the surrounding surfaces: inventory
//! loading, rules configuration, and the CLI.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Unidup operations
#[derive(Error, Diagnostic, Debug)]
pub enum UnidupError {
    // Inventory errors
    #[error("Inventory source not found: {path}")]
    #[diagnostic(
        code(unidup::inventory::not_found),
        help("Check that the export file or directory exists and is readable")
    )]
    InventoryNotFound { path: String },

    #[error("Failed to parse inventory export: {path}")]
    #[diagnostic(
        code(unidup::inventory::parse_failed),
        help("Inventory exports are JSON arrays of raw installation records")
    )]
    InventoryParseFailed { path: String, reason: String },

    // Rules errors
    #[error("Rules file not found: {path}")]
    #[diagnostic(code(unidup::rules::not_found))]
    RulesNotFound { path: String },

    #[error("Failed to parse rules file: {path}")]
    #[diagnostic(code(unidup::rules::parse_failed))]
    RulesParseFailed { path: String, reason: String },

    #[error("Invalid pattern in rules: {pattern}")]
    #[diagnostic(
        code(unidup::rules::invalid_pattern),
        help("Patterns are regular expressions matched against display names")
    )]
    InvalidPattern { pattern: String, reason: String },

    // CLI errors
    #[error("Unsupported shell: {shell}")]
    #[diagnostic(
        code(unidup::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    #[error("Failed to read confirmation: {reason}")]
    #[diagnostic(code(unidup::cli::confirmation_failed))]
    ConfirmationFailed { reason: String },

    #[error("Failed to serialize report: {reason}")]
    #[diagnostic(code(unidup::report::serialize_failed))]
    ReportSerializeFailed { reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(unidup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for UnidupError {
    fn from(err: std::io::Error) -> Self {
        UnidupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for UnidupError {
    fn from(err: serde_yaml::Error) -> Self {
        UnidupError::RulesParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for UnidupError {
    fn from(err: serde_json::Error) -> Self {
        UnidupError::InventoryParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, UnidupError>;
