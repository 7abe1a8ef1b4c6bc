//! # Error Handling
//!
//! Centralized error type for repoweave, built on `thiserror`. Every failure
//! mode the tool can hit (manifest parsing, containment validation, git
//! command execution, hosting-provider calls) has its own variant carrying
//! enough context to produce a useful report line.
//!
//! The propagation policy is coarse at the run level: errors scoped to a
//! single manifest directory are caught at the directory boundary and turned
//! into a report line, and the run continues with the next directory. Only
//! the connectivity pre-flight failure is fatal to a whole `update` run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for repoweave operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest violated a structural rule, e.g. a Component manifest with
    /// a Project-kind descendant, or a directory carrying both manifest
    /// filenames.
    #[error("Validation error for {path}: {message}")]
    Validation { path: PathBuf, message: String },

    /// A manifest file could not be loaded or was not a JSON object.
    #[error("Manifest error for {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// A required label is missing and could not be collected.
    #[error("Missing required label '{label}' in {path}")]
    MissingLabel { path: PathBuf, label: String },

    /// An error occurred while executing a git command.
    #[error("Git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// A git push exceeded its timeout and was abandoned.
    #[error("Git push timed out after {seconds}s in {dir}")]
    PushTimeout { dir: PathBuf, seconds: u64 },

    /// The hosting provider rejected or failed an operation.
    #[error("Hosting provider error: {message}")]
    Provider { message: String },

    /// The hosting provider could not be reached during pre-flight.
    #[error("Provider connectivity check failed: {message}")]
    Connectivity { message: String },

    /// The .gitignore file could not be parsed into a matcher.
    #[error("Ignore pattern error: {message}")]
    Ignore { message: String },

    /// Invalid tool configuration (environment or flags).
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation {
            path: PathBuf::from("/repo/api/component.json"),
            message: "component cannot include project /repo/api/app".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Validation error"));
        assert!(display.contains("/repo/api/component.json"));
        assert!(display.contains("cannot include project"));
    }

    #[test]
    fn test_error_display_missing_label() {
        let error = Error::MissingLabel {
            path: PathBuf::from("/repo/api"),
            label: "tier".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing required label 'tier'"));
        assert!(display.contains("/repo/api"));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "push -u origin main".to_string(),
            dir: PathBuf::from("/repo/api"),
            stderr: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("push -u origin main"));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_error_display_push_timeout() {
        let error = Error::PushTimeout {
            dir: PathBuf::from("/repo/api"),
            seconds: 60,
        };
        let display = format!("{}", error);
        assert!(display.contains("timed out after 60s"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{unclosed").unwrap_err();
        let error: Error = json_error.into();
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }
}
