//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Fatal conditions that abort the bootstrap sequence.
///
/// Discovery running out of attempts is deliberately absent: it is a
/// [`DiscoveryResult::NotFound`](crate::domain::discovery::DiscoveryResult)
/// outcome, not an error.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Download failed: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Cannot extract {}: {reason}", .archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("No '{binary}' binary found under an entry starting with '{prefix}'")]
    BinaryNotFound { prefix: String, binary: String },

    #[error("Cannot write proxy config {}: {reason}", .path.display())]
    ConfigWriteFailed { path: PathBuf, reason: String },

    #[error("Failed to launch {program}: {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Invalid credential '{0}': expected a UUID")]
    InvalidCredential(String),
}
