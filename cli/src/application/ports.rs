//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{DiscoveryResult, LaunchedProcess, SupervisedProcess};

// ── Value Types ───────────────────────────────────────────────────────────────

/// What a fetch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already existed; no network I/O happened.
    AlreadyPresent,
    /// The artifact was streamed to the destination.
    Downloaded { bytes: u64 },
}

// ── Artifact Ports ────────────────────────────────────────────────────────────

/// Idempotent "fetch URL to file" capability.
#[allow(async_fn_in_trait)]
pub trait ArtifactFetcher {
    /// Ensure `dest` exists and is executable, downloading `url` only if
    /// `dest` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::DownloadFailed`](crate::domain::BootstrapError)
    /// on timeout, transport error, or a non-success HTTP status.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome>;
}

/// Unpacks an archive and installs one binary from it.
#[allow(async_fn_in_trait)]
pub trait ArchiveInstaller {
    /// Extract `archive`, find the top-level entry starting with
    /// `entry_prefix`, and copy its `binary_name` to `dest_dir/binary_name`.
    ///
    /// Returns the installed path.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailed` if the archive cannot be read and
    /// `BinaryNotFound` if the entry or binary is missing. Nothing is
    /// installed on error.
    async fn install(
        &self,
        archive: &Path,
        dest_dir: &Path,
        entry_prefix: &str,
        binary_name: &str,
    ) -> Result<PathBuf>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the filesystem operations the bootstrap performs directly.
#[allow(async_fn_in_trait)]
pub trait LocalFs {
    /// Create `path` and any missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Replace the contents of `path` with `content` in full.
    async fn write_replace(&self, path: &Path, content: &str) -> Result<()>;
}

// ── Process Port ──────────────────────────────────────────────────────────────

/// Starts background processes. Liveness is not tracked after launch.
pub trait ProcessLauncher {
    /// Spawn `process` and return immediately.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if the OS refuses to spawn it.
    fn launch(&self, process: &SupervisedProcess) -> Result<LaunchedProcess>;

    /// Stop a process this launcher started. Used only to roll back a
    /// partially completed bootstrap.
    ///
    /// # Errors
    ///
    /// Returns an error if the process is unknown or cannot be signalled.
    fn terminate(&self, process: LaunchedProcess) -> Result<()>;
}

// ── Discovery Ports ───────────────────────────────────────────────────────────

/// An append-only text source, read in full on each call.
#[allow(async_fn_in_trait)]
pub trait LogSource {
    /// Current contents, or `None` if the source does not exist yet.
    async fn read_all(&self) -> Result<Option<String>>;
    /// Human-readable location, for operator messages.
    fn describe(&self) -> String;
}

/// Finds the tunnel's public hostname.
#[allow(async_fn_in_trait)]
pub trait DomainDiscoverer {
    /// Resolve to the hostname, or to `NotFound` once the budget is spent.
    async fn discover(&self) -> DiscoveryResult;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
