//! Artifact descriptors and the installation ledger.
//!
//! Pure data: no I/O. The infra layer fetches and installs what these
//! descriptors name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

// ── Constants ────────────────────────────────────────────────────────────────

/// Official sing-box release for linux-amd64.
pub const SINGBOX_URL: &str = "https://github.com/SagerNet/sing-box/releases/download/v1.12.9/sing-box-1.12.9-linux-amd64.tar.gz";

/// Official cloudflared release for linux-amd64.
pub const CLOUDFLARED_URL: &str =
    "https://github.com/cloudflare/cloudflared/releases/latest/download/cloudflared-linux-amd64";

pub const SINGBOX: &str = "sing-box";
pub const CLOUDFLARED: &str = "cloudflared";

pub const SINGBOX_ARCHIVE_FILE: &str = "sing-box.tar.gz";
pub const CONFIG_FILE: &str = "config.json";
pub const TUNNEL_LOG_FILE: &str = "argo.log";

// ── Types ────────────────────────────────────────────────────────────────────

/// How a fetched artifact becomes an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The download is the executable itself.
    Binary,
    /// The download is a `.tar.gz` holding a top-level directory whose name
    /// starts with `entry_prefix`, with `binary_name` inside it.
    Archive {
        entry_prefix: String,
        binary_name: String,
    },
}

/// A binary the bootstrap needs, and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub url: String,
    /// Where the download lands.
    pub destination: PathBuf,
    pub kind: ArtifactKind,
}

impl ArtifactSpec {
    /// The sing-box archive, downloaded to `<work_dir>/sing-box.tar.gz`.
    #[must_use]
    pub fn singbox(url: &str, work_dir: &Path) -> Self {
        Self {
            name: SINGBOX.to_string(),
            url: url.to_string(),
            destination: work_dir.join(SINGBOX_ARCHIVE_FILE),
            kind: ArtifactKind::Archive {
                entry_prefix: SINGBOX.to_string(),
                binary_name: SINGBOX.to_string(),
            },
        }
    }

    /// The standalone cloudflared binary, downloaded to `<work_dir>/cloudflared`.
    #[must_use]
    pub fn cloudflared(url: &str, work_dir: &Path) -> Self {
        Self {
            name: CLOUDFLARED.to_string(),
            url: url.to_string(),
            destination: work_dir.join(CLOUDFLARED),
            kind: ArtifactKind::Binary,
        }
    }
}

/// Artifact name → resolved executable path.
///
/// Entries are write-once: a path recorded for a name stays fixed for the
/// lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct InstallationState {
    resolved: BTreeMap<String, PathBuf>,
}

impl InstallationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the executable path for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` already has a recorded path.
    pub fn record(&mut self, name: &str, path: PathBuf) -> Result<()> {
        if let Some(existing) = self.resolved.get(name) {
            anyhow::bail!(
                "{name} is already installed at {}",
                existing.display()
            );
        }
        self.resolved.insert(name.to_string(), path);
        Ok(())
    }

    /// Resolved executable for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` was never installed.
    pub fn executable(&self, name: &str) -> Result<&Path> {
        self.resolved
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| anyhow::anyhow!("{name} has not been installed"))
    }
}
