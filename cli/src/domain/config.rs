//! Bootstrap configuration, built once at startup and passed down.
//!
//! Pure data and validation: no environment lookups happen here; the CLI
//! layer resolves flags and env vars before constructing [`BootstrapConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::artifact::{
    ArtifactSpec, CLOUDFLARED_URL, CONFIG_FILE, SINGBOX_URL, TUNNEL_LOG_FILE,
};
use crate::domain::discovery::PollSettings;
use crate::domain::error::BootstrapError;
use crate::domain::proxy_config::transport_path;

// ── Constants ────────────────────────────────────────────────────────────────

/// Fallback credential when none is supplied. Replace it in any real deployment.
pub const DEFAULT_CREDENTIAL: &str = "792c9cd6-9ece-4ebc-ff02-86eaf8bf7e73";
pub const DEFAULT_LISTEN_PORT: u16 = 8080;
pub const DEFAULT_WORK_DIR: &str = "tmp";
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

// ── Config ───────────────────────────────────────────────────────────────────

/// Everything one bootstrap run needs.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// VLESS user id; also the secret part of the WebSocket path.
    pub credential: String,
    /// Local port sing-box listens on and cloudflared forwards to.
    pub listen_port: u16,
    /// Directory holding downloads, config, and the tunnel log.
    pub work_dir: PathBuf,
    pub singbox_url: String,
    pub cloudflared_url: String,
    pub poll: PollSettings,
    /// Bound on a whole artifact transfer.
    pub download_timeout: Duration,
}

impl BootstrapConfig {
    /// Config with defaults for everything except the credential.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::InvalidCredential`] if `credential` is not a UUID.
    pub fn new(credential: &str, work_dir: &Path) -> Result<Self, BootstrapError> {
        Ok(Self {
            credential: validate_credential(credential)?,
            listen_port: DEFAULT_LISTEN_PORT,
            work_dir: work_dir.to_path_buf(),
            singbox_url: SINGBOX_URL.to_string(),
            cloudflared_url: CLOUDFLARED_URL.to_string(),
            poll: PollSettings::default(),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        })
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn tunnel_log_path(&self) -> PathBuf {
        self.work_dir.join(TUNNEL_LOG_FILE)
    }

    #[must_use]
    pub fn transport_path(&self) -> String {
        transport_path(&self.credential)
    }

    #[must_use]
    pub fn singbox_artifact(&self) -> ArtifactSpec {
        ArtifactSpec::singbox(&self.singbox_url, &self.work_dir)
    }

    #[must_use]
    pub fn cloudflared_artifact(&self) -> ArtifactSpec {
        ArtifactSpec::cloudflared(&self.cloudflared_url, &self.work_dir)
    }
}

/// Check that `credential` is a UUID and return it unchanged.
///
/// sing-box compares user ids textually, so the original spelling is kept.
///
/// # Errors
///
/// Returns [`BootstrapError::InvalidCredential`] if parsing fails.
pub fn validate_credential(credential: &str) -> Result<String, BootstrapError> {
    uuid::Uuid::parse_str(credential)
        .map(|_| credential.to_string())
        .map_err(|_| BootstrapError::InvalidCredential(credential.to_string()))
}
