//! Command implementations

pub mod discover;
pub mod link;
pub mod up;
pub mod version;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;

use crate::domain::config::{DEFAULT_CREDENTIAL, DEFAULT_LISTEN_PORT, DEFAULT_WORK_DIR};
use crate::domain::discovery::{DEFAULT_ATTEMPTS, PollSettings, TUNNEL_DOMAIN_SUFFIX};
use crate::domain::ConnectionLink;
use crate::output::OutputContext;

/// Settings shared by every command that touches a running tunnel.
#[derive(Args, Debug, Clone)]
pub struct TunnelArgs {
    /// VLESS user id (UUID); also the secret WebSocket path
    #[arg(long = "uuid", env = "UUID", default_value = DEFAULT_CREDENTIAL)]
    pub credential: String,

    /// Local port sing-box listens on
    #[arg(long, env = "ARGO_PORT", default_value_t = DEFAULT_LISTEN_PORT)]
    pub port: u16,

    /// Directory for downloads, config, and the tunnel log
    #[arg(long, env = "FILE_PATH", default_value = DEFAULT_WORK_DIR)]
    pub work_dir: PathBuf,
}

/// Hostname polling budget.
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// How many times to check the tunnel log
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: u32,

    /// Milliseconds to wait before each check
    #[arg(long, default_value_t = 2000)]
    pub interval_ms: u64,
}

impl PollArgs {
    #[must_use]
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            attempts: self.attempts,
            interval: Duration::from_millis(self.interval_ms),
        }
    }
}

/// Print the discovered host and the link.
fn print_ready(ctx: &OutputContext, link: &ConnectionLink) {
    ctx.success(&format!("found domain: {}", link.host()));
    ctx.success("VLESS link:");
    ctx.link(&link.to_string());
}

/// Warn that no hostname appeared and point at the raw evidence.
fn print_host_not_found(ctx: &OutputContext, log: &Path, attempts: u32) {
    ctx.warn(&format!(
        "no *.{TUNNEL_DOMAIN_SUFFIX} domain found after {attempts} checks; inspect {}",
        log.display()
    ));
}
