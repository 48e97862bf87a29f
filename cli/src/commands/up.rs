//! `argoboot up`: download, configure, and start sing-box behind a quick
//! tunnel, then print the connection link.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::application::services::bootstrap::{self as service, BootstrapOutcome, BootstrapPorts};
use crate::application::services::discovery::PollingDiscoverer;
use crate::domain::BootstrapConfig;
use crate::domain::artifact::{CLOUDFLARED_URL, SINGBOX_URL};
use crate::domain::config::{DEFAULT_DOWNLOAD_TIMEOUT, validate_credential};
use crate::infra::archive::TarGzInstaller;
use crate::infra::fetcher::HttpFetcher;
use crate::infra::fs::{LocalFs, TunnelLog};
use crate::infra::process::DetachedLauncher;
use crate::output::{OutputContext, TerminalReporter};

use super::{PollArgs, TunnelArgs, print_host_not_found, print_ready};

/// Arguments for the up command.
#[derive(Args, Debug)]
pub struct UpArgs {
    #[command(flatten)]
    pub tunnel: TunnelArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    /// sing-box release archive (.tar.gz)
    #[arg(long, default_value = SINGBOX_URL)]
    pub singbox_url: String,

    /// cloudflared release binary
    #[arg(long, default_value = CLOUDFLARED_URL)]
    pub cloudflared_url: String,

    /// Upper bound on each download, in seconds
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT.as_secs())]
    pub download_timeout_secs: u64,
}

impl UpArgs {
    /// Resolve flags and environment into a [`BootstrapConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is not a UUID.
    pub fn to_config(&self) -> Result<BootstrapConfig> {
        Ok(BootstrapConfig {
            credential: validate_credential(&self.tunnel.credential)?,
            listen_port: self.tunnel.port,
            work_dir: self.tunnel.work_dir.clone(),
            singbox_url: self.singbox_url.clone(),
            cloudflared_url: self.cloudflared_url.clone(),
            poll: self.poll.settings(),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
        })
    }
}

/// Run `argoboot up`.
///
/// # Errors
///
/// Returns an error if any download, install, config write, or launch fails.
pub async fn run(ctx: &OutputContext, args: &UpArgs) -> Result<()> {
    let config = args.to_config()?;
    tracing::debug!(?config, "bootstrap config resolved");

    let fetcher = HttpFetcher::new(config.download_timeout).with_progress(ctx.download_progress());
    let launcher = DetachedLauncher::new();
    let discoverer = PollingDiscoverer::new(TunnelLog::new(config.tunnel_log_path()), config.poll);
    let reporter = TerminalReporter::new(ctx);

    let outcome = service::bootstrap(
        BootstrapPorts {
            fetcher: &fetcher,
            installer: &TarGzInstaller,
            local_fs: &LocalFs,
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &config,
        &reporter,
    )
    .await?;

    match outcome {
        BootstrapOutcome::Ready { link } => print_ready(ctx, &link),
        BootstrapOutcome::HostNotFound { log, attempts } => {
            print_host_not_found(ctx, &log, attempts);
        }
    }
    Ok(())
}
