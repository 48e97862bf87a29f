//! `argoboot discover`: poll an existing tunnel log for its hostname.
//!
//! Recovers the link when `up` gave up waiting but cloudflared kept running.

use anyhow::Result;
use clap::Args;

use crate::application::ports::DomainDiscoverer;
use crate::application::services::discovery::PollingDiscoverer;
use crate::domain::config::validate_credential;
use crate::domain::{ConnectionLink, DiscoveryResult, TLS_EDGE_PORT};
use crate::domain::artifact::TUNNEL_LOG_FILE;
use crate::domain::proxy_config::transport_path;
use crate::infra::fs::TunnelLog;
use crate::output::OutputContext;

use super::{PollArgs, TunnelArgs, print_host_not_found, print_ready};

/// Arguments for the discover command.
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub tunnel: TunnelArgs,

    #[command(flatten)]
    pub poll: PollArgs,
}

/// Run `argoboot discover`.
///
/// # Errors
///
/// Returns an error if the credential is not a UUID. Not finding a hostname
/// is reported as a warning, not an error.
pub async fn run(ctx: &OutputContext, args: &DiscoverArgs) -> Result<()> {
    let credential = validate_credential(&args.tunnel.credential)?;
    let log_path = args.tunnel.work_dir.join(TUNNEL_LOG_FILE);
    let discoverer = PollingDiscoverer::new(TunnelLog::new(log_path.clone()), args.poll.settings());

    ctx.step("waiting for tunnel hostname...");
    match discoverer.discover().await {
        DiscoveryResult::Found(host) => {
            let link = ConnectionLink::new(
                &credential,
                &host,
                TLS_EDGE_PORT,
                &transport_path(&credential),
            );
            print_ready(ctx, &link);
        }
        DiscoveryResult::NotFound { attempts } => print_host_not_found(ctx, &log_path, attempts),
    }
    Ok(())
}
