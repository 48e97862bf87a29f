//! `argoboot link`: render the connection link for a known tunnel host.

use anyhow::Result;
use clap::Args;

use crate::domain::config::{DEFAULT_CREDENTIAL, validate_credential};
use crate::domain::proxy_config::transport_path;
use crate::domain::{ConnectionLink, TLS_EDGE_PORT};
use crate::output::OutputContext;

/// Arguments for the link command.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Tunnel hostname, e.g. `abc-def.trycloudflare.com`
    #[arg(long)]
    pub host: String,

    /// VLESS user id (UUID)
    #[arg(long = "uuid", env = "UUID", default_value = DEFAULT_CREDENTIAL)]
    pub credential: String,
}

/// Run `argoboot link`.
///
/// # Errors
///
/// Returns an error if the credential is not a UUID.
pub fn run(ctx: &OutputContext, args: &LinkArgs) -> Result<()> {
    let credential = validate_credential(&args.credential)?;
    let link = ConnectionLink::new(
        &credential,
        &args.host,
        TLS_EDGE_PORT,
        &transport_path(&credential),
    );
    ctx.link(&link.to_string());
    Ok(())
}
