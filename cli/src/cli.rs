//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Expose a sing-box VLESS endpoint through an ephemeral Cloudflare tunnel
#[derive(Parser)]
#[command(
    name = "argoboot",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log bootstrap internals to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download, configure, and start sing-box + cloudflared, then print the link
    Up(commands::up::UpArgs),

    /// Re-read the tunnel log of a running bootstrap and print the link
    Discover(commands::discover::DiscoverArgs),

    /// Print the link for a known tunnel hostname
    Link(commands::link::LinkArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli { quiet, no_color, command, .. } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Up(args) => commands::up::run(&ctx, &args).await,
            Command::Discover(args) => commands::discover::run(&ctx, &args).await,
            Command::Link(args) => commands::link::run(&ctx, &args),
            Command::Version => {
                commands::version::run();
                Ok(())
            }
        }
    }
}
