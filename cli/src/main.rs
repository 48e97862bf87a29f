//! argoboot - sing-box behind an ephemeral Cloudflare tunnel

use clap::Parser;

use argoboot::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    argoboot::logging::init(cli.verbose);
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
