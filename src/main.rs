//! uhome CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uhome::cli::{devices, Cli, Commands};
use uhome::client::LockAction;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uhome=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Devices => devices::handle_devices(&cli.credentials).await,
        Commands::Lock(args) => {
            devices::handle_lock(&cli.credentials, &args.device_ids, LockAction::Lock).await
        }
        Commands::Unlock(args) => {
            devices::handle_lock(&cli.credentials, &args.device_ids, LockAction::Unlock).await
        }
        Commands::AuthorizeUrl => devices::handle_authorize_url(&cli.credentials).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
