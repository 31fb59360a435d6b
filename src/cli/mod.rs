//! CLI entry point for uhome.

pub mod devices;
pub mod session;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// U home OpenAPI CLI
#[derive(Parser, Debug)]
#[command(name = "uhome", version, about = "Query and control U home devices")]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// OAuth client settings; anything left unset falls back to the config
/// layers and then to an interactive prompt.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// OAuth client id
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, global = true)]
    pub client_secret: Option<String>,

    /// Redirect URI registered for the client
    #[arg(long, global = true)]
    pub redirect_uri: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover devices and dump their current state
    Devices,
    /// Lock one or more devices
    Lock(DeviceArgs),
    /// Unlock one or more devices
    Unlock(DeviceArgs),
    /// Print an authorization URL and its state without logging in
    AuthorizeUrl,
}

/// Device selection for commands.
#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device ids
    #[arg(required = true)]
    pub device_ids: Vec<String>,
}
