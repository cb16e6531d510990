mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use logging::init_logging;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, default_value = "/etc/passgate.yaml", env = "PASSGATE_CONFIG")]
    config: PathBuf,
}

#[derive(clap::Subcommand)]
pub(crate) enum Commands {
    /// Validate config file
    Check,
    /// Create a password hash for provisioning an account
    Hash,
    /// Try a username and password against the account database
    Login { username: String },
    /// Show the failed-login block state of a username
    Status { username: String },
    /// Look up a user in the configured directory
    Lookup {
        identifier: String,
        /// Also check a password by binding as the user
        #[arg(long)]
        verify_password: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Check => crate::commands::check::command(&cli).await,
        Commands::Hash => crate::commands::hash::command().await,
        Commands::Login { username } => crate::commands::login::command(&cli, username).await,
        Commands::Status { username } => crate::commands::status::command(&cli, username).await,
        Commands::Lookup {
            identifier,
            verify_password,
        } => crate::commands::lookup::command(&cli, identifier, *verify_password).await,
    }
}
