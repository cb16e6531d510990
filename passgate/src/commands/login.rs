use anyhow::{Context, Result};
use passgate_core::Services;
use tracing::*;

use super::common::read_password;
use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli, username: &str) -> Result<()> {
    let config = load_config(&cli.config, true)?;
    let services = Services::new(config).await?;

    let password = read_password("Password")?;
    let outcome = services
        .authenticator
        .authenticate(username, &password)
        .await
        .context("Could not complete the login")?;

    if outcome.is_authenticated() {
        println!("Authenticated");
        return Ok(());
    }

    for message in outcome.error_messages() {
        println!("{message}");
    }
    debug!(categories = ?outcome.errors().iter().map(|e| e.category()).collect::<Vec<_>>(), "Denied");
    std::process::exit(1);
}
