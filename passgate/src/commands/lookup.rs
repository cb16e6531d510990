use anyhow::{Context, Result};
use passgate_core::directory_for;
use tracing::*;

use super::common::read_password;
use crate::config::load_config;

pub(crate) async fn command(
    cli: &crate::Cli,
    identifier: &str,
    verify_password: bool,
) -> Result<()> {
    let config = load_config(&cli.config, true)?;
    let Some(directory) = directory_for(&config) else {
        anyhow::bail!("No directory configured, add an `ldap` section to the config file");
    };

    if !directory
        .user_exists(identifier)
        .await
        .context("Directory lookup failed")?
    {
        error!(identifier, "No such user in the directory");
        std::process::exit(1);
    }

    if let Some(info) = directory
        .lookup_basic_info(identifier)
        .await
        .context("Directory lookup failed")?
    {
        println!("{}", serde_json::to_string_pretty(&info)?);
    }

    if verify_password {
        let password = read_password("Directory password")?;
        let accepted = directory
            .verify_password(identifier, &password)
            .await
            .context("Directory bind failed")?;
        if !accepted {
            error!(identifier, "The directory rejected the password");
            std::process::exit(1);
        }
        info!(identifier, "The directory accepted the password");
    }
    Ok(())
}
