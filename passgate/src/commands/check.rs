use anyhow::{Context, Result};
use tracing::*;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli) -> Result<()> {
    let config = load_config(&cli.config, true)?;
    let protection = &config.store.login_protection;
    info!(
        block_after = protection.block_after_nth_failed_login,
        max_seconds_to_block = protection.max_seconds_to_block,
        captcha_after = ?protection.require_captcha_after_nth_failed_login,
        "Login protection policy"
    );

    if let Some(ref ldap) = config.store.ldap {
        passgate_ldap::test_connection(&ldap.to_ldap_config())
            .await
            .context("Could not reach the directory")?;
        info!(host = %ldap.host, "Directory reachable");
    }

    info!("No problems found");
    Ok(())
}
