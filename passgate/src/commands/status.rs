use anyhow::Result;
use passgate_core::Services;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli, username: &str) -> Result<()> {
    let config = load_config(&cli.config, true)?;
    let services = Services::new(config).await?;
    let ledger = &services.ledger;

    let seconds_until_unblocked = ledger.seconds_until_unblocked(username).await?;
    let status = serde_json::json!({
        "username": username,
        "blocked": seconds_until_unblocked > 0,
        "seconds_until_unblocked": seconds_until_unblocked,
        "wait": ledger.wait_time_until_unblocked(username).await?.to_string(),
        "failed_attempts": ledger.failed_attempt_count(username).await?,
        "captcha_required": ledger.is_captcha_required_for(username).await?,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
