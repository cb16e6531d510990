use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use passgate_common::helpers::fs::secure_file;
use passgate_common::{PassgateConfig, PassgateConfigStore};
use tracing::*;

pub fn load_config(path: &Path, secure: bool) -> Result<PassgateConfig> {
    if secure {
        secure_file(path).context("Could not secure config")?;
    }

    let store: PassgateConfigStore = Config::builder()
        .add_source(File::from(path))
        .add_source(
            Environment::with_prefix("PASSGATE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Could not load config")?
        .try_deserialize()
        .context("Could not parse config")?;

    let paths_relative_to = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let config = PassgateConfig {
        store,
        paths_relative_to,
    };

    info!(
        "Using config: {path:?} (directory: {})",
        if config.store.ldap.is_some() {
            "ldap"
        } else {
            "none"
        },
    );
    config.validate();
    Ok(config)
}
