use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use passgate_common::helpers::fs::secure_file;
use passgate_common::PassgateConfig;
use passgate_db_migrations::migrate_database;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, TransactionTrait};
use tracing::debug;
use url::Url;

const SQLITE_FILE_NAME: &str = "db.sqlite3";

/// Rewrites a `sqlite:` URL so its path is a database file inside a
/// directory relative to the config file. Other URLs pass through.
fn resolve_database_url(config: &PassgateConfig) -> Result<(Url, Option<PathBuf>)> {
    let mut url = Url::parse(config.store.database_url.expose_secret())?;
    if url.scheme() != "sqlite" {
        return Ok((url, None));
    }

    let mut abs_path = config.paths_relative_to.clone();
    abs_path.push(url.path());
    abs_path.push(SQLITE_FILE_NAME);

    url.set_path(
        abs_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Failed to convert database path to string"))?,
    );
    url.set_query(Some("mode=rwc"));
    Ok((url, Some(abs_path)))
}

pub async fn connect_to_db(config: &PassgateConfig) -> Result<DatabaseConnection> {
    let (url, sqlite_path) = resolve_database_url(config)?;

    if let Some(ref path) = sqlite_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?
        }

        // Create the file so it can be secured before the pool opens it
        let db = Database::connect(ConnectOptions::new(url.to_string())).await?;
        db.begin().await?.commit().await?;
        drop(db);

        secure_file(path)?;
        debug!(path = %path.display(), "Using SQLite database");
    }

    let mut opt = ConnectOptions::new(url.to_string());
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(false);

    let connection = Database::connect(opt).await?;

    migrate_database(&connection).await?;
    Ok(connection)
}
