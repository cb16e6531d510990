use std::sync::Arc;

use anyhow::Result;
use passgate_common::time::{Clock, SystemClock};
use passgate_common::PassgateConfig;
use passgate_ldap::{Directory, LdapDirectory};
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::info;

use crate::db::connect_to_db;
use crate::{Argon2PasswordVerifier, Authenticator, DatabaseStore, FailedLoginLedger, RateLimitPolicy};

#[derive(Clone)]
pub struct Services {
    pub db: Arc<Mutex<DatabaseConnection>>,
    pub config: Arc<PassgateConfig>,
    pub store: Arc<DatabaseStore>,
    pub ledger: FailedLoginLedger<DatabaseStore>,
    pub authenticator: Arc<Authenticator<DatabaseStore>>,
    pub directory: Option<Arc<dyn Directory>>,
}

impl Services {
    pub async fn new(config: PassgateConfig) -> Result<Self> {
        let db = connect_to_db(&config).await?;
        let db = Arc::new(Mutex::new(db));

        let store = Arc::new(DatabaseStore::new(db.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let protection = &config.store.login_protection;

        let ledger = FailedLoginLedger::new(
            store.clone(),
            clock.clone(),
            protection.require_captcha_after_nth_failed_login,
        );
        let policy = RateLimitPolicy::from(protection);
        let authenticator = Arc::new(Authenticator::new(
            store.clone(),
            ledger.clone(),
            policy,
            Arc::new(Argon2PasswordVerifier::new()),
            clock,
        ));

        let directory = directory_for(&config);
        if directory.is_some() {
            info!("Directory lookups enabled");
        }

        Ok(Self {
            db,
            config: Arc::new(config),
            store,
            ledger,
            authenticator,
            directory,
        })
    }
}

/// The configured directory service, if any. Needs no database.
pub fn directory_for(config: &PassgateConfig) -> Option<Arc<dyn Directory>> {
    config
        .store
        .ldap
        .as_ref()
        .map(|ldap| Arc::new(LdapDirectory::new(ldap.to_ldap_config())) as Arc<dyn Directory>)
}
