use async_trait::async_trait;
use tracing::debug;

use crate::connection::{bind_as, connect};
use crate::error::Result;
use crate::queries::{find_user_by_cn, search_user_by_cn};
use crate::types::{BasicUserInfo, LdapConfig};

/// Read-only view of an external user directory
#[async_trait]
pub trait Directory: Send + Sync {
    async fn lookup_basic_info(&self, identifier: &str) -> Result<Option<BasicUserInfo>>;

    async fn user_exists(&self, identifier: &str) -> Result<bool>;

    /// Check `password` by binding as the user. Rejected credentials are
    /// `Ok(false)`; only transport or configuration problems are errors.
    async fn verify_password(&self, identifier: &str, password: &str) -> Result<bool>;
}

pub struct LdapDirectory {
    config: LdapConfig,
}

impl LdapDirectory {
    pub fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LdapConfig {
        &self.config
    }
}

#[async_trait]
impl Directory for LdapDirectory {
    async fn lookup_basic_info(&self, identifier: &str) -> Result<Option<BasicUserInfo>> {
        if identifier.is_empty() {
            return Ok(None);
        }
        Ok(find_user_by_cn(&self.config, identifier)
            .await?
            .map(Into::into))
    }

    async fn user_exists(&self, identifier: &str) -> Result<bool> {
        if identifier.is_empty() {
            return Ok(false);
        }
        Ok(find_user_by_cn(&self.config, identifier).await?.is_some())
    }

    async fn verify_password(&self, identifier: &str, password: &str) -> Result<bool> {
        // An empty password would turn into an unauthenticated bind
        if identifier.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let mut ldap = connect(&self.config).await?;
        let result = match search_user_by_cn(&mut ldap, &self.config, identifier).await {
            Ok(Some(user)) => bind_as(&mut ldap, &user.dn, password).await,
            Ok(None) => {
                debug!("No directory entry for {}", identifier);
                Ok(false)
            }
            Err(e) => Err(e),
        };
        let _ = ldap.unbind().await;

        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::TlsMode;

    fn unreachable_directory() -> LdapDirectory {
        LdapDirectory::new(LdapConfig {
            host: String::new(),
            port: 389,
            bind_dn: String::new(),
            bind_password: String::new(),
            tls_mode: TlsMode::Disabled,
            use_ssl: false,
            tls_verify: true,
            base_dn: "dc=example,dc=org".into(),
            user_filter: "(objectClass=person)".into(),
            timeout: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn test_empty_inputs_never_reach_the_server() {
        let directory = unreachable_directory();

        assert!(!directory.verify_password("", "secret").await.unwrap());
        assert!(!directory.verify_password("jdoe", "").await.unwrap());
        assert!(!directory.user_exists("").await.unwrap());
        assert!(directory.lookup_basic_info("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_configuration_errors_are_surfaced() {
        let directory = unreachable_directory();
        assert!(directory.user_exists("jdoe").await.is_err());
        assert!(directory.verify_password("jdoe", "secret").await.is_err());
    }
}
