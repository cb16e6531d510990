mod defaults;

use std::path::PathBuf;
use std::time::Duration;

use defaults::*;
use passgate_ldap::{LdapConfig, TlsMode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Secret;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoginProtectionConfig {
    /// Failed attempts tolerated before any delay applies
    #[serde(default = "_default_block_after_nth_failed_login")]
    pub block_after_nth_failed_login: u32,

    #[serde(default = "_default_max_seconds_to_block")]
    pub max_seconds_to_block: u64,

    /// Unset means a captcha is never required
    #[serde(default)]
    pub require_captcha_after_nth_failed_login: Option<u32>,
}

impl Default for LoginProtectionConfig {
    fn default() -> Self {
        Self {
            block_after_nth_failed_login: _default_block_after_nth_failed_login(),
            max_seconds_to_block: _default_max_seconds_to_block(),
            require_captcha_after_nth_failed_login: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LdapDirectoryConfig {
    pub host: String,

    #[serde(default = "_default_ldap_port")]
    pub port: u16,

    pub bind_dn: String,

    pub bind_password: Secret<String>,

    #[serde(default)]
    pub tls_mode: TlsMode,

    #[serde(default = "_default_false")]
    pub use_ssl: bool,

    #[serde(default = "_default_true")]
    pub tls_verify: bool,

    pub base_dn: String,

    #[serde(default = "_default_user_filter")]
    pub user_filter: String,

    #[serde(default = "_default_ldap_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl LdapDirectoryConfig {
    pub fn to_ldap_config(&self) -> LdapConfig {
        LdapConfig {
            host: self.host.clone(),
            port: self.port,
            bind_dn: self.bind_dn.clone(),
            bind_password: self.bind_password.expose_secret().clone(),
            tls_mode: self.tls_mode,
            use_ssl: self.use_ssl,
            tls_verify: self.tls_verify,
            base_dn: self.base_dn.clone(),
            user_filter: self.user_filter.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PassgateConfigStore {
    #[serde(default = "_default_database_url")]
    pub database_url: Secret<String>,

    #[serde(default)]
    pub login_protection: LoginProtectionConfig,

    #[serde(default)]
    pub ldap: Option<LdapDirectoryConfig>,
}

impl Default for PassgateConfigStore {
    fn default() -> Self {
        Self {
            database_url: _default_database_url(),
            login_protection: <_>::default(),
            ldap: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassgateConfig {
    pub store: PassgateConfigStore,
    pub paths_relative_to: PathBuf,
}

impl PassgateConfig {
    pub fn validate(&self) {
        for warning in self.warnings() {
            warn!("{warning}");
        }
    }

    fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = vec![];
        let protection = &self.store.login_protection;
        if protection.max_seconds_to_block == 0 {
            warnings.push("`login_protection.max_seconds_to_block` is 0 - failed logins will never block an account.");
        }
        if protection.max_seconds_to_block > _default_max_seconds_to_block() {
            warnings.push("`login_protection.max_seconds_to_block` is above one hour - blocks will be capped at 3600 seconds.");
        }
        if let Some(captcha_after) = protection.require_captcha_after_nth_failed_login {
            if captcha_after > protection.block_after_nth_failed_login {
                warnings.push("`login_protection.require_captcha_after_nth_failed_login` is higher than `block_after_nth_failed_login` - the captcha will only kick in after blocking starts.");
            }
        }
        if let Some(ref ldap) = self.store.ldap {
            if ldap.use_ssl && ldap.tls_mode != TlsMode::Disabled {
                warnings.push("Both `ldap.use_ssl` and `ldap.tls_mode` are set - STARTTLS will be used.");
            }
            if !ldap.tls_verify {
                warnings.push("LDAP certificate verification is disabled.");
            }
        }
        warnings
    }
}
