use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    Disabled,
    #[default]
    Preferred,
    Required,
}

impl From<&str> for TlsMode {
    fn from(s: &str) -> Self {
        match s {
            "disabled" => TlsMode::Disabled,
            "preferred" => TlsMode::Preferred,
            "required" => TlsMode::Required,
            _ => TlsMode::Preferred,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LdapConfig {
    pub host: String,
    pub port: u16,
    pub bind_dn: String,
    pub bind_password: String,
    /// STARTTLS negotiation on a plain `ldap://` connection
    pub tls_mode: TlsMode,
    /// Implicit TLS (`ldaps://`). Ignored when STARTTLS is requested.
    pub use_ssl: bool,
    pub tls_verify: bool,
    pub base_dn: String,
    pub user_filter: String,
    pub timeout: Duration,
}

/// Raw directory entry for a user, as found under the base DN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapUser {
    pub dn: String,
    pub cn: String,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Identity attributes used to provision or enrich an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicUserInfo {
    pub username: String,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<LdapUser> for BasicUserInfo {
    fn from(user: LdapUser) -> Self {
        Self {
            username: user.cn,
            email: user.email.map(|e| e.to_lowercase()),
            employee_id: user.employee_id,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_mode_from_str_defaults_to_preferred() {
        assert_eq!(TlsMode::from("disabled"), TlsMode::Disabled);
        assert_eq!(TlsMode::from("required"), TlsMode::Required);
        assert_eq!(TlsMode::from("bogus"), TlsMode::Preferred);
    }

    #[test]
    fn test_basic_info_lowercases_email() {
        let info: BasicUserInfo = LdapUser {
            dn: "cn=jdoe,ou=people,dc=example,dc=org".into(),
            cn: "jdoe".into(),
            email: Some("John.Doe@Example.ORG".into()),
            employee_id: Some("10042".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
        }
        .into();

        assert_eq!(info.username, "jdoe");
        assert_eq!(info.email.as_deref(), Some("john.doe@example.org"));
        assert_eq!(info.employee_id.as_deref(), Some("10042"));
    }
}
