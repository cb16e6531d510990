use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tracing::{debug, info, warn};

use crate::error::{LdapError, Result};
use crate::types::{LdapConfig, TlsMode};

/// How the connection to the directory is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transport {
    Plain,
    StartTls,
    Ldaps,
}

pub(crate) fn transport_for(config: &LdapConfig) -> Transport {
    match (config.tls_mode, config.use_ssl) {
        // STARTTLS wins over implicit TLS when both are requested
        (TlsMode::Preferred | TlsMode::Required, _) => Transport::StartTls,
        (TlsMode::Disabled, true) => Transport::Ldaps,
        (TlsMode::Disabled, false) => Transport::Plain,
    }
}

pub(crate) fn build_ldap_url(config: &LdapConfig) -> String {
    let scheme = match transport_for(config) {
        Transport::Ldaps => "ldaps",
        Transport::Plain | Transport::StartTls => "ldap",
    };

    format!("{}://{}:{}", scheme, config.host, config.port)
}

async fn open(config: &LdapConfig) -> Result<Ldap> {
    if config.host.is_empty() {
        return Err(LdapError::InvalidConfiguration(
            "LDAP host is not set".to_string(),
        ));
    }

    let url = build_ldap_url(config);
    debug!("Connecting to LDAP server: {}", url);

    let settings = LdapConnSettings::new()
        .set_conn_timeout(config.timeout)
        .set_starttls(transport_for(config) == Transport::StartTls)
        .set_no_tls_verify(!config.tls_verify);

    let (conn, ldap) = LdapConnAsync::with_settings(settings, &url)
        .await
        .map_err(|e| LdapError::ConnectionFailed(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = conn.drive().await {
            warn!("LDAP connection driver error: {}", e);
        }
    });

    Ok(ldap)
}

/// Connect and bind with the service account
pub async fn connect(config: &LdapConfig) -> Result<Ldap> {
    let mut ldap = open(config).await?;

    ldap.simple_bind(&config.bind_dn, &config.bind_password)
        .await
        .map_err(|e| LdapError::ServiceBindFailed(e.to_string()))?
        .success()
        .map_err(|e| LdapError::ServiceBindFailed(e.to_string()))?;

    info!("Successfully connected and authenticated to LDAP server");

    Ok(ldap)
}

/// Re-bind an open connection as `dn`. Returns `Ok(false)` when the
/// directory rejects the credentials and `Err` only on transport failures.
pub async fn bind_as(ldap: &mut Ldap, dn: &str, password: &str) -> Result<bool> {
    let result = ldap
        .simple_bind(dn, password)
        .await
        .map_err(|e| LdapError::ConnectionFailed(e.to_string()))?;

    if result.rc != 0 {
        debug!(dn = %dn, rc = result.rc, "LDAP bind rejected");
    }
    Ok(result.rc == 0)
}

pub async fn test_connection(config: &LdapConfig) -> Result<bool> {
    match connect(config).await {
        Ok(mut ldap) => {
            let _ = ldap.unbind().await;
            Ok(true)
        }
        Err(e) => {
            debug!("Test connection failed: {}", e);
            Err(e)
        }
    }
}
