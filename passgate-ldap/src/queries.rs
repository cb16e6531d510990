use ldap3::{ldap_escape, Ldap, Scope, SearchEntry};
use tracing::debug;

use crate::connection::connect;
use crate::error::{LdapError, Result};
use crate::types::{LdapConfig, LdapUser};

// Attributes requested for every user search
const LDAP_USER_ATTRIBUTES: &[&str] = &["cn", "mail", "employeeNumber", "givenName", "sn"];

fn first_attr(search_entry: &SearchEntry, name: &str) -> Option<String> {
    search_entry
        .attrs
        .get(name)
        .and_then(|v| v.first())
        .filter(|v| !v.is_empty())
        .cloned()
}

/// Extract user details from an LDAP SearchEntry.
/// Returns None if the entry has no `cn`.
pub(crate) fn extract_ldap_user(search_entry: SearchEntry) -> Option<LdapUser> {
    let cn = first_attr(&search_entry, "cn")?;

    Some(LdapUser {
        cn,
        email: first_attr(&search_entry, "mail"),
        employee_id: first_attr(&search_entry, "employeeNumber"),
        first_name: first_attr(&search_entry, "givenName"),
        last_name: first_attr(&search_entry, "sn"),
        dn: search_entry.dn,
    })
}

pub(crate) fn user_filter_for_cn(config: &LdapConfig, cn: &str) -> String {
    format!("(&{}(cn={}))", config.user_filter, ldap_escape(cn))
}

/// Search an already-bound connection for the first entry with the given `cn`
pub(crate) async fn search_user_by_cn(
    ldap: &mut Ldap,
    config: &LdapConfig,
    cn: &str,
) -> Result<Option<LdapUser>> {
    let filter = user_filter_for_cn(config, cn);

    let (rs, _res) = ldap
        .search(
            &config.base_dn,
            Scope::Subtree,
            &filter,
            LDAP_USER_ATTRIBUTES.to_vec(),
        )
        .await
        .map_err(|e| {
            LdapError::QueryFailed(format!("Search failed in {}: {}", config.base_dn, e))
        })?
        .success()
        .map_err(|e| {
            LdapError::QueryFailed(format!("Search failed in {}: {}", config.base_dn, e))
        })?;

    Ok(rs
        .into_iter()
        .map(SearchEntry::construct)
        .find_map(extract_ldap_user))
}

pub async fn find_user_by_cn(config: &LdapConfig, cn: &str) -> Result<Option<LdapUser>> {
    let mut ldap = connect(config).await?;
    let user = search_user_by_cn(&mut ldap, config, cn).await;
    let _ = ldap.unbind().await;

    let user = user?;
    if user.is_none() {
        debug!("No user found with cn: {}", cn);
    }
    Ok(user)
}
