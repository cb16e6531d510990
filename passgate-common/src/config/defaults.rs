use std::time::Duration;

use crate::Secret;

pub(crate) const fn _default_true() -> bool {
    true
}

pub(crate) const fn _default_false() -> bool {
    false
}

pub(crate) const fn _default_block_after_nth_failed_login() -> u32 {
    50
}

pub(crate) const fn _default_max_seconds_to_block() -> u64 {
    3600
}

pub(crate) const fn _default_ldap_port() -> u16 {
    389
}

#[inline]
pub(crate) fn _default_database_url() -> Secret<String> {
    Secret::new("sqlite:data/db".to_owned())
}

#[inline]
pub(crate) fn _default_user_filter() -> String {
    "(objectClass=person)".to_owned()
}

#[inline]
pub(crate) fn _default_ldap_timeout() -> Duration {
    Duration::from_secs(5)
}
