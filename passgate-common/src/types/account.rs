use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::time::seconds_until;
use crate::Secret;

pub const FLAG_YES: &str = "yes";
pub const FLAG_NO: &str = "no";

/// Account status flags. They are stored as free text and every flag fails
/// closed: only its explicit literal (case-insensitive) opens it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFlag {
    /// Set only for `"yes"`. Anything else, including a missing value, is inactive.
    Active,
    /// Cleared only for `"no"`. Anything else, including a missing value, is locked.
    Locked,
}

impl AccountFlag {
    pub fn evaluate(self, raw: Option<&str>) -> bool {
        match self {
            AccountFlag::Active => raw.is_some_and(|v| v.eq_ignore_ascii_case(FLAG_YES)),
            AccountFlag::Locked => !raw.is_some_and(|v| v.eq_ignore_ascii_case(FLAG_NO)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Correlation id shared with external systems
    pub external_id: Uuid,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<Secret<String>>,
    pub active: Option<String>,
    pub locked: Option<String>,
    pub failed_login_attempts: u32,
    pub block_until_utc: Option<DateTime<Utc>>,
    pub last_updated_utc: DateTime<Utc>,
}

impl Account {
    /// Placeholder used when no account matches a username. It carries a
    /// real hash so password verification costs the same, passes the status
    /// gates like any active account, and must never be persisted.
    pub fn stand_in(stand_in_hash: Secret<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            external_id: Uuid::nil(),
            employee_id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            email: String::new(),
            password_hash: Some(stand_in_hash),
            active: Some(FLAG_YES.to_owned()),
            locked: Some(FLAG_NO.to_owned()),
            failed_login_attempts: 0,
            block_until_utc: None,
            last_updated_utc: now,
        }
    }

    pub fn is_stand_in(&self) -> bool {
        self.id.is_nil()
    }

    pub fn is_active(&self) -> bool {
        AccountFlag::Active.evaluate(self.active.as_deref())
    }

    pub fn is_locked(&self) -> bool {
        AccountFlag::Locked.evaluate(self.locked.as_deref())
    }

    pub fn seconds_until_unblocked(&self, now: DateTime<Utc>) -> u64 {
        match self.block_until_utc {
            Some(block_until) => seconds_until(now, block_until).max(0) as u64,
            None => 0,
        }
    }

    pub fn is_blocked_by_rate_limit(&self, now: DateTime<Utc>) -> bool {
        self.seconds_until_unblocked(now) > 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            external_id: Uuid::new_v4(),
            employee_id: "10042".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            username: "jdoe".into(),
            email: "jdoe@example.org".into(),
            password_hash: None,
            active: Some("yes".into()),
            locked: Some("no".into()),
            failed_login_attempts: 0,
            block_until_utc: None,
            last_updated_utc: now(),
        }
    }

    // Values a loosely typed column may hold once read back as text
    const ODD_VALUES: &[Option<&str>] = &[
        Some("true"),
        Some("1"),
        Some("false"),
        Some("0"),
        Some("other"),
        Some(""),
        Some(" yes"),
        Some("no "),
        None,
    ];

    #[test]
    fn test_is_active() {
        for value in ["yes", "YES", "Yes", "yEs"] {
            assert!(AccountFlag::Active.evaluate(Some(value)), "{value:?}");
        }
        for value in ["no", "NO", "No"] {
            assert!(!AccountFlag::Active.evaluate(Some(value)), "{value:?}");
        }
        for value in ODD_VALUES {
            assert!(!AccountFlag::Active.evaluate(*value), "{value:?}");
        }
    }

    #[test]
    fn test_is_locked() {
        for value in ["yes", "YES", "Yes"] {
            assert!(AccountFlag::Locked.evaluate(Some(value)), "{value:?}");
        }
        for value in ["no", "NO", "No", "nO"] {
            assert!(!AccountFlag::Locked.evaluate(Some(value)), "{value:?}");
        }
        for value in ODD_VALUES {
            assert!(AccountFlag::Locked.evaluate(*value), "{value:?}");
        }
    }

    #[test]
    fn test_account_flags_delegate() {
        let mut account = account();
        assert!(account.is_active());
        assert!(!account.is_locked());

        account.active = None;
        account.locked = None;
        assert!(!account.is_active());
        assert!(account.is_locked());
    }

    #[test]
    fn test_stand_in_passes_status_gates() {
        let stand_in = Account::stand_in(Secret::new("$argon2id$stand-in".into()), now());
        assert!(stand_in.is_stand_in());
        assert!(stand_in.is_active());
        assert!(!stand_in.is_locked());
        assert!(!stand_in.is_blocked_by_rate_limit(now()));
        assert!(stand_in.password_hash.is_some());
        assert!(!account().is_stand_in());
    }

    #[test]
    fn test_seconds_until_unblocked() {
        let mut account = account();
        let cases = [
            (None, 0),
            (Some(now() + TimeDelta::seconds(8)), 8),
            (Some(now() + TimeDelta::minutes(1)), 60),
            (Some(now() - TimeDelta::days(1)), 0),
        ];
        for (block_until, expected) in cases {
            account.block_until_utc = block_until;
            assert_eq!(account.seconds_until_unblocked(now()), expected);
        }
    }

    #[test]
    fn test_is_blocked_by_rate_limit() {
        let mut account = account();
        assert!(!account.is_blocked_by_rate_limit(now()));

        account.block_until_utc = Some(now() - TimeDelta::days(1));
        assert!(!account.is_blocked_by_rate_limit(now()));

        account.block_until_utc = Some(now() + TimeDelta::days(1));
        assert!(account.is_blocked_by_rate_limit(now()));
    }
}
