mod database;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
pub use database::DatabaseStore;
use passgate_common::{Account, PassgateError};
use uuid::Uuid;

use crate::RateLimitPolicy;

/// A ledger entry: one failed attempt against a submitted username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub username: String,
    pub occurred_at_utc: DateTime<Utc>,
    pub block_until_utc: Option<DateTime<Utc>>,
}

/// State after a failed login was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLoginRecord {
    /// Account counter after the increment, or the number of ledger entries
    /// for the username when no account matched
    pub failed_login_attempts: u32,
    /// Block stored on the new ledger entry
    pub block_until_utc: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, PassgateError>;

    /// Insert or update by id. Rejects the stand-in account and any
    /// collision on external id, employee id, username or email.
    async fn save_account(&self, account: &Account) -> Result<(), PassgateError>;

    async fn append_failed_attempt(
        &self,
        username: &str,
        occurred_at_utc: DateTime<Utc>,
        block_until_utc: Option<DateTime<Utc>>,
    ) -> Result<(), PassgateError>;

    async fn find_failed_attempts(&self, username: &str)
        -> Result<Vec<FailedAttempt>, PassgateError>;

    /// Latest block across all ledger entries for `username`
    async fn latest_block_until(
        &self,
        username: &str,
    ) -> Result<Option<DateTime<Utc>>, PassgateError>;

    async fn count_failed_attempts(&self, username: &str) -> Result<u64, PassgateError>;

    /// Increments the account counter, raises its block and appends a
    /// ledger entry as one atomic unit. With no `account_id` only the ledger
    /// entry is written.
    async fn record_failed_login(
        &self,
        account_id: Option<Uuid>,
        username: &str,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> Result<FailedLoginRecord, PassgateError>;

    /// Counter to zero, block cleared. Idempotent.
    async fn reset_failed_logins(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), PassgateError>;
}
