use std::sync::Arc;

use chrono::{DateTime, Utc};
use passgate_common::time::Clock;
use passgate_common::{PassgateError, WaitTime};

use crate::{AuthStore, RateLimitPolicy};

/// Block state per submitted username, derived from the failed-attempt log.
/// The username does not have to belong to an account.
pub struct FailedLoginLedger<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    require_captcha_after_nth_failed_login: Option<u32>,
}

impl<S> Clone for FailedLoginLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            require_captcha_after_nth_failed_login: self.require_captcha_after_nth_failed_login,
        }
    }
}

impl<S: AuthStore> FailedLoginLedger<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        require_captcha_after_nth_failed_login: Option<u32>,
    ) -> Self {
        Self {
            store,
            clock,
            require_captcha_after_nth_failed_login,
        }
    }

    /// Latest block across all entries for `username`
    pub async fn block_until(&self, username: &str) -> Result<Option<DateTime<Utc>>, PassgateError> {
        self.store.latest_block_until(username).await
    }

    pub async fn seconds_until_unblocked(&self, username: &str) -> Result<u64, PassgateError> {
        let block_until = self.block_until(username).await?;
        Ok(RateLimitPolicy::seconds_remaining(
            block_until,
            self.clock.now(),
        ))
    }

    pub async fn is_blocked(&self, username: &str) -> Result<bool, PassgateError> {
        Ok(self.seconds_until_unblocked(username).await? > 0)
    }

    pub async fn wait_time_until_unblocked(&self, username: &str) -> Result<WaitTime, PassgateError> {
        Ok(WaitTime::from_seconds(
            self.seconds_until_unblocked(username).await?,
        ))
    }

    pub async fn failed_attempt_count(&self, username: &str) -> Result<u64, PassgateError> {
        self.store.count_failed_attempts(username).await
    }

    /// Never required unless a threshold is configured
    pub async fn is_captcha_required_for(&self, username: &str) -> Result<bool, PassgateError> {
        let Some(threshold) = self.require_captcha_after_nth_failed_login else {
            return Ok(false);
        };
        Ok(self.failed_attempt_count(username).await? >= u64::from(threshold))
    }
}
