use chrono::{DateTime, TimeDelta, Utc};
use passgate_common::time::seconds_until;
use passgate_common::LoginProtectionConfig;

pub const MAX_SECONDS_TO_BLOCK: u64 = 3600;
pub const BLOCK_AFTER_NTH_FAILED_LOGIN: u32 = 50;

/// Quadratic back-off for repeated failed logins. Pure: every method takes
/// the current instant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    block_after_nth_failed_login: u32,
    max_seconds_to_block: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(BLOCK_AFTER_NTH_FAILED_LOGIN, MAX_SECONDS_TO_BLOCK)
    }
}

impl From<&LoginProtectionConfig> for RateLimitPolicy {
    fn from(config: &LoginProtectionConfig) -> Self {
        Self::new(
            config.block_after_nth_failed_login,
            config.max_seconds_to_block,
        )
    }
}

impl RateLimitPolicy {
    /// Caps above [`MAX_SECONDS_TO_BLOCK`] are clamped to it
    pub const fn new(block_after_nth_failed_login: u32, max_seconds_to_block: u64) -> Self {
        Self {
            block_after_nth_failed_login,
            max_seconds_to_block: if max_seconds_to_block > MAX_SECONDS_TO_BLOCK {
                MAX_SECONDS_TO_BLOCK
            } else {
                max_seconds_to_block
            },
        }
    }

    pub fn block_after_nth_failed_login(&self) -> u32 {
        self.block_after_nth_failed_login
    }

    pub fn max_seconds_to_block(&self) -> u64 {
        self.max_seconds_to_block
    }

    /// `min(n², max_seconds_to_block)`
    pub fn seconds_to_delay(&self, failed_login_attempts: u32) -> u64 {
        let n = u64::from(failed_login_attempts);
        n.saturating_mul(n).min(self.max_seconds_to_block)
    }

    /// `None` below the threshold, otherwise `now` plus the delay for
    /// `failed_login_attempts`.
    pub fn block_until(
        &self,
        failed_login_attempts: u32,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if failed_login_attempts < self.block_after_nth_failed_login {
            return None;
        }
        let delay = i64::try_from(self.seconds_to_delay(failed_login_attempts))
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Some(
            now.checked_add_signed(delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Whole seconds left until `block_until`, never negative
    pub fn seconds_remaining(block_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
        match block_until {
            Some(block_until) => seconds_until(now, block_until).max(0) as u64,
            None => 0,
        }
    }

    pub fn is_blocked(block_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        Self::seconds_remaining(block_until, now) > 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seconds_to_delay() {
        let policy = RateLimitPolicy::default();
        let cases = [
            (0, 0),
            (1, 1),
            (5, 25),
            (6, 36),
            (10, 100),
            (20, 400),
            (50, 2500),
            (60, 3600),
            (61, 3600),
            (100, 3600),
            (u32::MAX, 3600),
        ];
        for (attempts, expected) in cases {
            assert_eq!(policy.seconds_to_delay(attempts), expected, "{attempts}");
        }
    }

    #[test]
    fn test_seconds_to_delay_respects_configured_cap() {
        let policy = RateLimitPolicy::new(3, 600);
        assert_eq!(policy.seconds_to_delay(24), 576);
        assert_eq!(policy.seconds_to_delay(25), 600);
        assert_eq!(policy.seconds_to_delay(1000), 600);
    }

    #[test]
    fn test_block_until_below_threshold() {
        let policy = RateLimitPolicy::default();
        for attempts in [0, 1, 10, BLOCK_AFTER_NTH_FAILED_LOGIN - 1] {
            assert_eq!(policy.block_until(attempts, now()), None, "{attempts}");
        }
    }

    #[test]
    fn test_block_until_at_and_above_threshold() {
        let policy = RateLimitPolicy::default();
        for attempts in [BLOCK_AFTER_NTH_FAILED_LOGIN, 51, 60, 61, 100, 10_000] {
            let block_until = policy.block_until(attempts, now()).unwrap();
            assert_eq!(
                (block_until - now()).num_seconds() as u64,
                policy.seconds_to_delay(attempts),
                "{attempts}"
            );
            assert!(block_until - now() <= TimeDelta::seconds(MAX_SECONDS_TO_BLOCK as i64));
        }
    }

    #[test]
    fn test_seconds_remaining() {
        assert_eq!(RateLimitPolicy::seconds_remaining(None, now()), 0);
        assert_eq!(
            RateLimitPolicy::seconds_remaining(Some(now() - TimeDelta::days(1)), now()),
            0
        );
        assert_eq!(RateLimitPolicy::seconds_remaining(Some(now()), now()), 0);
        assert_eq!(
            RateLimitPolicy::seconds_remaining(Some(now() + TimeDelta::seconds(8)), now()),
            8
        );
        assert_eq!(
            RateLimitPolicy::seconds_remaining(Some(now() + TimeDelta::milliseconds(2_100)), now()),
            3
        );
    }

    #[test]
    fn test_is_blocked() {
        assert!(!RateLimitPolicy::is_blocked(None, now()));
        assert!(!RateLimitPolicy::is_blocked(Some(now()), now()));
        assert!(RateLimitPolicy::is_blocked(
            Some(now() + TimeDelta::days(1)),
            now()
        ));
    }

    #[test]
    fn test_from_config() {
        let config = LoginProtectionConfig {
            block_after_nth_failed_login: 3,
            max_seconds_to_block: 60,
            require_captcha_after_nth_failed_login: None,
        };
        let policy = RateLimitPolicy::from(&config);
        assert_eq!(policy.block_after_nth_failed_login(), 3);
        assert_eq!(policy.max_seconds_to_block(), 60);
        assert_eq!(policy.block_until(2, now()), None);
        assert_eq!(policy.block_until(3, now()), Some(now() + TimeDelta::seconds(9)));
    }

    #[test]
    fn test_cap_never_exceeds_one_hour() {
        let config = LoginProtectionConfig {
            block_after_nth_failed_login: 1,
            max_seconds_to_block: 86_400,
            require_captcha_after_nth_failed_login: None,
        };
        let policy = RateLimitPolicy::from(&config);
        assert_eq!(policy.max_seconds_to_block(), MAX_SECONDS_TO_BLOCK);
        assert_eq!(policy.seconds_to_delay(1000), MAX_SECONDS_TO_BLOCK);
        assert_eq!(
            policy.block_until(1000, now()),
            Some(now() + TimeDelta::seconds(MAX_SECONDS_TO_BLOCK as i64))
        );
    }
}
