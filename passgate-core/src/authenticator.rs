use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use passgate_common::time::Clock;
use passgate_common::{Account, PassgateError, WaitTime};
use tracing::{info, warn};

use crate::{AuthStore, FailedLoginLedger, PasswordCheck, RateLimitPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Username,
    Password,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Username => write!(f, "username"),
            MissingField::Password => write!(f, "password"),
        }
    }
}

/// Why a login was denied. Messages never reveal whether a username exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Please provide a {0}")]
    MissingInput(MissingField),
    #[error("There have been too many failed logins for this account. Please wait {wait}, then try again.")]
    RateLimited { wait: WaitTime },
    #[error("That account is not active. If it is your account, please contact your organization's help desk.")]
    AccountInactive,
    #[error("That account is locked. If it is your account, please contact your organization's help desk.")]
    AccountLocked,
    /// Unknown username and wrong password alike
    #[error("Either the username or the password was not correct. Please try again.")]
    InvalidCredentials,
}

impl AuthFailure {
    pub fn category(&self) -> &'static str {
        match self {
            AuthFailure::MissingInput(_) => "missing_input",
            AuthFailure::RateLimited { .. } => "rate_limited",
            AuthFailure::AccountInactive => "account_inactive",
            AuthFailure::AccountLocked => "account_locked",
            AuthFailure::InvalidCredentials => "invalid_credentials",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationOutcome {
    errors: Vec<AuthFailure>,
}

impl AuthenticationOutcome {
    pub fn authenticated() -> Self {
        Self { errors: vec![] }
    }

    pub fn denied(failure: AuthFailure) -> Self {
        Self {
            errors: vec![failure],
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[AuthFailure] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Decides a single login attempt.
///
/// Checks run in a fixed order and the first failing one is reported:
/// missing input, username block, inactive account, locked account, wrong
/// password. The password is verified for every request that carries both
/// fields, including unknown usernames and requests an earlier check has
/// already denied, so response time does not depend on which check failed.
pub struct Authenticator<S> {
    store: Arc<S>,
    ledger: FailedLoginLedger<S>,
    policy: RateLimitPolicy,
    verifier: Arc<dyn PasswordCheck>,
    clock: Arc<dyn Clock>,
}

impl<S: AuthStore> Authenticator<S> {
    pub fn new(
        store: Arc<S>,
        ledger: FailedLoginLedger<S>,
        policy: RateLimitPolicy,
        verifier: Arc<dyn PasswordCheck>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            ledger,
            policy,
            verifier,
            clock,
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &FailedLoginLedger<S> {
        &self.ledger
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationOutcome, PassgateError> {
        if username.is_empty() {
            return Ok(self.deny(username, AuthFailure::MissingInput(MissingField::Username)));
        }
        if password.is_empty() {
            return Ok(self.deny(username, AuthFailure::MissingInput(MissingField::Password)));
        }

        let now = self.clock.now();
        let account = match self.store.find_account_by_username(username).await? {
            Some(account) => account,
            None => Account::stand_in(self.verifier.stand_in_hash(), now),
        };

        let gate = self.check_gates(username, &account, now).await?;

        let stored_hash = account
            .password_hash
            .as_ref()
            .map(|hash| hash.expose_secret().as_str());
        let password_matches =
            self.verifier.verify(password, stored_hash) && !account.is_stand_in();

        if let Some(failure) = gate {
            return Ok(self.deny(username, failure));
        }

        if !password_matches {
            let account_id = (!account.is_stand_in()).then_some(account.id);
            self.store
                .record_failed_login(account_id, username, now, &self.policy)
                .await?;
            return Ok(self.deny(username, AuthFailure::InvalidCredentials));
        }

        self.store.reset_failed_logins(account.id, now).await?;
        info!(username = %username, "Authenticated");
        Ok(AuthenticationOutcome::authenticated())
    }

    async fn check_gates(
        &self,
        username: &str,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthFailure>, PassgateError> {
        let ledger_block = self.ledger.block_until(username).await?;
        let seconds = RateLimitPolicy::seconds_remaining(ledger_block, now)
            .max(account.seconds_until_unblocked(now));
        if seconds > 0 {
            return Ok(Some(AuthFailure::RateLimited {
                wait: WaitTime::from_seconds(seconds),
            }));
        }
        if !account.is_active() {
            return Ok(Some(AuthFailure::AccountInactive));
        }
        if account.is_locked() {
            return Ok(Some(AuthFailure::AccountLocked));
        }
        Ok(None)
    }

    fn deny(&self, username: &str, failure: AuthFailure) -> AuthenticationOutcome {
        warn!(username = %username, reason = failure.category(), "Login denied");
        AuthenticationOutcome::denied(failure)
    }
}
