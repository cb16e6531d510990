use argon2::Argon2;
use passgate_common::helpers::hash::{hash_password_with, parse_hash, verify_password_hash};
use passgate_common::Secret;
use tracing::warn;
use uuid::Uuid;

/// Constant-time password comparison. Never fails: an unusable stored hash
/// is a mismatch.
pub trait PasswordCheck: Send + Sync {
    /// Always runs a full hash computation, against the stand-in hash when
    /// `stored_hash` is missing or unparseable.
    fn verify(&self, candidate: &str, stored_hash: Option<&str>) -> bool;

    /// Hash carried by the stand-in account for unknown usernames
    fn stand_in_hash(&self) -> Secret<String>;
}

pub struct Argon2PasswordVerifier {
    stand_in_hash: String,
}

impl Argon2PasswordVerifier {
    /// Stand-in hash built with the default parameters, matching hashes
    /// produced by `passgate hash`.
    pub fn new() -> Self {
        Self::with_argon2(&Argon2::default())
    }

    /// The stand-in should use the same parameters as real account hashes so
    /// both take equally long to verify.
    pub fn with_argon2(argon2: &Argon2<'_>) -> Self {
        let stand_in_password = Uuid::new_v4().to_string();
        Self {
            stand_in_hash: hash_password_with(argon2, &stand_in_password),
        }
    }
}

impl Default for Argon2PasswordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordCheck for Argon2PasswordVerifier {
    fn verify(&self, candidate: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash.filter(|hash| parse_hash(hash).is_ok()) {
            Some(hash) => match verify_password_hash(candidate, hash) {
                Ok(matches) => matches,
                Err(error) => {
                    warn!(%error, "Stored password hash could not be verified");
                    false
                }
            },
            None => {
                let _ = verify_password_hash(candidate, &self.stand_in_hash);
                false
            }
        }
    }

    fn stand_in_hash(&self) -> Secret<String> {
        Secret::new(self.stand_in_hash.clone())
    }
}
