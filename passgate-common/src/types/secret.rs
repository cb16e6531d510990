use std::fmt;

use serde::{Deserialize, Serialize};

/// Keeps passwords, hashes and connection strings out of `Debug` output
/// and therefore out of logs.
#[derive(PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub const fn new(v: T) -> Self {
        Self(v)
    }

    pub fn expose_secret(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(v: T) -> Self {
        Self::new(v)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<secret>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::new("hunter2".to_string());
        assert_eq!(format!("{secret:?}"), "<secret>");
        assert_eq!(format!("{:?}", Some(&secret)), "Some(<secret>)");
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_serde_is_transparent() {
        let secret: Secret<String> = serde_yaml::from_str("hunter2").unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
        assert_eq!(serde_yaml::to_string(&secret).unwrap().trim(), "hunter2");
    }
}
