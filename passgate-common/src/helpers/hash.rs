use anyhow::Result;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub fn hash_password(password: &str) -> String {
    hash_password_with(&Argon2::default(), password)
}

/// Hashes with explicit Argon2 parameters. The verifier uses this to build a
/// stand-in hash that costs exactly as much as real account hashes.
pub fn hash_password_with(argon2: &Argon2<'_>, password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    // Only panics for invalid hash parameters
    #[allow(clippy::unwrap_used)]
    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, Error> {
    PasswordHash::new(hash)
}

/// Argon2 parameters are read back from the PHC string, so hashes created
/// with different costs all verify.
pub fn verify_password_hash(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = parse_hash(hash).map_err(|e| anyhow::anyhow!(e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!(e)),
    }
}
