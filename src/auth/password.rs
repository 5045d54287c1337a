//! Credential hashing.
//!
//! Hashes are Argon2id PHC strings with a fresh salt each time, so the
//! parameters travel with the hash and verification reads them back.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

/// Memory cost in KiB (19 MiB).
const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes.
const TIME_COST: u32 = 2;
/// Degree of parallelism.
const LANES: u32 = 1;

/// Hashing or verification failure.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is not a valid PHC string")]
    MalformedHash,

    #[error("password does not match")]
    Mismatch,
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, LANES, None)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password for storage.
///
/// ```
/// let hash = mailroom::hash_password("secret1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `password` against a stored hash.
///
/// The argon2 verifier recomputes the hash with the stored parameters and
/// compares in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::MalformedHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| match e {
            password_hash::Error::Password => PasswordError::Mismatch,
            other => PasswordError::Hash(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_carries_parameters() {
        let hash = hash_password("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(hash.contains(&format!("m={MEMORY_COST_KIB},t={TIME_COST},p={LANES}")));
    }

    #[test]
    fn test_each_hash_gets_its_own_salt() {
        assert_ne!(
            hash_password("secret1").unwrap(),
            hash_password("secret1").unwrap()
        );
    }

    #[test]
    fn test_verify() {
        let hash = hash_password("secret1").unwrap();

        assert!(verify_password("secret1", &hash).is_ok());
        assert!(matches!(
            verify_password("secret2", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(matches!(
            verify_password("secret1", "plaintext"),
            Err(PasswordError::MalformedHash)
        ));
    }
}
