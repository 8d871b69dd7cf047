//! Password credentials: hashing, verification, strength policy, generation.
//!
//! Plaintext passwords only ever exist inside [`Password`], whose `Debug`
//! impl is redacted so they cannot leak through logs or error chains. The
//! system stores Argon2id hashes exclusively.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

// `Password` deliberately does not implement `Serialize`: the only place a
// plaintext ever leaves the process is the explicit one-time credential
// display, which reads `as_str()` on purpose.

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 10;

/// Length of generated temporary passwords.
const GENERATED_PASSWORD_LEN: usize = 16;

/// A plaintext password. Never stored, never logged.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A PHC-format Argon2id hash string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<CredentialHash, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;
    Ok(CredentialHash(hash.to_string()))
}

/// Verify a password against a stored hash.
///
/// The comparison inside `argon2` is constant-time; malformed hashes verify
/// as false rather than erroring, so callers stay on the uniform
/// invalid-credentials path.
pub fn verify_password(password: &Password, hash: &CredentialHash) -> bool {
    let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed)
        .is_ok()
}

/// Minimum-entropy policy for user-chosen passwords.
pub fn check_strength(password: &Password) -> Result<(), AuthError> {
    let s = password.as_str();
    if s.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword("must be at least 10 characters"));
    }
    if !s.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AuthError::WeakPassword("must contain a letter"));
    }
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword("must contain a digit"));
    }
    Ok(())
}

/// Generate a random temporary password that satisfies [`check_strength`].
pub fn generate_password<R: Rng>(rng: &mut R) -> Password {
    // Rejection-sample: an all-letter or all-digit draw is retried.
    loop {
        let candidate: String = rng
            .sample_iter(&Alphanumeric)
            .take(GENERATED_PASSWORD_LEN)
            .map(char::from)
            .collect();
        let password = Password::new(candidate);
        if check_strength(&password).is_ok() {
            return password;
        }
    }
}
