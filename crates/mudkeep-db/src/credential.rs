//! Password credentials: salted one-way hashes attached to player records.
//!
//! A `Credential` is the ONLY form in which a password exists inside the
//! database. The plaintext is hashed with a fresh random salt at creation
//! time and discarded; verification re-hashes the candidate with the
//! stored salt and compares in constant time (both done by the argon2
//! crate). Nothing here ever logs or stores the plaintext.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::DbError;

/// A salted argon2 hash of a player's password, stored in PHC string
/// format (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
///
/// The PHC string embeds the salt and the hashing parameters, so the
/// stored value is self-describing — a future parameter bump verifies
/// old credentials unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Hashes `password` with a freshly generated random salt.
    pub fn hash(password: &str) -> Result<Self, DbError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbError::Credential(e.to_string()))?
            .to_string();
        Ok(Self(hash))
    }

    /// Returns `true` if `candidate` matches the stored hash.
    ///
    /// A malformed stored hash verifies as `false` rather than erroring:
    /// from the caller's point of view that credential simply never
    /// matches, which is the safe failure mode.
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// The stored PHC string. Exposed for persistence of the record;
    /// contains no recoverable plaintext.
    pub fn as_phc_string(&self) -> &str {
        &self.0
    }
}

/// Manual `Debug` so a credential can never leak its hash (let alone a
/// password) through `{:?}` formatting in logs or error messages.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
