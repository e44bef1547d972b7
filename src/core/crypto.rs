//! Password hashing - salted bcrypt hashes, verification re-derives and compares

use bcrypt::{DEFAULT_COST, hash, verify};
use lazy_static::lazy_static;

lazy_static! {
    // same cost as stored hashes, so a miss takes as long as a wrong password
    static ref HASH_FICTICIO: String = hash("senha-ficticia", DEFAULT_COST).unwrap_or_default();
}

/// Hash a password using bcrypt with default cost
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify if `password` matches the stored hash.
/// A malformed hash is treated as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

/// Runs a full verification against a throwaway hash, used when the login does not exist
pub fn verify_unknown_user(password: &str) {
    let _ = verify(password, HASH_FICTICIO.as_str());
}
