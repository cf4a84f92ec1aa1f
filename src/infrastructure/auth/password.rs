use argon2::{
    password_hash::{rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use once_cell::sync::Lazy;

use crate::errors::PasswordError;

const MEMORY_COST_KIB: u32 = 15_000;
const TIME_COST: u32 = 2;
const LANES: u32 = 1;

/// Stand-in hash for usernames with no account, at the account cost.
static UNKNOWN_ACCOUNT_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("no-such-account").inspect_err(|e| tracing::error!("{}", e)).ok());

fn account_hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, LANES, None)
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Argon2id PHC string for a new account password.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = account_hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;
    Ok(phc.to_string())
}

/// `Ok(false)` means the password simply does not match; errors are
/// reserved for unreadable hashes. Cost parameters come from the stored
/// hash itself.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(stored_hash).map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

    Argon2::default()
        .verify_password(candidate.as_bytes(), &stored)
        .map(|()| true)
        .or_else(|e| match e {
            HashError::Password => Ok(false),
            other => Err(PasswordError::VerificationError(other.to_string())),
        })
}

/// Runs a full verification that always fails, so an unknown username
/// costs as much as a wrong password.
pub fn verify_unknown_account(candidate: &str) {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
        let _ = verify_password(candidate, hash);
    }
}
