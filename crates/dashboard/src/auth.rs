//! Credential hashing.
//!
//! Passwords are stored as argon2id PHC strings with fixed cost parameters,
//! so every stored hash is equally expensive to check.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::AppError;

/// Memory cost in KiB.
const MEMORY_COST_KIB: u32 = 19_456;
/// Number of passes.
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| AppError::Internal(format!("Invalid argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InvalidInput(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::InvalidInput(format!("Invalid password hash: {e}")))?;
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
