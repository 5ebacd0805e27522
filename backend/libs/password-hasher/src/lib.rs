//! Password hashing and verification using Argon2id
//!
//! The token manager never sees passwords; login handlers verify the
//! password through [`PasswordHasher`] and only then ask for a token pair.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;
use tracing::warn;

pub type Result<T> = std::result::Result<T, HashError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Password does not match the stored digest
    #[error("Password does not match")]
    Mismatch,

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// One-way password digest capability
pub trait PasswordHasher: Send + Sync {
    /// Returns a self-describing digest safe for storage
    fn hash(&self, password: &str) -> Result<String>;

    /// `Ok(())` when `password` produced `hash`
    fn verify(&self, hash: &str, password: &str) -> Result<()>;
}

/// Argon2id hasher
///
/// ## Security
///
/// - Salt: random 16-byte salt generated per password
/// - Output: PHC string, so cost parameters travel with the digest
/// - Verification uses the parameters embedded in the stored digest
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2Hasher {
    /// Argon2id with the crate's default cost (19 MiB, 2 passes, 1 lane)
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Explicit cost; values Argon2 rejects fall back to the default cost
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        match Params::new(memory_kib, iterations, parallelism, None) {
            Ok(params) => Self { params },
            Err(e) => {
                warn!(
                    memory_kib,
                    iterations,
                    parallelism,
                    error = %e,
                    "Invalid Argon2 cost, using defaults"
                );
                Self::new()
            }
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<()> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::InvalidHash(e.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(HashError::Mismatch),
            Err(e) => Err(HashError::Hashing(e.to_string())),
        }
    }
}
