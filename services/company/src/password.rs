//! Password hashing with argon2id

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use tracing::warn;

use crate::error::HashError;

/// Argon2 cost configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    /// Create a new PasswordConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ARGON2_MEMORY_KIB`: Memory cost in KiB (default: 19456)
    /// - `ARGON2_ITERATIONS`: Number of passes (default: 2)
    /// - `ARGON2_PARALLELISM`: Degree of parallelism (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: u32| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            memory_kib: read("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: read("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: read("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }
}

/// One-way salted password hashing
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
    /// Hash checked when no stored hash exists, so a miss costs a full verification
    unknown_hash: Arc<str>,
}

impl PasswordService {
    /// Initialize a new password service, validating the cost parameters
    pub fn new(config: PasswordConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::Params(e.to_string()))?;

        let mut service = Self {
            params,
            unknown_hash: Arc::from(""),
        };
        service.unknown_hash = Arc::from(service.hash("unknown-account")?);

        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Any failure, including an unparsable hash, is a non-match. The cost
    /// parameters are read from the hash itself, so hashes produced under an
    /// older configuration still verify.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        let parsed = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash could not be parsed: {}", e);
                return false;
            }
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, HashError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password)).await?
    }

    /// [`verify`](Self::verify) on the blocking thread pool; a failed task is a non-match
    pub async fn verify_blocking(&self, password: String, password_hash: String) -> bool {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&password, &password_hash))
            .await
            .unwrap_or(false)
    }

    /// Run one verification against a throwaway hash; used when the account
    /// does not exist so the response takes as long as a wrong password
    pub async fn verify_unknown_blocking(&self, password: String) {
        self.verify_blocking(password, self.unknown_hash.to_string())
            .await;
    }
}
