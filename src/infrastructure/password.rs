//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::PasswordSettings;
use crate::domain::errors::DomainError;

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of a throwaway secret with the configured parameters. Checked on
    /// unknown emails so every login attempt costs one full verification.
    decoy_hash: Arc<str>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    pub fn new(settings: PasswordSettings) -> Result<Self, DomainError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| DomainError::InvalidArgument(format!("argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_hash = argon2
            .hash_password(b"no such account", &SaltString::generate(&mut OsRng))
            .map_err(|e| DomainError::InvalidArgument(format!("argon2 parameters: {e}")))?
            .to_string();
        Ok(Self {
            argon2,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Returns a PHC string embedding the algorithm, parameters and salt.
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Persistence(format!("password hashing failed: {e}")))
    }

    /// Constant-time check of `password` against a stored PHC string. A
    /// malformed stored hash never matches.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spends the same work as `verify` without any stored hash to check.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy_hash);
    }
}
