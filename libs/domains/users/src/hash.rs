use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

use crate::error::{UserError, UserResult};

/// Password hashing capability consumed by the use cases
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HashProvider: Send + Sync {
    /// Hash a plain-text password
    async fn generate_hash(&self, plain: &str) -> UserResult<String>;

    /// Check a plain-text password against a stored hash
    async fn compare_hash(&self, plain: &str, hash: &str) -> UserResult<bool>;
}

/// Argon2id implementation producing PHC-formatted hashes
#[derive(Debug, Clone, Default)]
pub struct Argon2HashProvider {
    argon2: Argon2<'static>,
}

impl Argon2HashProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HashProvider for Argon2HashProvider {
    async fn generate_hash(&self, plain: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    async fn compare_hash(&self, plain: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
