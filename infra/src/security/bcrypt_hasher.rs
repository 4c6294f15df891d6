//! bcrypt implementation of the core `SecretHasher` seam

use cr_core::services::SecretHasher;

/// Hashes passwords with bcrypt at a configurable cost
#[derive(Debug, Clone, Copy)]
pub struct BcryptSecretHasher {
    cost: u32,
}

impl BcryptSecretHasher {
    /// Create a hasher with an explicit work factor
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptSecretHasher {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl SecretHasher for BcryptSecretHasher {
    fn hash(&self, secret: &str) -> Result<String, String> {
        bcrypt::hash(secret, self.cost).map_err(|e| format!("Failed to hash password: {}", e))
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, String> {
        bcrypt::verify(secret, hash).map_err(|e| format!("Failed to verify password: {}", e))
    }
}
