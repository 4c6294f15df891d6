//! Password hashing seam

/// One-way password hashing
pub trait SecretHasher: Send + Sync {
    /// Hash a plaintext secret
    fn hash(&self, secret: &str) -> Result<String, String>;

    /// Check a plaintext secret against a stored hash
    fn verify(&self, secret: &str, hash: &str) -> Result<bool, String>;
}

/// Reversible stand-in for tests; never use in production
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSecretHasher;

impl SecretHasher for MockSecretHasher {
    fn hash(&self, secret: &str) -> Result<String, String> {
        Ok(format!("mock${}", secret))
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, String> {
        Ok(hash.strip_prefix("mock$") == Some(secret))
    }
}
