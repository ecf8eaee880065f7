//! Password hashing using bcrypt
//!
//! # Performance Considerations
//!
//! Bcrypt is intentionally CPU-intensive. The `_async` variants run the work
//! on the blocking thread pool so it never stalls the async runtime.

use anyhow::Result;

/// Bcrypt work factor. Fixed at a moderate cost; raising it slows every
/// login and registration proportionally.
const HASH_COST: u32 = 10;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking operation)
    ///
    /// Salting is internal to bcrypt, so two hashes of the same password
    /// differ. Hashing failures are unrecoverable and propagate.
    pub fn hash(password: &str) -> Result<String> {
        let hash = bcrypt::hash(password, HASH_COST)?;
        Ok(hash)
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// A malformed hash is an ordinary mismatch, never an error.
    pub fn verify(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
