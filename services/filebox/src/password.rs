//! Password hashing and verification
//!
//! New hashes are bcrypt at cost 10, the format the shared `users`
//! collection has always held. Argon2 PHC strings written by earlier builds
//! of this service are still accepted on login.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordVerifier};

const BCRYPT_COST: u32 = 10;
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Hash a plaintext password with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

/// Check a plaintext password against a stored hash
///
/// Returns `Ok(false)` on mismatch; errors only when the stored hash itself
/// cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    if BCRYPT_PREFIXES
        .iter()
        .any(|prefix| stored_hash.starts_with(prefix))
    {
        return bcrypt::verify(password, stored_hash)
            .map_err(|e| anyhow::anyhow!("Failed to verify bcrypt hash: {}", e));
    }

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHasher, password_hash::SaltString};

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$2b$10$"));
        assert_ne!(hash, "secret");
        assert!(verify_password("secret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_argon2_hash() {
        let salt = SaltString::from_b64("c29tZXNhbHRzb21lc2FsdA").unwrap();
        let stored = Argon2::default()
            .hash_password(b"secret", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("secret", &stored).unwrap());
        assert!(!verify_password("wrong", &stored).unwrap());
    }

    #[test]
    fn test_verify_rejects_unparseable_hash() {
        assert!(verify_password("secret", "plaintext-in-db").is_err());
    }
}
