/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Check a plaintext password against a stored hash.
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let h1 = hash_password("hunter2", 4).unwrap();
        let h2 = hash_password("hunter2", 4).unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("hunter2", &h1));
        assert!(verify_password("hunter2", &h2));
    }

    #[test]
    fn cost_is_encoded_in_hash() {
        let hash = hash_password("pw", 10).unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("pw", "not-a-bcrypt-hash"));
    }
}
