//! Password digests.
//!
//! Salted SHA-256, stored as `hex(salt)$hex(digest)`. The salt is 16 random
//! bytes per account.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest(&salt, password))
}

/// Check a password against a stored `hex(salt)$hex(digest)` value.
///
/// Malformed stored values verify as false rather than erroring; they can
/// only appear through out-of-band database edits.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest(&salt, password) == digest_hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_original_password_only() {
        let stored = hash_password("hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &stored));
        assert!(!verify_password("hunter2hunter3", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("anything", "not-a-digest"));
        assert!(!verify_password("anything", "zzzz$zzzz"));
    }
}
