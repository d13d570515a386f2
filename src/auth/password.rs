use sha2::{Digest, Sha256};
use uuid::Uuid;

// Stretching rounds for the salted digest.
const ROUNDS: u32 = 4096;

/// Produce a salted, stretched digest in `sha256$<salt>$<digest>` form.
pub fn digest(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("sha256${}${}", salt, stretch(&salt, password))
}

/// Check a candidate password against a stored digest. Unknown or
/// malformed digests verify as false rather than erroring.
pub fn verify(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("sha256"), Some(salt), Some(expected)) => stretch(salt, password) == expected,
        _ => false,
    }
}

fn stretch(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        digest = hasher.finalize();
    }

    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let stored = digest("Passw0rd!");
        assert!(verify("Passw0rd!", &stored));
    }

    #[test]
    fn rejects_wrong_password() {
        let stored = digest("Passw0rd!");
        assert!(!verify("passw0rd!", &stored));
    }

    #[test]
    fn salts_make_digests_unique() {
        assert_ne!(digest("same"), digest("same"));
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("anything", "plaintext-from-an-old-import"));
        assert!(!verify("anything", "md5$abc$def"));
    }
}
