use sha2::{Digest, Sha256};

/// Canonical form used for store keys: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash an email for log fields so addresses never appear in clear
pub fn hash_email(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_email(email).as_bytes());
    format!("{:x}", hasher.finalize())
}
