use sha2::{Digest, Sha256};

pub fn sha256_hex(val: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(val.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Compares two secrets through their digests so the comparison time does
/// not depend on where the raw inputs first differ.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    if presented.is_empty() || expected.is_empty() {
        return false;
    }
    let a = sha256_hex(presented);
    let b = sha256_hex(expected);
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_identical_secrets() {
        assert!(secrets_match("cron-secret", "cron-secret"));
        assert!(!secrets_match("cron-secret", "cron-secreT"));
        assert!(!secrets_match("", ""));
    }
}
