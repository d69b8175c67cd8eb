/// Compare two byte strings in constant time
///
/// Used for password hashes and service-account credentials so that the
/// comparison time does not leak how many leading bytes matched.
pub fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_valid() {
        assert!(constant_time_eq(b"test-key", b"test-key"));
    }

    #[test]
    fn test_constant_time_eq_invalid() {
        assert!(!constant_time_eq(b"wrong-key", b"test-key"));
    }

    #[test]
    fn test_constant_time_eq_different_length() {
        assert!(!constant_time_eq(b"short", b"much-longer-key"));
    }

    #[test]
    fn test_constant_time_eq_empty() {
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_constant_time_eq_case_sensitive() {
        assert!(!constant_time_eq(b"Test-Key", b"test-key"));
    }
}
