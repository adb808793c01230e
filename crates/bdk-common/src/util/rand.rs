//! Random strings

use rand::Rng;

/// Characters drawn by [`random_alphanum`]
pub const ALPHANUM: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length used by [`random_alphanum_default`]
pub const DEFAULT_RANDOM_LEN: usize = 16;

/// Generate a random string of `len` ASCII letters and digits
pub fn random_alphanum(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHANUM[rng.random_range(0..ALPHANUM.len())] as char)
        .collect()
}

/// Generate a random 16 character alphanumeric string
pub fn random_alphanum_default() -> String {
    random_alphanum(DEFAULT_RANDOM_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_charset() {
        let s = random_alphanum(64);
        assert_eq!(s.len(), 64);
        assert!(s.bytes().all(|b| ALPHANUM.contains(&b)));
    }

    #[test]
    fn test_default_length() {
        assert_eq!(random_alphanum_default().len(), 16);
    }

    #[test]
    fn test_zero_length() {
        assert!(random_alphanum(0).is_empty());
    }

    #[test]
    fn test_values_differ() {
        // 62^32 possibilities; a collision here means the generator is broken.
        assert_ne!(random_alphanum(32), random_alphanum(32));
    }
}
