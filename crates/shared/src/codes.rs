//! Server-side generation of customer-facing reference codes.
//!
//! Booking references and discount codes are always generated here, never by
//! clients, so uniqueness checks and formats stay in one place.

use rand::Rng;

/// Prefix for discount code strings.
pub const DISCOUNT_CODE_PREFIX: &str = "DSC-";

/// Length of the random portion of a discount code.
pub const DISCOUNT_CODE_RANDOM_LEN: usize = 8;

/// Alphabet for generated codes. Excludes 0/O and 1/I to keep codes readable
/// when typed from a chat message.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates a discount code string, e.g. `DSC-7KQ2M9XA`.
pub fn generate_discount_code() -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..DISCOUNT_CODE_RANDOM_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", DISCOUNT_CODE_PREFIX, random)
}

/// Generates a booking reference, e.g. `BK-1718000000000-7KQ2M9`.
///
/// Timestamp-prefixed so references sort chronologically in support tooling.
pub fn generate_booking_reference(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..6)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("BK-{}-{}", now_millis, random)
}

/// Checks whether a string has the shape of a generated discount code.
pub fn is_discount_code_format(code: &str) -> bool {
    if let Some(rest) = code.strip_prefix(DISCOUNT_CODE_PREFIX) {
        rest.len() == DISCOUNT_CODE_RANDOM_LEN
            && rest.bytes().all(|b| CODE_ALPHABET.contains(&b))
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_discount_code_format() {
        let code = generate_discount_code();
        assert!(code.starts_with(DISCOUNT_CODE_PREFIX));
        assert_eq!(code.len(), DISCOUNT_CODE_PREFIX.len() + DISCOUNT_CODE_RANDOM_LEN);
        assert!(is_discount_code_format(&code));
    }

    #[test]
    fn test_generate_discount_code_no_ambiguous_characters() {
        for _ in 0..100 {
            let code = generate_discount_code();
            let random = &code[DISCOUNT_CODE_PREFIX.len()..];
            assert!(!random.contains('0'));
            assert!(!random.contains('O'));
            assert!(!random.contains('1'));
            assert!(!random.contains('I'));
        }
    }

    #[test]
    fn test_generate_discount_codes_differ() {
        // Collision over a handful of draws would indicate a broken RNG path.
        let a = generate_discount_code();
        let b = generate_discount_code();
        let c = generate_discount_code();
        assert!(a != b || b != c);
    }

    #[test]
    fn test_booking_reference_format() {
        let reference = generate_booking_reference(1718000000000);
        assert!(reference.starts_with("BK-1718000000000-"));
        assert_eq!(reference.len(), "BK-1718000000000-".len() + 6);
    }

    #[test]
    fn test_is_discount_code_format_rejects_bad_input() {
        assert!(!is_discount_code_format(""));
        assert!(!is_discount_code_format("DSC-"));
        assert!(!is_discount_code_format("DSC-short"));
        assert!(!is_discount_code_format("DSC-0OOOOOO0")); // ambiguous chars
        assert!(!is_discount_code_format("XYZ-ABCDEFGH"));
        assert!(!is_discount_code_format("DSC-ABCDEFGHJ")); // too long
    }

    #[test]
    fn test_is_discount_code_format_accepts_valid() {
        assert!(is_discount_code_format("DSC-ABCDEFGH"));
        assert!(is_discount_code_format("DSC-23456789"));
    }
}
