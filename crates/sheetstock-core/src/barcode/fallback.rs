//! # Deterministic Fallback Code
//!
//! When a record can't be derived (no thickness, unreadable dimensions) it
//! still needs a label. The fallback hashes a composite of the row's fields
//! and writes the digest in base 36.
//!
//! ```text
//! "A1|12|Black Steel||7" ─► SHA-256 ─► big integer ─► base 36 ─► first 8 chars
//! ```
//!
//! The digest is used for its spread only. Nothing here is a security
//! boundary.

use sha2::{Digest, Sha256};

use crate::MIN_FALLBACK_CODE_LENGTH;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Hashes `source` into a base-36 code of `length` characters.
///
/// `length` is clamped to at least [`MIN_FALLBACK_CODE_LENGTH`]. The same
/// input always gives the same code.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::generate_compact_code;
///
/// let code = generate_compact_code("A1|12|Black Steel||7", 8);
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, generate_compact_code("A1|12|Black Steel||7", 8));
/// ```
pub fn generate_compact_code(source: &str, length: usize) -> String {
    let length = length.max(MIN_FALLBACK_CODE_LENGTH);
    let digest = Sha256::digest(source.as_bytes());
    let digits = to_base36(&digest);
    digits.chars().take(length).collect()
}

/// Re-hashes `code` down to `target_len` if it is longer than `max_len`.
pub fn ensure_compact_if_needed(code: &str, max_len: usize, target_len: usize) -> String {
    if code.chars().count() <= max_len {
        code.to_string()
    } else {
        generate_compact_code(code, target_len)
    }
}

/// Base-36 rendering of a big-endian unsigned integer, most significant
/// digit first.
fn to_base36(bytes: &[u8]) -> String {
    let mut number: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    let mut out = Vec::new();

    while !number.is_empty() {
        let mut remainder: u32 = 0;
        let mut quotient = Vec::with_capacity(number.len());
        for &byte in &number {
            let acc = (remainder << 8) | byte as u32;
            let q = (acc / 36) as u8;
            remainder = acc % 36;
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q);
            }
        }
        out.push(BASE36_ALPHABET[remainder as usize]);
        number = quotient;
    }

    if out.is_empty() {
        return "0".to_string();
    }
    out.iter().rev().map(|&b| b as char).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(&[]), "0");
        assert_eq!(to_base36(&[0, 0]), "0");
        assert_eq!(to_base36(&[35]), "Z");
        assert_eq!(to_base36(&[36]), "10");
        assert_eq!(to_base36(&[0x01, 0x00]), "74");
        assert_eq!(to_base36(&[0xFF, 0xFF]), "1EKF");
    }

    #[test]
    fn test_deterministic_and_sized() {
        let a = generate_compact_code("B3|16|Galvanized|??|12", 8);
        let b = generate_compact_code("B3|16|Galvanized|??|12", 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_inputs_differ() {
        let a = generate_compact_code("row-1", 8);
        let b = generate_compact_code("row-2", 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_longer_code_extends_shorter() {
        let short = generate_compact_code("same source", 8);
        let long = generate_compact_code("same source", 12);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn test_never_below_minimum() {
        assert_eq!(generate_compact_code("tiny", 2).len(), MIN_FALLBACK_CODE_LENGTH);
    }

    #[test]
    fn test_ensure_compact_if_needed() {
        assert_eq!(ensure_compact_if_needed("12GB510", 16, 10), "12GB510");
        let long = "EP-12-GB-1700000000123";
        let compacted = ensure_compact_if_needed(long, 16, 10);
        assert_eq!(compacted.len(), 10);
        assert_eq!(compacted, generate_compact_code(long, 10));
    }
}
