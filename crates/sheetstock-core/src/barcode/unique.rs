//! # Uniqueness Resolver
//!
//! Appends a letter suffix until the candidate is free.
//!
//! ```text
//! 12GB510 taken → 12GB510A taken → 12GB510B free → "12GB510B"
//!
//! suffix(n): 0→A  1→B ... 25→Z  26→AA  27→AB ... 701→ZZ  702→AAA
//! ```
//!
//! The existence check runs against whatever snapshot the caller passes in.
//! When several writers share a store, the caller serializes
//! check-then-reserve itself (a UNIQUE column plus retry-on-conflict); the
//! resolver cannot.

use crate::error::{CoreError, CoreResult};
use crate::MAX_UNIQUE_ATTEMPTS;

/// Bijective base-26 suffix for a zero-based counter.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::alpha_suffix;
///
/// assert_eq!(alpha_suffix(0), "A");
/// assert_eq!(alpha_suffix(25), "Z");
/// assert_eq!(alpha_suffix(26), "AA");
/// ```
pub fn alpha_suffix(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Returns `candidate` if free, else the first free suffixed variant.
///
/// Gives up with [`CoreError::ResolutionExhausted`] after
/// [`MAX_UNIQUE_ATTEMPTS`] suffixes.
pub fn ensure_unique<F>(candidate: &str, code_exists: F) -> CoreResult<String>
where
    F: FnMut(&str) -> bool,
{
    ensure_unique_with_limit(candidate, code_exists, MAX_UNIQUE_ATTEMPTS)
}

/// [`ensure_unique`] with an explicit attempt cap.
pub fn ensure_unique_with_limit<F>(
    candidate: &str,
    mut code_exists: F,
    max_attempts: usize,
) -> CoreResult<String>
where
    F: FnMut(&str) -> bool,
{
    if !code_exists(candidate) {
        return Ok(candidate.to_string());
    }

    for index in 0..max_attempts {
        let attempt = format!("{}{}", candidate, alpha_suffix(index));
        if !code_exists(&attempt) {
            return Ok(attempt);
        }
    }

    Err(CoreError::ResolutionExhausted {
        candidate: candidate.to_string(),
        attempts: max_attempts,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alpha_suffix_sequence() {
        assert_eq!(alpha_suffix(0), "A");
        assert_eq!(alpha_suffix(1), "B");
        assert_eq!(alpha_suffix(25), "Z");
        assert_eq!(alpha_suffix(26), "AA");
        assert_eq!(alpha_suffix(27), "AB");
        assert_eq!(alpha_suffix(51), "AZ");
        assert_eq!(alpha_suffix(52), "BA");
        assert_eq!(alpha_suffix(701), "ZZ");
        assert_eq!(alpha_suffix(702), "AAA");
    }

    #[test]
    fn test_free_candidate_unchanged() {
        let code = ensure_unique("12GB510", |_| false).unwrap();
        assert_eq!(code, "12GB510");
    }

    #[test]
    fn test_skips_taken_suffixes() {
        let taken: HashSet<&str> = ["12GB510", "12GB510A", "12GB510B", "12GB510C"].into();
        let code = ensure_unique("12GB510", |c| taken.contains(c)).unwrap();
        assert_eq!(code, "12GB510D");
    }

    #[test]
    fn test_counts_predicate_calls() {
        let mut calls = 0;
        let code = ensure_unique("14PL408", |_| {
            calls += 1;
            calls <= 3
        })
        .unwrap();
        assert_eq!(code, "14PL408C");
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_broken_predicate_is_exhausted() {
        let err = ensure_unique_with_limit("12GB510", |_| true, 50).unwrap_err();
        match err {
            CoreError::ResolutionExhausted { candidate, attempts } => {
                assert_eq!(candidate, "12GB510");
                assert_eq!(attempts, 50);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_cap_terminates() {
        assert!(ensure_unique("X", |_| true).is_err());
    }
}
