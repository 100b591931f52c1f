//! # Legacy/Compact Classifier
//!
//! Decides whether an existing barcode should be rewritten.
//!
//! ```text
//! force_rebuild_all ─────────────────────────────► rebuild
//! blank ─────────────────────────────────────────► rebuild
//! longer than 16 chars ──────────────────────────► rebuild
//! migrate_legacy && (starts "EP-" || !compact) ──► rebuild
//! otherwise ─────────────────────────────────────► keep
//! ```
//!
//! Compact grammar: `^[0-9.]{1,4}[A-Z]{2}\d{1,2}\d{2}[A-Z]?$`. The optional
//! trailing letter is a single uniqueness suffix; two-letter suffixes
//! ("AA" onwards) fail the grammar.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{LEGACY_BARCODE_PREFIX, MAX_LEGACY_BARCODE_LEN};

static COMPACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9.]{1,4}[A-Z]{2}\d{1,2}\d{2}[A-Z]?$").expect("compact barcode pattern")
});

/// Returns true if `code` matches the compact grammar.
pub fn looks_compact(code: &str) -> bool {
    COMPACT_RE.is_match(code)
}

/// Returns true if `code` has a legacy shape: the historical prefix or an
/// over-long value.
pub fn is_legacy(code: &str) -> bool {
    is_legacy_with(code, LEGACY_BARCODE_PREFIX, MAX_LEGACY_BARCODE_LEN)
}

pub(crate) fn is_legacy_with(code: &str, prefix: &str, max_len: usize) -> bool {
    code.starts_with(prefix) || code.chars().count() > max_len
}

/// Decides whether `existing` should be replaced.
///
/// Never touches storage; the caller acts on the verdict.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::needs_rebuild;
///
/// assert!(needs_rebuild(None, false, false));
/// assert!(needs_rebuild(Some("EP-12-GB-20240101"), true, false));
/// assert!(!needs_rebuild(Some("12GB510"), true, false));
/// assert!(needs_rebuild(Some("12GB510"), false, true));
/// ```
pub fn needs_rebuild(existing: Option<&str>, migrate_legacy: bool, force_rebuild_all: bool) -> bool {
    needs_rebuild_with(
        existing,
        migrate_legacy,
        force_rebuild_all,
        LEGACY_BARCODE_PREFIX,
        MAX_LEGACY_BARCODE_LEN,
    )
}

pub(crate) fn needs_rebuild_with(
    existing: Option<&str>,
    migrate_legacy: bool,
    force_rebuild_all: bool,
    prefix: &str,
    max_len: usize,
) -> bool {
    if force_rebuild_all {
        return true;
    }
    let code = existing.unwrap_or("").trim();
    if code.is_empty() {
        return true;
    }
    // Too wide to scan off a label, so the length cap applies even when
    // legacy migration is off.
    if code.chars().count() > max_len {
        return true;
    }
    migrate_legacy && (is_legacy_with(code, prefix, max_len) || !looks_compact(code))
}

// =============================================================================
// Unit Tests
// =============================================================================
