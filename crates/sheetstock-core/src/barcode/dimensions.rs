//! # Dimension Parser
//!
//! Extracts a sheet size in inches from the free text people type into the
//! dimensions column.
//!
//! ```text
//! "120x60"      → (120, 60)
//! "approx 96x48"→ (96, 48)      the pair is found anywhere in the text
//! "10' x 5'"    → (120, 60)     feet markers multiply by 12
//! "96 x 48\""   → (96, 48)
//! "4ft by 8ft"  → (96, 48)      no separator: first two numbers
//! "abc"         → None
//! ```
//!
//! The larger value is always returned as the length.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern"));

static FEET_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:ft\b|ft\.|feet\b|')").expect("feet marker pattern"));

static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(\d+(?:\.\d+)?\s*(?:ft\.?|feet|'|in|")?)\s*[x*]\s*(\d+(?:\.\d+)?\s*(?:ft\.?|feet|'|in|")?)"#,
    )
    .expect("dimension pair pattern")
});

static MEASURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\d+(?:\.\d+)?\s*(?:ft\.?|feet|'|in|")?"#).expect("measure pattern")
});

/// A parsed sheet size. `length_in >= width_in` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_in: f64,
    pub width_in: f64,
}

impl Dimensions {
    /// Orders the two sides so the larger one is the length.
    pub fn new(a: f64, b: f64) -> Self {
        Dimensions {
            length_in: a.max(b),
            width_in: a.min(b),
        }
    }
}

/// Parses free-text dimensions into inches.
///
/// Returns `None` if fewer than two numbers are found or either side is
/// not positive.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::parse_dimensions;
///
/// let d = parse_dimensions("10' x 5'").unwrap();
/// assert_eq!((d.length_in, d.width_in), (120.0, 60.0));
/// assert!(parse_dimensions("abc").is_none());
/// ```
pub fn parse_dimensions(text: &str) -> Option<Dimensions> {
    let txt = text.replace('×', "x").to_lowercase();
    let txt = txt.trim();
    if txt.is_empty() {
        return None;
    }

    // "a x b" anywhere in the text, else the first two measures
    let (left, right) = if let Some(caps) = PAIR_RE.captures(txt) {
        (caps[1].to_string(), caps[2].to_string())
    } else {
        let mut found = MEASURE_RE.find_iter(txt).map(|m| m.as_str().to_string());
        (found.next()?, found.next()?)
    };

    let first = to_inches(&left)?;
    let second = to_inches(&right)?;
    if first <= 0.0 || second <= 0.0 {
        return None;
    }
    Some(Dimensions::new(first, second))
}

/// Converts one side ("10'", "60", "5 ft") to inches.
fn to_inches(fragment: &str) -> Option<f64> {
    let value: f64 = NUMBER_RE.find(fragment)?.as_str().parse().ok()?;
    if FEET_MARKER_RE.is_match(fragment) {
        Some(value * 12.0)
    } else {
        Some(value)
    }
}

/// Renders inches as feet and inches, e.g. `66.5` → `5' 6.5"`.
pub fn format_feet_inches(inches: f64) -> String {
    let feet = (inches / 12.0).floor() as i64;
    let remaining = inches.rem_euclid(12.0);
    let remaining = (remaining * 10.0).round() / 10.0;
    if feet > 0 {
        format!("{}' {:.1}\"", feet, remaining)
    } else {
        format!("{:.1}\"", remaining)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(text: &str) -> Option<(f64, f64)> {
        parse_dimensions(text).map(|d| (d.length_in, d.width_in))
    }

    #[test]
    fn test_plain_inches() {
        assert_eq!(dims("120x60"), Some((120.0, 60.0)));
        assert_eq!(dims("96 X 48"), Some((96.0, 48.0)));
        assert_eq!(dims("48*96"), Some((96.0, 48.0)));
        assert_eq!(dims("96 x 48\""), Some((96.0, 48.0)));
        assert_eq!(dims("60.5 x 120 in"), Some((120.0, 60.5)));
        assert_eq!(dims("120 × 60"), Some((120.0, 60.0)));
        assert_eq!(dims("approx 120 x 60"), Some((120.0, 60.0)));
        assert_eq!(dims("box 96x48"), Some((96.0, 48.0)));
        assert_eq!(dims("ex. 120x60"), Some((120.0, 60.0)));
        assert_eq!(dims("96x48 max"), Some((96.0, 48.0)));
    }

    #[test]
    fn test_feet_markers() {
        assert_eq!(dims("10' x 5'"), Some((120.0, 60.0)));
        assert_eq!(dims("10 ft x 5 ft"), Some((120.0, 60.0)));
        assert_eq!(dims("8 feet x 4 feet"), Some((96.0, 48.0)));
        assert_eq!(dims("10ft. x 60"), Some((120.0, 60.0)));
    }

    #[test]
    fn test_scan_without_separator() {
        assert_eq!(dims("4ft by 8ft"), Some((96.0, 48.0)));
        assert_eq!(dims("96\" / 48\""), Some((96.0, 48.0)));
    }

    #[test]
    fn test_width_never_exceeds_length() {
        for text in ["60x120", "5' x 10'", "1x2", "48 by 144"] {
            let d = parse_dimensions(text).unwrap();
            assert!(d.length_in >= d.width_in, "{}", text);
        }
    }

    #[test]
    fn test_malformed() {
        assert_eq!(dims("abc"), None);
        assert_eq!(dims(""), None);
        assert_eq!(dims("120"), None);
        assert_eq!(dims("0 x 60"), None);
        assert_eq!(dims("x 60"), None);
    }

    #[test]
    fn test_format_feet_inches() {
        assert_eq!(format_feet_inches(120.0), "10' 0.0\"");
        assert_eq!(format_feet_inches(66.5), "5' 6.5\"");
        assert_eq!(format_feet_inches(8.5), "8.5\"");
    }
}
