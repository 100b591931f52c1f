//! # Thickness Normalizer
//!
//! Turns raw thickness text into the leading token of a compact barcode.
//!
//! ```text
//!  material text ──► MaterialFamily ──► thickness token
//!
//!  "PLATE", "PL"       Plate      "1/4" → "14"   ".375" → "38"
//!  "...AL..."          Aluminum   "0.040" → ".04"  ".063" → ".063"
//!  anything else       Gauge      "12GA" → "12"  "6" → "06"
//! ```
//!
//! Aluminum matching is a plain substring test, so "GALVANIZED" and
//! "BLACK METAL" land in the aluminum branch too. Their gauge numbers are
//! not decimals, so the branch falls through to gauge parsing and the
//! result is the same two-digit token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::FRACTION_TOLERANCE;

static FRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*/\s*(\d+)\s*$").expect("fraction pattern"));

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern"));

/// Common plate fractions and their decimal equivalents.
pub const COMMON_FRACTIONS: &[((u32, u32), f64)] = &[
    ((1, 8), 0.125),
    ((1, 4), 0.25),
    ((3, 8), 0.375),
    ((1, 2), 0.5),
    ((5, 8), 0.625),
    ((3, 4), 0.75),
    ((7, 8), 0.875),
];

// =============================================================================
// Material Family
// =============================================================================

/// Which thickness convention a material uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFamily {
    /// Fractional inches ("1/4", "3/8").
    Plate,
    /// Decimal inches (".040", ".063").
    Aluminum,
    /// Gauge numbers ("12", "16GA").
    Gauge,
}

type FamilyRule = (fn(&str) -> bool, MaterialFamily);

/// Evaluated top to bottom against the trimmed, uppercased material text.
const FAMILY_RULES: &[FamilyRule] = &[
    (mentions_plate, MaterialFamily::Plate),
    (is_pl_abbreviation, MaterialFamily::Plate),
    (mentions_al, MaterialFamily::Aluminum),
];

fn mentions_plate(m: &str) -> bool {
    m.contains("PLATE")
}

fn is_pl_abbreviation(m: &str) -> bool {
    m == "PL" || m.starts_with("PL ") || m.ends_with(" PL")
}

fn mentions_al(m: &str) -> bool {
    m.contains("AL")
}

impl MaterialFamily {
    /// Classifies free material text. Missing text is `Gauge`.
    pub fn classify(material: Option<&str>) -> Self {
        let key = normalize(material);
        FAMILY_RULES
            .iter()
            .find(|(matches, _)| matches(&key))
            .map(|(_, family)| *family)
            .unwrap_or(MaterialFamily::Gauge)
    }
}

pub(crate) fn normalize(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_uppercase()
}

// =============================================================================
// Token Formatting
// =============================================================================

/// Normalizes `thickness` into a barcode token for the given material.
///
/// Returns `None` when the thickness is missing or has nothing usable.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::format_thickness_token;
///
/// assert_eq!(format_thickness_token(Some("3/8"), Some("Plate")).as_deref(), Some("38"));
/// assert_eq!(format_thickness_token(Some("0.040"), Some("Aluminum")).as_deref(), Some(".04"));
/// assert_eq!(format_thickness_token(Some("12GA"), Some("Galvanized")).as_deref(), Some("12"));
/// ```
pub fn format_thickness_token(thickness: Option<&str>, material: Option<&str>) -> Option<String> {
    format_thickness_token_with(thickness, material, FRACTION_TOLERANCE)
}

/// Same as [`format_thickness_token`] with an explicit fraction tolerance.
pub fn format_thickness_token_with(
    thickness: Option<&str>,
    material: Option<&str>,
    tolerance: f64,
) -> Option<String> {
    let raw = thickness?.trim();
    if raw.is_empty() {
        return None;
    }

    match MaterialFamily::classify(material) {
        MaterialFamily::Plate => plate_token(raw, tolerance),
        MaterialFamily::Aluminum => aluminum_token(raw).or_else(|| gauge_token(raw)),
        MaterialFamily::Gauge => gauge_token(raw),
    }
}

/// Parses `N/D` with both parts positive.
pub(crate) fn parse_fraction(s: &str) -> Option<(u32, u32)> {
    let caps = FRACTION_RE.captures(s)?;
    let num: u32 = caps[1].parse().ok()?;
    let den: u32 = caps[2].parse().ok()?;
    (num > 0 && den > 0).then_some((num, den))
}

fn clean(raw: &str) -> String {
    raw.trim().replace('"', "").to_lowercase()
}

fn plate_token(raw: &str, tolerance: f64) -> Option<String> {
    let s = clean(raw);

    let fraction = parse_fraction(&s).or_else(|| {
        if !s.contains('.') {
            return None;
        }
        let value: f64 = s.trim().parse().ok()?;
        COMMON_FRACTIONS
            .iter()
            .find(|(_, decimal)| (value - decimal).abs() < tolerance)
            .map(|(frac, _)| *frac)
    });

    if let Some((n, d)) = fraction {
        return Some(format!("{}{}", n, d));
    }

    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).take(3).collect();
    (!digits.is_empty()).then_some(digits)
}

fn aluminum_token(raw: &str) -> Option<String> {
    let mut s = clean(raw);

    if s.contains('/') {
        if let Some((n, d)) = parse_fraction(&s) {
            return Some(format!("{}{}", n, d));
        }
    }

    if s.len() > 1 && s.starts_with('0') {
        s.remove(0);
    }

    let (_, tail) = s.split_once('.')?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).take(3).collect();
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        Some(".0".to_string())
    } else {
        Some(format!(".{}", digits))
    }
}

fn gauge_token(raw: &str) -> Option<String> {
    let run = DIGIT_RUN_RE.find(raw)?.as_str();
    let head: String = run.chars().take(2).collect();
    Some(format!("{:0>2}", head))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_classification() {
        assert_eq!(MaterialFamily::classify(Some("Plate")), MaterialFamily::Plate);
        assert_eq!(MaterialFamily::classify(Some("pl")), MaterialFamily::Plate);
        assert_eq!(MaterialFamily::classify(Some("PL A36")), MaterialFamily::Plate);
        assert_eq!(MaterialFamily::classify(Some("A36 PL")), MaterialFamily::Plate);
        assert_eq!(MaterialFamily::classify(Some("Aluminum")), MaterialFamily::Aluminum);
        assert_eq!(MaterialFamily::classify(Some("Galvanized")), MaterialFamily::Aluminum);
        assert_eq!(MaterialFamily::classify(Some("Stainless")), MaterialFamily::Gauge);
        assert_eq!(MaterialFamily::classify(None), MaterialFamily::Gauge);
    }

    #[test]
    fn test_plate_fractions() {
        let cases = [
            ("1/8", "18"),
            ("1/4", "14"),
            ("3/8", "38"),
            ("1/2", "12"),
            ("5/8", "58"),
            ("3/4", "34"),
            ("7/8", "78"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                format_thickness_token(Some(input), Some("Plate")).as_deref(),
                Some(expected),
                "fraction {}",
                input
            );
        }
    }

    #[test]
    fn test_plate_decimal_matches_fraction() {
        assert_eq!(format_thickness_token(Some(".25"), Some("Plate")).as_deref(), Some("14"));
        assert_eq!(format_thickness_token(Some("0.376"), Some("PL")).as_deref(), Some("38"));
        assert_eq!(format_thickness_token(Some("0.5\""), Some("PL")).as_deref(), Some("12"));
    }

    #[test]
    fn test_plate_digit_fallback() {
        // No fraction within tolerance: first three digits
        assert_eq!(format_thickness_token(Some("0.3125"), Some("Plate")).as_deref(), Some("031"));
        assert_eq!(format_thickness_token(Some("1in"), Some("Plate")).as_deref(), Some("1"));
        assert_eq!(format_thickness_token(Some("thick"), Some("Plate")), None);
    }

    #[test]
    fn test_aluminum_decimals() {
        assert_eq!(format_thickness_token(Some("0.040"), Some("Aluminum")).as_deref(), Some(".04"));
        assert_eq!(format_thickness_token(Some(".063"), Some("AL")).as_deref(), Some(".063"));
        assert_eq!(format_thickness_token(Some("0.125"), Some("alum")).as_deref(), Some(".125"));
        assert_eq!(format_thickness_token(Some("0.0400"), Some("AL")).as_deref(), Some(".04"));
        assert_eq!(format_thickness_token(Some("0.000"), Some("AL")).as_deref(), Some(".0"));
    }

    #[test]
    fn test_aluminum_fraction() {
        assert_eq!(format_thickness_token(Some("1/4"), Some("Aluminum")).as_deref(), Some("14"));
    }

    #[test]
    fn test_aluminum_falls_through_to_gauge() {
        assert_eq!(format_thickness_token(Some("12"), Some("Galvanized")).as_deref(), Some("12"));
        assert_eq!(format_thickness_token(Some("16GA"), Some("Black Metal")).as_deref(), Some("16"));
    }

    #[test]
    fn test_gauge() {
        assert_eq!(format_thickness_token(Some("12GA"), Some("Steel")).as_deref(), Some("12"));
        assert_eq!(format_thickness_token(Some("6"), Some("Stainless")).as_deref(), Some("06"));
        assert_eq!(format_thickness_token(Some("ga 142"), None).as_deref(), Some("14"));
        assert_eq!(format_thickness_token(Some("GA"), Some("Steel")), None);
    }

    #[test]
    fn test_missing_thickness() {
        assert_eq!(format_thickness_token(None, Some("Steel")), None);
        assert_eq!(format_thickness_token(Some(""), Some("Steel")), None);
        assert_eq!(format_thickness_token(Some("   "), Some("Plate")), None);
    }

    #[test]
    fn test_parse_fraction_rejects_zero() {
        assert_eq!(parse_fraction("0/4"), None);
        assert_eq!(parse_fraction("1/0"), None);
        assert_eq!(parse_fraction(" 3 / 16 "), Some((3, 16)));
    }
}
