//! # Gauge Conversion
//!
//! Converts the thickness text stored on a row into decimal inches, for
//! exports that need a number rather than a label.
//!
//! ```text
//! "16GA" / "16 gauge" ──► gauge table ──► 0.0600
//! "14"                ──► gauge table ──► 0.0750
//! "3/8"               ──► fraction    ──► 0.375
//! ".063"              ──► decimal     ──► 0.063
//! ```

use crate::barcode::thickness::parse_fraction;

/// Manufacturer's standard gauge for sheet steel, in inches.
pub const GAUGE_TO_INCHES: &[(u32, f64)] = &[
    (6, 0.1935),
    (7, 0.1875),
    (8, 0.1644),
    (9, 0.1500),
    (10, 0.1350),
    (11, 0.1200),
    (12, 0.1050),
    (13, 0.0897),
    (14, 0.0750),
    (15, 0.0673),
    (16, 0.0600),
    (17, 0.0538),
    (18, 0.0480),
    (19, 0.0418),
    (20, 0.0360),
    (22, 0.0300),
    (24, 0.0240),
    (26, 0.0180),
    (28, 0.0150),
    (30, 0.0120),
];

/// Decimal inches for a gauge number, if the gauge is in the table.
pub fn gauge_to_inches(gauge: u32) -> Option<f64> {
    GAUGE_TO_INCHES
        .iter()
        .find(|(g, _)| *g == gauge)
        .map(|(_, inches)| *inches)
}

/// Converts free thickness text to decimal inches. Unknown input is `0.0`.
///
/// ## Example
/// ```rust
/// use sheetstock_core::gauge::thickness_to_decimal;
///
/// assert_eq!(thickness_to_decimal("16GA"), 0.06);
/// assert_eq!(thickness_to_decimal("3/8"), 0.375);
/// assert_eq!(thickness_to_decimal(".063"), 0.063);
/// assert_eq!(thickness_to_decimal("thick"), 0.0);
/// ```
pub fn thickness_to_decimal(thickness: &str) -> f64 {
    let s = thickness.trim();
    if s.is_empty() {
        return 0.0;
    }

    // Anything marked G / GA / GAUGE is looked up by its digits alone.
    if s.to_uppercase().contains('G') {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        return digits
            .parse()
            .ok()
            .and_then(gauge_to_inches)
            .unwrap_or(0.0);
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        if let Some(inches) = s.parse().ok().and_then(gauge_to_inches) {
            return inches;
        }
    }

    if s.contains('/') {
        return parse_fraction(s)
            .map(|(n, d)| n as f64 / d as f64)
            .unwrap_or(0.0);
    }

    s.parse().unwrap_or(0.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
