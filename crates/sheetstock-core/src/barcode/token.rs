//! # Token Composer
//!
//! Combines the thickness token, material code and sheet size into the
//! compact barcode.
//!
//! ```text
//!   thickness  material  width ft  length ft (2 digits)
//!   ┌──┐       ┌──┐      ┌─┐       ┌──┐
//!   │12│       │GB│      │5│       │10│      "12", "Black Steel", "120x60"
//!   └──┘       └──┘      └─┘       └──┘
//!                                              → "12GB510"
//! ```
//!
//! The smaller foot value is always written first. Stored codes were
//! issued this way, so a token says nothing about which side was typed as
//! the length.

use super::dimensions::parse_dimensions;
use super::material::material_code;
use super::thickness::format_thickness_token_with;
use crate::types::MaterialRecord;
use crate::FRACTION_TOLERANCE;

/// Derives the compact barcode for a material record.
///
/// Returns `None` if the thickness can't be normalized, the dimensions
/// can't be parsed, or either side rounds to zero feet.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::derive_compact_barcode_value;
///
/// assert_eq!(
///     derive_compact_barcode_value(Some("12"), Some("Black Steel"), Some("120x60")).as_deref(),
///     Some("12GB510")
/// );
/// assert_eq!(derive_compact_barcode_value(Some("12"), Some("Black Steel"), None), None);
/// ```
pub fn derive_compact_barcode_value(
    thickness: Option<&str>,
    material: Option<&str>,
    dimensions: Option<&str>,
) -> Option<String> {
    compose(thickness, material, dimensions, FRACTION_TOLERANCE)
}

/// [`derive_compact_barcode_value`] over a [`MaterialRecord`].
pub fn derive_for_record(record: &MaterialRecord) -> Option<String> {
    derive_compact_barcode_value(
        record.thickness.as_deref(),
        record.material.as_deref(),
        record.dimensions.as_deref(),
    )
}

pub(crate) fn compose(
    thickness: Option<&str>,
    material: Option<&str>,
    dimensions: Option<&str>,
    tolerance: f64,
) -> Option<String> {
    let thickness_token = format_thickness_token_with(thickness, material, tolerance)?;
    let mat_code = material_code(material);
    let dims = parse_dimensions(dimensions?)?;

    let a = inches_to_feet(dims.length_in);
    let b = inches_to_feet(dims.width_in);
    if a <= 0 || b <= 0 {
        return None;
    }
    let (width_ft, length_ft) = if a <= b { (a, b) } else { (b, a) };

    Some(format!("{}{}{}{:02}", thickness_token, mat_code, width_ft, length_ft))
}

/// Whole feet, halves rounded to even (66" → 6, 78" → 6).
fn inches_to_feet(inches: f64) -> i64 {
    (inches / 12.0).round_ties_even() as i64
}

// =============================================================================
// Unit Tests
// =============================================================================
