//! # Validation Module
//!
//! Checks for form and spreadsheet input before it reaches the database.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input parsing (THIS MODULE)                                  │
//! │  ├── Dates in the shop's formats                                       │
//! │  ├── Quantities typed as "10", "10.0" or "7."                          │
//! │  └── Barcodes a Code128 label can carry                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  └── UNIQUE barcode                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::types::NewInventoryItem;
use crate::MAX_BARCODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepted date layouts, tried in order.
pub const DATE_INPUT_FORMATS: &[&str] = &["%m-%d-%Y", "%m/%d/%Y", "%m-%d-%y", "%m/%d/%y", "%Y-%m-%d"];

// =============================================================================
// Dates
// =============================================================================

/// Parses a user-typed date. Blank input is `Ok(None)`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use sheetstock_core::validation::normalize_date_input;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 8, 26);
/// assert_eq!(normalize_date_input("08-26-2025").unwrap(), expected);
/// assert_eq!(normalize_date_input("8/26/25").unwrap(), expected);
/// assert_eq!(normalize_date_input("2025-08-26").unwrap(), expected);
/// assert_eq!(normalize_date_input("  ").unwrap(), None);
/// assert!(normalize_date_input("yesterday").is_err());
/// ```
pub fn normalize_date_input(raw: &str) -> ValidationResult<Option<NaiveDate>> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| {
            let date = NaiveDate::parse_from_str(s, fmt).ok()?;
            // %Y also reads "25" as year 25; leave two-digit years to %y.
            (!fmt.contains("%Y") || date.year() >= 1000).then_some(date)
        })
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "Date must be MM-DD-YYYY (e.g. 08-26-2025)".to_string(),
        })
}

// =============================================================================
// Quantities
// =============================================================================

/// Parses a quantity cell. Blank is zero and decimals are floored.
///
/// ## Example
/// ```rust
/// use sheetstock_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("10").unwrap(), 10);
/// assert_eq!(parse_quantity("12.7").unwrap(), 12);
/// assert_eq!(parse_quantity("7.").unwrap(), 7);
/// assert_eq!(parse_quantity("").unwrap(), 0);
/// assert!(parse_quantity("-3").is_err());
/// ```
pub fn parse_quantity(raw: &str) -> ValidationResult<i64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(0);
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("unrecognized quantity '{}'", s),
    };

    let value: f64 = match s.parse::<i64>() {
        Ok(n) => n as f64,
        Err(_) => s.parse().map_err(|_| invalid())?,
    };
    if !value.is_finite() {
        return Err(invalid());
    }
    if value < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(value.floor() as i64)
}

// =============================================================================
// Barcodes
// =============================================================================

/// Validates a barcode typed or scanned by a user.
///
/// ## Rules
/// - Must not be empty
/// - At most 48 characters
/// - Printable ASCII only (Code128 set B)
pub fn validate_barcode(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if let Some(bad) = code.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: format!("character {:?} cannot be printed in Code128", bad),
        });
    }

    Ok(())
}

// =============================================================================
// Items
// =============================================================================

/// Validates a new inventory row before insert.
pub fn validate_new_item(item: &NewInventoryItem) -> ValidationResult<()> {
    if item.is_blank() {
        return Err(ValidationError::Required {
            field: "shelf, thickness, metal type, dimensions or location".to_string(),
        });
    }

    if item.quantity < 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if let Some(code) = item.barcode.as_deref().filter(|b| !b.trim().is_empty()) {
        validate_barcode(code)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(normalize_date_input("08-26-2025").unwrap(), ymd(2025, 8, 26));
        assert_eq!(normalize_date_input("08/26/2025").unwrap(), ymd(2025, 8, 26));
        assert_eq!(normalize_date_input("08-26-25").unwrap(), ymd(2025, 8, 26));
        assert_eq!(normalize_date_input("08/26/25").unwrap(), ymd(2025, 8, 26));
        assert_eq!(normalize_date_input(" 2025-08-26 ").unwrap(), ymd(2025, 8, 26));
    }

    #[test]
    fn test_date_rejects_garbage() {
        assert!(normalize_date_input("26-08-2025").is_err());
        assert!(normalize_date_input("02-30-2025").is_err());
        assert!(normalize_date_input("soon").is_err());
        assert_eq!(normalize_date_input("").unwrap(), None);
    }

    #[test]
    fn test_quantities() {
        assert_eq!(parse_quantity("10").unwrap(), 10);
        assert_eq!(parse_quantity("10.0").unwrap(), 10);
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
        assert_eq!(parse_quantity("NaN").unwrap(), 0);
        assert!(matches!(
            parse_quantity("lots"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_quantity("-1"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(parse_quantity("inf").is_err());
    }

    #[test]
    fn test_barcode_rules() {
        assert!(validate_barcode("12GB510").is_ok());
        assert!(validate_barcode("EP-12-GB-1700000000").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(&"A".repeat(49)).is_err());
        assert!(validate_barcode("12GB510\u{00e9}").is_err());
        assert!(validate_barcode("12\tGB").is_err());
    }

    #[test]
    fn test_new_item_rules() {
        let mut item = NewInventoryItem::default();
        assert!(validate_new_item(&item).is_err());

        item.shelf = Some("A1".to_string());
        item.quantity = 2;
        assert!(validate_new_item(&item).is_ok());

        item.quantity = -1;
        assert!(validate_new_item(&item).is_err());

        item.quantity = 1;
        item.barcode = Some("bad\u{7f}".to_string());
        assert!(validate_new_item(&item).is_err());
    }
}
