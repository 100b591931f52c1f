//! # Material Coder
//!
//! Maps a free-text material description to the two-letter code in the
//! middle of a compact barcode.
//!
//! Rules run in order and the first hit wins:
//! 1. Override prefixes (`BLACK...` → `GB`)
//! 2. Exact match in the base table
//! 3. First word in the base table
//! 4. First two letters of the first word, padded with `X`

use super::thickness::normalize;

/// Prefix overrides, checked before the base table.
pub const MATERIAL_CODE_OVERRIDES: &[(&str, &str)] = &[
    ("BLACK", "GB"),
    ("BLACK STEEL", "GB"),
    ("BLACK METAL", "GB"),
];

/// Known material names and abbreviations.
pub const BASE_MATERIAL_CODES: &[(&str, &str)] = &[
    ("GALVANIZED", "GG"),
    ("GALV", "GG"),
    ("GAL", "GG"),
    ("STAINLESS", "SS"),
    ("STAINLESS STEEL", "SS"),
    ("SS", "SS"),
    ("CARBON", "CS"),
    ("CARBON STEEL", "CS"),
    ("MILD STEEL", "CS"),
    ("MS", "CS"),
    ("ALUMINUM", "AL"),
    ("ALUMINIUM", "AL"),
    ("ALUM", "AL"),
    ("AL", "AL"),
    ("BRASS", "BR"),
    ("COPPER", "CU"),
    ("STEEL", "ST"),
];

/// Code used when nothing can be inferred.
pub const UNKNOWN_MATERIAL_CODE: &str = "XX";

type CodeRule = fn(&str) -> Option<String>;

const CODE_RULES: &[CodeRule] = &[override_prefix, exact_base, first_word_base, first_letters];

/// Returns the two-character material code. Never fails.
///
/// ## Example
/// ```rust
/// use sheetstock_core::barcode::material_code;
///
/// assert_eq!(material_code(Some("black steel")), "GB");
/// assert_eq!(material_code(Some("Galvanized")), "GG");
/// assert_eq!(material_code(Some("unknown goop")), "UN");
/// assert_eq!(material_code(None), "XX");
/// ```
pub fn material_code(material: Option<&str>) -> String {
    let key = normalize(material);
    if key.is_empty() {
        return UNKNOWN_MATERIAL_CODE.to_string();
    }
    CODE_RULES
        .iter()
        .find_map(|rule| rule(&key))
        .unwrap_or_else(|| UNKNOWN_MATERIAL_CODE.to_string())
}

fn lookup(table: &[(&str, &str)], key: &str) -> Option<String> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| code.to_string())
}

fn override_prefix(key: &str) -> Option<String> {
    MATERIAL_CODE_OVERRIDES
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, code)| code.to_string())
}

fn exact_base(key: &str) -> Option<String> {
    lookup(BASE_MATERIAL_CODES, key)
}

fn first_word_base(key: &str) -> Option<String> {
    lookup(BASE_MATERIAL_CODES, key.split_whitespace().next()?)
}

fn first_letters(key: &str) -> Option<String> {
    let first = key.split_whitespace().next()?;
    let letters: String = first
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        return None;
    }
    Some(format!("{:X<2}", letters))
}

// =============================================================================
// Unit Tests
// =============================================================================
