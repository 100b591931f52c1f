//! # ProNest Export Rows
//!
//! Builds plate-inventory rows in the column layout the ProNest nesting
//! software imports. Writing them to disk is the db crate's job.
//!
//! ## Description Prefixes
//! ```text
//! plate "~"   black "+"   galv "-"   aluminum "="   stainless "<"
//!
//! "+12B (5' x 10')"   Black Steel, 12 gauge, 60" x 120"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::barcode::parse_dimensions;
use crate::gauge::thickness_to_decimal;
use crate::types::InventoryItem;

/// Column order ProNest expects.
pub const PRONEST_HEADERS: [&str; 24] = [
    "Description",
    "Plate Type",
    "Units",
    "Length",
    "Width",
    "MaterialID",
    "Material",
    "Thickness",
    "Stock Qty",
    "Unit Price",
    "Date Created",
    "Rotation",
    "Heat Num",
    "Stock Num",
    "Misc1",
    "Misc2",
    "Misc3",
    "Location",
    "Reorder limit",
    "Reorder quantity",
    "Supplier",
    "Created by",
    "Plate Path",
    "Grade",
];

pub const DEFAULT_SUPPLIER: &str = "Environmental Pneumatics";
pub const DEFAULT_CREATED_BY: &str = "Inventory Manager";

/// Side length used when a row has no usable dimensions.
pub const DEFAULT_SIDE_IN: f64 = 48.0;

/// One ProNest plate row. Field order matches [`PRONEST_HEADERS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProNestRow {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Plate Type")]
    pub plate_type: String,
    #[serde(rename = "Units")]
    pub units: String,
    #[serde(rename = "Length")]
    pub length: f64,
    #[serde(rename = "Width")]
    pub width: f64,
    #[serde(rename = "MaterialID")]
    pub material_id: String,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Thickness")]
    pub thickness: f64,
    #[serde(rename = "Stock Qty")]
    pub stock_qty: i64,
    #[serde(rename = "Unit Price")]
    pub unit_price: f64,
    #[serde(rename = "Date Created")]
    pub date_created: String,
    #[serde(rename = "Rotation")]
    pub rotation: i64,
    #[serde(rename = "Heat Num")]
    pub heat_num: String,
    #[serde(rename = "Stock Num")]
    pub stock_num: String,
    #[serde(rename = "Misc1")]
    pub misc1: String,
    #[serde(rename = "Misc2")]
    pub misc2: String,
    #[serde(rename = "Misc3")]
    pub misc3: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Reorder limit")]
    pub reorder_limit: i64,
    #[serde(rename = "Reorder quantity")]
    pub reorder_quantity: i64,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Created by")]
    pub created_by: String,
    #[serde(rename = "Plate Path")]
    pub plate_path: String,
    #[serde(rename = "Grade")]
    pub grade: String,
}

// =============================================================================
// Material Classification
// =============================================================================

/// Description prefix for a material, or `""` when none applies.
pub fn description_prefix(metal_type: Option<&str>) -> &'static str {
    let mt = lower(metal_type);
    if mt.contains("plate") {
        "~"
    } else if mt.contains("black") {
        "+"
    } else if mt.contains("galv") {
        "-"
    } else if is_aluminum(&mt) {
        "="
    } else if is_stainless(&mt) {
        "<"
    } else {
        ""
    }
}

/// ProNest material group: `AL`, `SS` or `MS` (mild steel).
pub fn material_abbrev(metal_type: Option<&str>) -> &'static str {
    let mt = lower(metal_type);
    if is_aluminum(&mt) {
        "AL"
    } else if is_stainless(&mt) {
        "SS"
    } else {
        "MS"
    }
}

/// Stock code: thickness text followed by a material marker.
///
/// `("12", "Black Steel")` → `"12B"`, `("1/4", "Plate")` → `"1/4PL"`,
/// unknown materials use the initials of each word.
pub fn classify_material_code(metal_type: Option<&str>, thickness: &str) -> String {
    let mt = lower(metal_type);
    let marker = if mt.contains("black") {
        "B".to_string()
    } else if mt.contains("plate") {
        "PL".to_string()
    } else if mt.contains("galv") {
        "G".to_string()
    } else if is_aluminum(&mt) {
        "AL".to_string()
    } else {
        metal_type
            .unwrap_or("")
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    };
    format!("{}{}", thickness, marker)
}

fn lower(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_lowercase()
}

fn is_aluminum(mt: &str) -> bool {
    mt.contains("aluminum") || mt == "al"
}

fn is_stainless(mt: &str) -> bool {
    mt.contains("stainless") || mt.contains("ss")
}

// =============================================================================
// Row Building
// =============================================================================

/// Builds the export row for `item`, the `index`-th row of the export.
///
/// `today` fills "Date Created" when the row has no date.
pub fn build_row(item: &InventoryItem, index: usize, today: NaiveDate) -> ProNestRow {
    let (length, width) = match (item.length_in, item.width_in) {
        (Some(l), Some(w)) if l > 0.0 && w > 0.0 => (l, w),
        _ => item
            .dimensions
            .as_deref()
            .and_then(parse_dimensions)
            .map(|d| (d.length_in, d.width_in))
            .unwrap_or((DEFAULT_SIDE_IN, DEFAULT_SIDE_IN)),
    };
    let length_ft = (length / 12.0).trunc() as i64;
    let width_ft = (width / 12.0).trunc() as i64;

    let thickness = item.thickness.as_deref().unwrap_or("").trim();
    let metal_type = item.metal_type.as_deref();
    let code = classify_material_code(metal_type, thickness);

    let qty = item.quantity.max(0);

    ProNestRow {
        description: format!(
            "{}{} ({}' x {}')",
            description_prefix(metal_type),
            code,
            width_ft,
            length_ft
        ),
        plate_type: "Rectangular".to_string(),
        units: "Inches".to_string(),
        length,
        width,
        material_id: format!("MAT{:03}", index + 1),
        material: material_abbrev(metal_type).to_string(),
        thickness: thickness_to_decimal(thickness),
        stock_qty: qty,
        unit_price: 0.0,
        date_created: item.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
        rotation: 0,
        heat_num: String::new(),
        stock_num: format!("{}{}{}", code, width_ft, length_ft),
        misc1: item.usable_scrap.clone().unwrap_or_default(),
        misc2: item.shelf.clone().unwrap_or_default(),
        misc3: String::new(),
        location: item.location.clone().unwrap_or_default(),
        reorder_limit: (qty / 2).max(1),
        reorder_quantity: (qty / 4).max(1),
        supplier: DEFAULT_SUPPLIER.to_string(),
        created_by: DEFAULT_CREATED_BY.to_string(),
        plate_path: String::new(),
        grade: String::new(),
    }
}

/// Builds rows for a whole listing, numbering MaterialIDs from `MAT001`.
pub fn build_rows(items: &[InventoryItem], today: NaiveDate) -> Vec<ProNestRow> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| build_row(item, index, today))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewInventoryItem;
    use chrono::Utc;

    fn item(thickness: &str, metal: &str, dims: Option<&str>, qty: i64) -> InventoryItem {
        NewInventoryItem {
            shelf: Some("A1".to_string()),
            thickness: Some(thickness.to_string()),
            metal_type: Some(metal.to_string()),
            dimensions: dims.map(str::to_string),
            location: Some("Bay 2".to_string()),
            quantity: qty,
            ..Default::default()
        }
        .into_item("id".to_string(), Utc::now())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(description_prefix(Some("Plate")), "~");
        assert_eq!(description_prefix(Some("Black Steel")), "+");
        assert_eq!(description_prefix(Some("Galvanized")), "-");
        assert_eq!(description_prefix(Some("Aluminum")), "=");
        assert_eq!(description_prefix(Some("AL")), "=");
        assert_eq!(description_prefix(Some("Stainless")), "<");
        assert_eq!(description_prefix(Some("Copper")), "");
    }

    #[test]
    fn test_material_abbrev() {
        assert_eq!(material_abbrev(Some("aluminum")), "AL");
        assert_eq!(material_abbrev(Some("304 SS")), "SS");
        assert_eq!(material_abbrev(Some("Black Steel")), "MS");
        assert_eq!(material_abbrev(None), "MS");
    }

    #[test]
    fn test_classify_material_code() {
        assert_eq!(classify_material_code(Some("Black Steel"), "12"), "12B");
        assert_eq!(classify_material_code(Some("Plate"), "1/4"), "1/4PL");
        assert_eq!(classify_material_code(Some("galv"), "16"), "16G");
        assert_eq!(classify_material_code(Some("Aluminum"), ".063"), ".063AL");
        assert_eq!(classify_material_code(Some("cold rolled steel"), "18"), "18CRS");
    }

    #[test]
    fn test_build_row() {
        let row = build_row(&item("12", "Black Steel", Some("120x60"), 9), 0, today());
        assert_eq!(row.description, "+12B (5' x 10')");
        assert_eq!(row.stock_num, "12B510");
        assert_eq!(row.material_id, "MAT001");
        assert_eq!(row.material, "MS");
        assert_eq!(row.thickness, 0.1050);
        assert_eq!((row.length, row.width), (120.0, 60.0));
        assert_eq!(row.reorder_limit, 4);
        assert_eq!(row.reorder_quantity, 2);
        assert_eq!(row.date_created, "2024-03-01");
        assert_eq!(row.misc2, "A1");
        assert_eq!(row.location, "Bay 2");
    }

    #[test]
    fn test_missing_dimensions_default_to_four_feet() {
        let row = build_row(&item("16", "Galvanized", None, 0), 4, today());
        assert_eq!((row.length, row.width), (48.0, 48.0));
        assert_eq!(row.description, "-16G (4' x 4')");
        assert_eq!(row.material_id, "MAT005");
        assert_eq!(row.reorder_limit, 1);
        assert_eq!(row.reorder_quantity, 1);
    }

    #[test]
    fn test_feet_truncate() {
        // 66" is 5.5 ft: ProNest labels drop the fraction
        let row = build_row(&item("14", "Steel", Some("66x30"), 1), 0, today());
        assert_eq!(row.stock_num, "14S25");
    }

    #[test]
    fn test_rows_serialize_with_pronest_headers() {
        let row = build_row(&item("12", "Black Steel", Some("120x60"), 1), 0, today());
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), PRONEST_HEADERS.len());
        for header in PRONEST_HEADERS {
            assert!(object.contains_key(header), "missing {}", header);
        }
    }
}
