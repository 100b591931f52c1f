//! # Domain Types
//!
//! Core domain types used throughout Sheetstock.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │ MaterialRecord  │   │ InventoryQuery  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  thickness      │   │  filters        │       │
//! │  │  barcode        │   │  material       │   │  sort column    │       │
//! │  │  shelf, qty     │   │  dimensions     │   │  display units  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ RebuildOptions  │   │ RebuildSummary  │   │  BarcodeChange  │       │
//! │  │ migrate_legacy  │   │ assigned        │   │  id             │       │
//! │  │ force_rebuild   │   │ migrated        │   │  current        │       │
//! │  │ dry_run         │   │ rewritten/total │   │  proposed       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every inventory row has:
//! - `id`: UUID v4 - immutable, used for updates and deletes
//! - `barcode`: compact code - human-readable, rewritten by migrations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::barcode::dimensions::{format_feet_inches, parse_dimensions};

// =============================================================================
// Material Record
// =============================================================================

/// The three free-text fields a barcode is derived from.
///
/// Any of them may be missing; derivation degrades to `None` rather than
/// failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub thickness: Option<String>,
    pub material: Option<String>,
    pub dimensions: Option<String>,
}

impl MaterialRecord {
    /// Creates a record from borrowed fields.
    pub fn new(thickness: Option<&str>, material: Option<&str>, dimensions: Option<&str>) -> Self {
        MaterialRecord {
            thickness: thickness.map(str::to_string),
            material: material.map(str::to_string),
            dimensions: dimensions.map(str::to_string),
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// One stocked sheet size on one shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Compact barcode printed on the rack label.
    pub barcode: Option<String>,

    pub shelf: Option<String>,

    /// Free text: gauge ("12", "12GA"), fraction ("1/4") or decimal (".063").
    pub thickness: Option<String>,

    /// Free text material description ("Black Steel", "Galvanized", ...).
    pub metal_type: Option<String>,

    /// Free text sheet size ("120x60", "10' x 5'").
    pub dimensions: Option<String>,

    pub location: Option<String>,

    /// Sheets on hand (never negative).
    pub quantity: i64,

    /// Offcut size still usable, as written on the sheet.
    pub usable_scrap: Option<String>,

    /// Date the stock was received.
    pub date: Option<NaiveDate>,

    /// Parsed longer side in inches.
    pub length_in: Option<f64>,

    /// Parsed shorter side in inches.
    pub width_in: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// The fields the barcode is derived from.
    pub fn material_record(&self) -> MaterialRecord {
        MaterialRecord {
            thickness: self.thickness.clone(),
            material: self.metal_type.clone(),
            dimensions: self.dimensions.clone(),
        }
    }

    /// The natural key used to detect duplicate rows on import.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(
            self.shelf.as_deref(),
            self.thickness.as_deref(),
            self.metal_type.as_deref(),
            self.dimensions.as_deref(),
            self.location.as_deref(),
        )
    }

    /// Returns true if the row carries a non-blank barcode.
    pub fn has_barcode(&self) -> bool {
        self.barcode
            .as_deref()
            .map(|b| !b.trim().is_empty())
            .unwrap_or(false)
    }

    /// Dimensions rendered for display in the chosen units.
    ///
    /// Falls back to the raw dimension text when it can't be parsed.
    pub fn display_dimensions(&self, units: DisplayUnits) -> String {
        let raw = self.dimensions.clone().unwrap_or_default();
        match units {
            DisplayUnits::Raw => raw,
            DisplayUnits::FeetInches => match (self.length_in, self.width_in) {
                (Some(l), Some(w)) => {
                    format!("{} x {}", format_feet_inches(l), format_feet_inches(w))
                }
                _ => raw,
            },
        }
    }
}

/// Input for creating an inventory row (form or import).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub barcode: Option<String>,
    pub shelf: Option<String>,
    pub thickness: Option<String>,
    pub metal_type: Option<String>,
    pub dimensions: Option<String>,
    pub location: Option<String>,
    pub quantity: i64,
    pub usable_scrap: Option<String>,
    pub date: Option<NaiveDate>,
}

impl NewInventoryItem {
    /// Builds the stored row, filling parsed length/width from the dimensions.
    pub fn into_item(self, id: String, now: DateTime<Utc>) -> InventoryItem {
        let parsed = self.dimensions.as_deref().and_then(parse_dimensions);
        InventoryItem {
            id,
            barcode: self.barcode.filter(|b| !b.trim().is_empty()),
            shelf: self.shelf,
            thickness: self.thickness,
            metal_type: self.metal_type,
            dimensions: self.dimensions,
            location: self.location,
            quantity: self.quantity,
            usable_scrap: self.usable_scrap,
            date: self.date,
            length_in: parsed.map(|d| d.length_in),
            width_in: parsed.map(|d| d.width_in),
            created_at: now,
            updated_at: now,
        }
    }

    /// The natural key used to detect duplicate rows on import.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(
            self.shelf.as_deref(),
            self.thickness.as_deref(),
            self.metal_type.as_deref(),
            self.dimensions.as_deref(),
            self.location.as_deref(),
        )
    }

    /// Returns true if none of the identifying fields are filled in.
    pub fn is_blank(&self) -> bool {
        [
            &self.shelf,
            &self.thickness,
            &self.metal_type,
            &self.dimensions,
            &self.location,
        ]
        .iter()
        .all(|f| f.as_deref().map(str::trim).unwrap_or("").is_empty())
    }
}

/// shelf + thickness + metal_type + dimensions + location.
///
/// Missing fields compare equal to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub shelf: String,
    pub thickness: String,
    pub metal_type: String,
    pub dimensions: String,
    pub location: String,
}

impl ItemKey {
    pub fn new(
        shelf: Option<&str>,
        thickness: Option<&str>,
        metal_type: Option<&str>,
        dimensions: Option<&str>,
        location: Option<&str>,
    ) -> Self {
        let f = |s: Option<&str>| s.unwrap_or("").to_string();
        ItemKey {
            shelf: f(shelf),
            thickness: f(thickness),
            metal_type: f(metal_type),
            dimensions: f(dimensions),
            location: f(location),
        }
    }
}

// =============================================================================
// Inventory Query (caller-owned view state)
// =============================================================================

/// Column the inventory listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Barcode,
    #[default]
    Shelf,
    Thickness,
    MetalType,
    Dimensions,
    Location,
    Quantity,
    Date,
    Length,
    Width,
}

impl SortColumn {
    /// The SQL column backing this sort. Only these names ever reach SQL.
    pub const fn column_name(&self) -> &'static str {
        match self {
            SortColumn::Barcode => "barcode",
            SortColumn::Shelf => "shelf",
            SortColumn::Thickness => "thickness",
            SortColumn::MetalType => "metal_type",
            SortColumn::Dimensions => "dimensions",
            SortColumn::Location => "location",
            SortColumn::Quantity => "quantity",
            SortColumn::Date => "date",
            SortColumn::Length => "length_in",
            SortColumn::Width => "width_in",
        }
    }
}

impl std::str::FromStr for SortColumn {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "barcode" => Ok(SortColumn::Barcode),
            "shelf" => Ok(SortColumn::Shelf),
            "thickness" => Ok(SortColumn::Thickness),
            "metal_type" | "metal" | "material" => Ok(SortColumn::MetalType),
            "dimensions" => Ok(SortColumn::Dimensions),
            "location" => Ok(SortColumn::Location),
            "quantity" | "qty" => Ok(SortColumn::Quantity),
            "date" => Ok(SortColumn::Date),
            "length" => Ok(SortColumn::Length),
            "width" => Ok(SortColumn::Width),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "sort column".to_string(),
                reason: format!("unknown column '{}'", other),
            }),
        }
    }
}

/// How dimensions are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUnits {
    /// As typed ("120x60").
    #[default]
    Raw,
    /// Parsed and rendered as feet and inches ("10' 0.0\" x 5' 0.0\"").
    FeetInches,
}

/// Filters, sort order and display units for one inventory view.
///
/// Owned by the caller and passed into every listing call; nothing in the
/// workspace keeps this as process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryQuery {
    /// Exact-match filters.
    pub shelf: Option<String>,
    pub thickness: Option<String>,
    pub metal_type: Option<String>,
    pub location: Option<String>,

    /// Substring match on barcode.
    pub barcode_contains: Option<String>,

    /// Inclusive ranges on the parsed dimensions, in inches.
    pub min_length_in: Option<f64>,
    pub max_length_in: Option<f64>,
    pub min_width_in: Option<f64>,
    pub max_width_in: Option<f64>,

    pub sort: SortColumn,
    pub descending: bool,
    pub limit: Option<u32>,

    pub units: DisplayUnits,
}

impl InventoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shelf(mut self, shelf: impl Into<String>) -> Self {
        self.shelf = Some(shelf.into());
        self
    }

    pub fn metal_type(mut self, metal_type: impl Into<String>) -> Self {
        self.metal_type = Some(metal_type.into());
        self
    }

    pub fn thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = Some(thickness.into());
        self
    }

    pub fn sort_by(mut self, column: SortColumn, descending: bool) -> Self {
        self.sort = column;
        self.descending = descending;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

// =============================================================================
// Barcode Rebuild Types
// =============================================================================

/// Flags for a bulk barcode rebuild, usually sourced from UI toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildOptions {
    /// Rewrite codes that don't follow the compact grammar.
    pub migrate_legacy: bool,
    /// Rewrite every code, compact or not.
    pub force_rebuild_all: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        RebuildOptions {
            migrate_legacy: true,
            force_rebuild_all: false,
            dry_run: false,
        }
    }
}

/// Counters reported after a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Rows that had no barcode and received one.
    pub assigned: usize,
    /// Rows whose existing barcode was replaced.
    pub migrated: usize,
    /// assigned + migrated.
    pub rewritten: usize,
    /// Rows examined.
    pub total: usize,
}

/// One proposed (or applied) barcode rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeChange {
    pub id: String,
    pub current: Option<String>,
    pub proposed: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
