//! # sheetstock-core: Pure Logic for Sheetstock
//!
//! This crate holds every rule of the sheet-metal inventory that can be
//! expressed as a pure function. Nothing here touches a database, a file
//! or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sheetstock Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            `sheetstock` CLI / embedding application             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ sheetstock-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  barcode  │  │   types   │  │   gauge   │  │ validation│  │   │
//! │  │   │  tokens   │  │ Inventory │  │  ProNest  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                sheetstock-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories, CSV            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`barcode`] - Compact barcode token derivation, classification, uniqueness
//! - [`types`] - Domain types (InventoryItem, MaterialRecord, InventoryQuery)
//! - [`gauge`] - Gauge/fraction/decimal thickness conversion
//! - [`pronest`] - ProNest plate-inventory export rows
//! - [`validation`] - Form and spreadsheet input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use sheetstock_core::barcode::derive_compact_barcode_value;
//!
//! let code = derive_compact_barcode_value(Some("12"), Some("Black Steel"), Some("120x60"));
//! assert_eq!(code.as_deref(), Some("12GB510"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod error;
pub mod gauge;
pub mod pronest;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::BarcodeRules;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of the timestamp-based codes issued before compact codes existed
/// (`EP-<thickness>-<material>-<stamp>`).
pub const LEGACY_BARCODE_PREFIX: &str = "EP-";

/// Codes longer than this are treated as legacy and are too wide to scan
/// reliably off a 1.8" label.
pub const MAX_LEGACY_BARCODE_LEN: usize = 16;

/// Length of the hash-based fallback code used when a record can't be derived.
pub const FALLBACK_CODE_LENGTH: usize = 8;

/// Fallback codes are never truncated below this.
pub const MIN_FALLBACK_CODE_LENGTH: usize = 6;

/// Upper bound on uniqueness-suffix attempts before giving up.
pub const MAX_UNIQUE_ATTEMPTS: usize = 10_000;

/// Tolerance when matching a decimal plate thickness to a common fraction.
pub const FRACTION_TOLERANCE: f64 = 0.002;

/// Longest barcode value accepted from user input.
pub const MAX_BARCODE_LEN: usize = 48;
