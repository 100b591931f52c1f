//! # sheetstock-db: Database Layer for Sheetstock
//!
//! Storage for the sheet-metal inventory: SQLite via sqlx, bulk barcode
//! maintenance, CSV interchange and configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sheetstock Data Flow                             │
//! │                                                                         │
//! │  `sheetstock rebuild` / embedding application                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  sheetstock-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Inventory    │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  Repository   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ BarcodeService│    │ 001_init.sql │  │   │
//! │  │   │ BarcodeRules  │◄───│ CSV transfer  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/sheetstock/sheetstock.db                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Inventory CRUD and listings
//! - [`barcodes`] - Preview, rebuild and assign barcodes
//! - [`transfer`] - CSV import, export, backup and restore
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sheetstock_db::{AppConfig, Database};
//! use sheetstock_core::RebuildOptions;
//!
//! let config = AppConfig::load(None)?;
//! let db = Database::new(config.db_config()?).await?.with_rules(config.barcode);
//!
//! let summary = db.barcodes().rebuild(RebuildOptions::default()).await?;
//! println!("{} assigned, {} migrated", summary.assigned, summary.migrated);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcodes;
pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transfer;

// =============================================================================
// Re-exports
// =============================================================================

pub use barcodes::BarcodeService;
pub use config::{AppConfig, DatabaseSettings};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::inventory::InventoryRepository;
pub use transfer::{DuplicateStrategy, ImportOptions, ImportSummary, RestoreMode};
