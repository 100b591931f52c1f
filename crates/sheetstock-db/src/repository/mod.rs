//! # Repository Module
//!
//! Database repository implementations for Sheetstock.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command / BarcodeService / CSV transfer                           │
//! │       │                                                                 │
//! │       │  db.inventory().list(&query)                                   │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── insert / get_by_id / update / delete                              │
//! │  ├── find_by_barcode / barcode_exists / existing_barcodes              │
//! │  └── adjust_quantity / extract_dimensions                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
