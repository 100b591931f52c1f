//! # CSV Transfer
//!
//! Spreadsheet interchange for the inventory table.
//!
//! ## Operations
//! ```text
//! ┌───────────────────┬────────────────────────────────────────────────────┐
//! │ import_csv        │ loose headers, duplicate strategy, optional codes │
//! │ export_inventory  │ the visible columns, one row per item             │
//! │ export_pronest    │ ProNest plate-inventory layout                    │
//! │ backup_csv        │ every column, including ids and timestamps        │
//! │ restore_csv       │ replace or append; ids are always regenerated     │
//! └───────────────────┴────────────────────────────────────────────────────┘
//! ```
//!
//! Everything works over `Read`/`Write`, so callers pick files, stdin or
//! in-memory buffers.

use std::collections::HashMap;
use std::io::{Read, Write};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sheetstock_core::pronest::build_rows;
use sheetstock_core::validation::{normalize_date_input, parse_quantity};
use sheetstock_core::{InventoryItem, NewInventoryItem};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::inventory::{generate_item_id, insert_row};

/// Columns written by [`export_inventory_csv`].
pub const INVENTORY_HEADERS: [&str; 9] = [
    "barcode",
    "shelf",
    "thickness",
    "metal_type",
    "dimensions",
    "location",
    "quantity",
    "usable_scrap",
    "date",
];

/// Maps a spreadsheet header to its inventory column.
///
/// Headers are matched case-insensitively after trimming.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let column = match header.trim().to_lowercase().as_str() {
        "barcode" => "barcode",
        "shelf" => "shelf",
        "thickness" => "thickness",
        "metal_type" | "metal" | "material" => "metal_type",
        "dimensions" | "dimension" => "dimensions",
        "location" => "location",
        "qty" | "quantity" => "quantity",
        "usable_scrap" | "sheet size" | "sheet_size" => "usable_scrap",
        "date" | "date_added" => "date",
        "created_at" => "created_at",
        _ => return None,
    };
    Some(column)
}

// =============================================================================
// Options & Summaries
// =============================================================================

/// What to do when an imported row matches an existing one on
/// shelf + thickness + metal_type + dimensions + location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    /// Overwrite quantity, scrap, date and (if given) barcode.
    Update,
    #[default]
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    pub duplicates: DuplicateStrategy,
    /// Assign a compact barcode to inserted rows that arrive without one.
    pub generate_barcodes: bool,
}

/// Outcome of an import. Per-row problems are collected, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub barcodes_generated: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Delete every row first.
    Replace,
    /// Keep existing rows.
    Append,
}

// =============================================================================
// Header mapping
// =============================================================================

/// Column name → field index for one CSV file. First occurrence wins.
struct ColumnMap(HashMap<&'static str, usize>);

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(column) = canonical_column(header) {
                map.entry(column).or_insert(index);
            }
        }
        ColumnMap(map)
    }

    fn has_data_columns(&self) -> bool {
        INVENTORY_HEADERS.iter().any(|c| self.0.contains_key(c))
    }

    /// Trimmed field value, `None` when missing or blank.
    fn get(&self, record: &csv::StringRecord, column: &str) -> Option<String> {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn new_item(&self, record: &csv::StringRecord, quantity: i64, date: Option<NaiveDate>) -> NewInventoryItem {
        NewInventoryItem {
            barcode: self.get(record, "barcode"),
            shelf: self.get(record, "shelf"),
            thickness: self.get(record, "thickness"),
            metal_type: self.get(record, "metal_type"),
            dimensions: self.get(record, "dimensions"),
            location: self.get(record, "location"),
            quantity,
            usable_scrap: self.get(record, "usable_scrap"),
            date,
        }
    }
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// =============================================================================
// Import
// =============================================================================

/// Imports inventory rows from CSV.
///
/// ## Row Handling
/// 1. Rows with no shelf/thickness/metal/dimensions/location are ignored
/// 2. A bad quantity records an error and skips the row
/// 3. A bad date is stored as empty
/// 4. A row matching an existing key is updated or skipped per `options`
/// 5. New rows without a barcode get one when `generate_barcodes` is set
///
/// ## Errors
/// Fails outright only when the file can't be read or has no recognizable
/// inventory columns.
pub async fn import_csv<R: Read>(db: &Database, reader: R, options: ImportOptions) -> DbResult<ImportSummary> {
    let mut csv_reader = reader_for(reader);
    let columns = ColumnMap::from_headers(csv_reader.headers()?);
    if !columns.has_data_columns() {
        return Err(DbError::Csv("No recognizable inventory columns found".to_string()));
    }

    let repo = db.inventory();
    let barcodes = db.barcodes();
    let mut summary = ImportSummary::default();

    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row_number = index + 2; // header is row 1

        let quantity_raw = columns.get(&record, "quantity").unwrap_or_default();
        let quantity = match parse_quantity(&quantity_raw) {
            Ok(q) => q,
            Err(e) => {
                summary.errors.push(format!("Row {}: {}", row_number, e));
                continue;
            }
        };

        let date = match columns.get(&record, "date") {
            Some(raw) => normalize_date_input(&raw).unwrap_or_else(|e| {
                warn!(row = row_number, date = %raw, error = %e, "Bad date, left empty");
                None
            }),
            None => None,
        };

        let new_item = columns.new_item(&record, quantity, date);
        if new_item.is_blank() {
            debug!(row = row_number, "Skipping row with no key fields");
            continue;
        }

        if let Some(mut existing) = repo.find_by_key(&new_item.key()).await? {
            match options.duplicates {
                DuplicateStrategy::Skip => summary.skipped += 1,
                DuplicateStrategy::Update => {
                    if new_item.barcode.is_some() {
                        existing.barcode = new_item.barcode;
                    }
                    existing.usable_scrap = new_item.usable_scrap;
                    existing.quantity = new_item.quantity;
                    existing.date = new_item.date;
                    match repo.update(&existing).await {
                        Ok(()) => summary.updated += 1,
                        Err(e) => summary.errors.push(format!("Row {}: {}", row_number, e)),
                    }
                }
            }
            continue;
        }

        let item = match repo.insert(new_item).await {
            Ok(item) => item,
            Err(e) => {
                summary.errors.push(format!("Row {}: {}", row_number, e));
                continue;
            }
        };
        summary.inserted += 1;

        if options.generate_barcodes && !item.has_barcode() {
            match barcodes.assign(&item.id).await {
                Ok(_) => summary.barcodes_generated += 1,
                Err(e) => warn!(row = row_number, error = %e, "Barcode generation failed"),
            }
        }
    }

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "CSV import complete"
    );
    Ok(summary)
}

// =============================================================================
// Export
// =============================================================================

/// Writes `items` with the [`INVENTORY_HEADERS`] columns. Returns rows written.
pub fn export_inventory_csv<W: Write>(items: &[InventoryItem], writer: W) -> DbResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(INVENTORY_HEADERS)?;

    for item in items {
        let quantity = item.quantity.to_string();
        let date = format_date(item.date);
        wtr.write_record([
            item.barcode.as_deref().unwrap_or(""),
            item.shelf.as_deref().unwrap_or(""),
            item.thickness.as_deref().unwrap_or(""),
            item.metal_type.as_deref().unwrap_or(""),
            item.dimensions.as_deref().unwrap_or(""),
            item.location.as_deref().unwrap_or(""),
            quantity.as_str(),
            item.usable_scrap.as_deref().unwrap_or(""),
            date.as_str(),
        ])?;
    }

    wtr.flush()?;
    debug!(rows = items.len(), "Exported inventory CSV");
    Ok(items.len())
}

/// Writes `items` in the ProNest plate-inventory layout.
pub fn export_pronest_csv<W: Write>(items: &[InventoryItem], today: NaiveDate, writer: W) -> DbResult<usize> {
    let rows = build_rows(items, today);
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), "Exported ProNest CSV");
    Ok(rows.len())
}

// =============================================================================
// Backup & Restore
// =============================================================================

/// Writes every column of every row.
pub async fn backup_csv<W: Write>(db: &Database, writer: W) -> DbResult<usize> {
    let items = db.inventory().all().await?;
    let mut wtr = csv::Writer::from_writer(writer);
    for item in &items {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    info!(rows = items.len(), "Inventory backed up");
    Ok(items.len())
}

/// Restores rows from a backup (or any inventory CSV).
///
/// Ids are regenerated and length/width are re-parsed from the dimension
/// text. The whole file is parsed before anything is written, and all
/// writes share one transaction, so a bad file leaves the table untouched.
///
/// ## Errors
/// * `DbError::Csv` - no usable columns, or a row with a bad quantity
/// * `DbError::UniqueViolation` - a restored barcode is already in use
pub async fn restore_csv<R: Read>(db: &Database, reader: R, mode: RestoreMode) -> DbResult<usize> {
    let mut csv_reader = reader_for(reader);
    let columns = ColumnMap::from_headers(csv_reader.headers()?);
    if !columns.has_data_columns() {
        return Err(DbError::Csv("No restorable columns in backup".to_string()));
    }

    let now = Utc::now();
    let mut items = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row_number = index + 2;

        let quantity_raw = columns.get(&record, "quantity").unwrap_or_default();
        let quantity = parse_quantity(&quantity_raw)
            .map_err(|e| DbError::Csv(format!("Row {}: {}", row_number, e)))?;
        let date = columns
            .get(&record, "date")
            .and_then(|raw| normalize_date_input(&raw).ok().flatten());

        let mut item = columns
            .new_item(&record, quantity, date)
            .into_item(generate_item_id(), now);
        if let Some(created) = columns
            .get(&record, "created_at")
            .and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
        {
            item.created_at = created;
        }
        items.push(item);
    }

    let mut tx = db.pool().begin().await.map_err(DbError::transaction)?;
    if mode == RestoreMode::Replace {
        let cleared = sqlx::query("DELETE FROM inventory").execute(&mut *tx).await?;
        info!(rows = cleared.rows_affected(), "Cleared inventory before restore");
    }
    for item in &items {
        insert_row(&mut *tx, item).await?;
    }
    tx.commit().await.map_err(DbError::transaction)?;

    info!(rows = items.len(), ?mode, "Inventory restored");
    Ok(items.len())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use sheetstock_core::pronest::PRONEST_HEADERS;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    const IMPORT: &str = "\
Shelf,Thickness,Material,Dimension,Location,Qty,Sheet Size,Date Added
A1,12,Black Steel,120x60,Rack 1,4,,01/15/2024
A2,16,Galvanized,96x48,Rack 1,10.0,24x24,not a date
A3,14,Steel,96x48,Rack 2,lots,,
,,,,,3,,
";

    #[tokio::test]
    async fn test_import_normalizes_headers() {
        let db = setup().await;
        let summary = import_csv(&db, IMPORT.as_bytes(), ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Row 4:"));

        let items = db.inventory().all().await.unwrap();
        let galv = items
            .iter()
            .find(|i| i.metal_type.as_deref() == Some("Galvanized"))
            .unwrap();
        assert_eq!(galv.quantity, 10);
        assert_eq!(galv.usable_scrap.as_deref(), Some("24x24"));
        assert_eq!(galv.date, None);

        let black = items
            .iter()
            .find(|i| i.shelf.as_deref() == Some("A1"))
            .unwrap();
        assert_eq!(black.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(black.length_in, Some(120.0));
    }

    #[tokio::test]
    async fn test_import_duplicates() {
        let db = setup().await;
        import_csv(&db, IMPORT.as_bytes(), ImportOptions::default())
            .await
            .unwrap();

        let again = "shelf,thickness,metal_type,dimensions,location,quantity\n\
                     A1,12,Black Steel,120x60,Rack 1,9\n";

        let skipped = import_csv(&db, again.as_bytes(), ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(skipped.skipped, 1);
        assert_eq!(skipped.inserted, 0);

        let options = ImportOptions {
            duplicates: DuplicateStrategy::Update,
            generate_barcodes: false,
        };
        let updated = import_csv(&db, again.as_bytes(), options).await.unwrap();
        assert_eq!(updated.updated, 1);
        assert_eq!(db.inventory().count().await.unwrap(), 2);

        let items = db.inventory().all().await.unwrap();
        let black = items
            .iter()
            .find(|i| i.shelf.as_deref() == Some("A1"))
            .unwrap();
        assert_eq!(black.quantity, 9);
    }

    #[tokio::test]
    async fn test_import_generates_barcodes() {
        let db = setup().await;
        let options = ImportOptions {
            duplicates: DuplicateStrategy::Skip,
            generate_barcodes: true,
        };
        let summary = import_csv(&db, IMPORT.as_bytes(), options).await.unwrap();
        assert_eq!(summary.barcodes_generated, 2);

        let codes = db.inventory().existing_barcodes().await.unwrap();
        assert!(codes.contains("12GB510"));
        assert!(codes.contains("16GG408"));
    }

    #[tokio::test]
    async fn test_import_rejects_unknown_columns() {
        let db = setup().await;
        let err = import_csv(&db, "foo,bar\n1,2\n".as_bytes(), ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Csv(_)));
    }

    #[tokio::test]
    async fn test_export_inventory() {
        let db = setup().await;
        import_csv(&db, IMPORT.as_bytes(), ImportOptions::default())
            .await
            .unwrap();
        let items = db.inventory().all().await.unwrap();

        let mut out = Vec::new();
        let written = export_inventory_csv(&items, &mut out).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("barcode,shelf,thickness,metal_type,dimensions,location,quantity,usable_scrap,date")
        );
        assert!(text.contains(",A1,12,Black Steel,120x60,Rack 1,4,,2024-01-15"));
    }

    #[tokio::test]
    async fn test_export_pronest_header() {
        let db = setup().await;
        import_csv(&db, IMPORT.as_bytes(), ImportOptions::default())
            .await
            .unwrap();
        let items = db.inventory().all().await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut out = Vec::new();
        assert_eq!(export_pronest_csv(&items, today, &mut out).unwrap(), 2);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some(PRONEST_HEADERS.join(",").as_str()));
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_backup_and_restore() {
        let db = setup().await;
        let options = ImportOptions {
            duplicates: DuplicateStrategy::Skip,
            generate_barcodes: true,
        };
        import_csv(&db, IMPORT.as_bytes(), options).await.unwrap();
        let before = db.inventory().all().await.unwrap();

        let mut backup = Vec::new();
        assert_eq!(backup_csv(&db, &mut backup).await.unwrap(), 2);

        let restored = restore_csv(&db, backup.as_slice(), RestoreMode::Replace)
            .await
            .unwrap();
        assert_eq!(restored, 2);

        let after = db.inventory().all().await.unwrap();
        assert_eq!(after.len(), 2);
        for old in &before {
            let new = after
                .iter()
                .find(|i| i.barcode == old.barcode)
                .unwrap();
            assert_ne!(new.id, old.id);
            assert_eq!(new.quantity, old.quantity);
            assert_eq!(new.date, old.date);
            assert_eq!(new.length_in, old.length_in);
        }
    }

    #[tokio::test]
    async fn test_restore_append_conflict_is_atomic() {
        let db = setup().await;
        let options = ImportOptions {
            duplicates: DuplicateStrategy::Skip,
            generate_barcodes: true,
        };
        import_csv(&db, IMPORT.as_bytes(), options).await.unwrap();

        let mut backup = Vec::new();
        backup_csv(&db, &mut backup).await.unwrap();

        // Same barcodes again
        let err = restore_csv(&db, backup.as_slice(), RestoreMode::Append)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(db.inventory().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_restore_rejects_bad_quantity() {
        let db = setup().await;
        let csv = "shelf,quantity\nA1,many\n";
        let err = restore_csv(&db, csv.as_bytes(), RestoreMode::Append)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Csv(_)));
        assert_eq!(db.inventory().count().await.unwrap(), 0);
    }

    #[test]
    fn test_canonical_column() {
        assert_eq!(canonical_column(" QTY "), Some("quantity"));
        assert_eq!(canonical_column("Sheet Size"), Some("usable_scrap"));
        assert_eq!(canonical_column("metal"), Some("metal_type"));
        assert_eq!(canonical_column("id"), None);
    }
}
