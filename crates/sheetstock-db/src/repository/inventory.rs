//! # Inventory Repository
//!
//! Database operations for inventory rows.
//!
//! ## Key Operations
//! - CRUD by id, lookup by barcode
//! - Filtered and sorted listings driven by a caller-owned [`InventoryQuery`]
//! - Quantity adjustments that never go below zero
//! - Barcode snapshot for the uniqueness resolver
//!
//! ## Listing Query
//! ```text
//! InventoryQuery { shelf: "A1", metal_type: "Galvanized", sort: Quantity desc, limit: 50 }
//!       │
//!       ▼
//! SELECT ... FROM inventory
//!  WHERE 1=1 AND shelf = ? AND metal_type = ?
//!  ORDER BY quantity DESC, id
//!  LIMIT ?
//! ```
//! Filter values are always bound. The ORDER BY column comes from
//! [`SortColumn::column_name`], a fixed whitelist.

use std::collections::HashSet;

use chrono::Utc;
use sheetstock_core::barcode::parse_dimensions;
use sheetstock_core::validation::{validate_barcode, validate_new_item};
use sheetstock_core::{InventoryItem, InventoryQuery, ItemKey, NewInventoryItem, SortColumn};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Column list matching [`InventoryItem`]'s fields.
pub(crate) const ITEM_COLUMNS: &str = "id, barcode, shelf, thickness, metal_type, dimensions, \
     location, quantity, usable_scrap, date, length_in, width_in, created_at, updated_at";

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let item = repo.insert(new_item).await?;
/// let found = repo.find_by_barcode("12GB510").await?;
/// let qty = repo.adjust_quantity(&item.id, -2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Validates and inserts a new row with a fresh id.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Stored row with parsed length/width
    /// * `Err(DbError::UniqueViolation)` - Barcode already in use
    pub async fn insert(&self, new_item: NewInventoryItem) -> DbResult<InventoryItem> {
        validate_new_item(&new_item).map_err(sheetstock_core::CoreError::from)?;

        let item = new_item.into_item(generate_item_id(), Utc::now());
        self.insert_item(&item).await?;
        Ok(item)
    }

    /// Inserts a fully formed row as-is.
    pub async fn insert_item(&self, item: &InventoryItem) -> DbResult<()> {
        insert_row(&self.pool, item).await
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Gets a row by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {} FROM inventory WHERE id = ?1", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Gets a row by its exact barcode.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {} FROM inventory WHERE barcode = ?1", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(barcode.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Gets the first row matching the import key.
    ///
    /// Missing fields in the stored row match empty strings in the key.
    pub async fn find_by_key(&self, key: &ItemKey) -> DbResult<Option<InventoryItem>> {
        let sql = format!(
            r#"
            SELECT {} FROM inventory
            WHERE COALESCE(shelf, '') = ?1
              AND COALESCE(thickness, '') = ?2
              AND COALESCE(metal_type, '') = ?3
              AND COALESCE(dimensions, '') = ?4
              AND COALESCE(location, '') = ?5
            ORDER BY created_at, id
            LIMIT 1
            "#,
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(&key.shelf)
            .bind(&key.thickness)
            .bind(&key.metal_type)
            .bind(&key.dimensions)
            .bind(&key.location)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Returns true if any row carries `barcode`.
    pub async fn barcode_exists(&self, barcode: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM inventory WHERE barcode = ?1")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Snapshot of every barcode currently stored.
    ///
    /// The set is not live: check again (or rely on the UNIQUE column)
    /// before writing.
    pub async fn existing_barcodes(&self) -> DbResult<HashSet<String>> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT barcode FROM inventory WHERE barcode IS NOT NULL AND barcode <> ''",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(codes.into_iter().collect())
    }

    /// Lists rows matching `query`, in its sort order.
    pub async fn list(&self, query: &InventoryQuery) -> DbResult<Vec<InventoryItem>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM inventory WHERE 1=1", ITEM_COLUMNS));

        let exact = [
            ("shelf", &query.shelf),
            ("thickness", &query.thickness),
            ("metal_type", &query.metal_type),
            ("location", &query.location),
        ];
        for (column, value) in exact {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                qb.push(format!(" AND {} = ", column));
                qb.push_bind(value.trim().to_string());
            }
        }

        if let Some(fragment) = query.barcode_contains.as_deref().filter(|v| !v.is_empty()) {
            qb.push(" AND barcode LIKE ");
            qb.push_bind(format!("%{}%", fragment));
        }

        let ranges = [
            ("length_in", ">=", query.min_length_in),
            ("length_in", "<=", query.max_length_in),
            ("width_in", ">=", query.min_width_in),
            ("width_in", "<=", query.max_width_in),
        ];
        for (column, op, bound) in ranges {
            if let Some(bound) = bound {
                qb.push(format!(" AND {} {} ", column, op));
                qb.push_bind(bound);
            }
        }

        let direction = if query.descending { "DESC" } else { "ASC" };
        qb.push(format!(
            " ORDER BY {} {}, id",
            query.sort.column_name(),
            direction
        ));

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        let items = qb
            .build_query_as::<InventoryItem>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Inventory listing");
        Ok(items)
    }

    /// Every row in insertion order.
    pub async fn all(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!("SELECT {} FROM inventory ORDER BY created_at, id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, InventoryItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Distinct non-empty values of a column, sorted (for filter dropdowns).
    pub async fn distinct_values(&self, column: SortColumn) -> DbResult<Vec<String>> {
        let name = column.column_name();
        let sql = format!(
            "SELECT DISTINCT CAST({name} AS TEXT) FROM inventory \
             WHERE {name} IS NOT NULL AND CAST({name} AS TEXT) <> '' ORDER BY 1"
        );
        let values: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;
        Ok(values)
    }

    /// Counts rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Updates every editable column of an existing row.
    ///
    /// Length and width are re-parsed from the dimension text.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating inventory row");

        let parsed = item.dimensions.as_deref().and_then(parse_dimensions);
        let barcode = item.barcode.as_deref().filter(|b| !b.trim().is_empty());
        if let Some(code) = barcode {
            validate_barcode(code).map_err(sheetstock_core::CoreError::from)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                barcode = ?2,
                shelf = ?3,
                thickness = ?4,
                metal_type = ?5,
                dimensions = ?6,
                location = ?7,
                quantity = ?8,
                usable_scrap = ?9,
                date = ?10,
                length_in = ?11,
                width_in = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(barcode)
        .bind(&item.shelf)
        .bind(&item.thickness)
        .bind(&item.metal_type)
        .bind(&item.dimensions)
        .bind(&item.location)
        .bind(item.quantity)
        .bind(&item.usable_scrap)
        .bind(item.date)
        .bind(parsed.map(|d| d.length_in))
        .bind(parsed.map(|d| d.width_in))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| barcode_conflict(e, barcode))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", &item.id));
        }
        Ok(())
    }

    /// Adds `delta` to a row's quantity, clamping at zero.
    ///
    /// ## Returns
    /// The new quantity.
    pub async fn adjust_quantity(&self, id: &str, delta: i64) -> DbResult<i64> {
        debug!(id = %id, delta = %delta, "Adjusting quantity");

        let quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET quantity = MAX(0, quantity + ?2), updated_at = ?3
            WHERE id = ?1
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        quantity.ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Adds `delta` to the quantity of the row carrying `barcode`.
    ///
    /// This is what a scan at the rack does.
    pub async fn adjust_quantity_by_barcode(&self, barcode: &str, delta: i64) -> DbResult<i64> {
        let quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE inventory
            SET quantity = MAX(0, quantity + ?2), updated_at = ?3
            WHERE barcode = ?1
            RETURNING quantity
            "#,
        )
        .bind(barcode.trim())
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let quantity = quantity.ok_or_else(|| DbError::not_found("Barcode", barcode))?;
        info!(barcode = %barcode, delta, quantity, "Scanned stock change");
        Ok(quantity)
    }

    /// Sets the quantity of the row carrying `barcode`.
    pub async fn set_quantity_for_barcode(&self, barcode: &str, quantity: i64) -> DbResult<()> {
        if quantity < 0 {
            return Err(sheetstock_core::CoreError::invalid_input(
                "quantity",
                "must not be negative",
            )
            .into());
        }

        let result = sqlx::query(
            "UPDATE inventory SET quantity = ?2, updated_at = ?3 WHERE barcode = ?1",
        )
        .bind(barcode.trim())
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Barcode", barcode));
        }
        Ok(())
    }

    /// Sets or clears a row's barcode.
    pub async fn set_barcode(&self, id: &str, barcode: Option<&str>) -> DbResult<()> {
        let barcode = barcode.map(str::trim).filter(|b| !b.is_empty());
        if let Some(code) = barcode {
            validate_barcode(code).map_err(sheetstock_core::CoreError::from)?;
        }

        let result = sqlx::query("UPDATE inventory SET barcode = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(barcode)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| barcode_conflict(e, barcode))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }
        Ok(())
    }

    /// Re-parses every row's dimension text into length/width.
    ///
    /// ## Returns
    /// Number of rows whose dimensions parsed.
    pub async fn extract_dimensions(&self) -> DbResult<usize> {
        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as("SELECT id, dimensions FROM inventory")
                .fetch_all(&self.pool)
                .await?;

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;
        let mut parsed_count = 0;
        for (id, dimensions) in &rows {
            let parsed = dimensions.as_deref().and_then(parse_dimensions);
            if parsed.is_some() {
                parsed_count += 1;
            }
            sqlx::query("UPDATE inventory SET length_in = ?2, width_in = ?3 WHERE id = ?1")
                .bind(id)
                .bind(parsed.map(|d| d.length_in))
                .bind(parsed.map(|d| d.width_in))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await.map_err(DbError::transaction)?;

        info!(rows = rows.len(), parsed = parsed_count, "Extracted dimensions");
        Ok(parsed_count)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes a row by id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }
        Ok(())
    }

    /// Deletes every row. Returns how many were removed.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM inventory").execute(&self.pool).await?;
        info!(rows = result.rows_affected(), "Cleared inventory");
        Ok(result.rows_affected())
    }
}

/// Inserts `item` through any executor, so callers holding a transaction
/// can batch inserts.
pub(crate) async fn insert_row<'e, E>(executor: E, item: &InventoryItem) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %item.id, barcode = ?item.barcode, "Inserting inventory row");

    sqlx::query(
        r#"
        INSERT INTO inventory (
            id, barcode, shelf, thickness, metal_type, dimensions,
            location, quantity, usable_scrap, date, length_in, width_in,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&item.id)
    .bind(&item.barcode)
    .bind(&item.shelf)
    .bind(&item.thickness)
    .bind(&item.metal_type)
    .bind(&item.dimensions)
    .bind(&item.location)
    .bind(item.quantity)
    .bind(&item.usable_scrap)
    .bind(item.date)
    .bind(item.length_in)
    .bind(item.width_in)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(executor)
    .await
    .map_err(|e| barcode_conflict(e, item.barcode.as_deref()))?;

    Ok(())
}

/// Helper to generate a new row ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fills in the offending barcode on UNIQUE failures.
pub(crate) fn barcode_conflict(err: sqlx::Error, barcode: Option<&str>) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } if field.ends_with("barcode") => {
            DbError::duplicate("barcode", barcode.unwrap_or(""))
        }
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> InventoryRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().inventory()
    }

    fn new_item(shelf: &str, thickness: &str, metal: &str, dims: &str, qty: i64) -> NewInventoryItem {
        NewInventoryItem {
            shelf: Some(shelf.to_string()),
            thickness: Some(thickness.to_string()),
            metal_type: Some(metal.to_string()),
            dimensions: Some(dims.to_string()),
            quantity: qty,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;
        let item = repo
            .insert(new_item("A1", "12", "Black Steel", "120x60", 4))
            .await
            .unwrap();

        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.shelf.as_deref(), Some("A1"));
        assert_eq!(fetched.length_in, Some(120.0));
        assert_eq!(fetched.width_in, Some(60.0));
        assert_eq!(fetched.quantity, 4);
        assert_eq!(fetched.barcode, None);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_row() {
        let repo = setup().await;
        let err = repo.insert(NewInventoryItem::default()).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_barcode_is_unique() {
        let repo = setup().await;
        let mut first = new_item("A1", "12", "Black Steel", "120x60", 1);
        first.barcode = Some("12GB510".to_string());
        repo.insert(first.clone()).await.unwrap();

        first.shelf = Some("A2".to_string());
        let err = repo.insert(first).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "barcode");
                assert_eq!(value, "12GB510");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_many_rows_without_barcode() {
        let repo = setup().await;
        repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.insert(new_item("A2", "14", "Steel", "96x48", 1)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.existing_barcodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_barcode_lookups() {
        let repo = setup().await;
        let item = repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.set_barcode(&item.id, Some("12ST408")).await.unwrap();

        assert!(repo.barcode_exists("12ST408").await.unwrap());
        assert!(!repo.barcode_exists("12ST409").await.unwrap());
        let found = repo.find_by_barcode(" 12ST408 ").await.unwrap().unwrap();
        assert_eq!(found.id, item.id);
        assert!(repo.existing_barcodes().await.unwrap().contains("12ST408"));

        repo.set_barcode(&item.id, Some("  ")).await.unwrap();
        assert!(!repo.barcode_exists("12ST408").await.unwrap());
    }

    #[tokio::test]
    async fn test_adjust_quantity_clamps_at_zero() {
        let repo = setup().await;
        let item = repo.insert(new_item("A1", "12", "Steel", "96x48", 3)).await.unwrap();

        assert_eq!(repo.adjust_quantity(&item.id, 2).await.unwrap(), 5);
        assert_eq!(repo.adjust_quantity(&item.id, -10).await.unwrap(), 0);
        assert!(matches!(
            repo.adjust_quantity("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_quantity_by_barcode() {
        let repo = setup().await;
        let mut new = new_item("A1", "16", "Galvanized", "120x48", 2);
        new.barcode = Some("16GG410".to_string());
        repo.insert(new).await.unwrap();

        assert_eq!(repo.adjust_quantity_by_barcode("16GG410", -1).await.unwrap(), 1);
        repo.set_quantity_for_barcode("16GG410", 12).await.unwrap();
        let item = repo.find_by_barcode("16GG410").await.unwrap().unwrap();
        assert_eq!(item.quantity, 12);

        assert!(repo.set_quantity_for_barcode("16GG410", -1).await.is_err());
        assert!(repo.set_quantity_for_barcode("NOPE", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let repo = setup().await;
        repo.insert(new_item("A1", "12", "Black Steel", "120x60", 4)).await.unwrap();
        repo.insert(new_item("A1", "16", "Galvanized", "96x48", 9)).await.unwrap();
        repo.insert(new_item("B2", "16", "Galvanized", "144x60", 1)).await.unwrap();

        let on_a1 = repo.list(&InventoryQuery::new().shelf("A1")).await.unwrap();
        assert_eq!(on_a1.len(), 2);

        let galv = repo
            .list(&InventoryQuery::new().metal_type("Galvanized").sort_by(SortColumn::Quantity, true))
            .await
            .unwrap();
        assert_eq!(galv.iter().map(|i| i.quantity).collect::<Vec<_>>(), vec![9, 1]);

        let long = repo
            .list(&InventoryQuery {
                min_length_in: Some(120.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(long.len(), 2);

        let limited = repo.list(&InventoryQuery::new().limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_values() {
        let repo = setup().await;
        repo.insert(new_item("B2", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.insert(new_item("A1", "14", "Steel", "96x48", 1)).await.unwrap();

        let shelves = repo.distinct_values(SortColumn::Shelf).await.unwrap();
        assert_eq!(shelves, vec!["A1".to_string(), "B2".to_string()]);
    }

    #[tokio::test]
    async fn test_find_by_key() {
        let repo = setup().await;
        let item = repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();

        let key = ItemKey::new(Some("A1"), Some("12"), Some("Steel"), Some("96x48"), None);
        let found = repo.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(found.id, item.id);

        let other = ItemKey::new(Some("A1"), Some("12"), Some("Steel"), Some("96x48"), Some("Bay 1"));
        assert!(repo.find_by_key(&other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_reparses_dimensions() {
        let repo = setup().await;
        let mut item = repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        item.dimensions = Some("10' x 5'".to_string());
        repo.update(&item).await.unwrap();

        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.length_in, Some(120.0));

        item.id = "missing".to_string();
        assert!(matches!(repo.update(&item).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_extract_dimensions() {
        let repo = setup().await;
        let item = repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.insert(new_item("A2", "12", "Steel", "odd size", 1)).await.unwrap();
        sqlx::query("UPDATE inventory SET length_in = NULL, width_in = NULL")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert_eq!(repo.extract_dimensions().await.unwrap(), 1);
        let fetched = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!((fetched.length_in, fetched.width_in), (Some(96.0), Some(48.0)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let item = repo.insert(new_item("A1", "12", "Steel", "96x48", 1)).await.unwrap();
        repo.insert(new_item("A2", "12", "Steel", "96x48", 1)).await.unwrap();

        repo.delete(&item.id).await.unwrap();
        assert!(repo.delete(&item.id).await.is_err());
        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
