//! # Barcode Service
//!
//! Bulk maintenance of the barcode column: preview, rebuild and
//! single-row assignment.
//!
//! ## Rebuild Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SINGLE TRANSACTION                                   │
//! │                                                                         │
//! │  1. SELECT every row (insertion order)                                 │
//! │  2. taken = snapshot of stored barcodes                                │
//! │  3. for each row:                                                      │
//! │       needs_rebuild? ── no ──► skip                                    │
//! │            │ yes                                                        │
//! │       derive or fallback                                               │
//! │            │                                                            │
//! │       ensure_unique against taken (minus the row's own code)           │
//! │            │                                                            │
//! │       UPDATE ... SET barcode ── UNIQUE conflict? ─► mark taken, retry  │
//! │            │                                                            │
//! │       taken -= old code, taken += new code                             │
//! │  4. COMMIT (skipped on dry run)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is only a hint. The UNIQUE column on `inventory.barcode`
//! is what actually serializes check-then-reserve when another writer is
//! active.

use std::collections::HashSet;

use chrono::Utc;
use sheetstock_core::{BarcodeChange, BarcodeRules, InventoryItem, RebuildOptions, RebuildSummary};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::inventory::ITEM_COLUMNS;

/// Write attempts per row when a concurrent writer keeps taking codes.
const MAX_WRITE_RETRIES: usize = 3;

/// Bulk barcode operations over the inventory table.
#[derive(Debug, Clone)]
pub struct BarcodeService {
    pool: SqlitePool,
    rules: BarcodeRules,
}

impl BarcodeService {
    /// Creates a service using `rules` for derivation and classification.
    pub fn new(pool: SqlitePool, rules: BarcodeRules) -> Self {
        BarcodeService { pool, rules }
    }

    /// Up to `sample` proposed changes. Writes nothing.
    ///
    /// Proposals are resolved against the current barcodes, so the suffixes
    /// shown are the ones a rebuild would assign.
    pub async fn preview(&self, options: RebuildOptions, sample: usize) -> DbResult<Vec<BarcodeChange>> {
        let rows = fetch_rows(&self.pool).await?;
        let mut planner = Planner::new(&self.rules, options, &rows);

        let mut changes = Vec::new();
        for row in &rows {
            if changes.len() >= sample {
                break;
            }
            if let Some(change) = planner.propose(row)? {
                planner.commit(&change);
                changes.push(change);
            }
        }

        debug!(count = changes.len(), "Previewed barcode changes");
        Ok(changes)
    }

    /// Rewrites every barcode that needs it.
    ///
    /// ## Returns
    /// Counts of assigned (was blank) and migrated (was set) rows.
    ///
    /// ## Errors
    /// * `DbError::Core(ResolutionExhausted)` - the resolver hit its cap;
    ///   nothing is written
    pub async fn rebuild(&self, options: RebuildOptions) -> DbResult<RebuildSummary> {
        info!(
            migrate_legacy = options.migrate_legacy,
            force = options.force_rebuild_all,
            dry_run = options.dry_run,
            "Rebuilding barcodes"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;
        let rows: Vec<InventoryItem> =
            sqlx::query_as(&format!("SELECT {} FROM inventory ORDER BY created_at, id", ITEM_COLUMNS))
                .fetch_all(&mut *tx)
                .await?;

        let mut planner = Planner::new(&self.rules, options, &rows);
        let mut summary = RebuildSummary {
            total: rows.len(),
            ..Default::default()
        };

        for row in &rows {
            let Some(change) = planner.propose(row)? else {
                continue;
            };

            let applied = if options.dry_run {
                change
            } else {
                self.write_with_retry(&mut tx, &mut planner, row, change).await?
            };

            if applied.current.is_some() {
                summary.migrated += 1;
            } else {
                summary.assigned += 1;
            }
            summary.rewritten += 1;
            planner.commit(&applied);
        }

        if options.dry_run {
            tx.rollback().await?;
        } else {
            tx.commit().await.map_err(DbError::transaction)?;
        }

        info!(
            assigned = summary.assigned,
            migrated = summary.migrated,
            total = summary.total,
            "Barcode rebuild complete"
        );
        Ok(summary)
    }

    /// Gives one row a barcode if it needs one, and returns the row's code.
    pub async fn assign(&self, id: &str) -> DbResult<String> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;
        let row: Option<InventoryItem> =
            sqlx::query_as(&format!("SELECT {} FROM inventory WHERE id = ?1", ITEM_COLUMNS))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let row = row.ok_or_else(|| DbError::not_found("Inventory item", id))?;

        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT barcode FROM inventory WHERE barcode IS NOT NULL AND barcode <> ''",
        )
        .fetch_all(&mut *tx)
        .await?;

        let options = RebuildOptions::default();
        let mut planner = Planner::with_taken(&self.rules, options, codes.into_iter().collect());

        let code = match planner.propose(&row)? {
            Some(change) => {
                let applied = self.write_with_retry(&mut tx, &mut planner, &row, change).await?;
                applied.proposed
            }
            None => row.barcode.clone().unwrap_or_default(),
        };

        tx.commit().await.map_err(DbError::transaction)?;
        debug!(id = %id, barcode = %code, "Assigned barcode");
        Ok(code)
    }

    async fn write_with_retry(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        planner: &mut Planner<'_>,
        row: &InventoryItem,
        mut change: BarcodeChange,
    ) -> DbResult<BarcodeChange> {
        for attempt in 1..=MAX_WRITE_RETRIES {
            let result = sqlx::query("UPDATE inventory SET barcode = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(&change.id)
                .bind(&change.proposed)
                .bind(Utc::now())
                .execute(&mut **tx)
                .await;

            match result.map_err(DbError::from) {
                Ok(_) => return Ok(change),
                Err(err) if err.is_unique_violation() && attempt < MAX_WRITE_RETRIES => {
                    warn!(
                        id = %change.id,
                        barcode = %change.proposed,
                        attempt,
                        "Barcode taken by another writer, re-resolving"
                    );
                    planner.mark_taken(&change.proposed);
                    change = match planner.propose(row)? {
                        Some(next) => next,
                        None => return Ok(change),
                    };
                }
                Err(err) if err.is_unique_violation() => {
                    return Err(DbError::duplicate("barcode", change.proposed));
                }
                Err(err) => return Err(err),
            }
        }
        Err(DbError::duplicate("barcode", change.proposed))
    }
}

async fn fetch_rows(pool: &SqlitePool) -> DbResult<Vec<InventoryItem>> {
    let rows = sqlx::query_as(&format!("SELECT {} FROM inventory ORDER BY created_at, id", ITEM_COLUMNS))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

fn current_code(row: &InventoryItem) -> Option<&str> {
    row.barcode.as_deref().map(str::trim).filter(|b| !b.is_empty())
}

// =============================================================================
// Planner
// =============================================================================

/// Tracks which codes are taken while a batch is being planned.
struct Planner<'a> {
    rules: &'a BarcodeRules,
    options: RebuildOptions,
    taken: HashSet<String>,
}

impl<'a> Planner<'a> {
    fn new(rules: &'a BarcodeRules, options: RebuildOptions, rows: &[InventoryItem]) -> Self {
        let taken = rows
            .iter()
            .filter_map(current_code)
            .map(str::to_string)
            .collect();
        Self::with_taken(rules, options, taken)
    }

    fn with_taken(rules: &'a BarcodeRules, options: RebuildOptions, taken: HashSet<String>) -> Self {
        Planner { rules, options, taken }
    }

    /// The change `row` needs, if any. Does not reserve the code.
    fn propose(&self, row: &InventoryItem) -> DbResult<Option<BarcodeChange>> {
        if !self.rules.needs_rebuild(
            row.barcode.as_deref(),
            self.options.migrate_legacy,
            self.options.force_rebuild_all,
        ) {
            return Ok(None);
        }

        let current = current_code(row);
        let candidate = self
            .rules
            .derive(&row.material_record(), row.shelf.as_deref(), &row.id);
        // A row never collides with its own code.
        let proposed = self
            .rules
            .ensure_unique(&candidate, |code| {
                self.taken.contains(code) && Some(code) != current
            })?;

        Ok(Some(BarcodeChange {
            id: row.id.clone(),
            current: current.map(str::to_string),
            proposed,
        }))
    }

    fn commit(&mut self, change: &BarcodeChange) {
        if let Some(old) = &change.current {
            self.taken.remove(old);
        }
        self.taken.insert(change.proposed.clone());
    }

    fn mark_taken(&mut self, code: &str) {
        self.taken.insert(code.to_string());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
