//! # sheetstock CLI
//!
//! Barcode maintenance and CSV transfer from the command line.
//!
//! ## Examples
//! ```text
//! sheetstock derive --thickness 12 --material "Black Steel" --dimensions 120x60
//! sheetstock preview --sample 20
//! sheetstock rebuild --dry-run
//! sheetstock import stock.csv --update --generate-barcodes
//! sheetstock export --shelf A1 --sort quantity --desc --out a1.csv
//! sheetstock scan 12GB510 -- -2
//! ```
//!
//! Logs go to stderr so CSV output on stdout stays clean.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sheetstock_core::{CoreError, InventoryQuery, RebuildOptions, SortColumn};
use sheetstock_db::transfer::{
    backup_csv, export_inventory_csv, export_pronest_csv, import_csv, restore_csv,
};
use sheetstock_db::{
    AppConfig, Database, DbError, DbResult, DuplicateStrategy, ImportOptions, RestoreMode,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sheet-metal inventory tool
#[derive(Parser)]
#[command(name = "sheetstock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short, long, global = true, env = "SHEETSTOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compact barcode for a material
    Derive {
        #[arg(short, long)]
        thickness: Option<String>,

        #[arg(short, long)]
        material: Option<String>,

        #[arg(short, long)]
        dimensions: Option<String>,
    },

    /// Show the barcode changes a rebuild would make
    Preview {
        /// Maximum number of changes to show
        #[arg(short, long, default_value_t = 20)]
        sample: usize,

        /// Print the changes as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        rebuild: RebuildArgs,
    },

    /// Assign missing barcodes and migrate legacy ones
    Rebuild {
        #[command(flatten)]
        rebuild: RebuildArgs,

        /// Compute counts without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Import rows from a CSV file
    Import {
        file: PathBuf,

        /// Update matching rows instead of skipping them
        #[arg(long)]
        update: bool,

        /// Give new rows without a barcode a compact code
        #[arg(short, long)]
        generate_barcodes: bool,
    },

    /// Export inventory rows as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export inventory rows in ProNest plate layout
    ExportPronest {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write every column of every row to CSV
    Backup {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load rows from a backup
    Restore {
        file: PathBuf,

        /// Keep existing rows instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Adjust the quantity of the row with this barcode
    Scan {
        barcode: String,

        /// Sheets added (positive) or taken (negative)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Fill length/width from the dimension text of every row
    ExtractDims,
}

#[derive(Args)]
struct RebuildArgs {
    /// Rewrite every barcode, compact or not
    #[arg(long)]
    force: bool,

    /// Leave non-compact codes alone
    #[arg(long)]
    no_migrate: bool,
}

impl RebuildArgs {
    fn options(&self, dry_run: bool) -> RebuildOptions {
        RebuildOptions {
            migrate_legacy: !self.no_migrate,
            force_rebuild_all: self.force,
            dry_run,
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    shelf: Option<String>,

    #[arg(long)]
    metal_type: Option<String>,

    #[arg(long)]
    thickness: Option<String>,

    /// Column to sort by (shelf, quantity, barcode, ...)
    #[arg(long)]
    sort: Option<String>,

    #[arg(long)]
    desc: bool,
}

impl FilterArgs {
    fn query(&self) -> DbResult<InventoryQuery> {
        let sort = match self.sort.as_deref() {
            Some(column) => column.parse::<SortColumn>().map_err(CoreError::from)?,
            None => SortColumn::default(),
        };
        Ok(InventoryQuery {
            shelf: self.shelf.clone(),
            metal_type: self.metal_type.clone(),
            thickness: self.thickness.clone(),
            ..Default::default()
        }
        .sort_by(sort, self.desc))
    }
}

/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,sheetstock=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sheetstock=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

async fn open_database(cli: &Cli) -> DbResult<Database> {
    let mut config = AppConfig::load(cli.config.clone())?;
    if let Some(path) = &cli.db {
        config.database.path = Some(path.clone());
    }

    let db = Database::new(config.db_config()?).await?;
    Ok(db.with_rules(config.barcode))
}

async fn run(cli: Cli) -> DbResult<()> {
    if let Commands::Derive {
        thickness,
        material,
        dimensions,
    } = &cli.command
    {
        let code = sheetstock_core::barcode::derive_compact_barcode_value(
            thickness.as_deref(),
            material.as_deref(),
            dimensions.as_deref(),
        )
        .ok_or_else(|| CoreError::invalid_input("material", "no compact barcode for these fields"))?;
        println!("{}", code);
        return Ok(());
    }

    let db = open_database(&cli).await?;

    match &cli.command {
        Commands::Derive { .. } => {}

        Commands::Preview {
            sample,
            json,
            rebuild,
        } => {
            let changes = db.barcodes().preview(rebuild.options(true), *sample).await?;
            if *json {
                let text = serde_json::to_string_pretty(&changes)
                    .map_err(|e| DbError::Internal(e.to_string()))?;
                println!("{}", text);
            } else if changes.is_empty() {
                println!("No barcode changes needed");
            } else {
                for change in changes {
                    println!(
                        "{}\t{}\t{}",
                        change.id,
                        change.current.as_deref().unwrap_or("-"),
                        change.proposed
                    );
                }
            }
        }

        Commands::Rebuild { rebuild, dry_run } => {
            let summary = db.barcodes().rebuild(rebuild.options(*dry_run)).await?;
            println!(
                "{} assigned, {} migrated, {} rows examined{}",
                summary.assigned,
                summary.migrated,
                summary.total,
                if *dry_run { " (dry run)" } else { "" }
            );
        }

        Commands::Import {
            file,
            update,
            generate_barcodes,
        } => {
            let options = ImportOptions {
                duplicates: if *update {
                    DuplicateStrategy::Update
                } else {
                    DuplicateStrategy::Skip
                },
                generate_barcodes: *generate_barcodes,
            };
            let reader = BufReader::new(File::open(file)?);
            let summary = import_csv(&db, reader, options).await?;
            println!(
                "Added: {}  Updated: {}  Skipped: {}  Barcodes generated: {}  Errors: {}",
                summary.inserted,
                summary.updated,
                summary.skipped,
                summary.barcodes_generated,
                summary.errors.len()
            );
            for error in &summary.errors {
                eprintln!("  {}", error);
            }
        }

        Commands::Export { filter, out } => {
            let items = db.inventory().list(&filter.query()?).await?;
            let rows = export_inventory_csv(&items, open_output(out.as_deref())?)?;
            info!(rows, "Export complete");
        }

        Commands::ExportPronest { filter, out } => {
            let items = db.inventory().list(&filter.query()?).await?;
            let today = chrono::Local::now().date_naive();
            let rows = export_pronest_csv(&items, today, open_output(out.as_deref())?)?;
            info!(rows, "ProNest export complete");
        }

        Commands::Backup { out } => {
            let rows = backup_csv(&db, open_output(out.as_deref())?).await?;
            info!(rows, "Backup complete");
        }

        Commands::Restore { file, append } => {
            let mode = if *append {
                RestoreMode::Append
            } else {
                RestoreMode::Replace
            };
            let reader = BufReader::new(File::open(file)?);
            let rows = restore_csv(&db, reader, mode).await?;
            println!("Restored {} rows", rows);
        }

        Commands::Scan { barcode, delta } => {
            let quantity = db
                .inventory()
                .adjust_quantity_by_barcode(barcode, *delta)
                .await?;
            println!("{}: {} on hand", barcode.trim(), quantity);
        }

        Commands::ExtractDims => {
            let updated = db.inventory().extract_dimensions().await?;
            println!("Updated dimensions for {} rows", updated);
        }
    }

    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(DbError::NotFound { entity, id }) => {
            eprintln!("Error: {} not found: {}", entity, id);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
