use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use oews_atlas_core::env_non_empty;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "oews-atlas")]
#[command(about = "Import BLS occupational wage tables into a local salary atlas", long_about = None)]
struct Cli {
    /// SQLite database path (overrides OEWS_ATLAS_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an OEWS table export (CSV, TSV or Excel workbook)
    Import {
        file: PathBuf,
        /// Survey year stamped on every row
        #[arg(short, long)]
        year: Option<i32>,
        /// Provenance tag stored with every row
        #[arg(long)]
        source_tag: Option<String>,
        /// Records buffered before each write
        #[arg(short, long)]
        batch_size: Option<usize>,
        /// Keep only occupation codes with this prefix (repeatable)
        #[arg(long = "occ-prefix")]
        occ_prefix: Vec<String>,
        /// Force delimited text with this delimiter: comma or tab (default: from the file extension)
        #[arg(short, long)]
        delimiter: Option<String>,
    },
    /// Summarize a table export without writing anything
    Analyze {
        file: PathBuf,
        #[arg(long = "occ-prefix")]
        occ_prefix: Vec<String>,
        #[arg(short, long)]
        delimiter: Option<String>,
    },
    /// Show database statistics
    Stats,
    /// Look up one salary row by career, location slug and year
    Lookup {
        career: String,
        /// Location slug; omit for the national row
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// List stored locations
    Locations {
        /// Two-letter state code
        #[arg(short, long)]
        state: Option<String>,
    },
}

pub(crate) fn get_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env_non_empty("OEWS_ATLAS_DB_PATH").map(PathBuf::from)).unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("oews-atlas")
            .join("atlas.db")
    })
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = get_db_path(cli.db);

    match cli.command {
        Commands::Import { file, year, source_tag, batch_size, occ_prefix, delimiter } => {
            let options = commands::import::ImportOptions {
                year,
                source_tag,
                batch_size,
                occ_prefix,
                delimiter,
            };
            commands::import::run(&db_path, &file, options).await
        },
        Commands::Analyze { file, occ_prefix, delimiter } => {
            commands::import::run_analyze(&file, &occ_prefix, delimiter.as_deref())
        },
        Commands::Stats => commands::query::run_stats(&db_path).await,
        Commands::Lookup { career, location, year } => {
            commands::query::run_lookup(&db_path, &career, location.as_deref(), year).await
        },
        Commands::Locations { state } => {
            commands::query::run_locations(&db_path, state.as_deref()).await
        },
    }
}
