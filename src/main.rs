use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use stacktab::engine::memo;
use stacktab::extract;
use stacktab::ExtractOptions;
use stacktab::Workbook;
use std::path::PathBuf;

/// Thin wrapper around the extraction engine: open a workbook, run the
/// pipeline, print the JSON result to stdout.
#[derive(Parser)]
#[command(about = "Extract stacked tables from a spreadsheet export as grouped JSON records.")]
struct Args {
    /// Workbook to read (.xlsx)
    file: PathBuf,

    /// Sheet to extract; defaults to the first sheet
    #[arg(long)]
    sheet: Option<String>,

    /// First column of the scan range
    #[arg(long, default_value = "C")]
    start_column: String,

    /// Last column of the scan range
    #[arg(long, default_value = "AC")]
    end_column: String,

    /// Case-insensitive substring marking the end-of-data row
    #[arg(long, default_value = "adds")]
    sentinel: String,

    /// Last data row assumed when no sentinel is found
    #[arg(long, default_value_t = 188)]
    fallback_row: u32,

    /// JSON file remembering the previously detected last row
    #[arg(long, value_name = "PATH")]
    memo: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut options = ExtractOptions::default();
    options.set_columns(&args.start_column, &args.end_column)?;
    options.sentinel_marker = args.sentinel;
    options.last_row_fallback = args.fallback_row;

    let mut workbook = Workbook::open(&args.file)
        .with_context(|| format!("Failed to open workbook {}", args.file.display()))?;
    let grid = workbook
        .read_grid(args.sheet.as_deref())
        .with_context(|| format!("Failed to read grid from {}", args.file.display()))?;

    let memo_row = args.memo.as_deref().and_then(memo::load);
    let extraction = extract(&grid, &options, memo_row);
    if let (Some(path), Some(row)) = (&args.memo, extraction.memo_update) {
        memo::store(path, row)
            .with_context(|| format!("Failed to persist memo {}", path.display()))?;
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&extraction)?
    } else {
        serde_json::to_string(&extraction)?
    };
    println!("{json}");
    eprintln!(
        "{} tables found, last data row {}",
        extraction.metadata.tables_found, extraction.metadata.last_row
    );
    Ok(())
}
