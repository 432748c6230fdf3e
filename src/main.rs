use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use partition_codec::engine::CodecError;
use partition_codec::engine::codec;
use partition_codec::engine::core::{PackedPhysicalType, PartitionMetadata};
use partition_codec::logging;
use rayon::prelude::*;
use tracing::info;

#[derive(Parser)]
#[command(name = "partition_codec")]
#[command(about = "Inspect and verify partition interchange files", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the schema and row-group layout of a file
    Inspect { file: PathBuf },

    /// Decode every column chunk with its inverse-mapped type
    Verify {
        file: PathBuf,

        /// Stop at the first failing chunk
        #[arg(long)]
        fail_fast: bool,
    },
}

fn format_physical(packed: i64) -> String {
    PackedPhysicalType::unpack(packed)
        .map(|p| p.to_string())
        .unwrap_or_else(|| format!("unknown({})", packed))
}

fn print_metadata(meta: &PartitionMetadata) {
    println!("Table:      {}", meta.table_name().unwrap_or("-"));
    println!("Created by: {}", meta.created_by().unwrap_or("-"));
    println!("Rows:       {}", meta.row_count());
    println!("Row groups: {}", meta.row_group_count());
    for rg in 0..meta.row_group_count() {
        if let Ok(rows) = meta.row_group_row_count(rg) {
            println!("  [{}] {} rows", rg, rows);
        }
    }
    println!("Columns:    {}", meta.column_count());
    for column in meta.columns() {
        println!(
            "  {:>3} {:<24} {:<26} {:<10} declared={}{}",
            column.id,
            column.name,
            format_physical(column.physical.pack()),
            column
                .column_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            column
                .declared_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if column.nullable { "" } else { " required" }
        );
    }
}

fn cmd_inspect(file: &Path) -> Result<(), CodecError> {
    let handle = codec::open_path_for_read(file)?;
    print_metadata(&codec::metadata(&handle));
    handle.close();
    Ok(())
}

/// Returns the number of chunks that failed to decode. Row groups are
/// decoded in parallel; each worker owns its output buffers.
fn cmd_verify(file: &Path, fail_fast: bool) -> Result<usize, CodecError> {
    let handle = codec::open_path_for_read(file)?;
    let meta = codec::metadata(&handle);

    let chunks: Vec<(usize, usize)> = (0..meta.row_group_count())
        .flat_map(|rg| (0..meta.column_count()).map(move |column| (rg, column)))
        .collect();
    let results: Vec<((usize, usize), Result<usize, CodecError>)> = chunks
        .par_iter()
        .map(|&(rg, column)| {
            let rows = handle.decode_column(rg, column).map(|b| b.row_count());
            ((rg, column), rows)
        })
        .collect();

    let mut failures = 0;
    let mut decoded_rows = 0u64;
    for ((rg, column), result) in results {
        match result {
            Ok(rows) => decoded_rows += rows as u64,
            Err(e) if e.is_chunk_local() && !fail_fast => {
                e.log_error();
                println!("  row group {} column {}: {} ({})", rg, column, e, e.kind());
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    println!(
        "Verified {} chunks, {} failed, {} values decoded",
        chunks.len(),
        failures,
        decoded_rows
    );
    handle.close();
    Ok(failures)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init()?;

    let result = match &args.command {
        Command::Inspect { file } => {
            info!(target: "partition_codec::cli", file = %file.display(), "Inspecting file");
            cmd_inspect(file).map(|_| 0)
        }
        Command::Verify { file, fail_fast } => {
            info!(target: "partition_codec::cli", file = %file.display(), "Verifying file");
            cmd_verify(file, *fail_fast)
        }
    };

    match result {
        Ok(0) => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::from(2)),
        Err(e) => {
            eprintln!("error: {} ({})", e, e.kind());
            Ok(ExitCode::FAILURE)
        }
    }
}
