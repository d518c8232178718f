use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use seqtab_tools::source::load_fasta_file;
use seqtab_tools::table::augment_in_place;
use seqtab_tools::{ensure_readable, init_logging, AugmentOptions, Error};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seq2tab", version)]
#[command(about = "Add a 'sequence' column to a tab-separated table from a FASTA file")]
#[command(long_about = "Adds a 'sequence' column to a tab-separated table by matching the values \
of <ID_COLUMN> against FASTA header IDs (the header text before the first ';'). \
Rows without a match get NA. The table file is modified in place.")]
struct Args {
    /// Tab-separated table, rewritten in place
    table_file: PathBuf,

    /// FASTA file with the sequences (.gz accepted)
    fasta_file: PathBuf,

    /// Header name of the ID column; falls back to the first column if absent
    id_column: String,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help = "Verbose output (-vv for trace)")]
    verbosity: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity);

    ensure_readable(&args.table_file, |path, source| Error::TableUnreadable { path, source })?;
    ensure_readable(&args.fasta_file, |path, source| Error::SourceUnreadable { path, source })?;

    let sequences = load_fasta_file(&args.fasta_file)?;
    let options = AugmentOptions::sequence_join(args.id_column);
    let report = augment_in_place(&args.table_file, &sequences, &options)
        .with_context(|| format!("failed to add sequences to {}", args.table_file.display()))?;

    info!("Successfully added sequences to table.");
    info!("Matched {} out of {} rows.", report.matched, report.total);

    Ok(())
}
