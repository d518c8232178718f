use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use seqtab_tools::source::load_cluster_file;
use seqtab_tools::table::augment_in_place;
use seqtab_tools::{ensure_readable, init_logging, AugmentOptions, Error};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assign-motu", version)]
#[command(about = "Assign MOTU names to table rows from SWARM clustering output")]
#[command(long_about = "Assigns MOTU names to the rows of a tab-separated table. Each line of \
the cluster file is one MOTU whose members are separated by whitespace; the first member \
(before any ';') names the MOTU. A 'MOTU' column is inserted after the first (ID) column \
and the table file is modified in place.")]
struct Args {
    /// SWARM output, one cluster per line (.gz accepted)
    cluster_file: PathBuf,

    /// Tab-separated table keyed by its first column, rewritten in place
    table_file: PathBuf,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help = "Verbose output (-vv for trace)")]
    verbosity: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity);

    ensure_readable(&args.cluster_file, |path, source| Error::SourceUnreadable { path, source })?;
    ensure_readable(&args.table_file, |path, source| Error::TableUnreadable { path, source })?;

    let motus = load_cluster_file(&args.cluster_file)?;
    let report = augment_in_place(&args.table_file, &motus, &AugmentOptions::motu_join())
        .with_context(|| format!("failed to assign MOTUs in {}", args.table_file.display()))?;

    info!("Successfully assigned MOTUs to table.");
    info!("Matched {} out of {} rows.", report.matched, report.total);
    if report.unmatched > 0 {
        warn!("{} sequences could not be assigned to any MOTU.", report.unmatched);
    }

    Ok(())
}
