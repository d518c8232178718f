use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use seqtab_tools::rename::rename_fasta_file;
use seqtab_tools::{ensure_readable, init_logging, Error};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rename-fasta", version)]
#[command(about = "Renumber FASTA headers as <prefix>_000000001, <prefix>_000000002, ...")]
struct Args {
    /// Input FASTA (.gz accepted)
    input_fasta: PathBuf,

    /// Output FASTA, gzip-compressed if it ends in .gz
    output_fasta: PathBuf,

    /// Prefix for the new sequence names
    prefix: String,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help = "Verbose output (-vv for trace)")]
    verbosity: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity);

    ensure_readable(&args.input_fasta, |path, source| Error::SourceUnreadable { path, source })?;

    let renamed = rename_fasta_file(&args.input_fasta, &args.output_fasta, &args.prefix)
        .with_context(|| format!("failed to rename {}", args.input_fasta.display()))?;

    info!(
        "Successfully renamed {} FASTA sequences in '{}' to '{}' with prefix '{}'",
        renamed,
        args.input_fasta.display(),
        args.output_fasta.display(),
        args.prefix
    );

    Ok(())
}
