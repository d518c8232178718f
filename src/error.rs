use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run. Each variant names the file involved.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The FASTA or cluster file could not be opened or read
    #[error("could not read source file '{}': {source}", path.display())]
    SourceUnreadable { path: PathBuf, source: io::Error },

    #[error("could not read table file '{}': {source}", path.display())]
    TableUnreadable { path: PathBuf, source: io::Error },

    /// Creating or writing the output (the `.tmp` sibling, or a rename-fasta output) failed
    #[error("could not write '{}': {source}", path.display())]
    TableWriteFailed { path: PathBuf, source: io::Error },

    /// The finished temporary file could not be moved over the original table
    #[error("could not replace '{}' with its augmented copy: {source}", path.display())]
    ReplaceFailed { path: PathBuf, source: io::Error },
}

/// Which side of a streaming table pass failed. Paths are attached by the caller.
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}
