use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub mod error;
pub mod rename;
pub mod source;
pub mod table;

pub use error::{Error, Result};
pub use source::Lookup;
pub use table::{AugmentOptions, AugmentReport, KeyColumn, Placement};

/// Table field separator
pub const DELIMITER: u8 = b'\t';

/// Written when a key has no match
pub const SENTINEL: &[u8] = b"NA";

/// Sequence ID without its annotation: everything before the first `;`.
///
/// `A;size=3` -> `A`; a token without `;` is returned as-is.
pub fn normalize_id(token: &[u8]) -> &[u8] {
    match token.iter().position(|&b| b == b';') {
        Some(pos) => &token[..pos],
        None => token,
    }
}

/// Strips a trailing `\n`, then a trailing `\r` (so `\r\n` goes too).
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn is_gz(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Opens `path` for buffered reading, decompressing `.gz` files on the fly.
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if is_gz(path) {
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(1 << 20, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(1 << 20, file)))
    }
}

/// Creates `path` for buffered writing, gzip-compressing when it ends in `.gz`.
pub fn create_writer<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Write>> {
    let path = path.as_ref();
    let file = File::create(path)?;

    if is_gz(path) {
        let encoder = GzEncoder::new(file, Compression::default());
        Ok(Box::new(BufWriter::with_capacity(1 << 20, encoder)))
    } else {
        Ok(Box::new(BufWriter::with_capacity(1 << 20, file)))
    }
}

/// Sets up `env_logger` for the binaries: info by default, `-v` debug,
/// `-vv` trace. `RUST_LOG` wins when set.
pub fn init_logging(verbosity: u8) {
    let filter_level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .parse_default_env()
        .init();
}

/// Pre-flight check run by the binaries before any processing starts.
///
/// `make_err` picks the error variant so the caller decides whether the
/// file is a source or a table.
pub fn ensure_readable<P, F>(path: P, make_err: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(std::path::PathBuf, io::Error) -> Error,
{
    let path = path.as_ref();
    File::open(path)
        .map(drop)
        .map_err(|e| make_err(path.to_path_buf(), e))
}
