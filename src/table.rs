//! Streams a tab-separated table and adds one looked-up column to every row.

use crate::error::{Error, Result, StreamError};
use crate::source::Lookup;
use crate::{DELIMITER, SENTINEL};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// Where the new column goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the last column
    Append,
    /// Between column 0 and column 1
    AfterFirst,
}

/// Which cell of a row holds the join key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyColumn {
    /// The header cell with this exact name, or column 0 if there is none
    Named(String),
    First,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentOptions {
    /// Header text of the added column
    pub column: String,
    pub key: KeyColumn,
    pub placement: Placement,
    /// Drop blank body lines instead of treating them as rows with an empty key
    pub skip_blank_rows: bool,
}

impl AugmentOptions {
    /// seq2tab: append `sequence`, key looked up by header name, blank lines kept.
    pub fn sequence_join<S: Into<String>>(id_column: S) -> Self {
        AugmentOptions {
            column: "sequence".to_string(),
            key: KeyColumn::Named(id_column.into()),
            placement: Placement::Append,
            skip_blank_rows: false,
        }
    }

    /// assign-motu: `MOTU` inserted after the first column, keyed on it, blank lines dropped.
    pub fn motu_join() -> Self {
        AugmentOptions {
            column: "MOTU".to_string(),
            key: KeyColumn::First,
            placement: Placement::AfterFirst,
            skip_blank_rows: true,
        }
    }
}

/// Per-run counters. `total == matched + unmatched`; the header is not counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AugmentReport {
    pub matched: usize,
    pub unmatched: usize,
    pub total: usize,
    /// Column the key was read from
    pub key_index: usize,
    /// The named key column was missing and column 0 was used instead
    pub key_fallback: bool,
}

/// Splits a raw line into its content and its terminator (`\n`, `\r\n` or nothing).
fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let content = crate::trim_line_end(line);
    line.split_at(content.len())
}

fn cell(row: &[u8], index: usize) -> &[u8] {
    row.split(|&b| b == DELIMITER).nth(index).unwrap_or(&[])
}

fn resolve_key(header: &[u8], key: &KeyColumn) -> (usize, bool) {
    let KeyColumn::Named(name) = key else {
        return (0, false);
    };
    match header
        .split(|&b| b == DELIMITER)
        .position(|c| c == name.as_bytes())
    {
        Some(index) => {
            debug!("Found id column '{}' at position {}", name, index);
            (index, false)
        }
        None => {
            warn!(
                "Column '{}' not found in header. Using first column instead.",
                name
            );
            (0, true)
        }
    }
}

fn write_row<W: Write>(
    writer: &mut W,
    row: &[u8],
    value: &[u8],
    placement: Placement,
    terminator: &[u8],
) -> io::Result<()> {
    let split = match placement {
        Placement::Append => None,
        Placement::AfterFirst => row.iter().position(|&b| b == DELIMITER),
    };
    let (head, tail) = match split {
        Some(pos) => row.split_at(pos),
        None => (row, &[][..]),
    };
    writer.write_all(head)?;
    writer.write_all(&[DELIMITER])?;
    writer.write_all(value)?;
    writer.write_all(tail)?;
    writer.write_all(terminator)
}

/// Copies `reader` to `writer` with one extra column per line.
///
/// The first line is the header and gets `options.column`. Every other line
/// gets the lookup value for its key cell, or `NA`. Cells are passed through
/// untouched and line terminators are preserved.
pub fn augment<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    lookup: &Lookup,
    options: &AugmentOptions,
) -> std::result::Result<AugmentReport, StreamError> {
    let mut report = AugmentReport::default();
    let mut buf = Vec::new();

    if reader
        .read_until(b'\n', &mut buf)
        .map_err(StreamError::Read)?
        == 0
    {
        warn!("Table has no header line; nothing to augment");
        return Ok(report);
    }
    let (header, terminator) = split_terminator(&buf);
    (report.key_index, report.key_fallback) = resolve_key(header, &options.key);
    write_row(
        &mut writer,
        header,
        options.column.as_bytes(),
        options.placement,
        terminator,
    )
    .map_err(StreamError::Write)?;

    loop {
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .map_err(StreamError::Read)?
            == 0
        {
            break;
        }
        let (row, terminator) = split_terminator(&buf);
        if row.is_empty() && options.skip_blank_rows {
            continue;
        }

        let key = cell(row, report.key_index);
        if report.total == 0 {
            debug!("First value in id column: {}", String::from_utf8_lossy(key));
        }
        let value = match lookup.get(key) {
            Some(value) => {
                report.matched += 1;
                value
            }
            None => {
                report.unmatched += 1;
                SENTINEL
            }
        };
        report.total += 1;

        write_row(&mut writer, row, value, options.placement, terminator)
            .map_err(StreamError::Write)?;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(report)
}

/// `<table>.tmp`, the sibling the augmented copy is written to.
pub fn temp_path(table: &Path) -> PathBuf {
    let mut name = OsString::from(table.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Rewrites the table at `path` with the extra column.
///
/// The new content goes to `<path>.tmp`, which is synced and then renamed over
/// the original. A `.tmp` left behind by a killed run is truncated and reused.
/// On any failure before the rename the temporary file is removed and the
/// original is left as it was.
pub fn augment_in_place<P: AsRef<Path>>(
    path: P,
    lookup: &Lookup,
    options: &AugmentOptions,
) -> Result<AugmentReport> {
    let path = path.as_ref();
    let unreadable = |source| Error::TableUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let tmp_path = temp_path(path);
    let write_failed = |source| Error::TableWriteFailed {
        path: tmp_path.clone(),
        source,
    };

    let input = File::open(path).map_err(unreadable)?;
    let permissions = input.metadata().map_err(unreadable)?.permissions();
    if tmp_path.exists() {
        warn!(
            "Overwriting leftover temporary file {} from an earlier run",
            tmp_path.display()
        );
    }
    let file = File::create(&tmp_path).map_err(write_failed)?;
    let tmp = NamedTempFile::from_parts(file, TempPath::from_path(&tmp_path));
    fs::set_permissions(tmp.path(), permissions).map_err(write_failed)?;

    let mut writer = BufWriter::with_capacity(1 << 20, tmp);
    let report = augment(
        BufReader::with_capacity(1 << 20, input),
        &mut writer,
        lookup,
        options,
    )
    .map_err(|e| match e {
        StreamError::Read(source) => unreadable(source),
        StreamError::Write(source) => write_failed(source),
    })?;

    let tmp = writer
        .into_inner()
        .map_err(|e| write_failed(e.into_error()))?;
    tmp.as_file().sync_all().map_err(write_failed)?;

    tmp.persist(path).map_err(|e| Error::ReplaceFailed {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(report)
}
