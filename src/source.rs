//! Loaders that turn a FASTA file or a cluster file into an ID lookup.
//!
//! Both loaders key entries by [`normalize_id`]; duplicate IDs overwrite the
//! earlier entry without complaint.

use crate::error::{Error, Result};
use crate::{normalize_id, open_reader, trim_line_end};
use log::{debug, info};
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;

/// Read-only mapping from a normalized ID to the value joined onto a table row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lookup {
    entries: HashMap<Vec<u8>, Vec<u8>>,
    /// FASTA headers seen, or non-empty cluster lines
    records: usize,
    /// Cluster member tokens seen (FASTA: same as `records`)
    members: usize,
}

impl Lookup {
    pub fn get(&self, id: &[u8]) -> Option<&[u8]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    /// Number of distinct IDs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn members(&self) -> usize {
        self.members
    }

    fn insert(&mut self, id: &[u8], value: Vec<u8>) {
        self.entries.insert(id.to_vec(), value);
    }
}

impl<K: Into<Vec<u8>>, V: Into<Vec<u8>>> FromIterator<(K, V)> for Lookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries: HashMap<Vec<u8>, Vec<u8>> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let records = entries.len();
        Lookup {
            entries,
            records,
            members: records,
        }
    }
}

/// Builds `ID -> sequence` from FASTA text.
///
/// The ID is the header text after `>` cut at the first `;`. The sequence is
/// every body line of the record concatenated as-is. Line terminators are not
/// part of the sequence: `\n` and a CRLF `\r\n` are both dropped. Lines before
/// the first header are ignored.
pub fn load_fasta_sequences<R: BufRead>(mut reader: R) -> io::Result<Lookup> {
    let mut lookup = Lookup::default();
    let mut current: Option<Vec<u8>> = None;
    let mut sequence = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = trim_line_end(&buf);

        if let Some(header) = line.strip_prefix(b">") {
            if let Some(id) = current.take() {
                lookup.insert(&id, std::mem::take(&mut sequence));
            }
            current = Some(normalize_id(header).to_vec());
            sequence.clear();
            lookup.records += 1;
        } else if current.is_some() {
            sequence.extend_from_slice(line);
        }
    }
    if let Some(id) = current {
        lookup.insert(&id, sequence);
    }

    lookup.members = lookup.records;
    Ok(lookup)
}

/// Builds `member ID -> representative ID` from a cluster file.
///
/// One cluster per line, members separated by whitespace. The first member
/// (cut at `;`) labels the whole line, itself included.
pub fn load_clusters<R: BufRead>(mut reader: R) -> io::Result<Lookup> {
    let mut lookup = Lookup::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let mut tokens = buf
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
            .map(normalize_id);
        let Some(seed) = tokens.next() else {
            continue;
        };
        let seed = seed.to_vec();

        lookup.insert(&seed, seed.clone());
        lookup.members += 1;
        for member in tokens {
            lookup.insert(member, seed.clone());
            lookup.members += 1;
        }
        lookup.records += 1;
    }

    Ok(lookup)
}

/// [`load_fasta_sequences`] on a file path (`.gz` accepted).
pub fn load_fasta_file<P: AsRef<Path>>(path: P) -> Result<Lookup> {
    let path = path.as_ref();
    let lookup = open_reader(path)
        .and_then(load_fasta_sequences)
        .map_err(|source| Error::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        "Loaded {} sequences ({} distinct IDs) from {}",
        lookup.records(),
        lookup.len(),
        path.display()
    );
    Ok(lookup)
}

/// [`load_clusters`] on a file path (`.gz` accepted).
pub fn load_cluster_file<P: AsRef<Path>>(path: P) -> Result<Lookup> {
    let path = path.as_ref();
    let lookup = open_reader(path)
        .and_then(load_clusters)
        .map_err(|source| Error::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} MOTUs from {}", lookup.records(), path.display());
    info!("Total sequences mapped: {}", lookup.members());
    if lookup.len() < lookup.members() {
        debug!(
            "{} member IDs were seen more than once; the last cluster listing them wins",
            lookup.members() - lookup.len()
        );
    }
    Ok(lookup)
}
