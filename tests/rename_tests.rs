use flate2::read::MultiGzDecoder;
use seqtab_tools::rename::{rename_fasta, rename_fasta_file};
use seqtab_tools::error::StreamError;
use seqtab_tools::Error;
use std::fs;
use std::io::{self, Read, Write};

fn rename(input: &[u8], prefix: &str) -> (String, usize) {
    let mut out = Vec::new();
    let count = rename_fasta(input, &mut out, prefix).unwrap();
    (String::from_utf8(out).unwrap(), count)
}

#[test]
fn test_rename_numbers_headers() {
    let (out, count) = rename(b">a\nACGT\n>b\nGG\nTT\n", "SEQ");
    assert_eq!(out, ">SEQ_000000001\nACGT\n>SEQ_000000002\nGG\nTT\n");
    assert_eq!(count, 2);
}

#[test]
fn test_rename_keeps_annotation_after_semicolon() {
    let (out, _) = rename(b">old_name;size=12;\nAC\n", "ODIN");
    assert_eq!(out, ">ODIN_000000001;size=12;\nAC\n");
}

#[test]
fn test_rename_terminates_every_line() {
    // last line gains a newline, blank lines stay
    let (out, count) = rename(b">x\r\nAC\n\nGT", "P");
    assert_eq!(out, ">P_000000001\nAC\n\nGT\n");
    assert_eq!(count, 1);
}

#[test]
fn test_rename_fasta_file_gz_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.fasta");
    let output = dir.path().join("out.fasta.gz");
    fs::write(&input, ">r;size=1\nACGT\n").unwrap();

    assert_eq!(rename_fasta_file(&input, &output, "S").unwrap(), 1);

    let mut text = String::new();
    MultiGzDecoder::new(fs::File::open(&output).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, ">S_000000001;size=1\nACGT\n");
}

#[test]
fn test_rename_fasta_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.fasta");
    fs::write(&input, ">r\nA\n").unwrap();

    let err = rename_fasta_file(dir.path().join("missing.fasta"), dir.path().join("o.fasta"), "S").unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable { .. }));

    let err = rename_fasta_file(&input, dir.path().join("no_such_dir").join("o.fasta"), "S").unwrap_err();
    assert!(matches!(err, Error::TableWriteFailed { .. }));
}

struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "no space left"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_rename_reports_failing_side() {
    let err = rename_fasta(&b">a\nAC\n"[..], FullDisk, "S").unwrap_err();
    assert!(matches!(err, StreamError::Write(_)));
}
