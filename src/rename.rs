use crate::error::{Error, Result, StreamError};
use crate::{create_writer, open_reader, trim_line_end};
use std::io::{BufRead, Write};
use std::path::Path;

/// Numbers FASTA headers as `>{prefix}_000000001`, `>{prefix}_000000002`, ...
///
/// Anything from the first `;` of the old header is kept, so size annotations
/// such as `;size=12` survive. Sequence lines are copied unchanged. Returns the
/// number of headers rewritten.
pub fn rename_fasta<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    prefix: &str,
) -> std::result::Result<usize, StreamError> {
    let mut count = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .map_err(StreamError::Read)?
            == 0
        {
            break;
        }
        let line = trim_line_end(&buf);

        let written = if line.starts_with(b">") {
            count += 1;
            let suffix = line
                .iter()
                .position(|&b| b == b';')
                .map_or(&[][..], |pos| &line[pos..]);
            write!(writer, ">{}_{:09}", prefix, count).and_then(|()| writer.write_all(suffix))
        } else {
            writer.write_all(line)
        };
        written
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(StreamError::Write)?;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(count)
}

/// [`rename_fasta`] between two paths. `.gz` is honoured on either side.
pub fn rename_fasta_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    prefix: &str,
) -> Result<usize> {
    let input = input.as_ref();
    let output = output.as_ref();
    let unreadable = |source| Error::SourceUnreadable {
        path: input.to_path_buf(),
        source,
    };
    let write_failed = |source| Error::TableWriteFailed {
        path: output.to_path_buf(),
        source,
    };

    let reader = open_reader(input).map_err(unreadable)?;
    let writer = create_writer(output).map_err(write_failed)?;

    rename_fasta(reader, writer, prefix).map_err(|e| match e {
        StreamError::Read(source) => unreadable(source),
        StreamError::Write(source) => write_failed(source),
    })
}
