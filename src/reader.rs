//! Streaming FASTA record reader.
//!
//! [`RecordReader`] groups the sequence lines between one `>` header and the
//! next into a single upper-cased sequence. It never holds more than the
//! record currently being assembled, and it never fails on malformed input:
//!
//! - headers with no sequence lines produce no record,
//! - sequence lines before the first header form a record of their own,
//! - empty input produces no records.
//!
//! Only I/O errors are reported.
//!
//! # Example
//!
//! ```rust
//! use khist::reader::RecordReader;
//!
//! let fasta = b">one\nacgt\nNNAC\n>empty\n>two\nTTT\n";
//! let records: Vec<_> = RecordReader::new(&fasta[..])
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(records, [&b"ACGTNNAC"[..], &b"TTT"[..]]);
//! # Ok::<(), khist::error::KhistError>(())
//! ```

use std::io::BufRead;

use bytes::{Bytes, BytesMut};

use crate::{error::KhistError, input::Input};

#[cfg(feature = "tracing")]
use tracing::trace;

/// Marks a header line.
pub const HEADER_MARKER: u8 = b'>';

/// Lazy iterator over the assembled sequences of a FASTA stream.
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: R,
    input: Input,
    line: Vec<u8>,
    seq: BytesMut,
    records_read: u64,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Wraps a buffered reader. Errors are attributed to stdin.
    pub fn new(reader: R) -> Self {
        Self::with_input(reader, Input::Stdin)
    }

    /// Wraps a buffered reader opened from `input`, which is named in errors.
    pub fn with_input(reader: R, input: Input) -> Self {
        Self {
            reader,
            input,
            line: Vec::new(),
            seq: BytesMut::new(),
            records_read: 0,
            done: false,
        }
    }

    /// Number of records yielded so far.
    #[must_use]
    pub const fn records_read(&self) -> u64 {
        self.records_read
    }

    fn finish_record(&mut self) -> Bytes {
        let mut seq = self.seq.split();
        seq.make_ascii_uppercase();
        self.records_read += 1;

        #[cfg(feature = "tracing")]
        trace!(record = self.records_read, len = seq.len(), "Assembled record");

        seq.freeze()
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Bytes, KhistError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.done = true;
                    if self.seq.is_empty() {
                        return None;
                    }
                    return Some(Ok(self.finish_record()));
                }
                Ok(_) => {
                    let line = trim_line_end(&self.line);
                    if line.first() == Some(&HEADER_MARKER) {
                        if !self.seq.is_empty() {
                            return Some(Ok(self.finish_record()));
                        }
                    } else {
                        self.seq.extend_from_slice(line);
                    }
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(KhistError::InputRead {
                        source,
                        input: self.input.clone(),
                    }));
                }
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for RecordReader<R> {}

/// Strips a trailing `\n` and then a trailing `\r`.
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
