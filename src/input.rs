//! Input source abstraction for file and stdin.
//!
//! This module provides the [`Input`] enum for abstracting over the two input
//! sources, so the same counting logic works for `khist genome.fa` and
//! `zcat genome.fa.gz | khist`.
//!
//! With the `gzip` feature, [`Input::open`] sniffs the gzip magic bytes and
//! decompresses transparently, whatever the source.
//!
//! # Example
//!
//! ```rust
//! use khist::input::Input;
//! use std::path::Path;
//!
//! // From a file path
//! let input = Input::from_path(Path::new("sequences.fa"));
//! assert!(matches!(input, Input::File(_)));
//!
//! // From stdin marker
//! let input = Input::from_path(Path::new("-"));
//! assert!(matches!(input, Input::Stdin));
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::KhistError;

#[cfg(feature = "gzip")]
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Input source for k-mer counting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// Read from a file at the specified path.
    File(PathBuf),
    /// Read from standard input.
    #[default]
    Stdin,
}

impl Input {
    /// Creates an `Input` from a path.
    ///
    /// If the path is "-", returns [`Self::Stdin`].
    /// Otherwise, returns [`Self::File`] with the given path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use khist::input::Input;
    /// use std::path::Path;
    ///
    /// let stdin = Input::from_path(Path::new("-"));
    /// assert!(stdin.is_stdin());
    ///
    /// let file = Input::from_path(Path::new("genome.fa"));
    /// assert!(file.is_file());
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Creates an `Input` from an optional path; `None` means stdin.
    #[must_use]
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdin, Self::from_path)
    }

    /// Returns `true` if this input is stdin.
    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Returns `true` if this input is a file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the file path if this is a file input.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Opens the source as a buffered line reader.
    ///
    /// # Errors
    ///
    /// Returns [`KhistError::InputOpen`] if the file cannot be opened, and
    /// [`KhistError::InputRead`] if the first bytes cannot be read while
    /// checking for gzip compression.
    pub fn open(&self) -> Result<Box<dyn BufRead>, KhistError> {
        let reader: Box<dyn BufRead> = match self {
            Self::File(path) => {
                let file = File::open(path).map_err(|source| KhistError::InputOpen {
                    source,
                    path: path.clone(),
                })?;
                Box::new(BufReader::new(file))
            }
            Self::Stdin => Box::new(BufReader::new(io::stdin())),
        };

        #[cfg(feature = "gzip")]
        let reader = maybe_gunzip(reader).map_err(|source| KhistError::InputRead {
            source,
            input: self.clone(),
        })?;

        Ok(reader)
    }
}

/// Wraps `reader` in a gzip decoder if the stream starts with the gzip magic.
///
/// Concatenated gzip members (as written by `bgzip`) are all decoded.
#[cfg(feature = "gzip")]
pub(crate) fn maybe_gunzip(mut reader: Box<dyn BufRead>) -> io::Result<Box<dyn BufRead>> {
    use flate2::bufread::MultiGzDecoder;

    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(reader)
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn from_path_stdin() {
        let input = Input::from_path(Path::new("-"));
        assert!(input.is_stdin());
        assert!(!input.is_file());
        assert!(input.as_path().is_none());
    }

    #[test]
    fn from_path_file() {
        let input = Input::from_path(Path::new("test.fa"));
        assert!(input.is_file());
        assert!(!input.is_stdin());
        assert_eq!(input.as_path(), Some(Path::new("test.fa")));
    }

    #[test]
    fn from_option_none() {
        assert!(Input::from_option(None).is_stdin());
    }

    #[test]
    fn from_option_some_file() {
        assert!(Input::from_option(Some(Path::new("test.fa"))).is_file());
        assert!(Input::from_option(Some(Path::new("-"))).is_stdin());
    }

    #[test]
    fn display() {
        assert_eq!(Input::Stdin.to_string(), "<stdin>");
        assert_eq!(Input::File(PathBuf::from("genome.fa")).to_string(), "genome.fa");
    }

    #[test]
    fn default_is_stdin() {
        assert!(Input::default().is_stdin());
    }

    #[test]
    fn open_missing_file() {
        let input = Input::File(PathBuf::from("/definitely/not/here.fa"));
        let err = input.open().err().unwrap();
        assert!(matches!(err, KhistError::InputOpen { .. }));
        assert!(err.to_string().contains("/definitely/not/here.fa"));
    }

    #[test]
    fn open_plain_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b">a\nACGT\n").unwrap();
        file.flush().unwrap();

        let mut content = String::new();
        Input::from_path(file.path())
            .open()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, ">a\nACGT\n");
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn open_gzip_file() {
        use flate2::{write::GzEncoder, Compression};

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">a\nACGT\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&compressed).unwrap();
        file.flush().unwrap();

        let mut content = String::new();
        Input::from_path(file.path())
            .open()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, ">a\nACGT\n");
    }
}
