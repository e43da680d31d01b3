//! Error types for khist.
//!
//! Every fallible operation in the library returns one of the strongly-typed
//! errors defined here. Malformed FASTA is never an error: the reader simply
//! yields fewer records. Only I/O failures and invalid parameters surface.

use std::path::PathBuf;
use thiserror::Error;

use crate::input::Input;

/// Errors that can occur in khist operations.
#[derive(Debug, Error)]
pub enum KhistError {
    /// K-mer length is outside the valid range (1-32).
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Encountered an invalid DNA base.
    #[error("invalid base 0x{base:02x} at position {position}")]
    InvalidBase { base: u8, position: usize },

    /// Failed to open an input file.
    #[error("failed to open input file '{path}': {source}")]
    InputOpen {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed while reading sequence lines.
    #[error("failed to read input {input}: {source}")]
    InputRead {
        #[source]
        source: std::io::Error,
        input: Input,
    },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the window.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KhistError {
    fn from(source: std::io::Error) -> Self {
        KhistError::WriteError { source }
    }
}

impl From<serde_json::Error> for KhistError {
    fn from(source: serde_json::Error) -> Self {
        KhistError::JsonError { source }
    }
}

impl From<KmerLengthError> for KhistError {
    fn from(err: KmerLengthError) -> Self {
        KhistError::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

impl From<InvalidBaseError> for KhistError {
    fn from(err: InvalidBaseError) -> Self {
        KhistError::InvalidBase {
            base: err.base,
            position: err.position,
        }
    }
}
