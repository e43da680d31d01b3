//! # khist
//!
//! Exact canonical k-mer counting for FASTA streams, summarised as a
//! count-of-counts histogram.
//!
//! Every window of length `k` over `{A, C, G, T}` is reduced to the
//! lexicographically smaller of itself and its reverse complement, counted
//! exactly, and the final counts are binned into 255 slots (the last slot
//! saturating). Windows containing `N`, or any other symbol, are skipped.
//!
//! ## Quick Start
//!
//! ```rust
//! use khist::kmer::KmerLength;
//! use khist::run::histogram_from_reader;
//!
//! let fasta = b">seq1\nACGT\n";
//! let histogram = histogram_from_reader(&fasta[..], KmerLength::new(2)?)?;
//!
//! assert_eq!(histogram.get(1), 1); // CG
//! assert_eq!(histogram.get(2), 1); // AC, seen once as GT
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `gzip`: transparently decompress gzip input (file or stdin)
//! - `tracing`: emit `tracing` spans and events while counting

pub mod cli;
pub mod config;
pub mod counts;
pub mod error;
pub mod histogram;
pub mod input;
pub mod kmer;
pub mod reader;
pub mod run;

pub use counts::KmerCounts;
pub use error::KhistError;
pub use histogram::Histogram;
pub use kmer::KmerLength;
