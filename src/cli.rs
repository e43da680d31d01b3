//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::kmer::{KmerLength, DEFAULT_K};

/// Counts canonical k-mers in a FASTA stream and prints their count-of-counts
/// histogram.
#[derive(Parser, Debug)]
#[command(name = "khist")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// K-mer length (1-32)
    #[arg(short = 'k', long = "kmer-len", default_value_t = DEFAULT_K, value_parser = parse_k)]
    pub k: usize,

    /// Path to a FASTA file; `-` or omitted reads stdin
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Suppress informational output on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// 255 tab-separated rows (count\tkmers)
    #[default]
    Tsv,
    /// JSON object with summary statistics and all rows
    Json,
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    KmerLength::new(k).map(KmerLength::get).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["khist"]).unwrap();
        assert_eq!(args.k, 31);
        assert!(args.path.is_none());
        assert_eq!(args.format, OutputFormat::Tsv);
        assert!(!args.quiet);
    }

    #[test]
    fn all_options() {
        let args =
            Args::try_parse_from(["khist", "-k", "21", "--format", "json", "-q", "genome.fa"])
                .unwrap();
        assert_eq!(args.k, 21);
        assert_eq!(args.path, Some(PathBuf::from("genome.fa")));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.quiet);
    }

    #[test]
    fn long_kmer_len_flag() {
        let args = Args::try_parse_from(["khist", "--kmer-len", "5", "-"]).unwrap();
        assert_eq!(args.k, 5);
        assert_eq!(args.path, Some(PathBuf::from("-")));
    }

    #[test]
    fn rejects_out_of_range_k() {
        assert!(Args::try_parse_from(["khist", "-k", "0"]).is_err());
        assert!(Args::try_parse_from(["khist", "-k", "33"]).is_err());
        assert!(Args::try_parse_from(["khist", "-k", "abc"]).is_err());
    }

    #[test]
    fn parse_k_messages() {
        assert_eq!(parse_k("abc"), Err("'abc' is not a valid number".to_string()));
        assert_eq!(
            parse_k("40"),
            Err("k-mer length 40 is out of range: must be between 1 and 32".to_string())
        );
        assert_eq!(parse_k("32"), Ok(32));
    }
}
