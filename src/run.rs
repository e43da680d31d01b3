//! K-mer counting pipeline and output.
//!
//! The pipeline is strictly sequential: records are read one at a time,
//! their canonical k-mers are folded into a single [`KmerCounts`] owned here,
//! and once the input is exhausted the counts are turned into a
//! [`Histogram`] and written out.

use std::io::{self, stdout, BufRead, BufWriter, Write};

use serde::Serialize;

use crate::{
    cli::OutputFormat,
    config::Config,
    counts::KmerCounts,
    error::KhistError,
    histogram::{Histogram, HistogramStats},
    input::Input,
    kmer::KmerLength,
    reader::RecordReader,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// A histogram row, used for JSON serialization.
#[derive(Serialize)]
struct HistogramRow {
    count: usize,
    kmers: u64,
}

/// The JSON output document.
#[derive(Serialize)]
struct HistogramReport {
    k: usize,
    stats: HistogramStats,
    histogram: Vec<HistogramRow>,
}

/// What a run consumed, for the closing message on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records read from the input.
    pub sequences: u64,
    /// Distinct canonical k-mers counted.
    pub distinct_kmers: u64,
}

impl RunSummary {
    fn from_counts(counts: &KmerCounts) -> Self {
        Self {
            sequences: counts.sequences(),
            distinct_kmers: counts.len() as u64,
        }
    }
}

/// Counts k-mers from `config.input` and writes the histogram to stdout.
///
/// A reader that stops early (`khist | head`) ends the run normally.
///
/// # Errors
///
/// Returns [`KhistError`] if the input cannot be opened or read, or if
/// output cannot be written.
pub fn run(config: &Config) -> Result<RunSummary, KhistError> {
    let counts = count_input(&config.input, config.k)?;
    let histogram = Histogram::from_counts(&counts);

    emit(stdout().lock(), &histogram, config.k, config.format)?;
    Ok(RunSummary::from_counts(&counts))
}

/// Writes and flushes the histogram, treating a closed pipe as the end.
fn emit<W: Write>(
    writer: W,
    histogram: &Histogram,
    k: KmerLength,
    format: OutputFormat,
) -> Result<(), KhistError> {
    let mut buf = BufWriter::new(writer);
    let written = write_histogram(&mut buf, histogram, k, format)
        .and_then(|()| buf.flush().map_err(KhistError::from));

    match written {
        Err(e) if is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

fn is_broken_pipe(err: &KhistError) -> bool {
    match err {
        KhistError::WriteError { source } => source.kind() == io::ErrorKind::BrokenPipe,
        KhistError::JsonError { source } => {
            source.io_error_kind() == Some(io::ErrorKind::BrokenPipe)
        }
        _ => false,
    }
}

/// Counts canonical k-mers from a file or stdin.
///
/// # Errors
///
/// Returns [`KhistError::InputOpen`] or [`KhistError::InputRead`] on I/O
/// failure.
pub fn count_input(input: &Input, k: KmerLength) -> Result<KmerCounts, KhistError> {
    #[cfg(feature = "tracing")]
    info!(k = k.get(), input = %input, "Starting k-mer counting");

    let reader = input.open()?;
    count_records(RecordReader::with_input(reader, input.clone()), k)
}

/// Counts canonical k-mers from any buffered reader.
///
/// # Example
///
/// ```rust
/// use khist::kmer::KmerLength;
/// use khist::run::count_reader;
///
/// let counts = count_reader(&b">seq1\nACGT\n"[..], KmerLength::new(2)?)?;
/// assert_eq!(counts.get("AC"), 2);
/// assert_eq!(counts.get("CG"), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`KhistError::InputRead`] if reading fails.
pub fn count_reader<R: BufRead>(reader: R, k: KmerLength) -> Result<KmerCounts, KhistError> {
    count_records(RecordReader::new(reader), k)
}

/// Builds the histogram for everything readable from `reader`.
///
/// # Errors
///
/// Returns [`KhistError::InputRead`] if reading fails.
pub fn histogram_from_reader<R: BufRead>(
    reader: R,
    k: KmerLength,
) -> Result<Histogram, KhistError> {
    let counts = count_reader(reader, k)?;
    Ok(Histogram::from_counts(&counts))
}

fn count_records<R: BufRead>(
    mut records: RecordReader<R>,
    k: KmerLength,
) -> Result<KmerCounts, KhistError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("count_kmers", k = k.get()).entered();

    let mut counts = KmerCounts::new(k);
    for record in records.by_ref() {
        counts.add_sequence(&record?);
    }

    #[cfg(feature = "tracing")]
    {
        debug!(
            records = records.records_read(),
            windows = counts.total(),
            "Read all records"
        );
        info!(unique_kmers = counts.len(), "K-mer counting complete");
    }

    Ok(counts)
}

/// Writes `histogram` in the requested format.
///
/// # Errors
///
/// Returns [`KhistError::WriteError`] or [`KhistError::JsonError`].
pub fn write_histogram<W: Write>(
    mut writer: W,
    histogram: &Histogram,
    k: KmerLength,
    format: OutputFormat,
) -> Result<(), KhistError> {
    match format {
        OutputFormat::Tsv => histogram.write_tsv(&mut writer)?,
        OutputFormat::Json => {
            let report = HistogramReport {
                k: k.get(),
                stats: histogram.stats(),
                histogram: histogram
                    .rows()
                    .map(|(count, kmers)| HistogramRow { count, kmers })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
