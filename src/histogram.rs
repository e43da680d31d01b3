//! K-mer frequency histogram computation.
//!
//! A histogram (count of counts) records, for every occurrence count `c` in
//! `1..=255`, how many distinct canonical k-mers were seen exactly `c` times.
//! Counts above [`MAX_COUNT`] saturate into the last slot, so slot 255 means
//! "255 or more". Slot 0 exists only so counts index directly and is always
//! zero.
//!
//! # Example
//!
//! ```rust
//! use khist::counts::KmerCounts;
//! use khist::histogram::Histogram;
//! use khist::kmer::KmerLength;
//!
//! let mut counts = KmerCounts::new(KmerLength::new(2)?);
//! counts.add_sequence(b"ACGT");
//!
//! let histogram = Histogram::from_counts(&counts);
//!
//! // CG appears once, AC (with its reverse complement GT) twice
//! assert_eq!(histogram.get(1), 1);
//! assert_eq!(histogram.get(2), 1);
//! assert_eq!(histogram.distinct_kmers(), counts.len() as u64);
//! # Ok::<(), khist::error::KmerLengthError>(())
//! ```

use std::io::{self, Write};

use serde::Serialize;

use crate::counts::KmerCounts;

/// Highest count with its own slot; larger counts are clamped to it.
pub const MAX_COUNT: usize = 255;

/// Number of slots, including the unused slot 0.
pub const NUM_SLOTS: usize = MAX_COUNT + 1;

/// Count-of-counts over `1..=MAX_COUNT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    slots: [u64; NUM_SLOTS],
}

/// Summary statistics for a k-mer histogram.
///
/// - `distinct_kmers`: number of distinct canonical k-mers
/// - `saturated_kmers`: k-mers counted [`MAX_COUNT`] times or more
/// - `mode_count`: the count shared by the most k-mers
/// - `mode_frequency`: how many k-mers have the mode count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramStats {
    /// Number of distinct canonical k-mers.
    pub distinct_kmers: u64,
    /// Number of k-mers in the saturated slot.
    pub saturated_kmers: u64,
    /// The count value that appears most frequently. Ties go to the larger
    /// count.
    pub mode_count: u64,
    /// Number of k-mers that have the mode count.
    pub mode_frequency: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// An all-zero histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; NUM_SLOTS],
        }
    }

    /// Builds the histogram from a finished count map in a single pass.
    #[must_use]
    pub fn from_counts(counts: &KmerCounts) -> Self {
        counts.values().collect()
    }

    /// Records one distinct k-mer seen `count` times.
    ///
    /// A zero count is not an observation and is ignored.
    pub fn record(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        let slot = usize::try_from(count).map_or(MAX_COUNT, |c| c.min(MAX_COUNT));
        self.slots[slot] += 1;
    }

    /// Number of distinct k-mers in slot `count`. Zero outside `1..=255`.
    #[must_use]
    pub fn get(&self, count: usize) -> u64 {
        match count {
            1..=MAX_COUNT => self.slots[count],
            _ => 0,
        }
    }

    /// `(count, distinct k-mers)` for every count in `1..=255`, ascending,
    /// zero rows included.
    pub fn rows(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        (1..=MAX_COUNT).map(move |count| (count, self.slots[count]))
    }

    /// Sum over all slots, which equals the number of distinct k-mers.
    #[must_use]
    pub fn distinct_kmers(&self) -> u64 {
        self.slots.iter().sum()
    }

    /// Computes summary statistics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use khist::histogram::Histogram;
    ///
    /// let histogram: Histogram = [1, 1, 2, 2, 2, 300].into_iter().collect();
    /// let stats = histogram.stats();
    ///
    /// assert_eq!(stats.distinct_kmers, 6);
    /// assert_eq!(stats.saturated_kmers, 1);
    /// assert_eq!(stats.mode_count, 2);
    /// assert_eq!(stats.mode_frequency, 3);
    /// ```
    #[must_use]
    pub fn stats(&self) -> HistogramStats {
        let (mode_count, mode_frequency) = self
            .rows()
            .filter(|&(_, freq)| freq > 0)
            .max_by_key(|&(_, freq)| freq)
            .map_or((0, 0), |(count, freq)| (count as u64, freq));

        HistogramStats {
            distinct_kmers: self.distinct_kmers(),
            saturated_kmers: self.slots[MAX_COUNT],
            mode_count,
            mode_frequency,
        }
    }

    /// Writes all 255 rows as `count\tkmers\n`.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (count, kmers) in self.rows() {
            writeln!(writer, "{count}\t{kmers}")?;
        }
        Ok(())
    }
}

impl FromIterator<u64> for Histogram {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for count in iter {
            histogram.record(count);
        }
        histogram
    }
}
