//! Canonical k-mer count map.
//!
//! [`KmerCounts`] is the single accumulator of a counting run. It is owned by
//! the caller and grows monotonically: keys are packed canonical k-mers, and
//! counts only ever increment.

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use crate::kmer::{canonical_kmers, unpack_to_string, Kmer, KmerLength};

/// Exact occurrence counts of canonical k-mers.
///
/// # Example
///
/// ```rust
/// use khist::counts::KmerCounts;
/// use khist::kmer::KmerLength;
///
/// let mut counts = KmerCounts::new(KmerLength::new(2)?);
/// counts.add_sequence(b"ACGT");
///
/// assert_eq!(counts.get("AC"), 2);
/// assert_eq!(counts.get("GT"), 2); // same canonical k-mer as AC
/// assert_eq!(counts.get("CG"), 1);
/// assert_eq!(counts.len(), 2);
/// # Ok::<(), khist::error::KmerLengthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KmerCounts {
    k: KmerLength,
    counts: FxHashMap<u64, u64>,
    sequences: u64,
}

impl KmerCounts {
    /// Creates an empty map for k-mers of length `k`.
    #[must_use]
    pub fn new(k: KmerLength) -> Self {
        Self {
            k,
            counts: FxHashMap::default(),
            sequences: 0,
        }
    }

    /// The k-mer length this map counts.
    #[must_use]
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Counts every canonical k-mer of `seq`.
    ///
    /// Windows with an ambiguous base are skipped; a sequence shorter than
    /// `k` adds nothing but is still tallied in [`Self::sequences`]. Returns
    /// the number of k-mers counted.
    pub fn add_sequence(&mut self, seq: &[u8]) -> u64 {
        self.sequences += 1;
        let mut added = 0;
        for canonical in canonical_kmers(seq, self.k) {
            self.increment(canonical);
            added += 1;
        }
        added
    }

    /// Adds one observation of a packed canonical k-mer.
    pub fn increment(&mut self, canonical: u64) {
        *self.counts.entry(canonical).or_insert(0) += 1;
    }

    /// Number of distinct canonical k-mers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of sequences passed to [`Self::add_sequence`].
    #[must_use]
    pub const fn sequences(&self) -> u64 {
        self.sequences
    }

    /// Sum of all counts, i.e. the number of valid windows seen.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Count of `kmer` in either orientation. Zero if `kmer` has the wrong
    /// length or an ambiguous base.
    #[must_use]
    pub fn get(&self, kmer: &str) -> u64 {
        match Kmer::from_sub(kmer.as_bytes()) {
            Ok(kmer) if kmer.k() == self.k => self.get_packed(kmer.canonical().packed_bits()),
            _ => 0,
        }
    }

    /// Count of a packed canonical k-mer.
    #[must_use]
    pub fn get_packed(&self, canonical: u64) -> u64 {
        self.counts.get(&canonical).copied().unwrap_or(0)
    }

    /// Iterates the counts alone.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.values().copied()
    }

    /// Unpacks the keys into strings.
    #[must_use]
    pub fn into_strings(self) -> HashMap<String, u64> {
        let k = self.k;
        self.counts
            .into_iter()
            .map(|(bits, count)| (unpack_to_string(bits, k), count))
            .collect()
    }
}
