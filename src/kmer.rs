//! K-mer extraction, packing and canonicalization.
//!
//! K-mers of length `1..=32` are stored 2-bit packed in a `u64`
//! (`A=0`, `C=1`, `G=2`, `T=3`). The code preserves the byte order
//! `A < C < G < T`, so for two k-mers of equal length comparing the packed
//! integers gives the same answer as comparing the strings byte-wise. That is
//! what lets [`Kmer::canonical`] and [`CanonicalKmers`] pick the
//! lexicographically smaller strand with a single integer `min`.
//!
//! # Example
//!
//! ```rust
//! use khist::kmer::{canonical_kmers, unpack_to_string, KmerLength};
//!
//! let k = KmerLength::new(2)?;
//! let kmers: Vec<String> = canonical_kmers(b"ACGT", k)
//!     .map(|bits| unpack_to_string(bits, k))
//!     .collect();
//!
//! assert_eq!(kmers, ["AC", "CG", "AC"]);
//! # Ok::<(), khist::error::KmerLengthError>(())
//! ```

use std::fmt;

use bytes::Bytes;

use crate::error::{InvalidBaseError, KhistError, KmerLengthError};

/// Smallest supported k-mer length.
pub const MIN_K: u8 = 1;

/// Largest supported k-mer length (2 bits per base in a `u64`).
pub const MAX_K: u8 = 32;

/// K-mer length used when none is given.
pub const DEFAULT_K: usize = 31;

/// Sentinel in [`NT4`] for anything that is not `A`, `C`, `G` or `T`.
const AMBIGUOUS: u8 = 4;

/// Byte to 2-bit code. Records are upper-cased by the reader, so only the
/// uppercase bases are mapped; `N` and everything else is ambiguous.
const NT4: [u8; 256] = {
    let mut table = [AMBIGUOUS; 256];
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'T' as usize] = 3;
    table
};

/// A validated k-mer length in `1..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Validates `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is 0 or greater than 32.
    ///
    /// # Example
    ///
    /// ```rust
    /// use khist::kmer::KmerLength;
    ///
    /// assert_eq!(KmerLength::new(31).unwrap().get(), 31);
    /// assert!(KmerLength::new(0).is_err());
    /// assert!(KmerLength::new(33).is_err());
    /// ```
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < MIN_K as usize || k > MAX_K as usize {
            return Err(KmerLengthError {
                k,
                min: MIN_K,
                max: MAX_K,
            });
        }
        Ok(Self(k))
    }

    /// Returns the length as a `usize`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Mask covering the low `2k` bits.
    const fn mask(self) -> u64 {
        if self.0 == MAX_K as usize {
            u64::MAX
        } else {
            (1u64 << (2 * self.0)) - 1
        }
    }

    /// Bit offset of the first base of a packed k-mer.
    const fn top_shift(self) -> u32 {
        2 * (self.0 as u32 - 1)
    }
}

impl Default for KmerLength {
    fn default() -> Self {
        Self(DEFAULT_K)
    }
}

impl fmt::Display for KmerLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

/// A single nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Monomer {
    A,
    C,
    G,
    T,
}

impl TryFrom<u8> for Monomer {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match NT4[byte as usize] {
            AMBIGUOUS => Err(byte),
            code => Ok(Self::from(u64::from(code))),
        }
    }
}

impl From<u64> for Monomer {
    fn from(code: u64) -> Self {
        match code & 3 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }
}

impl From<Monomer> for u64 {
    fn from(m: Monomer) -> u64 {
        match m {
            Monomer::A => 0,
            Monomer::C => 1,
            Monomer::G => 2,
            Monomer::T => 3,
        }
    }
}

impl Monomer {
    const fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::T => Self::A,
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// A packed k-mer over `{A, C, G, T}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Kmer {
    packed_bits: u64,
    k: KmerLength,
}

impl Kmer {
    /// Packs a window of bases. The k-mer length is the window length.
    ///
    /// # Errors
    ///
    /// Returns [`KhistError::InvalidKmerLength`] if the window is empty or
    /// longer than 32, and [`KhistError::InvalidBase`] for the last byte in
    /// the window that is not `A`, `C`, `G` or `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use khist::kmer::Kmer;
    ///
    /// let kmer = Kmer::from_sub(b"GATTACA")?;
    /// assert_eq!(kmer.to_string(), "GATTACA");
    /// assert!(Kmer::from_sub(b"GANTACA").is_err());
    /// # Ok::<(), khist::error::KhistError>(())
    /// ```
    pub fn from_sub(sub: &[u8]) -> Result<Self, KhistError> {
        let k = KmerLength::new(sub.len())?;

        if let Some(position) = sub.iter().rposition(|&b| NT4[b as usize] == AMBIGUOUS) {
            return Err(InvalidBaseError {
                base: sub[position],
                position,
            }
            .into());
        }

        let packed_bits = sub
            .iter()
            .fold(0u64, |bits, &b| (bits << 2) | u64::from(NT4[b as usize]));

        Ok(Self { packed_bits, k })
    }

    /// The 2-bit packed representation.
    #[must_use]
    pub const fn packed_bits(&self) -> u64 {
        self.packed_bits
    }

    /// The k-mer length.
    #[must_use]
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Complements every base and reverses the order.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        let mut bits = self.packed_bits;
        let mut rc = 0u64;
        for _ in 0..self.k.get() {
            let base = Monomer::from(bits).complement();
            rc = (rc << 2) | u64::from(base);
            bits >>= 2;
        }
        Self {
            packed_bits: rc,
            k: self.k,
        }
    }

    /// The lexicographically smaller of this k-mer and its reverse complement.
    ///
    /// # Example
    ///
    /// ```rust
    /// use khist::kmer::Kmer;
    ///
    /// let fwd = Kmer::from_sub(b"GT")?;
    /// assert_eq!(fwd.canonical().to_string(), "AC");
    ///
    /// // Palindromes are their own canonical form.
    /// let pal = Kmer::from_sub(b"CG")?;
    /// assert_eq!(pal.canonical(), pal);
    /// # Ok::<(), khist::error::KhistError>(())
    /// ```
    #[must_use]
    pub fn canonical(&self) -> Self {
        let rc = self.reverse_complement();
        if rc.packed_bits < self.packed_bits {
            rc
        } else {
            *self
        }
    }

    /// Unpacks into ASCII bases.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        unpack_to_bytes(self.packed_bits, self.k)
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&unpack_to_string(self.packed_bits, self.k))
    }
}

/// Unpacks `k` bases from packed bits into ASCII.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn unpack_to_bytes(packed_bits: u64, k: KmerLength) -> Bytes {
    let top = k.top_shift();
    (0..k.get() as u32)
        .map(|i| Monomer::from(packed_bits >> (top - 2 * i)).into_u8())
        .collect::<Vec<u8>>()
        .into()
}

/// Unpacks `k` bases from packed bits into a `String`.
#[must_use]
pub fn unpack_to_string(packed_bits: u64, k: KmerLength) -> String {
    unpack_to_bytes(packed_bits, k)
        .iter()
        .map(|&b| b as char)
        .collect()
}

/// Reverse complement of an ASCII sequence.
///
/// `A`, `C`, `G` and `T` are complemented; every other byte is kept as is
/// before the whole sequence is reversed.
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match Monomer::try_from(b) {
            Ok(m) => m.complement().into_u8(),
            Err(other) => other,
        })
        .collect()
}

/// Canonical form of an ASCII k-mer, or `None` if it contains an ambiguous
/// base.
///
/// ```rust
/// use khist::kmer::canonical;
///
/// assert_eq!(canonical(b"GT").as_deref(), Some(&b"AC"[..]));
/// assert_eq!(canonical(b"GN"), None);
/// ```
#[must_use]
pub fn canonical(kmer: &[u8]) -> Option<Vec<u8>> {
    if kmer.iter().any(|&b| NT4[b as usize] == AMBIGUOUS) {
        return None;
    }
    let rc = reverse_complement(kmer);
    if rc.as_slice() < kmer {
        Some(rc)
    } else {
        Some(kmer.to_vec())
    }
}

/// Iterates the canonical k-mers of `seq`, one per valid window.
pub fn canonical_kmers(seq: &[u8], k: KmerLength) -> CanonicalKmers<'_> {
    CanonicalKmers::new(seq, k)
}

/// Sliding-window iterator yielding packed canonical k-mers.
///
/// The forward and reverse-complement codes are rolled one base at a time.
/// An ambiguous byte restarts the run, so no window covering it is ever
/// yielded.
#[derive(Debug, Clone)]
pub struct CanonicalKmers<'a> {
    seq: &'a [u8],
    pos: usize,
    k: usize,
    mask: u64,
    shift: u32,
    forward: u64,
    reverse: u64,
    run: usize,
}

impl<'a> CanonicalKmers<'a> {
    /// Creates the iterator. Sequences shorter than `k` yield nothing.
    #[must_use]
    pub fn new(seq: &'a [u8], k: KmerLength) -> Self {
        Self {
            seq,
            pos: 0,
            k: k.get(),
            mask: k.mask(),
            shift: k.top_shift(),
            forward: 0,
            reverse: 0,
            run: 0,
        }
    }
}

impl Iterator for CanonicalKmers<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while let Some(&byte) = self.seq.get(self.pos) {
            self.pos += 1;
            let code = NT4[byte as usize];
            if code == AMBIGUOUS {
                self.run = 0;
                self.forward = 0;
                self.reverse = 0;
                continue;
            }
            let code = u64::from(code);
            self.forward = ((self.forward << 2) | code) & self.mask;
            self.reverse = (self.reverse >> 2) | ((3 - code) << self.shift);
            self.run += 1;
            if self.run >= self.k {
                return Some(self.forward.min(self.reverse));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len() - self.pos;
        let pending = (self.k - 1).saturating_sub(self.run);
        (0, Some(remaining.saturating_sub(pending)))
    }
}

impl std::iter::FusedIterator for CanonicalKmers<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn k(k: usize) -> KmerLength {
        KmerLength::new(k).unwrap()
    }

    fn canonical_strings(seq: &[u8], len: usize) -> Vec<String> {
        canonical_kmers(seq, k(len))
            .map(|bits| unpack_to_string(bits, k(len)))
            .collect()
    }

    #[test]
    fn kmer_length_bounds() {
        assert!(KmerLength::new(0).is_err());
        assert!(KmerLength::new(1).is_ok());
        assert!(KmerLength::new(32).is_ok());
        assert_eq!(
            KmerLength::new(33),
            Err(KmerLengthError {
                k: 33,
                min: 1,
                max: 32
            })
        );
        assert_eq!(KmerLength::default().get(), 31);
    }

    #[test]
    fn from_valid_substring() {
        let kmer = Kmer::from_sub(b"GATTACA").unwrap();
        insta::assert_snapshot!(kmer.to_string(), @"GATTACA");
        assert_eq!(kmer.k().get(), 7);
    }

    #[test]
    fn from_sub_reports_last_invalid_base() {
        let err = Kmer::from_sub(b"NACNG").unwrap_err();
        assert!(matches!(
            err,
            KhistError::InvalidBase {
                base: b'N',
                position: 3
            }
        ));

        let err = Kmer::from_sub(b"ACGTX").unwrap_err();
        assert!(matches!(
            err,
            KhistError::InvalidBase {
                base: b'X',
                position: 4
            }
        ));
    }

    #[test]
    fn from_sub_rejects_lowercase() {
        assert!(Kmer::from_sub(b"acgt").is_err());
    }

    #[test]
    fn from_sub_rejects_bad_length() {
        assert!(matches!(
            Kmer::from_sub(b""),
            Err(KhistError::InvalidKmerLength { k: 0, .. })
        ));
        let long = [b'A'; 33];
        assert!(matches!(
            Kmer::from_sub(&long),
            Err(KhistError::InvalidKmerLength { k: 33, .. })
        ));
    }

    #[test]
    fn packing_order_matches_byte_order() {
        let ac = Kmer::from_sub(b"AC").unwrap();
        let ca = Kmer::from_sub(b"CA").unwrap();
        let tt = Kmer::from_sub(b"TT").unwrap();
        assert!(ac.packed_bits() < ca.packed_bits());
        assert!(ca.packed_bits() < tt.packed_bits());
        assert_eq!(tt.packed_bits(), 0b1111);
    }

    #[test]
    fn reverse_complement_packed() {
        let kmer = Kmer::from_sub(b"AACGT").unwrap();
        assert_eq!(kmer.reverse_complement().to_string(), "ACGTT");
        assert_eq!(kmer.reverse_complement().reverse_complement(), kmer);
    }

    #[test]
    fn reverse_complement_full_width() {
        let seq = b"ACGTACGTACGTACGTACGTACGTACGTAAAA";
        let kmer = Kmer::from_sub(seq).unwrap();
        let rc = kmer.reverse_complement();
        assert_eq!(rc.to_bytes().as_ref(), reverse_complement(seq).as_slice());
    }

    #[test]
    fn reverse_complement_bytes_keeps_other_symbols() {
        assert_eq!(reverse_complement(b"ACGN"), b"NCGT");
        assert_eq!(reverse_complement(b""), b"");
    }

    #[test]
    fn canonical_picks_smaller_strand() {
        assert_eq!(Kmer::from_sub(b"GT").unwrap().canonical().to_string(), "AC");
        assert_eq!(Kmer::from_sub(b"AC").unwrap().canonical().to_string(), "AC");
        assert_eq!(Kmer::from_sub(b"TTT").unwrap().canonical().to_string(), "AAA");
    }

    #[test]
    fn palindrome_is_its_own_canonical() {
        let kmer = Kmer::from_sub(b"ACGT").unwrap();
        assert_eq!(kmer.reverse_complement(), kmer);
        assert_eq!(kmer.canonical(), kmer);
    }

    #[test]
    fn canonical_bytes() {
        assert_eq!(canonical(b"CGT"), Some(b"ACG".to_vec()));
        assert_eq!(canonical(b"ACG"), Some(b"ACG".to_vec()));
        assert_eq!(canonical(b"ANG"), None);
    }

    #[test]
    fn sliding_windows_basic() {
        assert_eq!(canonical_strings(b"ACGT", 2), ["AC", "CG", "AC"]);
    }

    #[test]
    fn sliding_windows_skip_ambiguous() {
        assert_eq!(canonical_strings(b"ACGN", 2), ["AC", "CG"]);
        assert_eq!(canonical_strings(b"ANCGNT", 2), ["CG"]);
        assert!(canonical_strings(b"NNNN", 2).is_empty());
    }

    #[test]
    fn sliding_windows_treat_other_symbols_as_ambiguous() {
        assert_eq!(canonical_strings(b"ACXGT", 2), ["AC", "AC"]);
    }

    #[test]
    fn sliding_windows_short_sequence() {
        assert!(canonical_strings(b"ACGTA", 31).is_empty());
        assert!(canonical_strings(b"", 1).is_empty());
    }

    #[test]
    fn sliding_windows_restart_after_ambiguous() {
        // A run of exactly k valid bases after an N yields one window.
        assert_eq!(canonical_strings(b"AAANCCC", 3), ["AAA", "CCC"]);
    }

    #[test]
    fn sliding_windows_full_width() {
        let seq = b"ACGTACGTACGTACGTACGTACGTACGTACGTT";
        let got: Vec<u64> = canonical_kmers(seq, k(32)).collect();
        let want: Vec<u64> = seq
            .windows(32)
            .map(|w| Kmer::from_sub(w).unwrap().canonical().packed_bits())
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn sliding_windows_match_naive_extraction() {
        let seq = b"GATTACANNACGTTGCAXTTTTGGGCCCAAATN";
        for len in 1..=8 {
            let got: Vec<u64> = canonical_kmers(seq, k(len)).collect();
            let want: Vec<u64> = seq
                .windows(len)
                .filter_map(|w| Kmer::from_sub(w).ok())
                .map(|kmer| kmer.canonical().packed_bits())
                .collect();
            assert_eq!(got, want, "k = {len}");
        }
    }

    #[test]
    fn size_hint_upper_bound_holds() {
        let seq = b"ACGTNACGTACGT";
        for len in 1..=6 {
            let mut iter = canonical_kmers(seq, k(len));
            loop {
                let (_, upper) = iter.size_hint();
                let remaining = iter.clone().count();
                assert!(remaining <= upper.unwrap(), "k = {len}");
                if iter.next().is_none() {
                    break;
                }
            }
        }
    }
}
