//! Fuzz target for the record reader and the rolling k-mer extractor.
//!
//! Feeds arbitrary bytes through the whole counting path and checks that
//! the rolling extractor agrees with naive window-by-window canonicalization.

#![no_main]

use khist::histogram::Histogram;
use khist::kmer::{canonical, canonical_kmers, unpack_to_bytes, KmerLength};
use khist::reader::RecordReader;
use khist::run::count_reader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let k = match KmerLength::new(usize::from(first % 32) + 1) {
        Ok(k) => k,
        Err(_) => return,
    };

    for record in RecordReader::new(rest) {
        let seq = record.expect("in-memory reads never fail");
        assert!(!seq.contains(&b'\n'));

        let rolled: Vec<_> = canonical_kmers(&seq, k)
            .map(|bits| unpack_to_bytes(bits, k).to_vec())
            .collect();
        let naive: Vec<_> = seq.windows(k.get()).filter_map(canonical).collect();
        assert_eq!(rolled, naive);
    }

    let counts = count_reader(rest, k).expect("in-memory reads never fail");
    let histogram = Histogram::from_counts(&counts);
    assert_eq!(histogram.distinct_kmers(), counts.len() as u64);
});
