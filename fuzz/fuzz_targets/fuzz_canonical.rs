//! Fuzz target for canonical k-mer computation.
//!
//! Checks, for arbitrary windows of up to 32 bytes:
//! 1. `Kmer::from_sub` either packs the window or reports an invalid base
//! 2. packed and byte-string canonical forms agree
//! 3. a k-mer and its reverse complement share one canonical form

#![no_main]

use khist::kmer::{canonical, reverse_complement, Kmer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 32 {
        return;
    }

    let kmer = match Kmer::from_sub(data) {
        Ok(kmer) => kmer,
        Err(_) => {
            assert!(
                canonical(data).is_none(),
                "rejected window has a canonical form"
            );
            return;
        }
    };

    assert_eq!(kmer.to_bytes().as_ref(), data);

    let packed = kmer.canonical();
    let bytes = canonical(data).expect("accepted window has no canonical form");
    assert_eq!(packed.to_bytes().as_ref(), bytes.as_slice());

    // Idempotent
    assert_eq!(packed.canonical(), packed);

    let rc = reverse_complement(data);
    let rc_kmer = Kmer::from_sub(&rc).expect("reverse complement is valid DNA");
    assert_eq!(rc_kmer.canonical(), packed);

    assert!(bytes.as_slice() <= data);
    assert!(bytes.as_slice() <= rc.as_slice());
});
