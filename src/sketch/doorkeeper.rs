use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BuildError;
use crate::hash::Hashes;
use crate::sketch::alloc_words;

const WORD_BITS: usize = u64::BITS as usize;

/// A membership filter marking "seen at least once since the last reset".
///
/// **Role**: before the frequency sketch is charged for an access, the
/// doorkeeper checks whether this id has already been sighted in the
/// current window.  A first sighting only sets doorkeeper bits; the sketch
/// is untouched.  Items accessed exactly once (the bulk of scan traffic)
/// therefore never consume sketch counter range.
///
/// **Implementation**: a word-packed bit vector of `AtomicU64`.  Each of
/// the k probe values addresses one bit, modulo the configured width, so
/// every index is always valid.  Bits are set with `fetch_or` and read
/// with relaxed loads; there is no lock.  `clear` is a plain per-word
/// store racing any concurrent `add`; a bit lost to that race costs one
/// extra doorkeeper pass for the affected id in the next window.
///
/// No false negatives; false positives bounded by the filter load.
#[derive(Debug)]
pub(crate) struct Doorkeeper {
    words: Vec<AtomicU64>,
    /// Total number of bits; every probe is taken modulo this.
    num_bits: usize,
    hash_count: usize,
}

impl Doorkeeper {
    /// `num_bits` and `hash_count` are validated by the builder before this
    /// is called; allocation is the only failure left.
    pub(crate) fn new(num_bits: usize, hash_count: usize) -> Result<Self, BuildError> {
        debug_assert!(num_bits > 0 && hash_count > 0);
        let num_words = (num_bits + WORD_BITS - 1) / WORD_BITS;
        Ok(Doorkeeper {
            words: alloc_words(num_words)?,
            num_bits,
            hash_count,
        })
    }

    #[inline]
    fn locate(&self, probe: u32) -> (usize, u32) {
        let bit = probe as usize % self.num_bits;
        (bit / WORD_BITS, (bit % WORD_BITS) as u32)
    }

    /// Returns `true` if the id behind `hashes` has (probably) been
    /// recorded since the last clear.
    #[inline]
    pub(crate) fn contains(&self, hashes: &Hashes) -> bool {
        (0..self.hash_count).all(|i| {
            let (word, bit) = self.locate(hashes.get(i));
            self.words[word].load(Ordering::Relaxed) >> bit & 1 == 1
        })
    }

    /// Records the id behind `hashes`.  Set-union semantics: redundant
    /// calls are harmless.
    #[inline]
    pub(crate) fn add(&self, hashes: &Hashes) {
        for i in 0..self.hash_count {
            let (word, bit) = self.locate(hashes.get(i));
            self.words[word].fetch_or(1u64 << bit, Ordering::Relaxed);
        }
    }

    /// Resets every bit.  Called only by the decay pass, so "first seen"
    /// information never outlives the halved sketch counters.
    pub(crate) fn clear(&self) {
        for word in &self.words {
            word.store(0, Ordering::Relaxed);
        }
    }
}
