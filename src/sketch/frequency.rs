use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BuildError;
use crate::hash::{Hashes, MAX_HASH_COUNT};
use crate::sketch::alloc_words;

const WORD_BITS: u32 = u64::BITS;

/// Approximate frequency counter: a Count-Min sketch over packed saturating
/// lanes, with conservative updates.
///
/// Each `AtomicU64` word holds `64 / counter_bits` counter lanes.  The k
/// probe values address k lanes (modulo the counter count); `estimate`
/// returns their minimum, `add` raises only the lanes lagging behind the
/// new minimum.  Conservative updates limit the overcounting that plain
/// increment-all-k suffers under hash collisions.
///
/// Lanes saturate at `counter_max` and are never incremented past it.
/// `reset` halves every lane, implementing exponential decay of history
/// while approximately preserving the relative order of hot and cold items.
///
/// All lane updates are relaxed atomics; the read-minimum-then-increment
/// sequence in `add` is not atomic as a whole.  Interleaved writers can
/// make a lane gain more or fewer increments than a serial execution
/// would, including, rarely, a carry into the adjacent lane when two
/// threads race a lane sitting one below the ceiling.  The contract is an
/// estimate, and the decay pass bounds how long any such distortion lives.
#[derive(Debug)]
pub(crate) struct FrequencySketch {
    words: Vec<AtomicU64>,
    /// Number of counter lanes; every probe is taken modulo this.
    num_counters: usize,
    counter_bits: u32,
    lanes_per_word: usize,
    /// All-ones lane: both the extraction mask and the saturation ceiling.
    lane_mask: u64,
    /// Clears the top bit of every lane so a whole-word right shift halves
    /// each lane without bleeding into its neighbour.
    halving_mask: u64,
    hash_count: usize,
}

impl FrequencySketch {
    /// `num_counters`, `counter_bits` (1..=32, dividing 64) and
    /// `hash_count` are validated by the builder; allocation is the only
    /// failure left.
    pub(crate) fn new(
        num_counters: usize,
        counter_bits: u32,
        hash_count: usize,
    ) -> Result<Self, BuildError> {
        debug_assert!(num_counters > 0);
        debug_assert!((1..=32).contains(&counter_bits) && WORD_BITS % counter_bits == 0);
        debug_assert!((1..=MAX_HASH_COUNT).contains(&hash_count));

        let lanes_per_word = (WORD_BITS / counter_bits) as usize;
        let num_words = (num_counters + lanes_per_word - 1) / lanes_per_word;
        let lane_mask = (1u64 << counter_bits) - 1;

        let mut halving_mask = 0u64;
        let mut shift = 0;
        while shift < WORD_BITS {
            halving_mask |= (lane_mask >> 1) << shift;
            shift += counter_bits;
        }

        Ok(FrequencySketch {
            words: alloc_words(num_words)?,
            num_counters,
            counter_bits,
            lanes_per_word,
            lane_mask,
            halving_mask,
            hash_count,
        })
    }

    /// Saturation ceiling of a single lane.
    #[inline]
    pub(crate) fn counter_max(&self) -> u32 {
        self.lane_mask as u32
    }

    /// Maps a probe value to `(word index, bit shift)` of its lane.
    #[inline]
    fn locate(&self, probe: u32) -> (usize, u32) {
        let idx = probe as usize % self.num_counters;
        (
            idx / self.lanes_per_word,
            (idx % self.lanes_per_word) as u32 * self.counter_bits,
        )
    }

    #[inline]
    fn lane(&self, word: usize, shift: u32) -> u32 {
        ((self.words[word].load(Ordering::Relaxed) >> shift) & self.lane_mask) as u32
    }

    /// Estimated count for the id behind `hashes`: the minimum of the k
    /// addressed lanes.  Never underestimates the recorded count (ignoring
    /// decay); may overestimate under collisions.
    #[inline]
    pub(crate) fn estimate(&self, hashes: &Hashes) -> u32 {
        let mut min = self.counter_max();
        for i in 0..self.hash_count {
            let (word, shift) = self.locate(hashes.get(i));
            min = min.min(self.lane(word, shift));
        }
        min
    }

    /// Conservative update: reads the k lanes, then raises only those
    /// strictly below `min + 1`, saturating at the ceiling.
    ///
    /// Returns `true` iff the resulting minimum sits at the ceiling, which
    /// the controller may use as a decay trigger.
    pub(crate) fn add(&self, hashes: &Hashes) -> bool {
        let mut slots = [(0usize, 0u32); MAX_HASH_COUNT];
        let mut lanes = [0u32; MAX_HASH_COUNT];
        let mut min = self.counter_max();
        for i in 0..self.hash_count {
            let slot = self.locate(hashes.get(i));
            let value = self.lane(slot.0, slot.1);
            slots[i] = slot;
            lanes[i] = value;
            min = min.min(value);
        }

        let new_min = min.saturating_add(1).min(self.counter_max());
        for i in 0..self.hash_count {
            if lanes[i] >= new_min {
                continue;
            }
            // Two probes may alias the same lane; raise it once.
            if slots[..i].contains(&slots[i]) {
                continue;
            }
            let (word, shift) = slots[i];
            self.words[word].fetch_add(1u64 << shift, Ordering::Relaxed);
        }

        new_min == self.counter_max()
    }

    /// Halves every lane: a whole-word right shift with each lane's top
    /// bit masked off beforehand, so no bit crosses a lane boundary.
    ///
    /// The sweep is unsynchronised; an increment racing it may be halved
    /// or lost for this cycle.
    pub(crate) fn reset(&self) {
        for word in &self.words {
            let value = word.load(Ordering::Relaxed);
            word.store((value >> 1) & self.halving_mask, Ordering::Relaxed);
        }
    }
}
