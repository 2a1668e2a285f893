use std::sync::atomic::{AtomicU64, Ordering};

use crate::builder::TinyLfuBuilder;
use crate::error::BuildError;
use crate::hash::Hashes;
use crate::sketch::{Doorkeeper, FrequencySketch};
use crate::stats::{Stats, StatsCounter};

// ---------------------------------------------------------------------------
// Sample budget
// ---------------------------------------------------------------------------

/// Total recorded accesses since the last decay pass.
///
/// Shared by every caller and bumped with a relaxed `fetch_add`; the
/// equality test in `record` hands the window crossing to exactly one
/// caller, so concurrent threads do not all claim the same decay.
#[derive(Debug)]
struct SampleBudget {
    samples: AtomicU64,
    sample_size: u64,
}

impl SampleBudget {
    fn new(sample_size: u64) -> Self {
        SampleBudget {
            samples: AtomicU64::new(0),
            sample_size,
        }
    }

    /// Counts one access; returns `true` when this call fills the window.
    #[inline]
    fn record(&self) -> bool {
        self.samples.fetch_add(1, Ordering::Relaxed) + 1 == self.sample_size
    }

    fn reset(&self) {
        self.samples.store(0, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// TinyLfu
// ---------------------------------------------------------------------------

/// A frequency-aware admission controller for a bounded cache.
///
/// The host cache keeps ownership of storage and of picking eviction
/// candidates; this controller only answers two questions: "how often was
/// this id accessed lately?" and "should this candidate displace that
/// victim?".  It tracks frequency approximately, in a fixed memory
/// footprint, through three cooperating pieces:
///
/// - a **doorkeeper** membership filter absorbing first sightings, so
///   one-hit wonders never consume sketch capacity;
/// - a **frequency sketch** of saturating counters with conservative
///   updates, estimating per-id access counts;
/// - a **sample budget** that triggers a periodic decay pass (halve the
///   sketch, clear the doorkeeper), bounding how long past popularity can
///   dominate admission decisions.
///
/// Every operation is `&self`, lock-free, and O(k) in the configured number
/// of hash functions; the controller is shared across threads as-is.  The
/// decay pass is the one O(width) operation and deliberately runs without
/// exclusion; concurrent callers may observe a partially decayed structure
/// for the remainder of that cycle, which the estimate contract absorbs.
///
/// # Example
/// ```
/// use doorman::TinyLfu;
///
/// let lfu = TinyLfu::with_capacity(10_000).unwrap();
/// for _ in 0..5 {
///     lfu.record_access(1);
/// }
/// lfu.record_access(2);
///
/// // A once-seen newcomer does not displace a hot incumbent,
/// assert!(!lfu.admit(2, Some(1)));
/// // but anything is admitted while the cache still has room.
/// assert!(lfu.admit(2, None));
/// ```
#[derive(Debug)]
pub struct TinyLfu {
    doorkeeper: Doorkeeper,
    sketch: FrequencySketch,
    budget: SampleBudget,
    decay_on_saturation: bool,
    stats: StatsCounter,
}

impl TinyLfu {
    /// Controller sized for a cache holding `capacity` items, using the
    /// default dimensioning of [`TinyLfuBuilder::for_capacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, BuildError> {
        TinyLfuBuilder::for_capacity(capacity).build()
    }

    /// Shorthand for [`TinyLfuBuilder::for_capacity`].
    pub fn builder(capacity: usize) -> TinyLfuBuilder {
        TinyLfuBuilder::for_capacity(capacity)
    }

    pub(crate) fn assemble(
        doorkeeper: Doorkeeper,
        sketch: FrequencySketch,
        sample_size: u64,
        decay_on_saturation: bool,
    ) -> Self {
        TinyLfu {
            doorkeeper,
            sketch,
            budget: SampleBudget::new(sample_size),
            decay_on_saturation,
            stats: StatsCounter::new(),
        }
    }

    /// Records one observed access to `id`.  Call exactly once per access.
    ///
    /// A first sighting in the current window lands in the doorkeeper
    /// only; second and later sightings feed the sketch.  Filling the
    /// sample window (or saturating the sketch, when that trigger is
    /// enabled) runs a full decay pass.
    pub fn record_access(&self, id: u64) {
        let hashes = Hashes::of(id);
        let saturated = if self.doorkeeper.contains(&hashes) {
            self.sketch.add(&hashes)
        } else {
            self.doorkeeper.add(&hashes);
            false
        };

        let window_full = self.budget.record();
        if window_full || (self.decay_on_saturation && saturated) {
            self.decay();
        }
        self.stats.record_access();
    }

    /// Estimated access frequency of `id` in the current window.
    ///
    /// The sketch estimate, plus one if the doorkeeper has seen the id.
    /// Without the correction an id sighted exactly once would read back
    /// as frequency 0.
    pub fn estimate(&self, id: u64) -> u32 {
        let hashes = Hashes::of(id);
        let mut estimate = self.sketch.estimate(&hashes);
        if self.doorkeeper.contains(&hashes) {
            estimate = estimate.saturating_add(1);
        }
        estimate
    }

    /// Decides whether `candidate` should take the cache slot of `victim`.
    ///
    /// `victim == None` means the cache still has room and the candidate
    /// is admitted unconditionally.  Otherwise the candidate must be
    /// strictly more frequent than the victim; ties keep the incumbent,
    /// avoiding churn between equally hot items.
    pub fn admit(&self, candidate: u64, victim: Option<u64>) -> bool {
        let Some(victim) = victim else {
            self.stats.record_admit();
            return true;
        };
        let admitted = self.estimate(candidate) > self.estimate(victim);
        if admitted {
            self.stats.record_admit();
        } else {
            self.stats.record_reject();
        }
        admitted
    }

    /// Point-in-time statistics snapshot.
    pub fn stats(&self) -> Stats {
        self.stats.snapshot()
    }

    /// The full decay pass: halve every sketch counter, clear the
    /// doorkeeper, restart the sample window.
    fn decay(&self) {
        self.sketch.reset();
        self.doorkeeper.clear();
        self.budget.reset();
        self.stats.record_decay();
    }
}
