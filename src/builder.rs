use crate::admission::TinyLfu;
use crate::error::BuildError;
use crate::hash::MAX_HASH_COUNT;
use crate::sketch::{Doorkeeper, FrequencySketch};

/// Builder for configuring and constructing a [`TinyLfu`].
///
/// Every dimension is fixed at construction and immutable afterwards;
/// changing one means building a new controller.  Validation happens in
/// [`build`](TinyLfuBuilder::build), before any backing array is allocated.
///
/// # Example
/// ```
/// use doorman::TinyLfuBuilder;
///
/// let lfu = TinyLfuBuilder::for_capacity(10_000)
///     .counter_bits(8)
///     .build()
///     .unwrap();
/// lfu.record_access(42);
/// assert_eq!(lfu.estimate(42), 1);
/// ```
#[derive(Clone, Debug)]
pub struct TinyLfuBuilder {
    doorkeeper_bits: usize,
    counters: usize,
    counter_bits: u32,
    sample_size: u64,
    hash_count: usize,
    decay_on_saturation: bool,
}

impl TinyLfuBuilder {
    /// Starts from dimensions suited to a cache holding `capacity` items:
    /// ten doorkeeper bits per item (≈1 % false positives at k = 4), one
    /// 4-bit counter per item, and a decay window of `capacity × 16`
    /// accesses so the hottest item can just saturate its counter within
    /// one window.
    pub fn for_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        TinyLfuBuilder {
            doorkeeper_bits: capacity.saturating_mul(10),
            counters: capacity,
            counter_bits: 4,
            sample_size: (capacity as u64).saturating_mul(16),
            hash_count: 4,
            decay_on_saturation: false,
        }
    }

    /// Width of the doorkeeper bit vector, in bits.
    pub fn doorkeeper_bits(mut self, num_bits: usize) -> Self {
        self.doorkeeper_bits = num_bits;
        self
    }

    /// Number of counters in the frequency sketch.
    pub fn counters(mut self, num_counters: usize) -> Self {
        self.counters = num_counters;
        self
    }

    /// Bit width of each sketch counter.  Must pack evenly into a 64-bit
    /// word and leave the estimate representable in a `u32`: one of 1, 2,
    /// 4, 8, 16 or 32.  A `b`-bit counter saturates at `2^b - 1`.
    pub fn counter_bits(mut self, bits: u32) -> Self {
        self.counter_bits = bits;
        self
    }

    /// Number of recorded accesses after which a decay pass runs: sketch
    /// counters halve, the doorkeeper clears, and the window restarts.
    pub fn sample_size(mut self, accesses: u64) -> Self {
        self.sample_size = accesses;
        self
    }

    /// Number of hash functions (probes per id), `1..=8`.
    pub fn hash_count(mut self, k: usize) -> Self {
        self.hash_count = k;
        self
    }

    /// Also run a decay pass whenever an increment drives an id's counters
    /// to the saturation ceiling, instead of waiting for the sample window
    /// to fill.  Off by default: the sample window alone bounds history,
    /// and a saturated counter simply means "as hot as we can measure".
    pub fn decay_on_saturation(mut self, enabled: bool) -> Self {
        self.decay_on_saturation = enabled;
        self
    }

    /// Validates the configuration and allocates the backing arrays.
    ///
    /// Fails atomically: either a fully constructed controller is returned
    /// or nothing is.
    pub fn build(self) -> Result<TinyLfu, BuildError> {
        if self.doorkeeper_bits == 0 {
            return Err(BuildError::InvalidConfig(
                "doorkeeper width must be greater than 0".into(),
            ));
        }
        if self.counters == 0 {
            return Err(BuildError::InvalidConfig(
                "sketch width must be greater than 0".into(),
            ));
        }
        if self.hash_count == 0 || self.hash_count > MAX_HASH_COUNT {
            return Err(BuildError::InvalidConfig(format!(
                "hash count must be between 1 and {}",
                MAX_HASH_COUNT
            )));
        }
        if !(1..=32).contains(&self.counter_bits) || 64 % self.counter_bits != 0 {
            return Err(BuildError::InvalidConfig(
                "counter bits must be one of 1, 2, 4, 8, 16 or 32".into(),
            ));
        }
        if self.sample_size == 0 {
            return Err(BuildError::InvalidConfig(
                "sample size must be greater than 0".into(),
            ));
        }

        let doorkeeper = Doorkeeper::new(self.doorkeeper_bits, self.hash_count)?;
        let sketch = FrequencySketch::new(self.counters, self.counter_bits, self.hash_count)?;
        Ok(TinyLfu::assemble(
            doorkeeper,
            sketch,
            self.sample_size,
            self.decay_on_saturation,
        ))
    }
}
