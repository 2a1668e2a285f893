//! Probabilistic backing structures for the admission controller: the
//! doorkeeper membership filter and the packed-counter frequency sketch.

pub(crate) mod doorkeeper;
pub(crate) mod frequency;

pub(crate) use doorkeeper::Doorkeeper;
pub(crate) use frequency::FrequencySketch;

use std::sync::atomic::AtomicU64;

use crate::error::BuildError;

/// Allocates a zeroed word array, surfacing allocation failure as an error
/// instead of an abort.  Nothing is returned unless the full array exists.
pub(crate) fn alloc_words(num_words: usize) -> Result<Vec<AtomicU64>, BuildError> {
    let mut words = Vec::new();
    words
        .try_reserve_exact(num_words)
        .map_err(|_| BuildError::AllocationFailed {
            bytes: num_words * std::mem::size_of::<AtomicU64>(),
        })?;
    words.resize_with(num_words, || AtomicU64::new(0));
    Ok(words)
}
