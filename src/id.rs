//! Item-identity derivation.
//!
//! The controller tracks opaque 64-bit ids and assumes nothing about their
//! structure.  Hosts whose trackable unit already carries a stable 64-bit
//! identity (an object number, a block address) pass it through unchanged;
//! the helpers here cover the two other common cases: a unit addressed by
//! an `(object, offset)` pair, such as a page within a file, and keys that
//! are arbitrary hashable values.
//!
//! Whatever the derivation, it must be applied consistently: the id used
//! by `record_access` must be the id later handed to `estimate`/`admit`,
//! or the frequency history will not line up.

use std::hash::Hash;

use ahash::RandomState;

/// Folds an `(object, offset)` pair into a single item id.
///
/// The offset is rotated by 29 (a prime, so the rotation never lines up
/// with byte boundaries) before the xor, keeping small offsets from
/// cancelling against small object ids.  The controller's own avalanche
/// mix does the heavy lifting afterwards, so this stays a single rotate
/// and xor per access.
#[inline]
pub fn composite(object: u64, offset: u64) -> u64 {
    object ^ offset.rotate_left(29)
}

/// Derives stable 64-bit ids from arbitrary hashable keys.
///
/// Wraps one randomly seeded [`RandomState`]; ids are deterministic for
/// the lifetime of the hasher but differ across hashers and across
/// processes.  Keep a single `IdHasher` next to the controller and route
/// every key through it.
///
/// # Example
/// ```
/// use doorman::id::IdHasher;
///
/// let ids = IdHasher::new();
/// assert_eq!(ids.id_of(&"alpha"), ids.id_of(&"alpha"));
/// ```
pub struct IdHasher {
    state: RandomState,
}

impl IdHasher {
    pub fn new() -> Self {
        IdHasher {
            state: RandomState::new(),
        }
    }

    /// The id for `key`.
    #[inline]
    pub fn id_of<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        self.state.hash_one(key)
    }
}

impl Default for IdHasher {
    fn default() -> Self {
        Self::new()
    }
}
