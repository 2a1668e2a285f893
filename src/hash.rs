/// Upper bound on the number of hash functions a controller may be
/// configured with.  Probe values are staged in fixed stack arrays of this
/// size on the sketch's hot path.
pub(crate) const MAX_HASH_COUNT: usize = 8;

/// Thomas Wang's 64-bit mix function.
///
/// A short sequence of shift/xor/add steps with full avalanche: every input
/// bit influences every output bit.  This is the only hash computation on
/// the access path; all k probe values are derived from its result.
#[inline]
pub(crate) fn mix64(key: u64) -> u64 {
    let mut key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^ (key >> 28)
}

/// The probe values for one item id.
///
/// One `mix64` call yields a 64-bit value that is split into halves `h1`
/// (low) and `h2` (high); probe `i` is `h1 + i * h2` (double hashing).
/// This gives k well-distributed indices for the price of a single mix,
/// which matters because it runs on every recorded access.
#[derive(Clone, Copy)]
pub(crate) struct Hashes {
    h1: u32,
    h2: u32,
}

impl Hashes {
    #[inline]
    pub(crate) fn of(id: u64) -> Self {
        let mixed = mix64(id);
        Hashes {
            h1: mixed as u32,
            h2: (mixed >> 32) as u32,
        }
    }

    /// Probe value `i` in `0..hash_count`.
    #[inline]
    pub(crate) fn get(&self, i: usize) -> u32 {
        self.h1.wrapping_add((i as u32).wrapping_mul(self.h2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_deterministic() {
        assert_eq!(mix64(42), mix64(42));
        assert_eq!(mix64(u64::MAX), mix64(u64::MAX));
    }

    #[test]
    fn mix_separates_adjacent_keys() {
        // Sequential ids (the common case for object/page numbers) must not
        // produce sequential hashes.
        let a = mix64(1);
        let b = mix64(2);
        assert_ne!(a, b);
        assert!((a ^ b).count_ones() > 8, "poor diffusion: {:016x} vs {:016x}", a, b);
    }

    #[test]
    fn probes_follow_double_hashing() {
        let id = 0xDEAD_BEEF_u64;
        let mixed = mix64(id);
        let h1 = mixed as u32;
        let h2 = (mixed >> 32) as u32;

        let hashes = Hashes::of(id);
        for i in 0..4usize {
            assert_eq!(hashes.get(i), h1.wrapping_add((i as u32).wrapping_mul(h2)));
        }
    }

    #[test]
    fn first_probe_is_low_half() {
        let hashes = Hashes::of(7);
        assert_eq!(hashes.get(0), mix64(7) as u32);
    }
}
