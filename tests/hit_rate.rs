//! Replays a deterministic Zipf access trace through a small model LRU
//! host, once with every miss inserted unconditionally and once gated by
//! the admission controller, and checks that the controller earns its
//! keep.  Zipf(s = 1.0) is the standard workload for evaluating admission
//! policies: a few very hot keys, a long tail of one-hit wonders.

use std::collections::HashMap;

use doorman::TinyLfu;

/// Cache capacity of the model host.
const CAP: usize = 256;
/// Key universe; CAP is ~3 % of it, so the victim choice matters.
const POOL: usize = 8_192;
/// Accesses in the trace: enough for a dozen decay windows at this
/// capacity while keeping the unoptimised test run short.
const TRACE: usize = 60_000;

// ---------------------------------------------------------------------------
// Zipf(s=1.0) sampler via inverse CDF: P(X ≤ k) ≈ ln(k)/ln(N) ⟹ k = N^u.
// ---------------------------------------------------------------------------

struct Xorshift64(u64);

impl Xorshift64 {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Uniform float in (0, 1].
    fn uniform(&mut self) -> f64 {
        let bits = self.next() >> 11;
        (bits + 1) as f64 / (1u64 << 53) as f64
    }

    /// Zipf(s=1) sample in [0, pool).
    fn zipf(&mut self, pool: usize) -> usize {
        let k = (pool as f64).powf(self.uniform()) as usize;
        k.saturating_sub(1).min(pool - 1)
    }
}

fn generate_trace(seed: u64) -> Vec<u64> {
    let mut rng = Xorshift64(seed);
    (0..TRACE).map(|_| rng.zipf(POOL) as u64).collect()
}

// ---------------------------------------------------------------------------
// Model LRU host: recency via a monotonic tick, victim = smallest tick.
// ---------------------------------------------------------------------------

struct ModelLru {
    /// key → tick of its most recent access.
    entries: HashMap<u64, u64>,
    tick: u64,
}

impl ModelLru {
    fn new() -> Self {
        ModelLru {
            entries: HashMap::with_capacity(CAP),
            tick: 0,
        }
    }

    /// Refreshes recency for a resident key.  Returns `true` on a hit.
    fn touch(&mut self, key: u64) -> bool {
        self.tick += 1;
        let tick = self.tick;
        if let Some(last) = self.entries.get_mut(&key) {
            *last = tick;
            true
        } else {
            false
        }
    }

    /// The eviction candidate, or `None` while the cache has room.
    /// Ticks are unique, so the victim is unambiguous.
    fn victim(&self) -> Option<u64> {
        if self.entries.len() < CAP {
            return None;
        }
        self.entries.iter().min_by_key(|&(_, &t)| t).map(|(&k, _)| k)
    }

    fn replace(&mut self, victim: Option<u64>, key: u64) {
        if let Some(victim) = victim {
            self.entries.remove(&victim);
        }
        self.entries.insert(key, self.tick);
    }
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

fn run_plain(trace: &[u64]) -> usize {
    let mut lru = ModelLru::new();
    let mut hits = 0;
    for &key in trace {
        if lru.touch(key) {
            hits += 1;
        } else {
            let victim = lru.victim();
            lru.replace(victim, key);
        }
    }
    hits
}

fn run_filtered(trace: &[u64]) -> usize {
    let lfu = TinyLfu::with_capacity(CAP).unwrap();
    let mut lru = ModelLru::new();
    let mut hits = 0;
    for &key in trace {
        lfu.record_access(key);
        if lru.touch(key) {
            hits += 1;
        } else {
            let victim = lru.victim();
            if lfu.admit(key, victim) {
                lru.replace(victim, key);
            }
        }
    }
    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn admission_filter_improves_lru_hit_count() {
    let trace = generate_trace(0xDEAD_BEEF_1234_5678);
    let plain = run_plain(&trace);
    let filtered = run_filtered(&trace);

    assert!(
        filtered > plain,
        "admission filter should beat plain LRU on a Zipf trace: {} vs {} hits ({:.2}% vs {:.2}%)",
        filtered,
        plain,
        filtered as f64 / TRACE as f64 * 100.0,
        plain as f64 / TRACE as f64 * 100.0,
    );
}

#[test]
fn admission_filter_is_seed_robust() {
    // Same comparison across a few unrelated seeds; the improvement must
    // not hinge on one lucky trace.
    for seed in [0xBAD_C0FFEE_u64, 0x1234_5678_9ABC_DEF0] {
        let trace = generate_trace(seed);
        let plain = run_plain(&trace);
        let filtered = run_filtered(&trace);
        assert!(
            filtered > plain,
            "seed {:#x}: {} vs {} hits",
            seed,
            filtered,
            plain
        );
    }
}
