use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated on every controller operation.
#[derive(Debug)]
pub(crate) struct StatsCounter {
    accesses: AtomicU64,
    admits: AtomicU64,
    rejects: AtomicU64,
    decays: AtomicU64,
}

impl StatsCounter {
    pub(crate) fn new() -> Self {
        StatsCounter {
            accesses: AtomicU64::new(0),
            admits: AtomicU64::new(0),
            rejects: AtomicU64::new(0),
            decays: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_access(&self) {
        self.accesses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_admit(&self) {
        self.admits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_reject(&self) {
        self.rejects.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decay(&self) {
        self.decays.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of the statistics.
    pub(crate) fn snapshot(&self) -> Stats {
        let accesses = self.accesses.load(Ordering::Relaxed);
        let admits = self.admits.load(Ordering::Relaxed);
        let rejects = self.rejects.load(Ordering::Relaxed);
        let decays = self.decays.load(Ordering::Relaxed);
        let decisions = admits + rejects;
        let admit_rate = if decisions == 0 {
            0.0_f64
        } else {
            admits as f64 / decisions as f64
        };
        Stats {
            accesses,
            admits,
            rejects,
            decays,
            admit_rate,
        }
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of admission statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    /// Accesses recorded via `record_access`.
    pub accesses: u64,
    /// Admission decisions that favoured the candidate.
    pub admits: u64,
    /// Admission decisions that kept the incumbent.
    pub rejects: u64,
    /// Full decay passes performed.
    pub decays: u64,
    /// `admits / (admits + rejects)`, or `0.0` before any decision.
    pub admit_rate: f64,
}

impl Stats {
    pub fn decision_count(&self) -> u64 {
        self.admits + self.rejects
    }
}
