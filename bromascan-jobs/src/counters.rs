use std::sync::atomic::{AtomicUsize, Ordering};

/// The three atomic tallies the orchestrator reports after a run (§4.7):
/// how many methods were eligible, and how many of those synthesized or
/// scanned successfully versus failed.
#[derive(Default)]
pub struct Counters {
    total: AtomicUsize,
    successful: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    pub fn new() -> Self {
        Counters::default()
    }

    pub fn add_total(&self, n: usize) {
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn successful(&self) -> usize {
        self.successful.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_calls() {
        let counters = Counters::new();
        counters.add_total(10);
        counters.record_success();
        counters.record_success();
        counters.record_failure();
        assert_eq!(counters.total(), 10);
        assert_eq!(counters.successful(), 2);
        assert_eq!(counters.failed(), 1);
    }
}
