use super::counters::{CounterSource, CpuTicks};

/// Aggregate CPU utilization as a delta ratio between two tick snapshots.
///
/// The sampler starts uninitialized (no retained snapshot) and becomes
/// primed on its first valid read. Exactly one previous snapshot is
/// retained; `update` replaces it only after a usable delta was computed,
/// so a failed or zero read never corrupts the baseline.
#[derive(Debug, Default)]
pub struct CpuSampler {
    prev: Option<CpuTicks>,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self { prev: None }
    }

    pub fn is_primed(&self) -> bool {
        self.prev.is_some()
    }

    /// Reads a fresh snapshot and returns the utilization fraction since
    /// the previous one. The first (priming) call reports 0.0. A read with
    /// no elapsed ticks, or one that went backwards (counter reset), also
    /// reports 0.0 and keeps the last good snapshot for the next attempt.
    pub fn update(&mut self, source: &dyn CounterSource) -> f64 {
        let now = source.cpu_ticks();
        if !now.is_valid() {
            return 0.0;
        }

        let Some(prev) = self.prev else {
            self.prev = Some(now);
            return 0.0;
        };

        if now.total() <= prev.total() {
            return 0.0;
        }

        let total_delta = now.total() - prev.total();
        let idle_delta = now.idle_ticks().saturating_sub(prev.idle_ticks());
        let utilization = total_delta.saturating_sub(idle_delta) as f64 / total_delta as f64;

        self.prev = Some(now);
        utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::counters::{MemoryTotals, Pid, ProcessMeta, ProcessStat};
    use std::cell::Cell;

    struct TickSource {
        ticks: Cell<CpuTicks>,
    }

    impl TickSource {
        fn new(ticks: CpuTicks) -> Self {
            Self {
                ticks: Cell::new(ticks),
            }
        }

        fn set(&self, ticks: CpuTicks) {
            self.ticks.set(ticks);
        }
    }

    impl CounterSource for TickSource {
        fn cpu_ticks(&self) -> CpuTicks {
            self.ticks.get()
        }
        fn pids(&self) -> Vec<Pid> {
            Vec::new()
        }
        fn process_stat(&self, _pid: Pid) -> Option<ProcessStat> {
            None
        }
        fn process_meta(&self, _pid: Pid) -> ProcessMeta {
            ProcessMeta::default()
        }
        fn memory_totals(&self) -> MemoryTotals {
            MemoryTotals::default()
        }
        fn uptime_seconds(&self) -> u64 {
            0
        }
        fn process_counts(&self) -> (u64, u64) {
            (0, 0)
        }
        fn os_pretty_name(&self) -> String {
            String::new()
        }
        fn kernel_release(&self) -> String {
            String::new()
        }
    }

    fn ticks(user: u64, system: u64, idle: u64, iowait: u64) -> CpuTicks {
        CpuTicks {
            user,
            system,
            idle,
            iowait,
            ..CpuTicks::default()
        }
    }

    #[test]
    fn first_update_primes_and_reports_zero() {
        let source = TickSource::new(ticks(100, 50, 800, 50));
        let mut sampler = CpuSampler::new();
        assert!(!sampler.is_primed());
        assert_eq!(sampler.update(&source), 0.0);
        assert!(sampler.is_primed());
    }

    #[test]
    fn delta_ratio_over_two_samples() {
        let source = TickSource::new(ticks(100, 50, 800, 50));
        let mut sampler = CpuSampler::new();
        sampler.update(&source);

        // +100 active, +100 idle => 100 busy out of 200 elapsed
        source.set(ticks(150, 100, 880, 70));
        let utilization = sampler.update(&source);
        assert!((utilization - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unchanged_snapshot_reports_zero() {
        let source = TickSource::new(ticks(100, 50, 800, 50));
        let mut sampler = CpuSampler::new();
        sampler.update(&source);
        assert_eq!(sampler.update(&source), 0.0);
    }

    #[test]
    fn zero_read_does_not_prime_or_advance() {
        let source = TickSource::new(CpuTicks::default());
        let mut sampler = CpuSampler::new();
        assert_eq!(sampler.update(&source), 0.0);
        assert!(!sampler.is_primed());

        // Prime with a valid read, then feed a zero read: the retained
        // snapshot must survive so the next good read still deltas
        // against it.
        source.set(ticks(100, 0, 100, 0));
        sampler.update(&source);
        source.set(CpuTicks::default());
        assert_eq!(sampler.update(&source), 0.0);

        source.set(ticks(200, 0, 100, 0));
        let utilization = sampler.update(&source);
        assert!((utilization - 1.0).abs() < 1e-9);
    }

    #[test]
    fn backwards_counters_report_zero_and_keep_baseline() {
        let source = TickSource::new(ticks(500, 100, 1000, 0));
        let mut sampler = CpuSampler::new();
        sampler.update(&source);

        source.set(ticks(100, 10, 200, 0));
        assert_eq!(sampler.update(&source), 0.0);

        // Baseline still the original snapshot.
        source.set(ticks(600, 100, 1100, 0));
        let utilization = sampler.update(&source);
        assert!((utilization - 0.5).abs() < 1e-9);
    }

    #[test]
    fn fully_idle_interval_is_zero_utilization() {
        let source = TickSource::new(ticks(100, 100, 1000, 0));
        let mut sampler = CpuSampler::new();
        sampler.update(&source);
        source.set(ticks(100, 100, 2000, 0));
        assert_eq!(sampler.update(&source), 0.0);
    }

    #[test]
    fn fully_busy_interval_is_one() {
        let source = TickSource::new(ticks(100, 100, 1000, 0));
        let mut sampler = CpuSampler::new();
        sampler.update(&source);
        source.set(ticks(600, 600, 1000, 0));
        assert_eq!(sampler.update(&source), 1.0);
    }
}
