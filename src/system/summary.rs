use super::counters::{CounterSource, MemoryTotals};
use super::cpu::CpuSampler;

/// Machine-wide derived metrics, rebuilt as one immutable snapshot per
/// sampling tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemSummary {
    pub os_name: String,
    pub kernel: String,
    /// Aggregate CPU utilization fraction since the previous tick.
    pub cpu_utilization: f64,
    /// (total - available) / total, 0.0 when totals are unreadable.
    pub memory_utilization: f64,
    pub total_processes: u64,
    pub running_processes: u64,
    pub uptime_seconds: u64,
}

impl SystemSummary {
    pub fn refresh(source: &dyn CounterSource, sampler: &mut CpuSampler) -> Self {
        #[cfg(feature = "sample-tracing")]
        let _span = tracing::debug_span!("summary.refresh").entered();

        let (total_processes, running_processes) = source.process_counts();
        SystemSummary {
            os_name: source.os_pretty_name(),
            kernel: source.kernel_release(),
            cpu_utilization: sampler.update(source),
            memory_utilization: memory_utilization(source.memory_totals()),
            total_processes,
            running_processes,
            uptime_seconds: source.uptime_seconds(),
        }
    }
}

pub fn memory_utilization(totals: MemoryTotals) -> f64 {
    if totals.total_kb == 0 {
        return 0.0;
    }
    totals.total_kb.saturating_sub(totals.available_kb) as f64 / totals.total_kb as f64
}
