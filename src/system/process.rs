use super::counters::{Pid, ProcessMeta, ProcessStat};
use crate::format::format_ram_mb;

/// One point-in-time view of a live process, rebuilt from scratch every
/// sampling tick and never mutated afterwards. Records for the same pid on
/// consecutive ticks are unrelated values.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub user: String,
    pub command: String,
    /// Resident set size, for sorting.
    pub rss_kb: u64,
    /// Resident set display string ("<n> MB", divisor 1024).
    pub ram: String,
    /// CPU time consumed since start over wall age. Not clamped above 1.0:
    /// multi-threaded accounting can legitimately exceed it transiently.
    pub cpu: f64,
    pub age_seconds: u64,
}

impl ProcessRecord {
    /// Derives a record from one raw stat read plus the uptime observed at
    /// the start of the tick.
    pub fn build(
        pid: Pid,
        stat: &ProcessStat,
        meta: ProcessMeta,
        uptime_seconds: u64,
        ticks_per_second: u64,
    ) -> Self {
        let ticks_per_second = ticks_per_second.max(1);
        let start_seconds = stat.starttime_ticks / ticks_per_second;
        // A start time past the current uptime means the pid was reused
        // under us; saturate to zero age instead of going negative.
        let age_seconds = uptime_seconds.saturating_sub(start_seconds);

        let cpu = if age_seconds > 0 {
            stat.total_ticks() as f64 / ticks_per_second as f64 / age_seconds as f64
        } else {
            0.0
        };

        // Kernel threads have no cmdline; show the bracketed comm like top.
        let command = if meta.command.is_empty() {
            format!("[{}]", stat.comm)
        } else {
            meta.command
        };

        ProcessRecord {
            pid,
            user: meta.user,
            command,
            rss_kb: meta.rss_kb,
            ram: format_ram_mb(meta.rss_kb),
            cpu,
            age_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(utime: u64, stime: u64, cutime: u64, cstime: u64, starttime: u64) -> ProcessStat {
        ProcessStat {
            comm: "worker".to_string(),
            state: 'S',
            utime,
            stime,
            cutime,
            cstime,
            starttime_ticks: starttime,
        }
    }

    fn meta(user: &str, command: &str, rss_kb: u64) -> ProcessMeta {
        ProcessMeta {
            user: user.to_string(),
            command: command.to_string(),
            rss_kb,
        }
    }

    #[test]
    fn cpu_is_ticks_over_age() {
        // 400 ticks at 100 Hz = 4 cpu-seconds over 40 s of age
        let record = ProcessRecord::build(
            7,
            &stat(250, 120, 20, 10, 6000),
            meta("alice", "worker --serve", 2048),
            100,
            100,
        );
        assert_eq!(record.age_seconds, 40);
        assert!((record.cpu - 0.1).abs() < 1e-9);
        assert_eq!(record.ram, "2 MB");
    }

    #[test]
    fn zero_ticks_is_zero_cpu_regardless_of_age() {
        let record =
            ProcessRecord::build(7, &stat(0, 0, 0, 0, 0), meta("root", "idle", 0), 5000, 100);
        assert_eq!(record.cpu, 0.0);
        assert_eq!(record.age_seconds, 5000);
    }

    #[test]
    fn fresh_process_with_zero_age_guards_division() {
        let record =
            ProcessRecord::build(7, &stat(5, 5, 0, 0, 10_000), meta("bob", "new", 100), 100, 100);
        assert_eq!(record.age_seconds, 0);
        assert_eq!(record.cpu, 0.0);
    }

    #[test]
    fn start_time_past_uptime_clamps_age_to_zero() {
        // pid-reuse race: starttime claims the future
        let record =
            ProcessRecord::build(7, &stat(10, 0, 0, 0, 999_999), meta("bob", "x", 0), 100, 100);
        assert_eq!(record.age_seconds, 0);
        assert_eq!(record.cpu, 0.0);
    }

    #[test]
    fn utilization_may_exceed_one() {
        // 8000 ticks at 100 Hz = 80 cpu-seconds over 40 s of wall age:
        // plausible for a multi-threaded process, must not be clamped.
        let record = ProcessRecord::build(
            7,
            &stat(6000, 2000, 0, 0, 6000),
            meta("alice", "threads", 0),
            100,
            100,
        );
        assert!((record.cpu - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_cmdline_falls_back_to_bracketed_comm() {
        let record = ProcessRecord::build(2, &stat(0, 0, 0, 0, 0), meta("root", "", 0), 10, 100);
        assert_eq!(record.command, "[worker]");
    }
}
