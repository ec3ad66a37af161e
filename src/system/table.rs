use std::cmp::Ordering;

use super::counters::CounterSource;
use super::process::ProcessRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Age,
    Pid,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Age,
            SortKey::Age => SortKey::Pid,
            SortKey::Pid => SortKey::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "CPU",
            SortKey::Memory => "RAM",
            SortKey::Age => "Age",
            SortKey::Pid => "PID",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "ram" => SortKey::Memory,
            "age" | "time" => SortKey::Age,
            "pid" => SortKey::Pid,
            _ => SortKey::Cpu,
        }
    }
}

/// The set of all currently observed processes, ordered by the active sort
/// key. Each refresh replaces the previous sequence wholesale; no record
/// identity is carried across ticks and no smoothing is applied.
#[derive(Debug, Default)]
pub struct ProcessTable {
    records: Vec<ProcessRecord>,
    sort: SortKey,
}

impl ProcessTable {
    pub fn new(sort: SortKey) -> Self {
        Self {
            records: Vec::new(),
            sort,
        }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// Changes the comparator and reorders the current records in place
    /// without resampling.
    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.sort = sort;
        sort_records(&mut self.records, sort);
    }

    /// Enumerates pids and builds one fresh record per pid. A pid that
    /// exited between enumeration and the stat read is dropped silently;
    /// the enumeration snapshot is expected to go stale under us.
    pub fn refresh(
        &mut self,
        source: &dyn CounterSource,
        uptime_seconds: u64,
        ticks_per_second: u64,
    ) {
        #[cfg(feature = "sample-tracing")]
        let _span = tracing::debug_span!("table.refresh").entered();

        let pids = source.pids();
        let mut records = Vec::with_capacity(pids.len());
        for pid in pids {
            let Some(stat) = source.process_stat(pid) else {
                continue;
            };
            let meta = source.process_meta(pid);
            records.push(ProcessRecord::build(
                pid,
                &stat,
                meta,
                uptime_seconds,
                ticks_per_second,
            ));
        }
        sort_records(&mut records, self.sort);
        self.records = records;
    }
}

/// Cpu, Memory and Age sort descending, Pid ascending; every tie breaks by
/// ascending pid so the order is fully deterministic.
fn sort_records(records: &mut [ProcessRecord], sort: SortKey) {
    records.sort_by(|a, b| {
        let primary = match sort {
            SortKey::Cpu => b.cpu.partial_cmp(&a.cpu).unwrap_or(Ordering::Equal),
            SortKey::Memory => b.rss_kb.cmp(&a.rss_kb),
            SortKey::Age => b.age_seconds.cmp(&a.age_seconds),
            SortKey::Pid => Ordering::Equal,
        };
        primary.then(a.pid.cmp(&b.pid))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, cpu: f64, rss_kb: u64, age_seconds: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            user: "tester".to_string(),
            command: format!("proc-{pid}"),
            rss_kb,
            ram: String::new(),
            cpu,
            age_seconds,
        }
    }

    #[test]
    fn cpu_sort_descending() {
        let mut records = vec![
            record(1, 0.1, 0, 0),
            record(2, 0.9, 0, 0),
            record(3, 0.5, 0, 0),
        ];
        sort_records(&mut records, SortKey::Cpu);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn cpu_ties_break_by_ascending_pid() {
        let mut records = vec![record(5, 0.2, 0, 0), record(3, 0.2, 0, 0)];
        sort_records(&mut records, SortKey::Cpu);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![3, 5]);
    }

    #[test]
    fn memory_and_age_sort_descending_pid_ascending() {
        let mut records = vec![
            record(4, 0.0, 100, 50),
            record(2, 0.0, 300, 10),
            record(9, 0.0, 100, 99),
        ];
        sort_records(&mut records, SortKey::Memory);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![2, 4, 9]);

        sort_records(&mut records, SortKey::Age);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![9, 4, 2]);

        sort_records(&mut records, SortKey::Pid);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![2, 4, 9]);
    }

    #[test]
    fn set_sort_key_reorders_in_place() {
        let mut table = ProcessTable::new(SortKey::Cpu);
        table.records = vec![record(1, 0.9, 10, 0), record(2, 0.1, 500, 0)];
        table.set_sort_key(SortKey::Memory);
        assert_eq!(table.records()[0].pid, 2);
        assert_eq!(table.sort_key(), SortKey::Memory);
    }

    #[test]
    fn sort_key_cycles_through_all_variants() {
        let key = SortKey::Cpu;
        assert_eq!(key.next(), SortKey::Memory);
        assert_eq!(key.next().next(), SortKey::Age);
        assert_eq!(key.next().next().next(), SortKey::Pid);
        assert_eq!(key.next().next().next().next(), SortKey::Cpu);
    }

    #[test]
    fn sort_key_from_config_strings() {
        assert_eq!(SortKey::from_str_config("memory"), SortKey::Memory);
        assert_eq!(SortKey::from_str_config("RAM"), SortKey::Memory);
        assert_eq!(SortKey::from_str_config("age"), SortKey::Age);
        assert_eq!(SortKey::from_str_config("pid"), SortKey::Pid);
        assert_eq!(SortKey::from_str_config("cpu"), SortKey::Cpu);
        assert_eq!(SortKey::from_str_config("anything-else"), SortKey::Cpu);
    }
}
