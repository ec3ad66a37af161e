use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use proctop::system::counters::{
    CounterSource, CpuTicks, MemoryTotals, Pid, ProcessMeta, ProcessStat, parse_cpu_line,
    parse_meminfo, parse_process_stat,
};
use proctop::system::table::{ProcessTable, SortKey};

/// Synthetic source with `n` processes of varied consumption.
struct SyntheticSource {
    n: usize,
}

impl CounterSource for SyntheticSource {
    fn cpu_ticks(&self) -> CpuTicks {
        CpuTicks {
            user: 4705,
            nice: 356,
            system: 584,
            idle: 3699,
            iowait: 23,
            irq: 0,
            softirq: 12,
            steal: 2,
        }
    }

    fn pids(&self) -> Vec<Pid> {
        (1..=self.n as Pid).collect()
    }

    fn process_stat(&self, pid: Pid) -> Option<ProcessStat> {
        Some(ProcessStat {
            comm: format!("proc_{pid}"),
            state: 'S',
            utime: (pid as u64 * 37) % 10_000,
            stime: (pid as u64 * 13) % 5_000,
            cutime: 0,
            cstime: 0,
            starttime_ticks: (pid as u64 * 101) % 500_000,
        })
    }

    fn process_meta(&self, pid: Pid) -> ProcessMeta {
        ProcessMeta {
            user: format!("u{}", pid % 8),
            command: format!("/usr/bin/proc_{pid} --work"),
            rss_kb: (pid as u64 * 211) % 1_000_000,
        }
    }

    fn memory_totals(&self) -> MemoryTotals {
        MemoryTotals {
            total_kb: 16_000_000,
            available_kb: 6_000_000,
        }
    }

    fn uptime_seconds(&self) -> u64 {
        10_000
    }

    fn process_counts(&self) -> (u64, u64) {
        (self.n as u64, 1)
    }

    fn os_pretty_name(&self) -> String {
        "Bench Linux".to_string()
    }

    fn kernel_release(&self) -> String {
        "6.0.0-bench".to_string()
    }
}

fn bench_parse_cpu_line(c: &mut Criterion) {
    let line = "cpu  4705 356 584 3699 23 0 12 2 0 0";
    c.bench_function("parse_cpu_line", |b| {
        b.iter(|| black_box(parse_cpu_line(black_box(line))))
    });
}

fn bench_parse_process_stat(c: &mut Criterion) {
    let line = "1432 (chrome (render)) S 1 1432 1432 0 -1 4194304 98765 0 12 0 25012 11873 304 122 20 0 17 0 89123 1093245 51234 18446744073709551615";
    c.bench_function("parse_process_stat", |b| {
        b.iter(|| black_box(parse_process_stat(black_box(line))))
    });
}

fn bench_parse_meminfo(c: &mut Criterion) {
    let contents = "MemTotal:       16000000 kB\nMemFree:         2000000 kB\nMemAvailable:    6000000 kB\nBuffers:          500000 kB\nCached:          4000000 kB\n";
    c.bench_function("parse_meminfo", |b| {
        b.iter(|| black_box(parse_meminfo(black_box(contents))))
    });
}

fn bench_table_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_refresh_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let source = SyntheticSource { n: size };
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let mut table = ProcessTable::new(SortKey::Cpu);
                table.refresh(black_box(source), source.uptime_seconds(), 100);
                black_box(table.len());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_cpu_line,
    bench_parse_process_stat,
    bench_parse_meminfo,
    bench_table_refresh
);
criterion_main!(benches);
