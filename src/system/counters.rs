use std::fs;
use std::path::{Path, PathBuf};

pub type Pid = u32;

/// One aggregate CPU tick snapshot from the `cpu` line of `/proc/stat`.
///
/// Buckets are kernel jiffy counters, monotonically non-decreasing until
/// reboot. A snapshot missing any bucket is invalid and is represented as
/// all zeroes; callers must not compute deltas against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Idle bucket partition: {idle, iowait}. The complement
    /// {user, nice, system, irq, softirq, steal} counts as active.
    pub fn idle_ticks(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn is_valid(&self) -> bool {
        self.total() > 0
    }
}

/// Raw per-process fields from `/proc/<pid>/stat` at one instant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessStat {
    pub comm: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    /// Process start time in ticks since boot.
    pub starttime_ticks: u64,
}

impl ProcessStat {
    /// Ticks consumed in user + system mode, including reaped children.
    pub fn total_ticks(&self) -> u64 {
        self.utime + self.stime + self.cutime + self.cstime
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total_kb: u64,
    pub available_kb: u64,
}

/// Per-process metadata that is not part of the stat line. Fields degrade
/// to empty strings / zero when the backing files are missing or partial.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessMeta {
    pub user: String,
    pub command: String,
    pub rss_kb: u64,
}

/// Read-only access to the raw OS counters one sampling tick needs.
///
/// Every accessor has a defined default on missing or malformed backing
/// data; none of them abort a sampling pass. Implementations hold no
/// state and perform no caching.
pub trait CounterSource {
    fn cpu_ticks(&self) -> CpuTicks;
    fn pids(&self) -> Vec<Pid>;
    /// `None` means the process exited between enumeration and this read.
    fn process_stat(&self, pid: Pid) -> Option<ProcessStat>;
    fn process_meta(&self, pid: Pid) -> ProcessMeta;
    fn memory_totals(&self) -> MemoryTotals;
    fn uptime_seconds(&self) -> u64;
    /// (total processes forked since boot, processes currently runnable).
    fn process_counts(&self) -> (u64, u64);
    fn os_pretty_name(&self) -> String;
    fn kernel_release(&self) -> String;
}

/// `CounterSource` backed by the procfs text files. The roots are
/// parameters so tests (and `--proc-root`) can sample a fixture tree
/// instead of the live kernel.
pub struct ProcFs {
    proc_root: PathBuf,
    etc_root: PathBuf,
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/etc")
    }

    pub fn with_roots(proc_root: impl Into<PathBuf>, etc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            etc_root: etc_root.into(),
        }
    }

    fn pid_path(&self, pid: Pid, file: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(file)
    }

    fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for ProcFs {
    fn cpu_ticks(&self) -> CpuTicks {
        let stat = self.read(&self.proc_root.join("stat"));
        stat.lines()
            .find(|l| l.starts_with("cpu "))
            .map(parse_cpu_line)
            .unwrap_or_default()
    }

    fn pids(&self) -> Vec<Pid> {
        let mut pids = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.proc_root) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str()
                    && let Ok(pid) = name.parse::<Pid>()
                {
                    pids.push(pid);
                }
            }
        }
        pids
    }

    fn process_stat(&self, pid: Pid) -> Option<ProcessStat> {
        let contents = fs::read_to_string(self.pid_path(pid, "stat")).ok()?;
        parse_process_stat(&contents)
    }

    fn process_meta(&self, pid: Pid) -> ProcessMeta {
        let status = self.read(&self.pid_path(pid, "status"));
        let user = match status_uid(&status) {
            Some(uid) => {
                let passwd = self.read(&self.etc_root.join("passwd"));
                user_for_uid(&passwd, uid).unwrap_or_else(|| uid.to_string())
            }
            None => String::new(),
        };

        let command = self
            .read(&self.pid_path(pid, "cmdline"))
            .replace('\0', " ")
            .trim()
            .to_string();

        ProcessMeta {
            user,
            command,
            rss_kb: status_value_kb(&status, "VmRSS:"),
        }
    }

    fn memory_totals(&self) -> MemoryTotals {
        parse_meminfo(&self.read(&self.proc_root.join("meminfo")))
    }

    fn uptime_seconds(&self) -> u64 {
        parse_uptime(&self.read(&self.proc_root.join("uptime")))
    }

    fn process_counts(&self) -> (u64, u64) {
        parse_process_counts(&self.read(&self.proc_root.join("stat")))
    }

    fn os_pretty_name(&self) -> String {
        parse_os_pretty_name(&self.read(&self.etc_root.join("os-release")))
    }

    fn kernel_release(&self) -> String {
        parse_kernel_release(&self.read(&self.proc_root.join("version")))
    }
}

/// Kernel tick rate used to convert jiffies to seconds. Falls back to the
/// conventional 100 Hz when sysconf is unavailable.
pub fn clock_ticks_per_second() -> u64 {
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 { ticks as u64 } else { 100 }
}

/// Parses the aggregate `cpu` line of `/proc/stat`. All eight buckets must
/// be present and numeric; a short or malformed line yields the all-zero
/// (invalid) snapshot.
pub fn parse_cpu_line(line: &str) -> CpuTicks {
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| f.parse().unwrap_or(0))
        .collect();
    if fields.len() < 8 {
        return CpuTicks::default();
    }
    CpuTicks {
        user: fields[0],
        nice: fields[1],
        system: fields[2],
        idle: fields[3],
        iowait: fields[4],
        irq: fields[5],
        softirq: fields[6],
        steal: fields[7],
    }
}

/// Parses one `/proc/<pid>/stat` line. The comm field may contain spaces
/// and parens, so the numeric fields are located after the last `)`.
/// Fields after comm: state(0) ppid(1) ... utime(11) stime(12) cutime(13)
/// cstime(14) ... starttime(19). Short lines and non-numeric fields
/// degrade to zero rather than failing the read.
pub fn parse_process_stat(contents: &str) -> Option<ProcessStat> {
    let open = contents.find('(')?;
    let close = contents.rfind(')')?;
    if close < open {
        return None;
    }
    let comm = contents[open + 1..close].to_string();
    let fields: Vec<&str> = contents[close + 1..].split_whitespace().collect();

    let num = |i: usize| -> u64 { fields.get(i).and_then(|f| f.parse().ok()).unwrap_or(0) };

    Some(ProcessStat {
        comm,
        state: fields
            .first()
            .and_then(|f| f.chars().next())
            .unwrap_or('?'),
        utime: num(11),
        stime: num(12),
        cutime: num(13),
        cstime: num(14),
        starttime_ticks: num(19),
    })
}

pub fn parse_meminfo(contents: &str) -> MemoryTotals {
    let mut totals = MemoryTotals::default();
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            totals.total_kb = first_number(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            totals.available_kb = first_number(rest);
        }
    }
    totals
}

pub fn parse_uptime(contents: &str) -> u64 {
    contents
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .map(|f| f as u64)
        .unwrap_or(0)
}

pub fn parse_process_counts(stat_contents: &str) -> (u64, u64) {
    let mut total = 0;
    let mut running = 0;
    for line in stat_contents.lines() {
        if let Some(rest) = line.strip_prefix("processes ") {
            total = rest.trim().parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("procs_running ") {
            running = rest.trim().parse().unwrap_or(0);
        }
    }
    (total, running)
}

pub fn parse_os_pretty_name(contents: &str) -> String {
    contents
        .lines()
        .find_map(|l| l.strip_prefix("PRETTY_NAME="))
        .map(|v| v.trim().trim_matches('"').to_string())
        .unwrap_or_default()
}

/// `/proc/version` reads "Linux version <release> ..."; the release is the
/// third whitespace token.
pub fn parse_kernel_release(contents: &str) -> String {
    contents
        .split_whitespace()
        .nth(2)
        .unwrap_or_default()
        .to_string()
}

/// Real uid from the `Uid:` line of `/proc/<pid>/status`.
pub fn status_uid(status_contents: &str) -> Option<u32> {
    status_contents
        .lines()
        .find_map(|l| l.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|v| v.parse().ok())
}

/// kB value of a `key:` line of `/proc/<pid>/status`, 0 when absent.
pub fn status_value_kb(status_contents: &str, key: &str) -> u64 {
    status_contents
        .lines()
        .find_map(|l| l.strip_prefix(key))
        .map(first_number)
        .unwrap_or(0)
}

/// Resolves a uid through the colon-delimited `/etc/passwd` registry
/// (`name:x:uid:...`).
pub fn user_for_uid(passwd_contents: &str, uid: u32) -> Option<String> {
    for line in passwd_contents.lines() {
        let mut fields = line.split(':');
        let name = fields.next()?;
        let _password = fields.next();
        if let Some(entry_uid) = fields.next()
            && entry_uid.parse() == Ok(uid)
        {
            return Some(name.to_string());
        }
    }
    None
}

fn first_number(s: &str) -> u64 {
    s.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
