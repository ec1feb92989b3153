use std::path::PathBuf;

use super::parse::{parse_buddyinfo, parse_loadavg, parse_procs_blocked, parse_vmstat};
use super::traits::{CollectError, KernelSignals, SignalSource};

/// Reads kernel signals from a procfs mount.
pub struct ProcCollector {
    root: PathBuf,
}

impl Default for ProcCollector {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, name: &str) -> Result<String, CollectError> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|source| CollectError::Read {
            path: path.display().to_string(),
            source,
        })
    }
}

impl SignalSource for ProcCollector {
    fn collect(&self) -> Result<KernelSignals, CollectError> {
        let vmstat = parse_vmstat(&self.read("vmstat")?)?;
        Ok(KernelSignals {
            mem_frag_index: parse_buddyinfo(&self.read("buddyinfo")?)?,
            oom_kill_count: vmstat.oom_kill_count,
            load_avg_1m: parse_loadavg(&self.read("loadavg")?)?,
            procs_blocked: parse_procs_blocked(&self.read("stat")?)?,
            dirty_pages_bytes: vmstat.dirty_pages_bytes,
        })
    }
}

/// Kernel release via sysinfo, "unknown" where the platform does not say.
pub fn kernel_version() -> String {
    sysinfo::System::kernel_version().unwrap_or_else(|| "unknown".into())
}
