mod parse;
mod proc_collector;
mod traits;

pub use parse::{parse_buddyinfo, parse_loadavg, parse_procs_blocked, parse_vmstat, VmStat};
pub use proc_collector::{kernel_version, ProcCollector};
pub use traits::{CollectError, KernelSignals, SignalSource};
