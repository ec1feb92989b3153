#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelSignals {
    pub mem_frag_index: f64,
    pub oom_kill_count: u64,
    pub load_avg_1m: f64,
    pub procs_blocked: u64,
    pub dirty_pages_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {file}: {reason}")]
    Malformed { file: &'static str, reason: String },
}

pub trait SignalSource: Send + Sync {
    fn collect(&self) -> Result<KernelSignals, CollectError>;
}
