//! Prometheus text format shared by the ingestion API and the workers.

use std::fmt::Write;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Default)]
pub struct Exposition {
    out: String,
}

impl Exposition {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    pub fn counter(&mut self, name: &str, help: &str, val: u64) -> &mut Self {
        self.header(name, help, "counter");
        let _ = writeln!(self.out, "{name} {val}");
        self
    }

    /// Durations are microseconds, so `sum / count` is the mean latency.
    pub fn summary(&mut self, name: &str, help: &str, (sum, count): (u64, u64)) -> &mut Self {
        self.header(name, help, "summary");
        let _ = writeln!(self.out, "{name}_sum {sum}");
        let _ = writeln!(self.out, "{name}_count {count}");
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    fn header(&mut self, name: &str, help: &str, kind: &str) {
        let _ = writeln!(self.out, "# HELP {name} {help}");
        let _ = writeln!(self.out, "# TYPE {name} {kind}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_has_help_and_type() {
        let text = Exposition::new().counter("jobs_total", "Jobs seen.", 7).finish();
        assert_eq!(text, "# HELP jobs_total Jobs seen.\n# TYPE jobs_total counter\njobs_total 7\n");
    }

    #[test]
    fn summary_emits_sum_and_count() {
        let text = Exposition::new()
            .counter("a_total", "A.", 0)
            .summary("lat_us", "Latency.", (1500, 3))
            .finish();
        assert!(text.contains("# TYPE lat_us summary\nlat_us_sum 1500\nlat_us_count 3\n"));
        assert!(text.starts_with("# HELP a_total"));
    }
}
