//! Parsers over the text of `/proc` files. They take file contents rather
//! than paths.

use super::traits::CollectError;

const PAGE_SIZE: u64 = 4096;
/// Order 9 and up are blocks of 2 MiB or more with 4 KiB pages.
const HUGE_ORDER: usize = 9;

/// Share of free pages that sit in order >= 9 blocks, across all zones.
/// Returns 0 when there are no free pages at all.
pub fn parse_buddyinfo(contents: &str) -> Result<f64, CollectError> {
    let mut total = 0f64;
    let mut huge = 0f64;

    for line in contents.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        // "Node 0, zone Normal" then one count per order
        if parts.len() < 5 || parts[0] != "Node" {
            continue;
        }
        for (order, raw) in parts[4..].iter().enumerate() {
            let count: u64 = raw.parse().map_err(|_| CollectError::Malformed {
                file: "buddyinfo",
                reason: format!("order {order} count {raw:?} is not a number"),
            })?;
            let pages = count as f64 * 2f64.powi(order as i32);
            total += pages;
            if order >= HUGE_ORDER {
                huge += pages;
            }
        }
    }

    if total == 0.0 {
        return Ok(0.0);
    }
    Ok(huge / total)
}

pub fn parse_procs_blocked(contents: &str) -> Result<u64, CollectError> {
    let line = contents
        .lines()
        .find(|l| l.starts_with("procs_blocked "))
        .ok_or_else(|| CollectError::Malformed {
            file: "stat",
            reason: "procs_blocked line missing".into(),
        })?;
    second_field("stat", line)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmStat {
    pub dirty_pages_bytes: u64,
    pub oom_kill_count: u64,
}

/// `nr_dirty` is converted from pages to bytes. `oom_kill` only exists on
/// kernels from 4.13 on and reads as 0 when absent.
pub fn parse_vmstat(contents: &str) -> Result<VmStat, CollectError> {
    let mut stat = VmStat::default();
    let mut saw_dirty = false;

    for line in contents.lines() {
        if line.starts_with("nr_dirty ") {
            stat.dirty_pages_bytes = second_field("vmstat", line)?.saturating_mul(PAGE_SIZE);
            saw_dirty = true;
        } else if line.starts_with("oom_kill ") {
            stat.oom_kill_count = second_field("vmstat", line)?;
        }
    }

    if !saw_dirty {
        return Err(CollectError::Malformed {
            file: "vmstat",
            reason: "nr_dirty line missing".into(),
        });
    }
    Ok(stat)
}

pub fn parse_loadavg(contents: &str) -> Result<f64, CollectError> {
    let first = contents.split_whitespace().next().ok_or_else(|| CollectError::Malformed {
        file: "loadavg",
        reason: "empty".into(),
    })?;
    first.parse().map_err(|_| CollectError::Malformed {
        file: "loadavg",
        reason: format!("{first:?} is not a number"),
    })
}

fn second_field(file: &'static str, line: &str) -> Result<u64, CollectError> {
    let raw = line.split_whitespace().nth(1).unwrap_or_default();
    raw.parse().map_err(|_| CollectError::Malformed {
        file,
        reason: format!("bad value in {line:?}"),
    })
}
