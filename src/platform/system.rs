//! Memory and load figures from `sysinfo`.

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::error::{CheckError, Result};

/// Memory and swap figures in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub total: u64,
    pub available: u64,
    pub free: u64,
    pub used: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub swap_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadStats {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub cpu_count: usize,
}

pub fn memory() -> Result<MemoryStats> {
    let refresh = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());
    let sys = System::new_with_specifics(refresh);

    let total = sys.total_memory();
    if total == 0 {
        return Err(CheckError::metric_collection(
            "total memory reported as zero",
        ));
    }

    let stats = MemoryStats {
        total,
        available: sys.available_memory(),
        free: sys.free_memory(),
        used: sys.used_memory(),
        swap_total: sys.total_swap(),
        swap_free: sys.free_swap(),
        swap_used: sys.used_swap(),
    };
    log::debug!("Memory stats: {:?}", stats);
    Ok(stats)
}

pub fn load() -> Result<LoadStats> {
    let refresh = RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing());
    let sys = System::new_with_specifics(refresh);
    let load = System::load_average();

    let cpu_count = match sys.cpus().len() {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .map_err(|e| CheckError::metric_collection(format!("unknown cpu count: {}", e)))?,
        n => n,
    };

    let stats = LoadStats {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
        cpu_count,
    };
    log::debug!("Load stats: {:?}", stats);
    Ok(stats)
}
