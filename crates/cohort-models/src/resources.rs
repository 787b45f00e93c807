//! Host resource probing.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Physical memory as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Capacity of the filesystem models are stored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
    /// Space available to unprivileged users.
    pub free_bytes: u64,
}

/// Source of host memory and disk statistics.
pub trait HostProbe: Send + Sync {
    fn memory(&self) -> Result<MemorySnapshot, ModelError>;
    fn disk(&self) -> Result<DiskSnapshot, ModelError>;
}

// Compile-time check: HostProbe must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn HostProbe) {}
};

/// Reads `/proc/meminfo` and `statvfs` of a mount point.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    meminfo_path: PathBuf,
    disk_path: PathBuf,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            meminfo_path: PathBuf::from("/proc/meminfo"),
            disk_path: PathBuf::from("/"),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SystemProbe {
    fn memory(&self) -> Result<MemorySnapshot, ModelError> {
        let text = std::fs::read_to_string(&self.meminfo_path)?;
        parse_meminfo(&text)
    }

    fn disk(&self) -> Result<DiskSnapshot, ModelError> {
        let stat = nix::sys::statvfs::statvfs(self.disk_path.as_path())
            .map_err(|e| ModelError::Probe(format!("statvfs {}: {e}", self.disk_path.display())))?;
        let frsize = stat.fragment_size() as u64;
        let blocks = stat.blocks() as u64;
        let free = stat.blocks_free() as u64;
        let avail = stat.blocks_available() as u64;
        Ok(DiskSnapshot {
            total_bytes: blocks * frsize,
            used_bytes: blocks.saturating_sub(free) * frsize,
            free_bytes: avail * frsize,
        })
    }
}

/// Parse `MemTotal` and `MemAvailable` (kB) from `/proc/meminfo` text.
pub(crate) fn parse_meminfo(text: &str) -> Result<MemorySnapshot, ModelError> {
    let field = |key: &str| -> Option<u64> {
        text.lines()
            .find_map(|line| line.strip_prefix(key)?.strip_prefix(':'))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|kb| kb.parse::<u64>().ok())
            .map(|kb| kb * 1024)
    };

    let total_bytes =
        field("MemTotal").ok_or_else(|| ModelError::Probe("MemTotal missing".to_string()))?;
    let available_bytes = match field("MemAvailable") {
        Some(v) => v,
        // Kernels before 3.14 lack MemAvailable.
        None => field("MemFree").unwrap_or(0) + field("Cached").unwrap_or(0),
    };
    Ok(MemorySnapshot {
        total_bytes,
        available_bytes,
    })
}

pub(crate) fn to_gb(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
}

/// VRAM figures. `total_gb` is a configured estimate; `used_gb` sums the
/// catalog VRAM of models marked loaded in this process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VramUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
}

/// Point-in-time host snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemResources {
    pub ram: RamUsage,
    pub disk: DiskUsage,
    pub vram: VramUsage,
}

impl SystemResources {
    pub(crate) fn from_snapshots(
        mem: MemorySnapshot,
        disk: DiskSnapshot,
        vram_total_gb: f64,
        vram_used_gb: f64,
    ) -> Self {
        let ram_used = mem.total_bytes.saturating_sub(mem.available_bytes);
        Self {
            ram: RamUsage {
                total_gb: to_gb(mem.total_bytes),
                used_gb: to_gb(ram_used),
                available_gb: to_gb(mem.available_bytes),
                percent: percent(ram_used, mem.total_bytes),
            },
            disk: DiskUsage {
                total_gb: to_gb(disk.total_bytes),
                used_gb: to_gb(disk.used_bytes),
                free_gb: to_gb(disk.free_bytes),
                percent: percent(disk.used_bytes, disk.used_bytes + disk.free_bytes),
            },
            vram: VramUsage {
                total_gb: vram_total_gb,
                used_gb: vram_used_gb,
                available_gb: vram_total_gb - vram_used_gb,
            },
        }
    }
}
