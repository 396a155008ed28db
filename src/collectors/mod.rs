pub mod system;

#[cfg(test)]
pub mod fake;

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInfo {
    pub host_name: String,
    pub os: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub mount: PathBuf,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub rx_bytes_total: u64,
    pub tx_bytes_total: u64,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} is not reported by this host")]
    Unavailable(&'static str),
    #[error("no mounted filesystem contains {}", .0.display())]
    NoFilesystem(PathBuf),
    #[error("{what} returned a non-finite value")]
    NotFinite { what: &'static str },
}

pub trait MetricsProvider: Send + 'static {
    fn host_info(&mut self) -> Result<HostInfo, ProbeError>;

    fn cpu_percent(&mut self, window: Duration) -> Result<f64, ProbeError>;

    fn load_average(&mut self) -> Result<LoadAverage, ProbeError>;

    fn memory(&mut self) -> Result<MemoryUsage, ProbeError>;

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage, ProbeError>;

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError>;
}
