use crate::collectors::{
    DiskUsage, HostInfo, LoadAverage, MemoryUsage, MetricsProvider, NetCounters, ProbeError,
};
use std::path::Path;
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, NetworkExt, NetworksExt, System, SystemExt};
use tracing::debug;

pub struct SysinfoProvider {
    system: System,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the CPU counters so the first window has a baseline.
        system.refresh_cpu();
        Self { system }
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoProvider {
    fn host_info(&mut self) -> Result<HostInfo, ProbeError> {
        let host_name = self.system.host_name();
        let os = self.system.long_os_version().or_else(|| self.system.name());
        if host_name.is_none() && os.is_none() {
            return Err(ProbeError::Unavailable("host identity"));
        }

        Ok(HostInfo {
            host_name: host_name.unwrap_or_default(),
            os: os.unwrap_or_else(|| std::env::consts::OS.to_string()),
            uptime_seconds: self.system.uptime(),
        })
    }

    fn cpu_percent(&mut self, window: Duration) -> Result<f64, ProbeError> {
        self.system.refresh_cpu();
        std::thread::sleep(window);
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(ProbeError::Unavailable("cpu usage"));
        }
        let usage = self.system.global_cpu_info().cpu_usage() as f64;
        if !usage.is_finite() {
            return Err(ProbeError::NotFinite { what: "cpu usage" });
        }
        Ok(usage)
    }

    fn load_average(&mut self) -> Result<LoadAverage, ProbeError> {
        let load = self.system.load_average();
        let avg = LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        };
        if !(avg.one.is_finite() && avg.five.is_finite() && avg.fifteen.is_finite()) {
            return Err(ProbeError::NotFinite {
                what: "load average",
            });
        }
        Ok(avg)
    }

    fn memory(&mut self) -> Result<MemoryUsage, ProbeError> {
        self.system.refresh_memory();
        let total_bytes = self.system.total_memory();
        if total_bytes == 0 {
            return Err(ProbeError::Unavailable("memory"));
        }
        Ok(MemoryUsage {
            used_bytes: self.system.used_memory(),
            total_bytes,
        })
    }

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage, ProbeError> {
        self.system.refresh_disks_list();
        self.system.refresh_disks();

        let mounts = self.system.disks().iter().map(|d| {
            let total = d.total_space();
            DiskUsage {
                mount: d.mount_point().to_path_buf(),
                used_bytes: total.saturating_sub(d.available_space()),
                total_bytes: total,
            }
        });
        let disk = containing_mount(mounts, path)
            .ok_or_else(|| ProbeError::NoFilesystem(path.to_path_buf()))?;
        debug!(path = %path.display(), mount = %disk.mount.display(), "disk resolved");
        Ok(disk)
    }

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError> {
        self.system.refresh_networks_list();
        self.system.refresh_networks();

        let mut ifaces = 0_usize;
        let mut counters = NetCounters::default();
        for (_iface, data) in self.system.networks().iter() {
            ifaces += 1;
            counters.rx_bytes_total = counters
                .rx_bytes_total
                .saturating_add(data.total_received());
            counters.tx_bytes_total = counters
                .tx_bytes_total
                .saturating_add(data.total_transmitted());
        }
        if ifaces == 0 {
            return Err(ProbeError::Unavailable("network interfaces"));
        }
        Ok(counters)
    }
}

fn containing_mount(
    mounts: impl IntoIterator<Item = DiskUsage>,
    path: &Path,
) -> Option<DiskUsage> {
    mounts
        .into_iter()
        .filter(|d| path.starts_with(&d.mount))
        .max_by_key(|d| d.mount.components().count())
}
