use crate::collectors::{
    DiskUsage, HostInfo, LoadAverage, MemoryUsage, MetricsProvider, NetCounters, ProbeError,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Scripted provider for tests. `None` fields fail their probe.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    pub host: Option<HostInfo>,
    pub cpu: Option<f64>,
    pub load: Option<LoadAverage>,
    pub memory: Option<MemoryUsage>,
    pub disk: Option<(u64, u64)>,
    pub net: Option<NetCounters>,
    pub panic_on_host: bool,
    pub trigger_after_cpu: Option<Arc<watch::Sender<bool>>>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        Self {
            host: Some(HostInfo {
                host_name: "testhost".to_string(),
                os: "TestOS 1.0".to_string(),
                uptime_seconds: 3600,
            }),
            cpu: Some(12.345),
            load: Some(LoadAverage {
                one: 0.42,
                five: 0.3,
                fifteen: 0.2,
            }),
            memory: Some(MemoryUsage {
                used_bytes: 512 * 1024 * 1024,
                total_bytes: 2048 * 1024 * 1024,
            }),
            disk: Some((25 * 1024 * 1024 * 1024, 100 * 1024 * 1024 * 1024)),
            net: Some(NetCounters {
                rx_bytes_total: 1_000,
                tx_bytes_total: 2_000,
            }),
            panic_on_host: false,
            trigger_after_cpu: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            host: None,
            cpu: None,
            load: None,
            memory: None,
            disk: None,
            net: None,
            ..Self::healthy()
        }
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl MetricsProvider for FakeProvider {
    fn host_info(&mut self) -> Result<HostInfo, ProbeError> {
        self.record();
        if self.panic_on_host {
            panic!("host probe exploded");
        }
        self.host
            .clone()
            .ok_or(ProbeError::Unavailable("host identity"))
    }

    fn cpu_percent(&mut self, _window: Duration) -> Result<f64, ProbeError> {
        self.record();
        if let Some(tx) = &self.trigger_after_cpu {
            let _ = tx.send(true);
        }
        self.cpu.ok_or(ProbeError::Unavailable("cpu usage"))
    }

    fn load_average(&mut self) -> Result<LoadAverage, ProbeError> {
        self.record();
        self.load.ok_or(ProbeError::Unavailable("load average"))
    }

    fn memory(&mut self) -> Result<MemoryUsage, ProbeError> {
        self.record();
        self.memory.ok_or(ProbeError::Unavailable("memory"))
    }

    fn disk_usage(&mut self, path: &Path) -> Result<DiskUsage, ProbeError> {
        self.record();
        let (used_bytes, total_bytes) = self
            .disk
            .ok_or_else(|| ProbeError::NoFilesystem(path.to_path_buf()))?;
        Ok(DiskUsage {
            mount: path.to_path_buf(),
            used_bytes,
            total_bytes,
        })
    }

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError> {
        self.record();
        self.net.ok_or(ProbeError::Unavailable("network interfaces"))
    }
}
