use crate::collectors::{MetricsProvider, ProbeError};
use crate::platform;
use crate::shutdown::Shutdown;
use crate::snapshot::{bytes_to_gb, bytes_to_mb, clamp_percent, percent_of, Snapshot};
use chrono::Local;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("metrics provider panicked: {0}")]
    Panicked(#[source] tokio::task::JoinError),
    #[error("metrics provider is unusable after an earlier panic")]
    Poisoned,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub disk_path: PathBuf,
    pub cpu_window: Duration,
    pub load_average: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            disk_path: platform::resolve_root_path(),
            cpu_window: DEFAULT_CPU_WINDOW,
            load_average: platform::supports_load_average(),
        }
    }
}

pub struct SnapshotBuilder<P> {
    provider: Arc<Mutex<P>>,
    opts: Arc<BuildOptions>,
}

impl<P: MetricsProvider> SnapshotBuilder<P> {
    pub fn new(provider: P, opts: BuildOptions) -> Self {
        Self {
            provider: Arc::new(Mutex::new(provider)),
            opts: Arc::new(opts),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.opts
    }

    pub async fn build(&self, shutdown: &Shutdown) -> Result<Snapshot, BuildError> {
        let provider = Arc::clone(&self.provider);
        let opts = Arc::clone(&self.opts);
        let shutdown = shutdown.clone();

        let res = tokio::task::spawn_blocking(move || -> Result<Snapshot, BuildError> {
            let mut guard = provider.lock().map_err(|_| BuildError::Poisoned)?;
            Ok(collect(&mut *guard, &opts, &shutdown))
        })
        .await;

        match res {
            Ok(inner) => inner,
            Err(err) => Err(BuildError::Panicked(err)),
        }
    }
}

fn collect<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    opts: &BuildOptions,
    shutdown: &Shutdown,
) -> Snapshot {
    let mut snap = Snapshot::empty(Local::now(), opts.disk_path.display().to_string());

    if let Some(host) = probe("host", shutdown, || provider.host_info()) {
        snap.host = host.host_name;
        snap.os = host.os;
        snap.uptime_seconds = host.uptime_seconds;
    }

    if let Some(cpu) = probe("cpu", shutdown, || provider.cpu_percent(opts.cpu_window)) {
        snap.cpu_percent = clamp_percent(cpu);
    }

    if opts.load_average {
        if let Some(load) = probe("load", shutdown, || provider.load_average()) {
            snap.load1 = Some(load.one);
            snap.load5 = Some(load.five);
            snap.load15 = Some(load.fifteen);
        }
    }

    if let Some(mem) = probe("memory", shutdown, || provider.memory()) {
        snap.mem_used_mb = bytes_to_mb(mem.used_bytes);
        snap.mem_total_mb = bytes_to_mb(mem.total_bytes);
        snap.mem_used_percent = percent_of(mem.used_bytes, mem.total_bytes);
    }

    if let Some(disk) = probe("disk", shutdown, || provider.disk_usage(&opts.disk_path)) {
        snap.disk_used_gb = bytes_to_gb(disk.used_bytes);
        snap.disk_total_gb = bytes_to_gb(disk.total_bytes);
        snap.disk_used_percent = percent_of(disk.used_bytes, disk.total_bytes);
    }

    if let Some(net) = probe("net", shutdown, || provider.net_counters()) {
        snap.net_bytes_in = net.rx_bytes_total;
        snap.net_bytes_out = net.tx_bytes_total;
    }

    snap
}

fn probe<T>(
    name: &'static str,
    shutdown: &Shutdown,
    run: impl FnOnce() -> Result<T, ProbeError>,
) -> Option<T> {
    if shutdown.is_triggered() {
        debug!(probe = name, "skipped, stop requested");
        return None;
    }
    match run() {
        Ok(v) => Some(v),
        Err(err) => {
            debug!(probe = name, error = %err, "probe failed");
            None
        }
    }
}
