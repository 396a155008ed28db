use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Local>,
    pub host: String,
    pub os: String,
    #[serde(rename = "uptime_sec")]
    pub uptime_seconds: u64,
    pub cpu_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load15: Option<f64>,
    pub mem_used_mb: u64,
    pub mem_total_mb: u64,
    // Published key predates the field name; it carries the used percentage.
    #[serde(rename = "mem_free_pct")]
    pub mem_used_percent: f64,
    pub disk_path: String,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    #[serde(rename = "disk_used_pct")]
    pub disk_used_percent: f64,
    pub net_bytes_in: u64,
    pub net_bytes_out: u64,
}

impl Snapshot {
    pub fn empty(timestamp: DateTime<Local>, disk_path: impl Into<String>) -> Self {
        Self {
            timestamp,
            host: String::new(),
            os: String::new(),
            uptime_seconds: 0,
            cpu_percent: 0.0,
            load1: None,
            load5: None,
            load15: None,
            mem_used_mb: 0,
            mem_total_mb: 0,
            mem_used_percent: 0.0,
            disk_path: disk_path.into(),
            disk_used_gb: 0.0,
            disk_total_gb: 0.0,
            disk_used_percent: 0.0,
            net_bytes_in: 0,
            net_bytes_out: 0,
        }
    }
}

pub(crate) fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    clamp_percent((part as f64 / whole as f64) * 100.0)
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub(crate) fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}
