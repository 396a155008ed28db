use crate::snapshot::Snapshot;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    pretty: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    pub fn header<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        if self.format == OutputFormat::Table {
            writeln!(out, "{}", table_header())?;
            out.flush()?;
        }
        Ok(())
    }

    pub fn snapshot<W: Write>(&self, out: &mut W, snap: &Snapshot) -> Result<(), RenderError> {
        match self.format {
            OutputFormat::Table => writeln!(out, "{}", table_row(snap))?,
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut *out, snap)?;
                writeln!(out)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, snap)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

pub fn table_header() -> String {
    columns(
        "TIME",
        "CPU%",
        "Load1",
        "MEM_USED/TOTAL(MB)",
        "MEM%",
        "DISK%",
        "NET_IN/NET_OUT(B)",
        "HOST",
    )
}

pub fn table_row(snap: &Snapshot) -> String {
    let load1 = snap
        .load1
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string());
    columns(
        &snap.timestamp.format("%H:%M:%S").to_string(),
        &format!("{:.1}", snap.cpu_percent),
        &load1,
        &format!("{}/{}", snap.mem_used_mb, snap.mem_total_mb),
        &format!("{:.1}", snap.mem_used_percent),
        &format!("{:.1}", snap.disk_used_percent),
        &format!("{}/{}", snap.net_bytes_in, snap.net_bytes_out),
        &snap.host,
    )
}

#[allow(clippy::too_many_arguments)]
fn columns(
    time: &str,
    cpu: &str,
    load1: &str,
    mem: &str,
    mem_pct: &str,
    disk_pct: &str,
    net: &str,
    host: &str,
) -> String {
    format!("{time:<8} {cpu:>6} {load1:>6} {mem:>19} {mem_pct:>6} {disk_pct:>6} {net:>25} {host}")
}
