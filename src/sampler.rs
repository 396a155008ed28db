use crate::builder::{BuildError, SnapshotBuilder};
use crate::collectors::MetricsProvider;
use crate::render::{OutputFormat, RenderError, Renderer};
use crate::shutdown::Shutdown;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SingleShot,
    Streaming { every: Duration, limit: Option<u64> },
}

impl Mode {
    pub fn from_flags(interval: Duration, count: i64) -> Self {
        if interval.is_zero() {
            return Mode::SingleShot;
        }
        let limit = u64::try_from(count).ok().filter(|&n| n > 0);
        Mode::Streaming {
            every: interval,
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    SingleShot,
    Stopped { emitted: u64 },
    Exhausted { emitted: u64 },
}

pub struct Sampler<P> {
    builder: SnapshotBuilder<P>,
    mode: Mode,
    format: OutputFormat,
}

impl<P: MetricsProvider> Sampler<P> {
    pub fn new(builder: SnapshotBuilder<P>, mode: Mode, format: OutputFormat) -> Self {
        Self {
            builder,
            mode,
            format,
        }
    }

    pub async fn run<W: Write>(
        &self,
        out: &mut W,
        mut shutdown: Shutdown,
    ) -> Result<Outcome, SampleError> {
        match self.mode {
            Mode::SingleShot => self.single_shot(out, &shutdown).await,
            Mode::Streaming { every, limit } => {
                self.stream(out, &mut shutdown, every, limit).await
            }
        }
    }

    async fn single_shot<W: Write>(
        &self,
        out: &mut W,
        shutdown: &Shutdown,
    ) -> Result<Outcome, SampleError> {
        let renderer = Renderer::new(self.format, true);
        let snap = self.builder.build(shutdown).await?;
        if shutdown.is_triggered() {
            info!("stopped before the sample was written");
            return Ok(Outcome::Stopped { emitted: 0 });
        }
        renderer.header(out)?;
        renderer.snapshot(out, &snap)?;
        Ok(Outcome::SingleShot)
    }

    async fn stream<W: Write>(
        &self,
        out: &mut W,
        shutdown: &mut Shutdown,
        every: Duration,
        limit: Option<u64>,
    ) -> Result<Outcome, SampleError> {
        let renderer = Renderer::new(self.format, false);
        info!(
            interval = %humantime::format_duration(every),
            limit = ?limit,
            disk_path = %self.builder.options().disk_path.display(),
            "streaming started"
        );
        renderer.header(out)?;

        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut emitted = 0_u64;

        loop {
            if limit.is_some_and(|n| emitted >= n) {
                info!(emitted, "sample limit reached");
                return Ok(Outcome::Exhausted { emitted });
            }

            match next_wake(shutdown, &mut ticker).await {
                Wake::Stop => {
                    info!(emitted, "streaming stopped");
                    return Ok(Outcome::Stopped { emitted });
                }
                Wake::Tick => {
                    let snap = self.builder.build(shutdown).await?;
                    if shutdown.is_triggered() {
                        debug!("discarding sample built during stop");
                        info!(emitted, "streaming stopped");
                        return Ok(Outcome::Stopped { emitted });
                    }
                    renderer.snapshot(out, &snap)?;
                    emitted += 1;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Stop,
    Tick,
}

// A stop that is ready alongside a tick always wins.
async fn next_wake(shutdown: &mut Shutdown, ticker: &mut Interval) -> Wake {
    tokio::select! {
        biased;
        _ = shutdown.wait() => Wake::Stop,
        _ = ticker.tick() => Wake::Tick,
    }
}
