//! Sender orchestration: vision loop plus publisher thread.
//!
//! The vision loop runs on the calling thread and owns the pipeline (and so
//! the only angle writer). The publisher runs on a scoped thread reading the
//! register, which guarantees it is joined before `run_sender` returns,
//! whichever way the vision loop ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use aerotrack_core::angle_register;
use aerotrack_telemetry::{PublisherStats, TelemetryError, TelemetryPublisher};
use aerotrack_vision::{
    AnglePipeline, FrameSource, PipelineStats, Segmenter, SourceError, VisionError,
};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SenderConfig};

#[derive(thiserror::Error, Debug)]
pub enum SenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Stop conditions for the vision loop besides the running flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Stop after this many processed frames.
    pub max_frames: Option<u64>,
}

/// Vision loop counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionLoopStats {
    pub processed: u64,
    /// `Ok(None)` answers from the source.
    pub empty_polls: u64,
    /// Non-fatal source errors.
    pub source_errors: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenderReport {
    pub vision: VisionLoopStats,
    pub pipeline: PipelineStats,
    pub publisher: PublisherStats,
    /// Register value when the sender stopped.
    pub final_angle: f64,
}

/// Pull frames until the source is exhausted, the frame budget is spent or
/// `running` clears.
///
/// An empty poll or a transient source error sleeps `retry_delay` and
/// retries; tracker state is left untouched.
pub fn run_vision_loop<F, S>(
    source: &mut F,
    pipeline: &mut AnglePipeline<S>,
    retry_delay: Duration,
    limits: RunLimits,
    running: &AtomicBool,
) -> VisionLoopStats
where
    F: FrameSource + ?Sized,
    S: Segmenter,
{
    let mut stats = VisionLoopStats::default();

    while running.load(Ordering::Relaxed) {
        if limits.max_frames.is_some_and(|max| stats.processed >= max) {
            log::info!("frame budget of {} reached", stats.processed);
            break;
        }

        match source.next_frame() {
            Ok(Some(frame)) => {
                pipeline.process_frame(&frame.view());
                stats.processed += 1;
            }
            Ok(None) => {
                stats.empty_polls += 1;
                std::thread::sleep(retry_delay);
            }
            Err(SourceError::Exhausted) => {
                log::info!("frame source exhausted");
                break;
            }
            Err(e) => {
                stats.source_errors += 1;
                log::warn!("frame acquisition failed: {e}");
                std::thread::sleep(retry_delay);
            }
        }
    }

    stats
}

/// Run the full sender with the default segmenter.
pub fn run_sender<F>(
    config: &SenderConfig,
    source: &mut F,
    limits: RunLimits,
    running: &AtomicBool,
) -> Result<SenderReport, SenderError>
where
    F: FrameSource + ?Sized,
{
    config.validate()?;

    let (writer, reader) = angle_register(0.0);
    let mut pipeline = AnglePipeline::new(config.pipeline, writer)?;
    let publisher = TelemetryPublisher::bind(config.publisher(), reader.clone())?;
    let publishing = AtomicBool::new(true);

    log::info!(
        "sender started: {}x{} frames, angle -> {}",
        config.resolution.width,
        config.resolution.height,
        config.destination
    );

    let (vision, published) = std::thread::scope(|s| {
        let handle = s.spawn(|| publisher.run(&publishing));

        let vision = run_vision_loop(source, &mut pipeline, config.retry_delay, limits, running);

        publishing.store(false, Ordering::Relaxed);
        let published = handle.join().unwrap_or_else(|_| {
            log::error!("publisher thread panicked");
            PublisherStats::default()
        });
        (vision, published)
    });

    let report = SenderReport {
        vision,
        pipeline: pipeline.stats(),
        publisher: published,
        final_angle: reader.latest(),
    };
    log::info!(
        "sender stopped: {} frames, {} fresh angles, {} datagrams sent, final angle {:.3} deg",
        report.vision.processed,
        report.pipeline.fresh,
        report.publisher.sent,
        report.final_angle.to_degrees()
    );
    Ok(report)
}
