use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::shared::constants::LOG_INTERVAL_FRAMES;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

use super::frame_pipeline::RedactionPipeline;

/// Counters for one completed stream run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub frames: usize,
    pub faces: usize,
}

/// The capture loop: pull a frame, redact it, push it downstream.
///
/// Strictly sequential: one frame is fully processed and written before
/// the next is read, so frames reach the sink in capture order with no
/// internal buffering. Three things end the loop: the source's
/// end-of-stream sentinel, a sink write failure (the consumer is gone;
/// logged and treated as a normal stop), and the cancellation flag.
/// A detector error is different: it aborts the run with an error, because
/// a stream that silently stops redacting is worse than one that stops.
pub struct RedactStreamUseCase {
    source: Box<dyn FrameSource>,
    sink: Box<dyn FrameSink>,
    pipeline: RedactionPipeline,
    cancelled: Arc<AtomicBool>,
}

impl RedactStreamUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        pipeline: RedactionPipeline,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(&mut self) -> Result<StreamSummary, Box<dyn std::error::Error>> {
        let result = self.run_loop();
        self.source.close();
        if let Err(e) = self.sink.close() {
            log::warn!("Sink close failed: {e}");
        }
        result
    }

    fn run_loop(&mut self) -> Result<StreamSummary, Box<dyn std::error::Error>> {
        let mut summary = StreamSummary::default();
        let started = Instant::now();

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("Cancelled after {} frames", summary.frames);
                break;
            }

            let Some(mut frame) = self.source.next_frame()? else {
                break;
            };

            summary.faces += self.pipeline.process(&mut frame)?;
            summary.frames += 1;

            if let Err(e) = self.sink.write(&frame) {
                log::warn!("Downstream sink gone after {} frames: {e}", summary.frames);
                break;
            }

            if summary.frames % LOG_INTERVAL_FRAMES == 0 {
                let fps = summary.frames as f64 / started.elapsed().as_secs_f64().max(1e-6);
                log::info!(
                    "{} frames, {} faces redacted, {fps:.1} fps",
                    summary.frames,
                    summary.faces
                );
            }
        }

        log::info!(
            "Stream finished: {} frames, {} faces redacted",
            summary.frames,
            summary.faces
        );
        Ok(summary)
    }
}
