use crate::detection::domain::face_detector::FaceDetector;
use crate::redaction::domain::frame_redactor::FrameRedactor;
use crate::shared::frame::Frame;

/// Per-frame orchestrator: detect, validate, redact, in place.
///
/// Holds the detector and redactor for the life of a capture session and
/// keeps no per-frame state. Each `process` call is independent: the frame
/// goes in mutable, comes back mutated, and nothing is retained.
pub struct RedactionPipeline {
    detector: Box<dyn FaceDetector>,
    redactor: Box<dyn FrameRedactor>,
}

impl RedactionPipeline {
    pub fn new(detector: Box<dyn FaceDetector>, redactor: Box<dyn FrameRedactor>) -> Self {
        Self { detector, redactor }
    }

    /// Redact all detected faces in `frame`, returning how many regions
    /// were obscured.
    ///
    /// A detector error propagates untouched: masking it would silently
    /// disable redaction, which is a privacy failure the operator must see.
    /// An empty detection result leaves the frame bit-identical.
    pub fn process(&mut self, frame: &mut Frame) -> Result<usize, Box<dyn std::error::Error>> {
        let detected = self.detector.detect(frame)?;

        // Backends clamp their own output; re-validate here anyway so a
        // misbehaving backend can never hand the redactor an out-of-bounds
        // or zero-area box.
        let regions: Vec<_> = detected
            .iter()
            .filter_map(|r| r.clamp_to(frame.width(), frame.height()))
            .collect();

        if regions.is_empty() {
            return Ok(0);
        }

        self.redactor.redact(frame, &regions)?;
        Ok(regions.len())
    }
}
