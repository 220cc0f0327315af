use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Reads the frame, never writes it. Implementations own whatever model
/// state they need (hence `&mut self`) and return candidate regions that
/// are already clamped to frame bounds with positive area. An empty result
/// means "no faces", which is common and not an error; a returned error
/// means the detection capability itself failed and must reach the caller.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
