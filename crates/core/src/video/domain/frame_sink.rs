use crate::shared::frame::Frame;

/// Push-based consumer of redacted frames (encoder, file, test buffer).
///
/// `write` may fail at any moment, since a downstream encoder can die
/// between any two frames. That failure is terminal for the surrounding
/// loop; the sink is not expected to recover.
pub trait FrameSink: Send {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
