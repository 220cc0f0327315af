use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Pull-based supplier of frames, one at a time, in capture order.
///
/// End of stream is signalled by `Ok(None)`, not an error: a camera being
/// unplugged and a file running out of frames look the same to the loop.
/// Geometry and frame rate are fixed for the lifetime of the source.
pub trait FrameSource: Send {
    fn metadata(&self) -> &StreamMetadata;

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the capture device or underlying process.
    fn close(&mut self);
}
