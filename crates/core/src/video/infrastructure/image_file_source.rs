use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Presents a still image as a one-frame stream.
///
/// Lets the same pipeline and loop redact a single picture; the sentinel
/// fires after the one frame has been pulled.
pub struct ImageFileSource {
    frame: Option<Frame>,
    metadata: StreamMetadata,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("failed to read image {}: {e}", path.display()))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        let metadata = StreamMetadata {
            width,
            height,
            fps: 1.0,
        };
        let frame = Frame::new(img.into_raw(), width, height, 3, 0);
        Ok(Self {
            frame: Some(frame),
            metadata,
        })
    }
}

impl FrameSource for ImageFileSource {
    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
