use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::FrameSink;

/// Writes each frame it receives to the target path as an image file.
///
/// For the single-image flow this is called exactly once; in a longer
/// stream each write overwrites the previous one (last frame wins).
pub struct ImageFileSink {
    path: PathBuf,
}

impl ImageFileSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl FrameSink for ImageFileSink {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;
        img.save(&self.path)
            .map_err(|e| format!("failed to write image {}: {e}", self.path.display()))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_png_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.png");

        let mut data = vec![0u8; 8 * 8 * 3];
        data[0] = 200;
        let frame = Frame::new(data, 8, 8, 3, 0);

        let mut sink = ImageFileSink::new(&path);
        sink.write(&frame).unwrap();
        sink.close().unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(0, 0).0, [200, 0, 0]);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        let mut sink = ImageFileSink::new(Path::new("/no/such/dir/out.png"));
        assert!(sink.write(&frame).is_err());
    }
}
