/// Properties of one capture session: fixed for its whole duration.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl StreamMetadata {
    /// Bytes per RGB24 frame at this geometry.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bytes() {
        let meta = StreamMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
        };
        assert_eq!(meta.frame_bytes(), 640 * 480 * 3);
    }
}
