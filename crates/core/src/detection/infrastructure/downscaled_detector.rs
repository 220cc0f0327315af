use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{DETECT_DOWNSCALE, MIN_FACE_SIZE};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Decorator that detects on a downscaled copy of the frame.
///
/// Detection cost scales with pixel count, so running the wrapped detector
/// on a half-size copy roughly quarters per-frame latency. Boxes come back
/// in small-image coordinates and are mapped to full-frame coordinates by
/// dividing by the scale factor; anything smaller than `min_size` after
/// mapping is dropped as noise.
pub struct DownscaledDetector {
    inner: Box<dyn FaceDetector>,
    factor: u32,
    min_size: i32,
}

impl DownscaledDetector {
    /// Wrap `inner` with the fixed live-video policy (0.5 scale, 30 px
    /// minimum face).
    pub fn new(inner: Box<dyn FaceDetector>) -> Self {
        Self {
            inner,
            factor: (1.0 / DETECT_DOWNSCALE).round() as u32,
            min_size: MIN_FACE_SIZE,
        }
    }

    pub fn with_params(
        inner: Box<dyn FaceDetector>,
        factor: u32,
        min_size: i32,
    ) -> Result<Self, &'static str> {
        if factor < 1 {
            return Err("downscale factor must be >= 1");
        }
        Ok(Self {
            inner,
            factor,
            min_size,
        })
    }
}

impl FaceDetector for DownscaledDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if self.factor == 1 {
            let regions = self.inner.detect(frame)?;
            return Ok(filter_small(regions, self.min_size));
        }

        let small = downscale_frame(frame, self.factor);
        let small_regions = self.inner.detect(&small)?;

        let factor = self.factor as i32;
        let regions = small_regions
            .iter()
            .map(|r| Region::new(r.x * factor, r.y * factor, r.width * factor, r.height * factor))
            .filter_map(|r| r.clamp_to(frame.width(), frame.height()))
            .collect();

        Ok(filter_small(regions, self.min_size))
    }
}

fn filter_small(regions: Vec<Region>, min_size: i32) -> Vec<Region> {
    regions
        .into_iter()
        .filter(|r| r.width >= min_size && r.height >= min_size)
        .collect()
}

/// Area-average downscale by an integer factor, preserving the frame index.
fn downscale_frame(frame: &Frame, factor: u32) -> Frame {
    let fw = frame.width() as usize;
    let fh = frame.height() as usize;
    let channels = frame.channels() as usize;
    let n = factor as usize;
    let new_w = (fw / n).max(1);
    let new_h = (fh / n).max(1);

    let src = frame.data();
    let mut out = vec![0u8; new_w * new_h * channels];

    for y in 0..new_h {
        for x in 0..new_w {
            for c in 0..channels {
                let mut sum = 0u32;
                let mut count = 0u32;
                for dy in 0..n {
                    for dx in 0..n {
                        let sy = y * n + dy;
                        let sx = x * n + dx;
                        if sy < fh && sx < fw {
                            sum += src[(sy * fw + sx) * channels + c] as u32;
                            count += 1;
                        }
                    }
                }
                out[(y * new_w + x) * channels + c] = (sum / count) as u8;
            }
        }
    }

    Frame::new(
        out,
        new_w as u32,
        new_h as u32,
        frame.channels(),
        frame.index(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    /// Records the frame sizes it was called with and returns fixed regions.
    struct RecordingDetector {
        seen: Arc<Mutex<Vec<(u32, u32)>>>,
        regions: Vec<Region>,
    }

    impl RecordingDetector {
        fn returning(regions: Vec<Region>) -> (Self, Arc<Mutex<Vec<(u32, u32)>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    seen: seen.clone(),
                    regions,
                },
                seen,
            )
        }
    }

    impl FaceDetector for RecordingDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            self.seen
                .lock()
                .unwrap()
                .push((frame.width(), frame.height()));
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }
    }

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![100u8; (w * h * 3) as usize], w, h, 3, 0)
    }

    #[test]
    fn test_inner_sees_downscaled_frame() {
        let (inner, seen) = RecordingDetector::returning(Vec::new());
        let mut detector = DownscaledDetector::with_params(Box::new(inner), 2, 0).unwrap();

        detector.detect(&frame(640, 480)).unwrap();
        detector.detect(&frame(641, 479)).unwrap();

        // Odd dimensions truncate toward zero.
        assert_eq!(&*seen.lock().unwrap(), &[(320, 240), (320, 239)]);
    }

    #[test]
    fn test_boxes_mapped_back_by_scale_factor() {
        let (inner, _) = RecordingDetector::returning(vec![Region::new(10, 20, 30, 40)]);
        let mut detector = DownscaledDetector::with_params(Box::new(inner), 2, 0).unwrap();
        let out = detector.detect(&frame(640, 480)).unwrap();
        assert_eq!(out, vec![Region::new(20, 40, 60, 80)]);
    }

    #[test]
    fn test_scaled_boxes_clamped_to_full_frame() {
        // x=120 w=55 at half scale → x=240 w=110, clipped at the 300-wide edge.
        let (inner, _) = RecordingDetector::returning(vec![Region::new(120, 10, 55, 40)]);
        let mut detector = DownscaledDetector::with_params(Box::new(inner), 2, 0).unwrap();
        let out = detector.detect(&frame(300, 200)).unwrap();
        assert_eq!(out, vec![Region::new(240, 20, 60, 80)]);
    }

    #[test]
    fn test_small_boxes_dropped() {
        let (inner, _) = RecordingDetector::returning(vec![
            Region::new(10, 10, 5, 5),
            Region::new(50, 50, 40, 40),
        ]);
        let mut detector = DownscaledDetector::with_params(Box::new(inner), 2, 30).unwrap();
        let out = detector.detect(&frame(640, 480)).unwrap();
        assert_eq!(out, vec![Region::new(100, 100, 80, 80)]);
    }

    #[test]
    fn test_inner_error_propagates() {
        let mut detector =
            DownscaledDetector::with_params(Box::new(FailingDetector), 2, 30).unwrap();
        assert!(detector.detect(&frame(100, 100)).is_err());
    }

    #[test]
    fn test_factor_one_is_passthrough() {
        let (inner, _) = RecordingDetector::returning(vec![Region::new(10, 20, 50, 60)]);
        let mut detector = DownscaledDetector::with_params(Box::new(inner), 1, 0).unwrap();
        let out = detector.detect(&frame(100, 100)).unwrap();
        assert_eq!(out, vec![Region::new(10, 20, 50, 60)]);
    }

    #[test]
    fn test_zero_factor_rejected() {
        let (inner, _) = RecordingDetector::returning(Vec::new());
        assert!(DownscaledDetector::with_params(Box::new(inner), 0, 0).is_err());
    }

    #[test]
    fn test_downscale_frame_geometry() {
        let small = downscale_frame(&frame(100, 60), 2);
        assert_eq!(small.width(), 50);
        assert_eq!(small.height(), 30);
        assert_eq!(small.channels(), 3);
    }

    #[test]
    fn test_downscale_frame_averages_blocks() {
        // 2×2 frame, one white pixel among three black → average 63 or 64.
        let mut data = vec![0u8; 2 * 2 * 3];
        data[0] = 255;
        data[1] = 255;
        data[2] = 255;
        let small = downscale_frame(&Frame::new(data, 2, 2, 3, 0), 2);
        assert_eq!(small.width(), 1);
        assert_eq!(small.height(), 1);
        assert_eq!(small.data()[0], 63);
    }

    #[test]
    fn test_default_policy_uses_half_scale() {
        let (inner, _) = RecordingDetector::returning(vec![Region::new(20, 20, 30, 30)]);
        let mut detector = DownscaledDetector::new(Box::new(inner));
        let out = detector.detect(&frame(640, 480)).unwrap();
        // 30 small px → 60 full px, above the 30 px minimum.
        assert_eq!(out, vec![Region::new(40, 40, 60, 60)]);
    }
}
