use std::cell::RefCell;

use crate::redaction::domain::frame_redactor::FrameRedactor;
use crate::shared::constants::BLUR_KERNEL_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};

/// Redacts by replacing each region with a strong separable Gaussian blur.
///
/// The kernel is precomputed once; scratch buffers are reused across
/// regions and frames to keep the hot loop allocation-free.
pub struct GaussianBlurRedactor {
    kernel: Vec<f32>,
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
}

impl GaussianBlurRedactor {
    pub fn new(kernel_size: usize) -> Self {
        let kernel_size = kernel_size | 1; // must be odd
        Self {
            kernel: gaussian::gaussian_kernel_1d(kernel_size),
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
        }
    }
}

impl Default for GaussianBlurRedactor {
    fn default() -> Self {
        Self::new(BLUR_KERNEL_SIZE)
    }
}

impl FrameRedactor for GaussianBlurRedactor {
    fn redact(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let fw = frame.width() as usize;
        let channels = frame.channels() as usize;
        let data = frame.data_mut();

        for r in regions {
            let rect = RoiRect {
                x: r.x.max(0) as usize,
                y: r.y.max(0) as usize,
                w: r.width.max(0) as usize,
                h: r.height.max(0) as usize,
            };
            if rect.w == 0 || rect.h == 0 {
                continue;
            }

            let mut roi = self.roi_buf.borrow_mut();
            let mut temp = self.blur_temp.borrow_mut();
            gaussian::extract_roi(data, fw, channels, rect, &mut roi);
            gaussian::blur_with_kernel(&mut roi, rect.w, rect.h, channels, &self.kernel, &mut temp);
            gaussian::write_roi_back(data, &roi, fw, channels, rect);
        }

        Ok(())
    }
}
