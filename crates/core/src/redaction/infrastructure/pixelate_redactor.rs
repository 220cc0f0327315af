use std::cell::RefCell;

use crate::redaction::domain::frame_redactor::FrameRedactor;
use crate::shared::constants::PIXELATE_GRID;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};

/// Redacts by mosaicing: each region is area-averaged down to at most
/// `grid × grid` blocks, then scaled back up with nearest-neighbor
/// interpolation. The grid is aggressive enough that individual facial
/// features are not recoverable from the blocks.
pub struct PixelateRedactor {
    grid: usize,
    roi_buf: RefCell<Vec<u8>>,
}

impl PixelateRedactor {
    pub fn new(grid: usize) -> Self {
        Self {
            grid: grid.max(1),
            roi_buf: RefCell::new(Vec::new()),
        }
    }
}

impl Default for PixelateRedactor {
    fn default() -> Self {
        Self::new(PIXELATE_GRID)
    }
}

impl FrameRedactor for PixelateRedactor {
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
            gaussian::extract_roi(data, fw, channels, rect, &mut roi);
            mosaic(&mut roi, rect.w, rect.h, channels, self.grid);
            gaussian::write_roi_back(data, &roi, fw, channels, rect);
        }

        Ok(())
    }
}

/// Replace the buffer contents with a `grid × grid` block mosaic.
///
/// Each block becomes the area average of the pixels it covers. When the
/// ROI is smaller than the grid, the block size floors at one pixel, which
/// makes the transform the identity only for ROIs that are already at most
/// one block large in each direction.
fn mosaic(data: &mut [u8], width: usize, height: usize, channels: usize, grid: usize) {
    let cols = grid.min(width);
    let rows = grid.min(height);

    for by in 0..rows {
        let y0 = by * height / rows;
        let y1 = ((by + 1) * height / rows).max(y0 + 1);
        for bx in 0..cols {
            let x0 = bx * width / cols;
            let x1 = ((bx + 1) * width / cols).max(x0 + 1);

            for c in 0..channels {
                let mut sum = 0u32;
                for y in y0..y1 {
                    for x in x0..x1 {
                        sum += data[(y * width + x) * channels + c] as u32;
                    }
                }
                let avg = (sum / ((y1 - y0) * (x1 - x0)) as u32) as u8;
                for y in y0..y1 {
                    for x in x0..x1 {
                        data[(y * width + x) * channels + c] = avg;
                    }
                }
            }
        }
    }
}
