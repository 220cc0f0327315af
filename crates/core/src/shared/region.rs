/// A candidate face bounding box in full-frame pixel coordinates.
///
/// Detector backends produce these in their native conventions (relative
/// fractions, float corners) via the constructors below; everything past
/// `clamp_to` is guaranteed in-bounds with positive area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts a box reported as fractions of the frame dimensions
    /// (MediaPipe convention: `xmin`, `ymin`, `width`, `height` in [0,1]).
    pub fn from_relative(xmin: f64, ymin: f64, width: f64, height: f64, frame_w: u32, frame_h: u32) -> Self {
        Self {
            x: (xmin * frame_w as f64).round() as i32,
            y: (ymin * frame_h as f64).round() as i32,
            width: (width * frame_w as f64).round() as i32,
            height: (height * frame_h as f64).round() as i32,
        }
    }

    /// Converts float corner coordinates (YOLO convention: `x1,y1,x2,y2`
    /// in absolute pixels, possibly non-integer) to integer pixel bounds.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let x = x1.round() as i32;
        let y = y1.round() as i32;
        Self {
            x,
            y,
            width: x2.round() as i32 - x,
            height: y2.round() as i32 - y,
        }
    }

    /// Clamps the region to `[0, frame_w) × [0, frame_h)`.
    ///
    /// Returns `None` when nothing with positive area remains. Boxes that
    /// touch or exceed the frame edge are ordinary detector noise, so a
    /// degenerate result is a silent drop, never an error. Idempotent on
    /// regions already in bounds.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x.saturating_add(self.width)).min(frame_w as i32);
        let y2 = (self.y.saturating_add(self.height)).min(frame_h as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }
}
