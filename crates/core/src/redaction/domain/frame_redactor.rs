use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for irreversibly obscuring regions of a frame.
///
/// Implementations mutate the caller-owned frame in place and touch only
/// pixels inside the given regions. Regions must already be clamped to
/// frame bounds with positive area; single-pixel regions are legal. The
/// transform is a privacy guarantee: output pixels inside a region must
/// not allow the original face to be reconstructed.
pub trait FrameRedactor: Send {
    fn redact(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
