pub const BLAZEFACE_MODEL_NAME: &str = "blazeface_short_range.onnx";
pub const BLAZEFACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/blazeface_short_range.onnx";

pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Minimum detection confidence for the BlazeFace backend. Thresholding
/// happens inside the backend; lower-scored boxes are never returned.
pub const BLAZEFACE_CONFIDENCE: f64 = 0.6;

/// Minimum detection confidence for the YOLO backend.
pub const YOLO_CONFIDENCE: f64 = 0.25;

/// Scale factor applied to the frame before detection in the fast path.
pub const DETECT_DOWNSCALE: f64 = 0.5;

/// Smallest face (in full-frame pixels) the fast path will report.
pub const MIN_FACE_SIZE: i32 = 30;

/// Gaussian kernel size for blur redaction. Strong enough that no facial
/// structure survives; weakening it is a privacy regression, not a tweak.
pub const BLUR_KERNEL_SIZE: usize = 51;

/// Pixelation grid: each region is reduced to at most this many blocks
/// per side before being scaled back up.
pub const PIXELATE_GRID: usize = 16;

/// Frames between throughput log lines in the stream loop.
pub const LOG_INTERVAL_FRAMES: usize = 120;
