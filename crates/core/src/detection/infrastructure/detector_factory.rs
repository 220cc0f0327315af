use std::str::FromStr;

use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    BLAZEFACE_MODEL_NAME, BLAZEFACE_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};

use super::downscaled_detector::DownscaledDetector;
use super::model_resolver;
use super::onnx_blazeface_detector::OnnxBlazefaceDetector;
use super::onnx_yolo_detector::OnnxYoloDetector;

/// The closed set of detector backends. New backends are added here, not
/// by string-matching deeper in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorBackend {
    /// BlazeFace, relative coordinates, fixed 0.6 confidence.
    Mediapipe,
    /// YOLO face model, absolute coordinates.
    Yolo,
    /// BlazeFace behind the half-resolution fast path.
    Fast,
}

#[derive(Error, Debug)]
pub enum DetectorSelectError {
    #[error("unknown detector backend \"{0}\" (expected one of: mediapipe, yolo, fast)")]
    Unknown(String),
}

impl FromStr for DetectorBackend {
    type Err = DetectorSelectError;

    /// Case-insensitive, whitespace-trimmed backend lookup. Rejected names
    /// fail here, at construction time, before any frame is processed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mediapipe" => Ok(DetectorBackend::Mediapipe),
            "yolo" => Ok(DetectorBackend::Yolo),
            "fast" => Ok(DetectorBackend::Fast),
            other => Err(DetectorSelectError::Unknown(other.to_string())),
        }
    }
}

/// Build the selected backend, resolving its model assets.
///
/// The returned detector owns its model session for the life of the
/// pipeline; a failure to load assets propagates immediately.
pub fn create_detector(
    backend: DetectorBackend,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match backend {
        DetectorBackend::Mediapipe => {
            let model = model_resolver::resolve(BLAZEFACE_MODEL_NAME, BLAZEFACE_MODEL_URL, None)?;
            log::info!("Using BlazeFace detector ({})", model.display());
            Ok(Box::new(OnnxBlazefaceDetector::new(&model)?))
        }
        DetectorBackend::Yolo => {
            let model = model_resolver::resolve(YOLO_MODEL_NAME, YOLO_MODEL_URL, None)?;
            log::info!("Using YOLO detector ({})", model.display());
            Ok(Box::new(OnnxYoloDetector::new(&model)?))
        }
        DetectorBackend::Fast => {
            let model = model_resolver::resolve(BLAZEFACE_MODEL_NAME, BLAZEFACE_MODEL_URL, None)?;
            log::info!("Using BlazeFace detector at half resolution ({})", model.display());
            let inner = Box::new(OnnxBlazefaceDetector::new(&model)?);
            Ok(Box::new(DownscaledDetector::new(inner)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mediapipe", DetectorBackend::Mediapipe)]
    #[case("yolo", DetectorBackend::Yolo)]
    #[case("fast", DetectorBackend::Fast)]
    #[case("MediaPipe", DetectorBackend::Mediapipe)]
    #[case("  YOLO  ", DetectorBackend::Yolo)]
    #[case("\tFast\n", DetectorBackend::Fast)]
    fn test_backend_names_parse(#[case] name: &str, #[case] expected: DetectorBackend) {
        assert_eq!(name.parse::<DetectorBackend>().unwrap(), expected);
    }

    #[rstest]
    #[case("foo")]
    #[case("")]
    #[case("yolov8 ")]
    fn test_unknown_backend_rejected(#[case] name: &str) {
        let err = name.parse::<DetectorBackend>().unwrap_err();
        assert!(err.to_string().contains("unknown detector backend"));
    }

    #[test]
    fn test_error_message_names_valid_backends() {
        let err = "cascade".parse::<DetectorBackend>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mediapipe"));
        assert!(msg.contains("yolo"));
        assert!(msg.contains("fast"));
    }
}
