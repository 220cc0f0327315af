/// BlazeFace face detector using ONNX Runtime via `ort`.
///
/// The short-range MediaPipe model reports boxes as fractions of the frame
/// dimensions; this backend decodes them, applies its fixed confidence
/// threshold, and converts to clamped absolute pixel regions.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::BLAZEFACE_CONFIDENCE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::nms::{suppress, ScoredBox};

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Anchor count for the short-range model.
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output (box deltas + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Load the BlazeFace ONNX model. Failure here is fatal to the backend
    /// and surfaces immediately; there is no per-frame retry.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence: BLAZEFACE_CONFIDENCE,
            anchors: generate_anchors(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let input_tensor = preprocess(frame, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // Two outputs: regressors [1, 896, 16] and scores [1, 896, 1].
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let candidates = decode_relative_boxes(
            reg_data,
            score_data,
            &self.anchors,
            self.confidence,
        );
        let kept = suppress(candidates, NMS_IOU_THRESH);

        // Relative fractions → absolute pixels, then clamp; degenerate
        // boxes drop out here.
        let regions = kept
            .iter()
            .map(|b| {
                Region::from_relative(
                    b.x1,
                    b.y1,
                    b.x2 - b.x1,
                    b.y2 - b.y1,
                    frame.width(),
                    frame.height(),
                )
            })
            .filter_map(|r| r.clamp_to(frame.width(), frame.height()))
            .collect();

        Ok(regions)
    }
}

/// Decode anchor-relative regressor output into boxes in [0,1] space,
/// keeping only those at or above `min_confidence`.
fn decode_relative_boxes(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    min_confidence: f64,
) -> Vec<ScoredBox> {
    let mut boxes = Vec::new();
    let count = anchors.len().min(score_data.len()).min(NUM_ANCHORS);

    for i in 0..count {
        let score = sigmoid(score_data[i]) as f64;
        if score < min_confidence {
            continue;
        }

        let offset = i * REGRESSOR_STRIDE;
        if offset + 4 > reg_data.len() {
            break;
        }

        let cx = (anchors[i][0] + reg_data[offset] / INPUT_SIZE as f32) as f64;
        let cy = (anchors[i][1] + reg_data[offset + 1] / INPUT_SIZE as f32) as f64;
        let w = (reg_data[offset + 2] / INPUT_SIZE as f32) as f64;
        let h = (reg_data[offset + 3] / INPUT_SIZE as f32) as f64;

        boxes.push(ScoredBox {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
            score,
        });
    }

    boxes
}

/// Resize the frame to `size × size` (nearest neighbor) and normalize to
/// [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let sy = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let sx = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[sy, sx, c]] as f32 / 255.0;
            }
        }
    }
    tensor
}

/// Anchor centers for the short-range model: 16×16 grid with 2 anchors per
/// cell, then 8×8 with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8usize, 2usize), (16, 6)];
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, per_cell) in &strides {
        let grid = INPUT_SIZE as usize / stride;
        for y in 0..grid {
            for x in 0..grid {
                let cx = (x as f32 + 0.5) / grid as f32;
                let cy = (y as f32 + 0.5) / grid as f32;
                for _ in 0..per_cell {
                    anchors.push([cx, cy]);
                }
            }
        }
    }
    anchors
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
