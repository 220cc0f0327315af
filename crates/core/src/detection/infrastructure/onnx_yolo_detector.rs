/// YOLO face detector using ONNX Runtime via `ort`.
///
/// Letterboxes the frame to the model input, decodes detections to absolute
/// pixel corner coordinates, and rounds them to integer pixel bounds. A
/// frame may yield zero or many boxes; neither case is special.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::YOLO_CONFIDENCE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::nms::{suppress, ScoredBox};

/// Model input resolution when the ONNX graph has dynamic dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO face ONNX model and prepare for inference.
    ///
    /// Input resolution is read from the model's NCHW input shape, falling
    /// back to 640 when dynamic. Load failure is fatal and propagates.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        Ok(Self {
            session,
            confidence: YOLO_CONFIDENCE,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let (input_tensor, scale, pad_x, pad_y) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let candidates = parse_detections(data, &shape, self.confidence, scale, pad_x, pad_y)?;
        let kept = suppress(candidates, NMS_IOU_THRESH);

        let regions = kept
            .iter()
            .map(|b| Region::from_corners(b.x1, b.y1, b.x2, b.y2))
            .filter_map(|r| r.clamp_to(frame.width(), frame.height()))
            .collect();

        Ok(regions)
    }
}

/// Decode the raw output tensor into absolute-pixel scored boxes.
///
/// YOLO exports come in both [1, features, detections] and
/// [1, detections, features] layouts; rows are `[cx, cy, w, h, conf, ...]`
/// in letterbox coordinates, mapped back here via `scale` and padding.
fn parse_detections(
    data: &[f32],
    shape: &[usize],
    min_confidence: f64,
    scale: f64,
    pad_x: u32,
    pad_y: u32,
) -> Result<Vec<ScoredBox>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < 5 {
        return Err(format!("YOLO output rows too short: {num_feats} features").into());
    }

    let at = |det: usize, feat: usize| -> f64 {
        if transposed {
            data[feat * num_dets + det] as f64
        } else {
            data[det * num_feats + feat] as f64
        }
    };

    let mut boxes = Vec::new();
    for i in 0..num_dets {
        let conf = at(i, 4);
        if conf < min_confidence {
            continue;
        }

        let cx = at(i, 0);
        let cy = at(i, 1);
        let w = at(i, 2);
        let h = at(i, 3);

        boxes.push(ScoredBox {
            x1: ((cx - w / 2.0) - pad_x as f64) / scale,
            y1: ((cy - h / 2.0) - pad_y as f64) / scale,
            x2: ((cx + w / 2.0) - pad_x as f64) / scale,
            y2: ((cy + h / 2.0) - pad_y as f64) / scale,
            score: conf,
        });
    }
    Ok(boxes)
}

/// Letterbox-resize a frame to `target × target`, preserving aspect ratio
/// with gray padding. Returns `(NCHW float32 tensor, scale, pad_x, pad_y)`.
fn letterbox(frame: &Frame, target: u32) -> (ndarray::Array4<f32>, f64, u32, u32) {
    let src = frame.as_ndarray();
    let src_w = frame.width() as usize;
    let src_h = frame.height() as usize;
    let t = target as usize;

    let scale = (t as f64 / src_w as f64).min(t as f64 / src_h as f64);
    let new_w = ((src_w as f64 * scale) as usize).max(1);
    let new_h = ((src_h as f64 * scale) as usize).max(1);
    let pad_x = (t - new_w) / 2;
    let pad_y = (t - new_h) / 2;

    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, t, t), 114.0 / 255.0);
    for y in 0..new_h {
        let sy = (((y as f64 + 0.5) / scale) as usize).min(src_h - 1);
        for x in 0..new_w {
            let sx = (((x as f64 + 0.5) / scale) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y + pad_y, x + pad_x]] = src[[sy, sx, c]] as f32 / 255.0;
            }
        }
    }

    (tensor, scale, pad_x as u32, pad_y as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_letterbox_square_frame_has_no_padding() {
        let frame = Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 3, 0);
        let (tensor, scale, pad_x, pad_y) = letterbox(&frame, 640);
        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert_relative_eq!(scale, 6.4);
        assert_eq!(pad_x, 0);
        assert_eq!(pad_y, 0);
    }

    #[test]
    fn test_letterbox_wide_frame_pads_vertically() {
        let frame = Frame::new(vec![0u8; 200 * 100 * 3], 200, 100, 3, 0);
        let (_tensor, scale, pad_x, pad_y) = letterbox(&frame, 640);
        assert_relative_eq!(scale, 3.2);
        assert_eq!(pad_x, 0);
        assert_eq!(pad_y, 160); // (640 - 320) / 2
    }

    #[test]
    fn test_letterbox_padding_is_gray() {
        let frame = Frame::new(vec![0u8; 200 * 100 * 3], 200, 100, 3, 0);
        let (tensor, _, _, _) = letterbox(&frame, 640);
        // Top padding row stays at the fill value.
        assert!((tensor[[0, 0, 0, 0]] - 114.0 / 255.0).abs() < 1e-6);
        // Image area is overwritten with frame content (black).
        assert!(tensor[[0, 0, 320, 320]].abs() < 1e-6);
    }

    /// [1, detections, features] rows, zero-filled except the listed dets.
    fn plain_rows(rows: &[[f32; 5]], total_dets: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; total_dets * 5];
        for (i, row) in rows.iter().enumerate() {
            data[i * 5..(i + 1) * 5].copy_from_slice(row);
        }
        data
    }

    #[test]
    fn test_parse_detections_plain_layout() {
        // [1, 6, 5]: six detections, one above threshold.
        // cx=100, cy=50, w=40, h=20, conf=0.9
        let data = plain_rows(&[[100.0, 50.0, 40.0, 20.0, 0.9]], 6);
        let boxes = parse_detections(&data, &[1, 6, 5], 0.25, 1.0, 0, 0).unwrap();
        assert_eq!(boxes.len(), 1);
        assert!((boxes[0].x1 - 80.0).abs() < 1e-9);
        assert!((boxes[0].y2 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_detections_transposed_layout() {
        // [1, 5, 8]: features along axis 1, eight detections.
        // det 0: cx=10 cy=10 w=4 h=4 conf=0.8; the rest conf=0.
        let mut data = vec![0.0f32; 5 * 8];
        data[0] = 10.0; // cx
        data[8] = 10.0; // cy
        data[16] = 4.0; // w
        data[24] = 4.0; // h
        data[32] = 0.8; // conf
        let boxes = parse_detections(&data, &[1, 5, 8], 0.25, 1.0, 0, 0).unwrap();
        assert_eq!(boxes.len(), 1);
        assert!((boxes[0].x1 - 8.0).abs() < 1e-9);
        assert!((boxes[0].x2 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_detections_unmaps_letterbox() {
        // scale 2, pad (10, 20): letterbox box (30..50, 40..60) → (10..20, 10..20)
        let data = plain_rows(&[[40.0, 50.0, 20.0, 20.0, 0.9]], 6);
        let boxes = parse_detections(&data, &[1, 6, 5], 0.25, 2.0, 10, 20).unwrap();
        assert!((boxes[0].x1 - 10.0).abs() < 1e-9);
        assert!((boxes[0].y1 - 10.0).abs() < 1e-9);
        assert!((boxes[0].x2 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_detections_rejects_bad_shape() {
        assert!(parse_detections(&[], &[1, 5], 0.25, 1.0, 0, 0).is_err());
    }

    #[test]
    fn test_no_detections_above_threshold_is_empty() {
        let data = plain_rows(&[[100.0, 50.0, 40.0, 20.0, 0.1]], 6);
        let boxes = parse_detections(&data, &[1, 6, 5], 0.25, 1.0, 0, 0).unwrap();
        assert!(boxes.is_empty());
    }
}
