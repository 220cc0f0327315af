pub mod detector_factory;
pub mod downscaled_detector;
pub mod model_resolver;
pub mod nms;
pub mod onnx_blazeface_detector;
pub mod onnx_yolo_detector;
