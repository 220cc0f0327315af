pub mod ffmpeg_camera_source;
pub mod image_file_sink;
pub mod image_file_source;
pub mod rtsp_encoder_sink;
