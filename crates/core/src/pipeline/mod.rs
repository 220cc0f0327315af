pub mod frame_pipeline;
pub mod stream_use_case;
