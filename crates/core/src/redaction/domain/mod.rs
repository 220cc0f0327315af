pub mod frame_redactor;
