pub mod blur_redactor;
mod gaussian;
pub mod pixelate_redactor;
pub mod redactor_factory;
