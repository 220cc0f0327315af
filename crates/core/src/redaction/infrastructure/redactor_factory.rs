use std::str::FromStr;

use thiserror::Error;

use crate::redaction::domain::frame_redactor::FrameRedactor;

use super::blur_redactor::GaussianBlurRedactor;
use super::pixelate_redactor::PixelateRedactor;

/// Which obfuscation transform the pipeline applies. One setting per
/// pipeline, not per region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedactionMode {
    Blur,
    Pixelate,
}

#[derive(Error, Debug)]
pub enum RedactorSelectError {
    #[error("unknown redaction mode \"{0}\" (expected blur or pixel)")]
    Unknown(String),
}

impl FromStr for RedactionMode {
    type Err = RedactorSelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blur" => Ok(RedactionMode::Blur),
            "pixel" | "pixelate" => Ok(RedactionMode::Pixelate),
            other => Err(RedactorSelectError::Unknown(other.to_string())),
        }
    }
}

/// Create the redactor for `mode` with its fixed strength constants.
pub fn create_redactor(mode: RedactionMode) -> Box<dyn FrameRedactor> {
    match mode {
        RedactionMode::Blur => {
            log::info!("Redaction mode: gaussian blur");
            Box::new(GaussianBlurRedactor::default())
        }
        RedactionMode::Pixelate => {
            log::info!("Redaction mode: pixelation");
            Box::new(PixelateRedactor::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;
    use rstest::rstest;

    #[rstest]
    #[case("blur", RedactionMode::Blur)]
    #[case("Blur", RedactionMode::Blur)]
    #[case(" pixel ", RedactionMode::Pixelate)]
    #[case("PIXELATE", RedactionMode::Pixelate)]
    fn test_mode_names_parse(#[case] name: &str, #[case] expected: RedactionMode) {
        assert_eq!(name.parse::<RedactionMode>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = "mosaic".parse::<RedactionMode>().unwrap_err();
        assert!(err.to_string().contains("unknown redaction mode"));
    }

    #[rstest]
    #[case(RedactionMode::Blur)]
    #[case(RedactionMode::Pixelate)]
    fn test_created_redactor_is_not_identity(#[case] mode: RedactionMode) {
        let mut data = vec![0u8; 32 * 32 * 3];
        for (i, v) in data.iter_mut().enumerate() {
            *v = (i % 251) as u8;
        }
        let mut frame = Frame::new(data.clone(), 32, 32, 3, 0);

        let redactor = create_redactor(mode);
        redactor
            .redact(&mut frame, &[Region::new(0, 0, 32, 32)])
            .unwrap();

        assert_ne!(frame.data(), &data[..]);
    }
}
