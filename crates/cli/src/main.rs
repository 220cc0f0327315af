use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use camblur_core::detection::infrastructure::detector_factory::{create_detector, DetectorBackend};
use camblur_core::pipeline::frame_pipeline::RedactionPipeline;
use camblur_core::pipeline::stream_use_case::RedactStreamUseCase;
use camblur_core::redaction::infrastructure::redactor_factory::{create_redactor, RedactionMode};
use camblur_core::shared::stream_metadata::StreamMetadata;
use camblur_core::video::domain::frame_sink::FrameSink;
use camblur_core::video::domain::frame_source::FrameSource;
use camblur_core::video::infrastructure::ffmpeg_camera_source::FfmpegCameraSource;
use camblur_core::video::infrastructure::image_file_sink::ImageFileSink;
use camblur_core::video::infrastructure::image_file_source::ImageFileSource;
use camblur_core::video::infrastructure::rtsp_encoder_sink::RtspEncoderSink;

#[cfg(target_os = "linux")]
const DEFAULT_DEVICE: &str = "/dev/video0";
#[cfg(not(target_os = "linux"))]
const DEFAULT_DEVICE: &str = "0";

/// Redact faces in a live camera stream and publish it over RTSP.
#[derive(Parser)]
#[command(name = "camblur")]
struct Cli {
    /// Detection backend: mediapipe, yolo or fast.
    #[arg(long, default_value = "mediapipe")]
    detector: String,

    /// Redaction mode: blur or pixelate.
    #[arg(long, default_value = "blur")]
    mode: String,

    /// Capture device (v4l2 path, avfoundation index or dshow name).
    #[arg(long, default_value = DEFAULT_DEVICE)]
    device: String,

    /// Capture width in pixels.
    #[arg(long, default_value = "640")]
    width: u32,

    /// Capture height in pixels.
    #[arg(long, default_value = "480")]
    height: u32,

    /// Capture frame rate.
    #[arg(long, default_value = "30")]
    fps: f64,

    /// RTSP publish URL (falls back to the RTSP_URL environment variable).
    #[arg(long)]
    rtsp_url: Option<String>,

    /// ffmpeg executable (falls back to the FFMPEG_EXE environment variable).
    #[arg(long)]
    ffmpeg: Option<String>,

    /// Redact a single image instead of streaming.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output path for --input (required with it).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let backend: DetectorBackend = cli.detector.parse()?;
    let mode: RedactionMode = cli.mode.parse()?;
    let pipeline = RedactionPipeline::new(create_detector(backend)?, create_redactor(mode));

    let (source, sink): (Box<dyn FrameSource>, Box<dyn FrameSink>) = match cli.input {
        Some(ref input) => {
            let output = cli.output.as_ref().ok_or("--input requires --output")?;
            (
                Box::new(ImageFileSource::open(input)?),
                Box::new(ImageFileSink::new(output)),
            )
        }
        None => {
            let ffmpeg = cli
                .ffmpeg
                .or_else(|| env::var("FFMPEG_EXE").ok())
                .unwrap_or_else(|| "ffmpeg".to_string());
            let rtsp_url = cli
                .rtsp_url
                .or_else(|| env::var("RTSP_URL").ok())
                .unwrap_or_else(|| "rtsp://localhost:8554/stream".to_string());
            let metadata = StreamMetadata {
                width: cli.width,
                height: cli.height,
                fps: cli.fps,
            };
            let sink = RtspEncoderSink::open(&ffmpeg, &rtsp_url, &metadata)?;
            let source = FfmpegCameraSource::open(&ffmpeg, &cli.device, metadata)?;
            log::info!("Publishing to {rtsp_url}");
            (Box::new(source), Box::new(sink))
        }
    };

    let mut use_case = RedactStreamUseCase::new(source, sink, pipeline, None);
    let summary = use_case.execute()?;
    log::info!(
        "Done: {} frames, {} faces redacted",
        summary.frames,
        summary.faces
    );
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.width == 0 || cli.height == 0 {
        return Err(format!(
            "Capture size must be nonzero, got {}x{}",
            cli.width, cli.height
        )
        .into());
    }
    if !cli.fps.is_finite() || cli.fps <= 0.0 {
        return Err(format!("Frame rate must be positive, got {}", cli.fps).into());
    }
    if let Some(ref input) = cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    Ok(())
}
