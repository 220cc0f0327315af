use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Captures camera frames through an `ffmpeg` child process.
///
/// ffmpeg opens the platform camera device and emits rawvideo rgb24 on
/// stdout; this source reads exactly one frame's worth of bytes per call.
/// A clean EOF (device unplugged, process exited) is the end-of-stream
/// sentinel, not an error.
pub struct FfmpegCameraSource {
    child: Child,
    stdout: ChildStdout,
    metadata: StreamMetadata,
    index: usize,
}

impl FfmpegCameraSource {
    /// Spawn ffmpeg against `device` (e.g. `/dev/video0` on Linux, an
    /// avfoundation index on macOS, a dshow device name on Windows).
    pub fn open(
        ffmpeg_exe: &str,
        device: &str,
        metadata: StreamMetadata,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let size = format!("{}x{}", metadata.width, metadata.height);
        let rate = format!("{}", metadata.fps.round() as i64);

        let mut cmd = Command::new(ffmpeg_exe);
        cmd.args(["-loglevel", "warning"])
            .args(["-f", capture_format()])
            .args(["-video_size", &size])
            .args(["-framerate", &rate])
            .args(["-i", &device_arg(device)])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdout(Stdio::piped())
            .stdin(Stdio::null());

        log::info!("Opening camera {device} at {size} @ {rate} fps via {ffmpeg_exe}");
        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to start ffmpeg ({ffmpeg_exe}): {e}"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or("ffmpeg child has no stdout pipe")?;

        Ok(Self {
            child,
            stdout,
            metadata,
            index: 0,
        })
    }
}

impl FrameSource for FfmpegCameraSource {
    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut data = vec![0u8; self.metadata.frame_bytes()];
        match self.stdout.read_exact(&mut data) {
            Ok(()) => {
                let frame = Frame::new(
                    data,
                    self.metadata.width,
                    self.metadata.height,
                    3,
                    self.index,
                );
                self.index += 1;
                Ok(Some(frame))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                log::info!("Camera stream ended after {} frames", self.index);
                Ok(None)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    fn close(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for FfmpegCameraSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// ffmpeg input format for the platform camera stack.
fn capture_format() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "v4l2"
    }
    #[cfg(target_os = "macos")]
    {
        "avfoundation"
    }
    #[cfg(target_os = "windows")]
    {
        "dshow"
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        "v4l2"
    }
}

/// dshow expects `video=<name>`; other stacks take the device path as-is.
fn device_arg(device: &str) -> String {
    #[cfg(target_os = "windows")]
    {
        format!("video={device}")
    }
    #[cfg(not(target_os = "windows"))]
    {
        device.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_format_is_known_stack() {
        assert!(["v4l2", "avfoundation", "dshow"].contains(&capture_format()));
    }

    #[test]
    fn test_missing_executable_fails_at_open() {
        let meta = StreamMetadata {
            width: 320,
            height: 240,
            fps: 30.0,
        };
        let result = FfmpegCameraSource::open("/nonexistent/ffmpeg", "/dev/video0", meta);
        assert!(result.is_err());
    }
}
