use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_sink::FrameSink;

/// Pushes redacted frames to an RTSP server through an `ffmpeg` encoder
/// child process.
///
/// ffmpeg reads rawvideo rgb24 from stdin, encodes with low-latency x264
/// settings, and publishes over RTSP/TCP. When the encoder or the server
/// goes away the stdin write fails with a broken pipe, which surfaces as
/// an error the capture loop treats as terminal.
pub struct RtspEncoderSink {
    child: Child,
    stdin: Option<ChildStdin>,
    frame_bytes: usize,
    written: usize,
}

impl RtspEncoderSink {
    pub fn open(
        ffmpeg_exe: &str,
        rtsp_url: &str,
        metadata: &StreamMetadata,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let size = format!("{}x{}", metadata.width, metadata.height);
        let rate = format!("{}", metadata.fps.round() as i64);

        let mut cmd = Command::new(ffmpeg_exe);
        cmd.args(["-loglevel", "warning"])
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgb24"])
            .args(["-s", &size])
            .args(["-r", &rate])
            .args(["-i", "-"])
            .arg("-an")
            .args(["-c:v", "libx264"])
            .args(["-preset", "ultrafast"])
            .args(["-tune", "zerolatency"])
            .args(["-crf", "28"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-g", "30"])
            .args(["-f", "rtsp"])
            .args(["-rtsp_transport", "tcp"])
            .arg(rtsp_url)
            .stdin(Stdio::piped())
            .stdout(Stdio::null());

        log::info!("Streaming {size} @ {rate} fps to {rtsp_url} via {ffmpeg_exe}");
        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to start ffmpeg encoder ({ffmpeg_exe}): {e}"))?;
        let stdin = child.stdin.take().ok_or("ffmpeg child has no stdin pipe")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            frame_bytes: metadata.frame_bytes(),
            written: 0,
        })
    }
}

impl FrameSink for RtspEncoderSink {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.data().len() != self.frame_bytes {
            return Err(format!(
                "frame size mismatch: got {} bytes, sink expects {}",
                frame.data().len(),
                self.frame_bytes
            )
            .into());
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or("encoder sink is already closed")?;

        stdin.write_all(frame.data()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                "encoder pipe closed (ffmpeg exited or RTSP server unreachable)".into()
            } else {
                Box::<dyn std::error::Error>::from(e)
            }
        })?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Dropping stdin sends EOF so ffmpeg can flush its encoder.
        self.stdin.take();
        let status = self.child.wait()?;
        log::info!("Encoder exited ({status}) after {} frames", self.written);
        Ok(())
    }
}

impl Drop for RtspEncoderSink {
    fn drop(&mut self) {
        self.stdin.take();
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_fails_at_open() {
        let meta = StreamMetadata {
            width: 320,
            height: 240,
            fps: 30.0,
        };
        let result =
            RtspEncoderSink::open("/nonexistent/ffmpeg", "rtsp://127.0.0.1:8554/cam", &meta);
        assert!(result.is_err());
    }
}
