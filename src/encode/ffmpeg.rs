use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::RgbImage;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameSize};
use crate::foundation::error::{TimelapseError, TimelapseResult};

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output AVI file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// MJPEG quantizer (`-q:v`), 2 (best) to 31 (worst).
    pub quality: u8,
}

impl FfmpegSinkOpts {
    /// Create options for writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            quality: 3,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB24 frames to its stdin.
///
/// Output is Motion-JPEG in an AVI container. Dropping a sink that was started but never
/// ended tears the process down and removes the partial file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Output file path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn join_stderr(&mut self) -> TimelapseResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TimelapseError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TimelapseError::encode(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn remove_output(&self) {
        match std::fs::remove_file(&self.opts.out_path) {
            Ok(()) => tracing::warn!(
                path = %self.opts.out_path.display(),
                "removed incomplete output"
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.opts.out_path.display(),
                error = %e,
                "failed to remove incomplete output"
            ),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TimelapseResult<()> {
        if self.child.is_some() {
            return Err(TimelapseError::encode("ffmpeg sink already started"));
        }
        cfg.size.validate()?;
        if self.opts.quality < 2 || self.opts.quality > 31 {
            return Err(TimelapseError::validation(
                "mjpeg quality must be within 2..=31",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(TimelapseError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(TimelapseError::encode(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        // The system binary avoids native FFmpeg dev header/lib requirements.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.size.width, cfg.size.height),
            "-r",
            &cfg.fps.get().to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "mjpeg",
            "-q:v",
            &self.opts.quality.to_string(),
            "-pix_fmt",
            mjpeg_pix_fmt(cfg.size),
            "-f",
            "avi",
        ])
        .arg(&self.opts.out_path);

        tracing::debug!(cmd = ?cmd, "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|e| {
            TimelapseError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TimelapseError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TimelapseError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> TimelapseResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TimelapseError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(TimelapseError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }

        if frame.dimensions() != (cfg.size.width, cfg.size.height) {
            return Err(TimelapseError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.size.width,
                cfg.size.height
            )));
        }
        if frame.as_raw().len() != cfg.size.rgb24_len() {
            return Err(TimelapseError::validation(
                "frame data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TimelapseError::encode("ffmpeg sink is already finalized"));
        };
        stdin.write_all(frame.as_raw()).map_err(|e| {
            TimelapseError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> TimelapseResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TimelapseError::encode("ffmpeg sink not started"))?;
        self.cfg = None;

        let status = child.wait().map_err(|e| {
            TimelapseError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        });
        let stderr_bytes = self.join_stderr();

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                self.remove_output();
                return Err(e);
            }
        };
        if !status.success() {
            let stderr = stderr_bytes
                .map(|b| String::from_utf8_lossy(&b).trim().to_owned())
                .unwrap_or_default();
            self.remove_output();
            return Err(TimelapseError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        stderr_bytes?;

        tracing::debug!(path = %self.opts.out_path.display(), "ffmpeg finished");
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        self.cfg = None;

        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        let _ = child.wait();
        let _ = self.join_stderr();
        self.remove_output();
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

/// Full-range pixel format for the MJPEG stream: 4:2:0 when both sides are even, else 4:4:4.
pub fn mjpeg_pix_fmt(size: FrameSize) -> &'static str {
    if size.is_even() { "yuvj420p" } else { "yuvj444p" }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TimelapseResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
