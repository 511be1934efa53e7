use image::RgbImage;

use crate::foundation::core::{Fps, FrameIndex, FrameSize};
use crate::foundation::error::{TimelapseError, TimelapseResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output canvas size.
    pub size: FrameSize,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming composited frames in sequence order.
///
/// Lifecycle: `begin` once, `push_frame` with strictly increasing [`FrameIndex`], then exactly
/// one of `end` (finalize the output) or `abort` (discard it).
pub trait FrameSink {
    /// Open the output stream.
    fn begin(&mut self, cfg: SinkConfig) -> TimelapseResult<()>;
    /// Append one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> TimelapseResult<()>;
    /// Flush and close the output stream.
    fn end(&mut self) -> TimelapseResult<()>;
    /// Tear down an unfinished stream and discard what was written. Must be safe to call in any
    /// state.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbImage)>,
    ended: usize,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, RgbImage)] {
        &self.frames
    }

    /// How many times `end` was called.
    pub fn end_count(&self) -> usize {
        self.ended
    }

    /// Whether `abort` was called.
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TimelapseResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = 0;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> TimelapseResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| TimelapseError::encode("in-memory sink not started"))?;
        if frame.dimensions() != (cfg.size.width, cfg.size.height) {
            return Err(TimelapseError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.size.width,
                cfg.size.height
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(TimelapseError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TimelapseResult<()> {
        self.ended += 1;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
