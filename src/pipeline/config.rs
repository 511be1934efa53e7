use std::path::PathBuf;

use crate::{
    compose::{canvas::OverflowPolicy, decode::DecodePolicy},
    foundation::{
        core::{Fps, FrameSize, Rgb8},
        error::{TimelapseError, TimelapseResult},
    },
    sequence::order::{DEFAULT_DELIMITER, MalformedPolicy},
};

/// File name written into the output directory unless overridden.
pub const DEFAULT_OUTPUT_NAME: &str = "video.avi";

/// Settings for one run, fixed from start to finish.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimelapseConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas size.
    pub size: FrameSize,
    /// Canvas fill color.
    pub background: Rgb8,
    /// Directory scanned for snapshots.
    pub input_dir: PathBuf,
    /// Directory the video is written into.
    pub output_dir: PathBuf,
    /// Video file name inside `output_dir`.
    pub output_name: String,
    /// Character that ends the numeric token in snapshot names.
    pub delimiter: char,
    /// Placement of names without a sequence index.
    pub malformed: MalformedPolicy,
    /// Handling of images that fail to decode.
    pub on_decode_error: DecodePolicy,
    /// Handling of images larger than the canvas.
    pub oversize: OverflowPolicy,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl TimelapseConfig {
    /// Config with default policies, black background and `video.avi`.
    pub fn new(
        fps: u32,
        width: u32,
        height: u32,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> TimelapseResult<Self> {
        Ok(Self {
            fps: Fps::new(fps)?,
            size: FrameSize::new(width, height)?,
            background: Rgb8::BLACK,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            output_name: DEFAULT_OUTPUT_NAME.to_owned(),
            delimiter: DEFAULT_DELIMITER,
            malformed: MalformedPolicy::default(),
            on_decode_error: DecodePolicy::default(),
            oversize: OverflowPolicy::default(),
            overwrite: true,
        })
    }

    /// Full path of the video file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// Re-check invariants after fields were edited directly.
    pub fn validate(&self) -> TimelapseResult<()> {
        Fps::new(self.fps.get())?;
        self.size.validate()?;
        if self.output_name.is_empty()
            || self.output_name.contains(std::path::is_separator)
        {
            return Err(TimelapseError::validation(format!(
                "output name '{}' must be a plain file name",
                self.output_name
            )));
        }
        if std::path::is_separator(self.delimiter) {
            return Err(TimelapseError::validation(
                "delimiter must not be a path separator",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
