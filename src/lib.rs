//! Timelapse assembles a directory of numbered still images into a single video.
//!
//! # Pipeline overview
//!
//! 1. **Scan**: list `input_dir` (non-recursive) and keep names containing `.jpg` or `.png`
//! 2. **Order**: extract the numeric token from each name and sort numerically
//!    ([`order_candidates`])
//! 3. **Compose**: decode each image and center it on a fixed-size background canvas
//!    ([`compose_centered`])
//! 4. **Encode**: push frames in order into a [`FrameSink`], finalized exactly once
//!    ([`FfmpegSink`] streams to the system `ffmpeg` binary, MJPEG in AVI)
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic ordering**: the frame order is a total order over the discovered names, so
//!   repeated runs over an unchanged directory produce the same sequence.
//! - **No scaling**: images are copied verbatim; oversize images are clipped or rejected.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod encode;
mod foundation;
mod pipeline;
mod sequence;

pub use compose::canvas::{
    Composited, OverflowPolicy, blank_canvas, centered_offset, compose_centered,
};
pub use compose::decode::{DecodePolicy, decode_source};
pub use encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path, mjpeg_pix_fmt,
};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Fps, FrameIndex, FrameSize, MAX_FRAME_SIDE, Rgb8};
pub use foundation::error::{TimelapseError, TimelapseResult};
pub use pipeline::assemble::{AssembleStats, assemble, plan_sequence, run_timelapse};
pub use pipeline::config::{DEFAULT_OUTPUT_NAME, TimelapseConfig};
pub use sequence::order::{
    DEFAULT_DELIMITER, MalformedPolicy, OrderKey, OrderedSequence, SequencedEntry,
    compare_entries, order_candidates,
};
pub use sequence::scan::{discover_candidates, is_image_name};
