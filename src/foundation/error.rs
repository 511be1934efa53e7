use std::path::PathBuf;

use crate::foundation::core::FrameSize;

/// Convenience result type used across the crate.
pub type TimelapseResult<T> = Result<T, TimelapseError>;

/// Error type returned by scanning, ordering, compositing and encoding.
#[derive(thiserror::Error, Debug)]
pub enum TimelapseError {
    /// Invalid configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The input directory could not be opened for listing.
    #[error("cannot open input directory '{}': {source}", .path.display())]
    DirectoryOpen {
        /// Directory that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source image could not be read or decoded.
    #[error("decode error: '{}': {source}", .path.display())]
    Decode {
        /// Image that failed to decode.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A source image exceeds the canvas and oversize images are rejected.
    #[error(
        "image {width}x{height} does not fit the {}x{} canvas",
        .canvas.width,
        .canvas.height
    )]
    ImageTooLarge {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
        /// Target canvas size.
        canvas: FrameSize,
    },

    /// The output stream could not be opened, written or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// There is nothing to encode.
    #[error("no frames to encode: {0}")]
    NoFrames(String),

    /// Any other error, usually I/O with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimelapseError {
    /// Build a [`TimelapseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TimelapseError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TimelapseError::NoFrames`] value.
    pub fn no_frames(msg: impl Into<String>) -> Self {
        Self::NoFrames(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
