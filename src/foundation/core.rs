use std::str::FromStr;

use crate::foundation::error::{TimelapseError, TimelapseResult};

/// Zero-based position of a frame in the output stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer output frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(u32);

impl Fps {
    /// Build a frame rate; zero is rejected.
    pub fn new(fps: u32) -> TimelapseResult<Self> {
        if fps == 0 {
            return Err(TimelapseError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Largest accepted canvas side in pixels, matching the `image` crate's default decode limits.
pub const MAX_FRAME_SIDE: u32 = 16_384;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Build a canvas size; see [`FrameSize::validate`].
    pub fn new(width: u32, height: u32) -> TimelapseResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Check that both dimensions are non-zero and at most [`MAX_FRAME_SIDE`].
    ///
    /// Odd dimensions are accepted.
    pub fn validate(self) -> TimelapseResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TimelapseError::validation(
                "frame width/height must be non-zero",
            ));
        }
        if self.width > MAX_FRAME_SIDE || self.height > MAX_FRAME_SIDE {
            return Err(TimelapseError::validation(format!(
                "frame {}x{} exceeds the maximum of {MAX_FRAME_SIDE} pixels per side",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Whether both dimensions divide evenly for 2x2 chroma subsampling.
    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }

    /// Size of one RGB24 frame in bytes.
    pub fn rgb24_len(self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Whether an image of `width` x `height` fits without clipping.
    pub fn fits(self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Solid black, the default background.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `image` pixel.
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl FromStr for Rgb8 {
    type Err = TimelapseError;

    /// Parse `RRGGBB` hex, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TimelapseError::validation(format!(
                "color '{s}' must be 6 hex digits (RRGGBB)"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| TimelapseError::validation(format!("color '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
