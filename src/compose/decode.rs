use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::foundation::error::{TimelapseError, TimelapseResult};

/// What to do when a source image cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Leave the frame out of the video.
    #[default]
    Skip,
    /// Write a background-only frame in its place.
    Blank,
    /// Stop the run and discard the partial output.
    Abort,
}

/// Read and decode an image file into RGB8.
///
/// The format is sniffed from the file contents, so loosely named files such as
/// `0001_cam.jpg.bak` still decode. Alpha is dropped.
pub fn decode_source(path: &Path) -> TimelapseResult<RgbImage> {
    let decode_err = |source: image::ImageError| TimelapseError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    let img = reader.decode().map_err(decode_err)?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/decode.rs"]
mod tests;
