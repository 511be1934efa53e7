use image::RgbImage;

use crate::foundation::{
    core::{FrameSize, Rgb8},
    error::{TimelapseError, TimelapseResult},
};

/// What to do with a source image larger than the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the centered part that fits; the rest is cropped.
    #[default]
    Clip,
    /// Fail with [`TimelapseError::ImageTooLarge`].
    Reject,
}

/// A canvas-sized frame built from one source image.
#[derive(Clone, Debug)]
pub struct Composited {
    /// Frame pixels, exactly canvas-sized.
    pub frame: RgbImage,
    /// Top-left position of the source on the canvas; negative when it overflows.
    pub offset: (i64, i64),
    /// Whether part of the source fell outside the canvas.
    pub clipped: bool,
}

/// Canvas filled entirely with `background`.
pub fn blank_canvas(size: FrameSize, background: Rgb8) -> RgbImage {
    RgbImage::from_pixel(size.width, size.height, background.to_pixel())
}

/// Offset that centers a `width` x `height` image on `canvas` (floor division).
pub fn centered_offset(canvas: FrameSize, width: u32, height: u32) -> (i64, i64) {
    let x = (i64::from(canvas.width) - i64::from(width)).div_euclid(2);
    let y = (i64::from(canvas.height) - i64::from(height)).div_euclid(2);
    (x, y)
}

/// Center `source` on a fresh `size` canvas filled with `background`.
///
/// Pixels are copied verbatim, without scaling. The copy region is clipped to the canvas, so an
/// oversize source never writes out of bounds; under [`OverflowPolicy::Reject`] it is an error
/// instead.
pub fn compose_centered(
    source: &RgbImage,
    size: FrameSize,
    background: Rgb8,
    overflow: OverflowPolicy,
) -> TimelapseResult<Composited> {
    let (iw, ih) = source.dimensions();
    let clipped = !size.fits(iw, ih);
    if clipped && overflow == OverflowPolicy::Reject {
        return Err(TimelapseError::ImageTooLarge {
            width: iw,
            height: ih,
            canvas: size,
        });
    }

    let mut frame = blank_canvas(size, background);
    let offset = centered_offset(size, iw, ih);
    blit_clipped(&mut frame, source, offset);

    Ok(Composited {
        frame,
        offset,
        clipped,
    })
}

fn blit_clipped(dst: &mut RgbImage, src: &RgbImage, (x, y): (i64, i64)) {
    let (cw, ch) = (i64::from(dst.width()), i64::from(dst.height()));
    let (iw, ih) = (i64::from(src.width()), i64::from(src.height()));

    let (sx, sy) = ((-x).max(0), (-y).max(0));
    let (dx, dy) = (x.max(0), y.max(0));
    let w = (iw - sx).min(cw - dx);
    let h = (ih - sy).min(ch - dy);
    if w <= 0 || h <= 0 {
        return;
    }

    let row_bytes = (w * 3) as usize;
    let src_buf = src.as_raw();
    let dst_buf: &mut [u8] = dst;
    for row in 0..h {
        let s = (((sy + row) * iw + sx) * 3) as usize;
        let d = (((dy + row) * cw + dx) * 3) as usize;
        dst_buf[d..d + row_bytes].copy_from_slice(&src_buf[s..s + row_bytes]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
