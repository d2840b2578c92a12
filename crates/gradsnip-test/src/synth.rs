//! Synthetic test images
//!
//! The regression tests need images whose correct binarization is known,
//! so they are generated here instead of being loaded from disk.

use crate::TestResult;
use gradsnip_core::Image;

/// Darkest background value of [`unevenly_lit_page`] (left edge).
pub const PAGE_DARK: u32 = 60;
/// Brightest background value of [`unevenly_lit_page`] (right edge).
pub const PAGE_BRIGHT: u32 = 250;

/// Whether `(x, y)` is covered by ink on the synthetic page.
///
/// The page is a grid of "words": a 3-pixel horizontal stroke every 16 rows
/// and a 2-pixel vertical stem at the start of every 24-column cell.
pub fn page_ink(x: u32, y: u32) -> bool {
    let (cx, cy) = (x % 24, y % 16);
    let line = (6..9).contains(&cy) && cx < 18;
    let stem = (2..4).contains(&cx) && (3..9).contains(&cy);
    line || stem
}

/// Background intensity of column `x` on a page of width `width`.
pub fn page_background(x: u32, width: u32) -> u8 {
    let span = width.saturating_sub(1).max(1);
    (PAGE_DARK + (PAGE_BRIGHT - PAGE_DARK) * x / span) as u8
}

/// Grayscale page lit from the right.
///
/// The background rises linearly from [`PAGE_DARK`] to [`PAGE_BRIGHT`];
/// ink has 40% of the local background. Ink on the bright side is lighter
/// than paper on the dark side, so no single global threshold separates
/// them, while a threshold that follows the background does.
pub fn unevenly_lit_page(width: u32, height: u32) -> TestResult<Image> {
    let mut image = Image::new(width, height, 1)?.to_mut();
    for y in 0..height {
        let row = image.row_mut(y);
        for (x, s) in (0..width).zip(row.iter_mut()) {
            let bg = page_background(x, width);
            *s = if page_ink(x, y) {
                (u32::from(bg) * 2 / 5) as u8
            } else {
                bg
            };
        }
    }
    Ok(image.into())
}

/// Smooth multi-channel image
///
/// Channel 0 is a horizontal ramp, channel 1 a vertical ramp, channel 2 a
/// diagonal ramp and channel 3 a constant 200.
pub fn gradient_image(width: u32, height: u32, channels: u32) -> TestResult<Image> {
    let mut image = Image::new(width, height, channels)?.to_mut();
    let wspan = width.saturating_sub(1).max(1);
    let hspan = height.saturating_sub(1).max(1);
    for y in 0..height {
        for x in 0..width {
            let ramps = [
                (x * 255 / wspan) as u8,
                (y * 255 / hspan) as u8,
                ((x + y) * 255 / (wspan + hspan)) as u8,
                200,
            ];
            image.set_pixel(x, y, &ramps[..channels as usize])?;
        }
    }
    Ok(image.into())
}

/// Encode `image` as an uncompressed, bottom-up BMP file.
///
/// Images with fewer than three channels are stored as 8-bit indices into
/// a gray palette built from channel 0; others as 24-bit RGB from the first
/// three channels. The workspace only reads BMP, so inputs are built here.
pub fn bmp_bytes(image: &Image) -> Vec<u8> {
    let (width, height, channels) = image.shape();
    let paletted = channels < 3;
    let bits: u16 = if paletted { 8 } else { 24 };
    let stride = (width as usize * usize::from(bits)).div_ceil(32) * 4;
    let offset = 14 + 40 + if paletted { 256 * 4 } else { 0 };
    let file_size = offset + stride * height as usize;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(offset as u32).to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(&[0; 24]);

    if paletted {
        for v in 0..=255u8 {
            out.extend_from_slice(&[v, v, v, 0]);
        }
    }

    let ch = channels as usize;
    for y in (0..height).rev() {
        let start = out.len();
        for px in image.row(y).chunks_exact(ch) {
            if paletted {
                out.push(px[0]);
            } else {
                out.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        out.resize(start + stride, 0);
    }
    out
}
