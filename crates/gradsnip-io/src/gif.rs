//! GIF image format support
//!
//! Reads the first frame of a GIF with the `gif` crate. The frame is placed
//! on a canvas of the logical screen size and returned as four-channel
//! RGBA. Pixels the frame does not cover, and pixels of the transparent
//! color index, are transparent black. Later frames of an animation are
//! ignored. Writing is not supported.

use crate::{IoError, IoResult};
use gif::{ColorOutput, DecodeOptions};
use gradsnip_core::{Image, ImageFormat};
use std::io::Read;

/// Read the first frame of a GIF image from a reader.
pub fn read_gif<R: Read>(reader: R) -> IoResult<Image> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::Indexed);

    let mut decoder = options
        .read_info(reader)
        .map_err(|e| IoError::DecodeError(format!("GIF decode error: {}", e)))?;
    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);

    let frame = decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .ok_or_else(|| IoError::InvalidData("no frames in GIF".to_string()))?;

    // Local palette wins over the global one
    let palette = frame
        .palette
        .as_deref()
        .or(global_palette.as_deref())
        .ok_or_else(|| IoError::InvalidData("GIF has no color map".to_string()))?;
    log::debug!(
        "GIF screen {width}x{height}, frame {}x{} at ({}, {}), {} colors",
        frame.width,
        frame.height,
        frame.left,
        frame.top,
        palette.len() / 3
    );

    let mut image = Image::new(width, height, 4)?.into_mut();
    image.set_informat(ImageFormat::Gif);

    let frame_width = usize::from(frame.width);
    if frame_width == 0 {
        return Ok(image.into());
    }

    let (left, top) = (u32::from(frame.left), u32::from(frame.top));
    for (fy, src) in frame.buffer.chunks_exact(frame_width).enumerate() {
        let y = top + fy as u32;
        if y >= height {
            break;
        }
        let dst = image.row_mut(y);
        for (fx, &index) in src.iter().enumerate() {
            let x = (left + fx as u32) as usize;
            if x >= width as usize {
                break;
            }
            if frame.transparent == Some(index) {
                continue;
            }
            let at = usize::from(index) * 3;
            let rgb = palette.get(at..at + 3).ok_or_else(|| {
                IoError::InvalidData(format!("GIF color index {index} out of range"))
            })?;
            let px = &mut dst[x * 4..x * 4 + 4];
            px[..3].copy_from_slice(rgb);
            px[3] = 255;
        }
    }

    Ok(image.into())
}
