//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale stays one
//! channel, RGB three; CMYK is converted to RGB. Writing is not supported.

use crate::{IoError, IoResult};
use gradsnip_core::{Image, ImageFormat};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    cmyk.chunks_exact(4)
        .flat_map(|p| {
            let k = 255 - u32::from(p[3]);
            let mix = |v: u8| ((255 - u32::from(v)) * k / 255) as u8;
            [mix(p[0]), mix(p[1]), mix(p[2])]
        })
        .collect()
}

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A one-channel (grayscale) or three-channel (RGB) image.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG info unavailable".to_string()))?;

    let (channels, samples) = match info.pixel_format {
        PixelFormat::L8 => (1, pixels),
        // 16-bit samples arrive big-endian; keep the high byte
        PixelFormat::L16 => (1, pixels.chunks_exact(2).map(|p| p[0]).collect()),
        PixelFormat::RGB24 => (3, pixels),
        PixelFormat::CMYK32 => (3, cmyk_to_rgb(&pixels)),
    };

    let image = Image::from_samples(
        u32::from(info.width),
        u32::from(info.height),
        channels,
        samples,
    )?;
    let mut image = image.into_mut();
    image.set_informat(ImageFormat::Jpeg);
    Ok(image.into())
}
