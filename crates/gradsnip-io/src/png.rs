//! PNG image format support
//!
//! Palette, low bit depth and 16-bit images are expanded to 8-bit samples
//! on read; the channel count is kept as decoded (gray, gray + alpha, RGB
//! or RGBA).

use crate::{IoError, IoResult};
use gradsnip_core::{Image, ImageFormat, try_alloc_samples};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

fn channels_of(color_type: ColorType) -> IoResult<u32> {
    match color_type {
        ColorType::Grayscale => Ok(1),
        ColorType::GrayscaleAlpha => Ok(2),
        ColorType::Rgb => Ok(3),
        ColorType::Rgba => Ok(4),
        ColorType::Indexed => Err(IoError::UnsupportedFormat(
            "unexpanded PNG palette".to_string(),
        )),
    }
}

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }
    let channels = channels_of(color_type)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = try_alloc_samples(buf_size)?;
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut image = Image::new(width, height, channels)?.into_mut();
    image.set_informat(ImageFormat::Png);

    let bytes_per_row = output_info.line_size;
    let row_len = image.row_len();
    for y in 0..height {
        let start = y as usize * bytes_per_row;
        let src = buf
            .get(start..start + row_len)
            .ok_or_else(|| IoError::InvalidData("truncated PNG frame".to_string()))?;
        image.row_mut(y).copy_from_slice(src);
    }

    Ok(image.into())
}

/// Write a PNG image
///
/// 1 to 4 channels map to gray, gray + alpha, RGB and RGBA, all 8-bit.
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let color_type = match image.channels() {
        1 => ColorType::Grayscale,
        2 => ColorType::GrayscaleAlpha,
        3 => ColorType::Rgb,
        _ => ColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.samples())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(image: &Image) -> Vec<u8> {
        let mut buffer = Vec::new();
        write_png(image, &mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_png_roundtrip_grayscale() {
        let samples: Vec<u8> = (0..100).map(|i| (i * 2) as u8).collect();
        let image = Image::from_samples(10, 10, 1, samples).unwrap();

        let image2 = read_png(Cursor::new(encode(&image))).unwrap();
        assert_eq!(image2.shape(), (10, 10, 1));
        assert_eq!(image2.samples(), image.samples());
        assert_eq!(image2.informat(), ImageFormat::Png);
    }

    #[test]
    fn test_png_keeps_channel_count() {
        for channels in 1..=4 {
            let samples: Vec<u8> = (0..(6 * channels)).map(|i| (i * 9) as u8).collect();
            let image = Image::from_samples(3, 2, channels, samples).unwrap();
            let image2 = read_png(Cursor::new(encode(&image))).unwrap();
            assert_eq!(image2.channels(), channels);
            assert_eq!(image2.samples(), image.samples());
        }
    }

    #[test]
    fn test_png_1bit_expands_to_8bit() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 8, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::One);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0b1010_0000]).unwrap();
            writer.finish().unwrap();
        }
        let image = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(image.shape(), (8, 1, 1));
        assert_eq!(image.samples(), &[255, 0, 255, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_png_garbage() {
        assert!(matches!(
            read_png(Cursor::new(b"not a png".to_vec())),
            Err(IoError::DecodeError(_))
        ));
    }
}
