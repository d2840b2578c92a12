//! gradsnip-io - Image I/O for GradSnip
//!
//! Reads and writes [`Image`] buffers:
//!
//! | format | read | write | feature |
//! |---|---|---|---|
//! | PNG | 8-bit gray/GA/RGB/RGBA, palette and other depths expanded | 1-4 channels | `png-format` |
//! | PNM | binary P5, P6 | P5 (1 channel), P6 (3 channels) | `pnm` |
//! | JPEG | gray, RGB, CMYK as RGB | - | `jpeg` |
//! | BMP | 1/4/8-bit palette and 24-bit as RGB, 32-bit as RGBA | - | `bmp` |
//! | GIF | first frame as RGBA | - | `gif-format` |
//!
//! The input format is detected from the file contents, the output format
//! is given by the caller (see [`ImageFormat::from_path`]).

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "gif-format")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use gradsnip_core::ImageFormat;

use gradsnip_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its contents.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    let image = read_image_format(BufReader::new(file), format)?;
    log::debug!(
        "read {}: {}x{}x{} ({:?})",
        path.display(),
        image.width(),
        image.height(),
        image.channels(),
        format
    );
    Ok(image)
}

/// Read an image from memory, detecting the format from its contents.
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Read an image of a known format from a buffered reader.
#[allow(unused_variables)]
pub fn read_image_format<R>(reader: R, format: ImageFormat) -> IoResult<Image>
where
    R: std::io::BufRead + std::io::Seek,
{
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(reader),
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(reader),
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => gif::read_gif(reader),
        _ => Err(IoError::UnsupportedFormat(format!(
            "reading {:?} is not supported",
            format
        ))),
    }
}

/// Write an image to a file in the given format.
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_format(image, &mut writer, format)?;
    writer.flush()?;
    log::debug!("wrote {} ({:?})", path.display(), format);
    Ok(())
}

/// Encode an image into memory in the given format.
pub fn write_image_mem(image: &Image, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_format(image, &mut buffer, format)?;
    Ok(buffer)
}

/// Encode an image to a writer in the given format.
#[allow(unused_variables)]
pub fn write_image_format<W: Write>(image: &Image, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(image, writer),
        _ => Err(IoError::UnsupportedFormat(format!(
            "writing {:?} is not supported",
            format
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_roundtrip_png() {
        let image = Image::from_samples(3, 1, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let data = write_image_mem(&image, ImageFormat::Png).unwrap();
        let image2 = read_image_mem(&data).unwrap();
        assert_eq!(image2.samples(), image.samples());
        assert_eq!(image2.informat(), ImageFormat::Png);
    }

    #[test]
    fn test_write_unsupported() {
        let image = Image::new(1, 1, 1).unwrap();
        assert!(matches!(
            write_image_mem(&image, ImageFormat::Jpeg),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            write_image_mem(&image, ImageFormat::Bmp),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            write_image_mem(&image, ImageFormat::Unknown),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_image("/nonexistent/dir/page.png"),
            Err(IoError::Io(_))
        ));
    }
}
