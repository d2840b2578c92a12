//! BMP (Windows bitmap) format support
//!
//! Reads uncompressed bitmaps with a BITMAPINFOHEADER or one of its larger
//! successors. Palette images (1, 4 and 8 bits) and 24-bit images become
//! three-channel RGB, 32-bit images four-channel RGBA. Rows may be stored
//! bottom-up (positive height) or top-down (negative height). Writing is
//! not supported.

use crate::{IoError, IoResult};
use gradsnip_core::{Image, ImageFormat};
use std::io::{self, Read};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Uncompressed
const BI_RGB: u32 = 0;
/// Uncompressed with channel masks; only the usual BGRA layout is read
const BI_BITFIELDS: u32 = 3;

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn skip<R: Read>(reader: &mut R, n: u64) -> IoResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(n), &mut io::sink())?;
    if skipped < n {
        return Err(IoError::InvalidData("BMP file truncated".to_string()));
    }
    Ok(())
}

/// Palette index of pixel `x` in a packed row of 1, 4 or 8 bit indices.
fn palette_index(row: &[u8], x: usize, bits: u16) -> usize {
    let per_byte = 8 / usize::from(bits);
    let byte = row[x / per_byte];
    let shift = 8 - usize::from(bits) * (x % per_byte + 1);
    let mask = ((1u16 << bits) - 1) as u8;
    usize::from((byte >> shift) & mask)
}

/// Read a BMP image from a reader.
///
/// # Returns
/// A three-channel RGB image, or four-channel RGBA for 32-bit files. A
/// 32-bit file whose alpha bytes are all zero is treated as opaque.
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Image> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header)?;
    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }
    let pixel_offset = le_u32(&file_header, 10) as usize;

    let mut info = [0u8; BMP_INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info)?;
    let header_size = le_u32(&info, 0);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::UnsupportedFormat(format!(
            "BMP header size {header_size}"
        )));
    }

    let width = le_u32(&info, 4) as i32;
    let height = le_u32(&info, 8) as i32;
    let planes = le_u16(&info, 12);
    let bits = le_u16(&info, 14);
    let compression = le_u32(&info, 16);
    let colors_used = le_u32(&info, 32) as usize;
    log::debug!(
        "BMP header: {width}x{height}, {bits} bits, compression {compression}, {colors_used} colors"
    );

    if planes != 1 {
        return Err(IoError::InvalidData(format!("BMP planes {planes}")));
    }
    if compression != BI_RGB && !(compression == BI_BITFIELDS && bits == 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "BMP compression {compression}"
        )));
    }
    let channels = match bits {
        1 | 4 | 8 | 24 => 3,
        32 => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!("BMP bit depth {bits}")));
        }
    };
    if width <= 0 || height == 0 {
        return Err(IoError::InvalidData(format!("BMP size {width}x{height}")));
    }

    skip(&mut reader, u64::from(header_size - BMP_INFO_HEADER_SIZE))?;
    let mut position = BMP_FILE_HEADER_SIZE + header_size as usize;

    // Palette entries are stored B, G, R, reserved
    let palette: Vec<[u8; 3]> = if bits <= 8 {
        let max = 1usize << bits;
        let count = match colors_used {
            0 => max,
            n => n.min(max),
        };
        let mut raw = vec![0u8; count * 4];
        reader.read_exact(&mut raw)?;
        position += raw.len();
        raw.chunks_exact(4).map(|q| [q[2], q[1], q[0]]).collect()
    } else {
        Vec::new()
    };

    if pixel_offset > position {
        skip(&mut reader, (pixel_offset - position) as u64)?;
    }

    let width = width as u32;
    let top_down = height < 0;
    let height = height.unsigned_abs();

    let mut image = Image::new(width, height, channels)?.into_mut();
    image.set_informat(ImageFormat::Bmp);

    // Rows are padded to 4 bytes
    let stride = (width as usize * usize::from(bits)).div_ceil(32) * 4;
    let mut row = vec![0u8; stride];
    let mut alpha_seen = false;

    for i in 0..height {
        reader.read_exact(&mut row)?;
        let y = if top_down { i } else { height - 1 - i };
        let out = image.row_mut(y);

        match bits {
            24 => {
                for (px, src) in out.chunks_exact_mut(3).zip(row.chunks_exact(3)) {
                    px.copy_from_slice(&[src[2], src[1], src[0]]);
                }
            }
            32 => {
                for (px, src) in out.chunks_exact_mut(4).zip(row.chunks_exact(4)) {
                    px.copy_from_slice(&[src[2], src[1], src[0], src[3]]);
                    alpha_seen |= src[3] != 0;
                }
            }
            _ => {
                for (x, px) in out.chunks_exact_mut(3).enumerate() {
                    let index = palette_index(&row, x, bits);
                    let color = palette.get(index).ok_or_else(|| {
                        IoError::InvalidData(format!("BMP palette index {index} out of range"))
                    })?;
                    px.copy_from_slice(color);
                }
            }
        }
    }

    if bits == 32 && !alpha_seen {
        for px in image.samples_mut().chunks_exact_mut(4) {
            px[3] = 255;
        }
    }

    Ok(image.into())
}
