//! PNM (Portable Any Map) format support
//!
//! Reads and writes binary PGM (P5, one channel) and PPM (P6, three
//! channels). Maxvals other than 255 are rescaled to 8 bits on read;
//! 16-bit samples are big-endian as the format requires.

use crate::{IoError, IoResult};
use gradsnip_core::{Image, ImageFormat};
use std::io::{BufRead, Read, Write};

/// Parsed PNM header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PnmHeader {
    channels: u32,
    width: u32,
    height: u32,
    maxval: u32,
}

fn read_byte<R: BufRead>(reader: &mut R) -> IoResult<Option<u8>> {
    let mut byte = [0u8; 1];
    match reader.read(&mut byte)? {
        0 => Ok(None),
        _ => Ok(Some(byte[0])),
    }
}

/// Read one decimal header field, skipping whitespace and `#` comments.
///
/// Consumes the single whitespace byte that terminates the field.
fn read_field<R: BufRead>(reader: &mut R, name: &str) -> IoResult<u32> {
    let truncated = || IoError::InvalidData(format!("PNM header truncated before {name}"));

    let mut byte = read_byte(reader)?.ok_or_else(truncated)?;
    loop {
        if byte == b'#' {
            while byte != b'\n' {
                byte = read_byte(reader)?.ok_or_else(truncated)?;
            }
        } else if !byte.is_ascii_whitespace() {
            break;
        }
        byte = read_byte(reader)?.ok_or_else(truncated)?;
    }

    let mut value: u32 = 0;
    loop {
        if !byte.is_ascii_digit() {
            return Err(IoError::InvalidData(format!(
                "unexpected byte 0x{byte:02x} in PNM {name}"
            )));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(byte - b'0')))
            .ok_or_else(|| IoError::InvalidData(format!("PNM {name} too large")))?;
        match read_byte(reader)? {
            Some(b) if b.is_ascii_whitespace() => return Ok(value),
            Some(b) => byte = b,
            None => return Err(truncated()),
        }
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> IoResult<PnmHeader> {
    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic)?;
    let channels = match &magic {
        b"P5" => 1,
        b"P6" => 3,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM type {}",
                String::from_utf8_lossy(&magic)
            )));
        }
    };

    let width = read_field(reader, "width")?;
    let height = read_field(reader, "height")?;
    let maxval = read_field(reader, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("PNM maxval {maxval}")));
    }

    Ok(PnmHeader {
        channels,
        width,
        height,
        maxval,
    })
}

/// Read a binary PNM image (P5/P6) from a reader.
///
/// # Returns
/// A one-channel image for PGM and a three-channel image for PPM.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let header = read_header(&mut reader)?;
    log::debug!("PNM header: {:?}", header);

    let mut image = Image::new(header.width, header.height, header.channels)?.into_mut();
    image.set_informat(ImageFormat::Pnm);

    let samples = image.samples_mut();
    if header.maxval < 256 {
        reader.read_exact(samples)?;
        if header.maxval != 255 {
            for s in samples.iter_mut() {
                let v = u32::from(*s).min(header.maxval);
                *s = ((v * 255 + header.maxval / 2) / header.maxval) as u8;
            }
        }
    } else {
        let mut pair = [0u8; 2];
        for s in samples.iter_mut() {
            reader.read_exact(&mut pair)?;
            let v = u32::from(u16::from_be_bytes(pair)).min(header.maxval);
            *s = ((v * 255 + header.maxval / 2) / header.maxval) as u8;
        }
    }

    Ok(image.into())
}

/// Write an image as binary PNM to a writer.
///
/// One channel is written as P5, three channels as P6; other channel
/// counts have no binary PNM form and are rejected.
pub fn write_pnm<W: Write>(image: &Image, mut writer: W) -> IoResult<()> {
    let magic = match image.channels() {
        1 => "P5",
        3 => "P6",
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM cannot store {n} channels"
            )));
        }
    };

    write!(writer, "{}\n{} {}\n255\n", magic, image.width(), image.height())?;
    writer.write_all(image.samples())?;
    writer.flush()?;
    Ok(())
}
