//! Image - The interleaved 8-bit sample buffer
//!
//! `Image` is the buffer type every GradSnip operation consumes and
//! produces: a flat, row-major run of `u8` samples with the channels of
//! each pixel stored next to each other.
//!
//! # Sample layout
//!
//! - Sample `(x, y, c)` lives at `(y * width + x) * channels + c`
//! - Rows are tightly packed, there is no padding
//! - 1 channel is gray, 2 gray + alpha, 3 RGB, 4 RGBA
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared ownership).
//! To modify samples, convert to `ImageMut` via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Largest supported number of interleaved channels.
pub const MAX_CHANNELS: u32 = 4;

/// Image file format
///
/// Records where an image came from and selects the encoder on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format (images created in memory)
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// JFIF JPEG format
    Jpeg,
    /// Binary PNM (PGM / PPM)
    Pnm,
    /// Windows bitmap
    Bmp,
    /// GIF (first frame)
    Gif,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pnm => "pnm",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    ///
    /// Returns [`ImageFormat::Unknown`] for extensions that are not recognized.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" | "jpe" | "jfif" => Self::Jpeg,
            "pnm" | "pgm" | "ppm" => Self::Pnm,
            "bmp" | "dib" => Self::Bmp,
            "gif" => Self::Gif,
            _ => Self::Unknown,
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }
}

/// Internal image data
#[derive(Debug, Clone)]
struct ImageData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Interleaved samples per pixel
    channels: u32,
    /// Input file format
    informat: ImageFormat,
    /// Samples, `width * height * channels` long
    data: Vec<u8>,
}

impl ImageData {
    fn sample_count(width: u32, height: u32, channels: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(Error::InvalidChannels(channels));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or(Error::InvalidDimension { width, height })
    }
}

/// Allocate a zeroed sample vector, reporting allocation failure as an error.
///
/// Large scans can easily reach hundreds of megabytes per buffer, so the
/// buffers are reserved fallibly instead of aborting the process.
pub fn try_alloc_samples(len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed(len))?;
    data.resize(len, 0);
    Ok(data)
}

/// Image - Shared, immutable sample buffer
///
/// # Examples
///
/// ```
/// use gradsnip_core::Image;
///
/// // A 640x480 RGB image, all samples zero
/// let image = Image::new(640, 480, 3).unwrap();
/// assert_eq!(image.width(), 640);
/// assert_eq!(image.samples().len(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new image with all samples set to zero.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if width or height is 0
    /// - [`Error::InvalidChannels`] if `channels` is not in `1..=4`
    /// - [`Error::AllocationFailed`] if the samples cannot be allocated
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self> {
        let len = ImageData::sample_count(width, height, channels)?;
        let data = try_alloc_samples(len)?;
        Ok(Self::from_data(width, height, channels, data))
    }

    /// Wrap an existing sample vector.
    ///
    /// # Errors
    ///
    /// Same as [`Image::new`], plus [`Error::SampleLengthMismatch`] if
    /// `data.len() != width * height * channels`.
    pub fn from_samples(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let expected = ImageData::sample_count(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::SampleLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_data(width, height, channels, data))
    }

    fn from_data(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Image {
            inner: Arc::new(ImageData {
                width,
                height,
                channels,
                informat: ImageFormat::Unknown,
                data,
            }),
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.inner.channels
    }

    /// Get `(width, height, channels)`.
    #[inline]
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.inner.width, self.inner.height, self.inner.channels)
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// All samples, row-major and channel-interleaved.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.inner.data
    }

    /// Number of samples in one row (`width * channels`).
    #[inline]
    pub fn row_len(&self) -> usize {
        self.inner.width as usize * self.inner.channels as usize
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &self.inner.data[start..start + len]
    }

    /// Try to get mutable access to the samples.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Get mutable access, copying the samples only if they are shared.
    pub fn into_mut(self) -> ImageMut {
        match self.try_into_mut() {
            Ok(image_mut) => image_mut,
            Err(shared) => shared.to_mut(),
        }
    }

    /// Create a mutable copy of this image.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Like [`Image::to_mut`], but reports allocation failure instead of
    /// aborting.
    pub fn try_to_mut(&self) -> Result<ImageMut> {
        let len = self.inner.data.len();
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailed(len))?;
        data.extend_from_slice(&self.inner.data);
        Ok(ImageMut {
            inner: ImageData {
                data,
                ..*self.inner
            },
        })
    }
}

/// Mutable image
///
/// Exclusive owner of its samples. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.inner.channels
    }

    /// Get `(width, height, channels)`.
    #[inline]
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.inner.width, self.inner.height, self.inner.channels)
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Set the input file format.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// All samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.inner.data
    }

    /// All samples, mutable.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Number of samples in one row (`width * channels`).
    #[inline]
    pub fn row_len(&self) -> usize {
        self.inner.width as usize * self.inner.channels as usize
    }

    /// Samples of row `y`, mutable.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &mut self.inner.data[start..start + len]
    }

    /// Set every sample to `val`.
    pub fn fill(&mut self, val: u8) {
        self.inner.data.fill(val);
    }
}

impl From<ImageMut> for Image {
    fn from(image_mut: ImageMut) -> Self {
        Image {
            inner: Arc::new(image_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image = Image::new(100, 200, 3).unwrap();
        assert_eq!(image.width(), 100);
        assert_eq!(image.height(), 200);
        assert_eq!(image.channels(), 3);
        assert_eq!(image.samples().len(), 100 * 200 * 3);
        assert_eq!(image.row_len(), 300);
        assert!(image.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_image_creation_invalid() {
        assert!(matches!(
            Image::new(0, 100, 1),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Image::new(100, 0, 1),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(Image::new(10, 10, 0), Err(Error::InvalidChannels(0))));
        assert!(matches!(Image::new(10, 10, 5), Err(Error::InvalidChannels(5))));
    }

    #[test]
    fn test_from_samples_length_check() {
        assert!(Image::from_samples(2, 2, 1, vec![0; 4]).is_ok());
        assert!(matches!(
            Image::from_samples(2, 2, 1, vec![0; 5]),
            Err(Error::SampleLengthMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_clone_shares_data() {
        let a = Image::new(10, 10, 1).unwrap();
        let b = a.clone();
        assert_eq!(a.samples().as_ptr(), b.samples().as_ptr());

        let c: Image = a.to_mut().into();
        assert_ne!(a.samples().as_ptr(), c.samples().as_ptr());
    }

    #[test]
    fn test_try_into_mut_requires_unique() {
        let a = Image::new(4, 4, 1).unwrap();
        let b = a.clone();
        let a = a.try_into_mut().unwrap_err();
        drop(b);
        let mut m = a.try_into_mut().unwrap();
        m.fill(7);
        let back: Image = m.into();
        assert!(back.samples().iter().all(|&s| s == 7));
    }

    #[test]
    fn test_into_mut_copies_shared() {
        let a = Image::from_samples(2, 1, 1, vec![1, 2]).unwrap();
        let keep = a.clone();
        let mut m = a.into_mut();
        m.samples_mut()[0] = 9;
        assert_eq!(keep.samples(), &[1, 2]);
        assert_eq!(m.samples(), &[9, 2]);
    }

    #[test]
    fn test_try_to_mut_preserves_metadata() {
        let a = Image::from_samples(3, 1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let m = a.try_to_mut().unwrap();
        assert_eq!(m.shape(), (3, 1, 2));
        assert_eq!(m.samples(), a.samples());
    }

    #[test]
    fn test_rows() {
        let image = Image::from_samples(2, 2, 1, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(image.row(0), &[1, 2]);
        assert_eq!(image.row(1), &[3, 4]);

        let mut m = image.to_mut();
        m.row_mut(1).copy_from_slice(&[7, 8]);
        assert_eq!(m.samples(), &[1, 2, 7, 8]);
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("pgm"), ImageFormat::Pnm);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("tif"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_extension("Bmp"), ImageFormat::Bmp);
        assert_eq!(ImageFormat::from_extension("gif"), ImageFormat::Gif);
        assert_eq!(ImageFormat::Pnm.extension(), "pnm");
        assert_eq!(ImageFormat::Bmp.extension(), "bmp");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path("out/page.PPM"), ImageFormat::Pnm);
        assert_eq!(ImageFormat::from_path("scan.jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("noext"), ImageFormat::Unknown);
    }
}
