//! Sprite images
//!
//! A [`SpriteImage`] is an RGB or RGBA raster in canonical channel order
//! (red, green, blue, optional alpha) with rows packed back to back. It is
//! built once, either by decoding a file or from a raw decoder buffer, and is
//! read-only afterwards.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Extent;

/// Channel order and count of a raw decoded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }

    fn is_bgr(self) -> bool {
        matches!(self, Self::Bgr | Self::Bgra)
    }
}

/// Row stride most decoders use: `width * channels` rounded up to 4 bytes
pub fn padded_stride(width: u32, channels: usize) -> usize {
    (width as usize * channels + 3) & !3
}

/// An immutable RGB(A) raster
#[derive(Debug, Clone)]
pub struct SpriteImage {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl SpriteImage {
    /// Decode an image file.
    ///
    /// 8-bit RGB and RGBA are kept as they are. Grey, grey+alpha and
    /// high-bit-depth images are converted to 8-bit RGB or RGBA depending on
    /// whether they carry alpha.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| Error::resource(path, e))?;
        let (width, height) = (decoded.width(), decoded.height());

        let (layout, bytes) = match decoded {
            DynamicImage::ImageRgb8(img) => (PixelLayout::Rgb, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (PixelLayout::Rgba, img.into_raw()),
            other @ (DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgb32F(_)) => (PixelLayout::Rgb, other.into_rgb8().into_raw()),
            other @ (DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgba32F(_)) => {
                (PixelLayout::Rgba, other.into_rgba8().into_raw())
            },
            other => {
                return Err(Error::UnsupportedLayout(format!(
                    "{:?} in {}",
                    other.color(),
                    path.display()
                )));
            },
        };

        let stride = width as usize * layout.channels();
        let sprite = Self::from_raw(width, height, layout, stride, &bytes)
            .map_err(|e| Error::resource(path, e))?;
        debug!(
            path = %path.display(),
            width,
            height,
            channels = sprite.channels,
            "loaded sprite"
        );
        Ok(sprite)
    }

    /// Build from a decoder buffer whose rows are `stride` bytes apart.
    ///
    /// Row padding is dropped and BGR(A) input is swapped to RGB(A).
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: PixelLayout,
        stride: usize,
        bytes: &[u8],
    ) -> Result<Self> {
        let channels = layout.channels();
        let row_len = width as usize * channels;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "sprite must be non-empty, got {}x{}",
                width, height
            )));
        }
        if stride < row_len {
            return Err(Error::InvalidDimensions(format!(
                "stride {} is shorter than a {}-byte row",
                stride, row_len
            )));
        }
        // The last row does not need its padding
        let needed = stride * (height as usize - 1) + row_len;
        if bytes.len() < needed {
            return Err(Error::InvalidDimensions(format!(
                "expected at least {} bytes for {}x{} with stride {}, got {}",
                needed,
                width,
                height,
                stride,
                bytes.len()
            )));
        }

        let mut data = Vec::with_capacity(row_len * height as usize);
        if stride == row_len {
            data.extend_from_slice(&bytes[..row_len * height as usize]);
        } else {
            for row in 0..height as usize {
                let start = row * stride;
                data.extend_from_slice(&bytes[start..start + row_len]);
            }
        }

        if layout.is_bgr() {
            for px in data.chunks_exact_mut(channels) {
                px.swap(0, 2);
            }
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// 3 or 4
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Packed samples, `width * channels` bytes per row
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    /// All channels of one pixel. Panics if (x, y) is outside the image;
    /// callers clip first.
    #[inline]
    pub fn sample_at(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.offset(x, y);
        &self.data[idx..idx + self.channels]
    }

    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = self.offset(x, y);
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Stored alpha, or 255 for images without an alpha channel
    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if self.channels == 4 {
            self.data[self.offset(x, y) + 3]
        } else {
            255
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgba_png_alpha_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship.png");
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 1, Rgba([10, 20, 30, 137]));
        img.save(&path).unwrap();

        let sprite = SpriteImage::load(&path).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (4, 3));
        assert!(sprite.has_alpha());
        assert_eq!(sprite.alpha_at(2, 1), 137);
        assert_eq!(sprite.sample_at(2, 1), &[10, 20, 30, 137]);
        assert_eq!(sprite.alpha_at(0, 0), 255);
    }

    #[test]
    fn test_rgb_png_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        let mut img = RgbImage::new(5, 2);
        img.put_pixel(4, 1, Rgb([1, 2, 3]));
        img.save(&path).unwrap();

        let sprite = SpriteImage::load(&path).unwrap();
        assert_eq!(sprite.channels(), 3);
        assert_eq!(sprite.alpha_at(4, 1), 255);
        assert_eq!(sprite.rgb_at(4, 1), (1, 2, 3));
    }

    #[test]
    fn test_grey_png_becomes_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        let img = image::GrayImage::from_pixel(2, 2, image::Luma([77]));
        img.save(&path).unwrap();

        let sprite = SpriteImage::load(&path).unwrap();
        assert_eq!(sprite.channels(), 3);
        assert_eq!(sprite.rgb_at(1, 1), (77, 77, 77));
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let err = SpriteImage::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::ResourceLoad { .. }));
    }

    #[test]
    fn test_garbage_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"this is not a png").unwrap();
        assert!(matches!(
            SpriteImage::load(&path),
            Err(Error::ResourceLoad { .. })
        ));
    }

    #[test]
    fn test_padded_rows_are_stripped() {
        // 3x2 RGB: row length 9, padded to 12
        let stride = padded_stride(3, 3);
        assert_eq!(stride, 12);
        let reference: Vec<u8> = (0..18).collect();
        let mut padded = Vec::new();
        for row in reference.chunks(9) {
            padded.extend_from_slice(row);
            padded.extend_from_slice(&[0xEE; 3]);
        }

        let sprite = SpriteImage::from_raw(3, 2, PixelLayout::Rgb, stride, &padded).unwrap();
        assert_eq!(sprite.as_bytes(), &reference[..]);
        for y in 0..2 {
            for x in 0..3 {
                let i = ((y * 3 + x) * 3) as usize;
                assert_eq!(sprite.sample_at(x, y), &reference[i..i + 3]);
            }
        }
    }

    #[test]
    fn test_bgra_is_swapped_to_rgba() {
        let bgra = [30, 20, 10, 200, 3, 2, 1, 100];
        let sprite = SpriteImage::from_raw(2, 1, PixelLayout::Bgra, 8, &bgra).unwrap();
        assert_eq!(sprite.sample_at(0, 0), &[10, 20, 30, 200]);
        assert_eq!(sprite.sample_at(1, 0), &[1, 2, 3, 100]);
    }

    #[test]
    fn test_bgr_with_padding() {
        // 1x2 BGR, each row padded to 4 bytes
        let bytes = [3, 2, 1, 0, 6, 5, 4, 0];
        let sprite = SpriteImage::from_raw(1, 2, PixelLayout::Bgr, 4, &bytes).unwrap();
        assert_eq!(sprite.rgb_at(0, 0), (1, 2, 3));
        assert_eq!(sprite.rgb_at(0, 1), (4, 5, 6));
        assert!(!sprite.has_alpha());
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(matches!(
            SpriteImage::from_raw(2, 2, PixelLayout::Rgba, 8, &[0; 15]),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(SpriteImage::from_raw(2, 2, PixelLayout::Rgb, 5, &[0; 12]).is_err());
    }
}
