use crate::error::{Error, Result};
use crate::geometry::Extent;

/// Bytes per cell: tightly packed R, G, B
pub const BYTES_PER_PIXEL: usize = 3;

// ============================================================================
// Utility Functions
// ============================================================================

/// Write an RGB triple to a 3-byte slice
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = r;
    dest[1] = g;
    dest[2] = b;
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// CPU-side RGB888 framebuffer, the size of the display surface.
///
/// Rows are stored top to bottom with no padding, so the pitch is always
/// `width * 3`. The buffer is created once and never resized.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    background: (u8, u8, u8),
}

impl PixelBuffer {
    /// Create a buffer cleared to black
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_background(width, height, (0, 0, 0))
    }

    /// Create a buffer whose `clear()` colour is `background`
    pub fn with_background(width: u32, height: u32, background: (u8, u8, u8)) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "pixel buffer must be non-empty, got {}x{}",
                width, height
            )));
        }
        let mut buffer = Self {
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
            background,
        };
        buffer.clear();
        Ok(buffer)
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

    /// Bytes per row
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    #[inline]
    pub fn background(&self) -> (u8, u8, u8) {
        self.background
    }

    pub fn set_background(&mut self, rgb: (u8, u8, u8)) {
        self.background = rgb;
    }

    /// Byte offset of cell (x, y); caller guarantees it is in range
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Reset every cell to the background colour
    pub fn clear(&mut self) {
        let (r, g, b) = self.background;
        self.clear_to(r, g, b);
    }

    /// Fill every cell with a solid colour
    pub fn clear_to(&mut self, r: u8, g: u8, b: u8) {
        if r == g && g == b {
            self.pixels.fill(r);
            return;
        }
        for chunk in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            write_pixel(chunk, r, g, b);
        }
    }

    /// Write one cell by coordinate
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) -> Result<()> {
        if !self.extent().contains(x as i64, y as i64) {
            return Err(self.out_of_bounds(x as i64, y as i64));
        }
        self.put(x as u32, y as u32, r, g, b);
        Ok(())
    }

    /// Write one cell by linear index (`y * width + x`)
    pub fn set_pixel_at(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        if index >= self.extent().area() {
            let w = self.width as usize;
            return Err(self.out_of_bounds((index % w) as i64, (index / w) as i64));
        }
        let offset = index * BYTES_PER_PIXEL;
        write_pixel(&mut self.pixels[offset..offset + BYTES_PER_PIXEL], r, g, b);
        Ok(())
    }

    /// Write a cell the caller has already clipped against `extent()`
    #[inline]
    pub(crate) fn put(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.pixel_index(x, y);
        write_pixel(&mut self.pixels[idx..idx + BYTES_PER_PIXEL], r, g, b);
    }

    /// Read a cell (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.extent().contains(x as i64, y as i64) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
        } else {
            None
        }
    }

    /// Current contents for presentation. Borrowed, never copied out.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}
