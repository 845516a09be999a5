//! Alpha-tested sprite stamping onto a [`PixelBuffer`]
//!
//! Each sprite pixel is either copied verbatim or skipped. There is no
//! blending: a pixel is drawn when its alpha is strictly greater than the
//! threshold and its destination lies inside the buffer.

use crate::display::PixelBuffer;
use crate::geometry::Position;
use crate::sprite::SpriteImage;

/// Alpha at or below this value is treated as fully transparent
pub const ALPHA_THRESHOLD: u8 = 210;

/// What happened to the sprite's pixels during one blit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlitStats {
    /// Pixels copied into the buffer
    pub written: usize,
    /// In-bounds pixels skipped by the alpha test
    pub transparent: usize,
    /// Pixels whose destination fell outside the buffer
    pub clipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    threshold: u8,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub const fn new() -> Self {
        Self {
            threshold: ALPHA_THRESHOLD,
        }
    }

    pub const fn with_threshold(threshold: u8) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Stamp `sprite` with its top-left corner at `pos`.
    ///
    /// Cost is proportional to the sprite's area, independent of the buffer
    /// size. Cells the sprite does not cover, and cells under transparent
    /// sprite pixels, keep whatever the buffer already held.
    pub fn blit(&self, sprite: &SpriteImage, pos: Position, buffer: &mut PixelBuffer) -> BlitStats {
        let bounds = buffer.extent();
        let mut stats = BlitStats::default();

        for i in 0..sprite.height() {
            let dy = pos.y as i64 + i as i64;
            for n in 0..sprite.width() {
                let dx = pos.x as i64 + n as i64;
                if !bounds.contains(dx, dy) {
                    stats.clipped += 1;
                    continue;
                }
                if sprite.alpha_at(n, i) <= self.threshold {
                    stats.transparent += 1;
                    continue;
                }
                let (r, g, b) = sprite.rgb_at(n, i);
                buffer.put(dx as u32, dy as u32, r, g, b);
                stats.written += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::PixelLayout;

    /// 2x2 RGBA sprite: opaque red, alpha 210 green, alpha 211 blue, alpha 0 white
    fn test_sprite() -> SpriteImage {
        let bytes = [
            255, 0, 0, 255, //
            0, 255, 0, 210, //
            0, 0, 255, 211, //
            255, 255, 255, 0,
        ];
        SpriteImage::from_raw(2, 2, PixelLayout::Rgba, 8, &bytes).unwrap()
    }

    fn blue_buffer(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::with_background(w, h, (0, 0, 255)).unwrap()
    }

    #[test]
    fn test_alpha_test_is_strictly_greater() {
        let sprite = test_sprite();
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let stats = Compositor::new().blit(&sprite, Position::new(1, 1), &mut buf);

        assert_eq!(buf.get_pixel(1, 1), Some((255, 0, 0)));
        // alpha == 210 is skipped
        assert_eq!(buf.get_pixel(2, 1), Some((0, 0, 0)));
        // alpha == 211 is drawn verbatim, no blending
        assert_eq!(buf.get_pixel(1, 2), Some((0, 0, 255)));
        assert_eq!(buf.get_pixel(2, 2), Some((0, 0, 0)));
        assert_eq!(
            stats,
            BlitStats {
                written: 2,
                transparent: 2,
                clipped: 0
            }
        );
    }

    #[test]
    fn test_transparent_pixels_preserve_background() {
        let sprite = test_sprite();
        let mut buf = blue_buffer(2, 2);
        Compositor::new().blit(&sprite, Position::new(0, 0), &mut buf);
        assert_eq!(buf.get_pixel(1, 0), Some((0, 0, 255)));
        assert_eq!(buf.get_pixel(1, 1), Some((0, 0, 255)));
    }

    #[test]
    fn test_partially_offscreen_is_clipped() {
        let sprite = test_sprite();
        let mut buf = PixelBuffer::new(3, 3).unwrap();
        let stats = Compositor::new().blit(&sprite, Position::new(-1, 2), &mut buf);
        // Only sprite pixel (1, 0) lands inside, at (0, 2); it is alpha 210.
        assert_eq!(stats.clipped, 3);
        assert_eq!(stats.written, 0);
        assert!(buf.as_bytes().iter().all(|&v| v == 0));

        let stats = Compositor::new().blit(&sprite, Position::new(2, 2), &mut buf);
        assert_eq!(stats.clipped, 3);
        assert_eq!(buf.get_pixel(2, 2), Some((255, 0, 0)));
    }

    #[test]
    fn test_fully_offscreen_touches_nothing() {
        let sprite = test_sprite();
        let mut buf = blue_buffer(4, 4);
        let before = buf.as_bytes().to_vec();
        for pos in [(-2, 0), (4, 0), (0, -2), (0, 4), (i32::MIN, i32::MAX)] {
            let stats = Compositor::new().blit(&sprite, pos.into(), &mut buf);
            assert_eq!(stats.clipped, 4);
        }
        assert_eq!(buf.as_bytes(), &before[..]);
    }

    #[test]
    fn test_repeat_clear_and_blit_is_idempotent() {
        let sprite = test_sprite();
        let compositor = Compositor::new();
        let mut buf = blue_buffer(6, 5);

        buf.clear();
        compositor.blit(&sprite, Position::new(3, 2), &mut buf);
        let first = buf.as_bytes().to_vec();
        for _ in 0..3 {
            buf.clear();
            compositor.blit(&sprite, Position::new(3, 2), &mut buf);
            assert_eq!(buf.as_bytes(), &first[..]);
        }
    }

    #[test]
    fn test_rgb_sprite_always_drawn() {
        let sprite =
            SpriteImage::from_raw(2, 1, PixelLayout::Rgb, 6, &[1, 2, 3, 4, 5, 6]).unwrap();
        let mut buf = PixelBuffer::new(2, 1).unwrap();
        let stats = Compositor::with_threshold(254).blit(&sprite, Position::default(), &mut buf);
        assert_eq!(stats.written, 2);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    }
}
