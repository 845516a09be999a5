//! Bouncing-sprite demo
//!
//! A sprite moved with W/A/S/D (or a gamepad d-pad / left stick). When any
//! part of it leaves the buffer it jumps back to the centre and the frame
//! reports an escape so the caller can play the explosion cue.

use sdl2::keyboard::Keycode;
use tracing::debug;

use crate::boundary::BoundaryPolicy;
use crate::compositor::{BlitStats, Compositor};
use crate::display::{PixelBuffer, PresentationSurface};
use crate::error::{Error, Result};
use crate::gamepad::{Controllers, PadButton, PadState};
use crate::geometry::{Extent, Position};
use crate::input::InputSnapshot;
use crate::sprite::SpriteImage;

/// Stick deflection that counts as a held direction
const STICK_PRESS: f32 = 0.5;

/// What one frame produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue {
        /// The sprite escaped and was recentred this frame
        escaped: bool,
        blit: BlitStats,
    },
    Quit,
}

pub struct Bounce {
    sprite: SpriteImage,
    position: Position,
    speed: i32,
    policy: BoundaryPolicy,
    compositor: Compositor,
}

impl Bounce {
    /// Fails if the sprite cannot fit inside `bounds`, since re-centring
    /// would then never produce an in-bounds position.
    pub fn new(sprite: SpriteImage, start: Position, speed: i32, bounds: Extent) -> Result<Self> {
        if sprite.width() > bounds.width || sprite.height() > bounds.height {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} sprite does not fit a {}x{} buffer",
                sprite.width(),
                sprite.height(),
                bounds.width,
                bounds.height
            )));
        }
        Ok(Self {
            sprite,
            position: start,
            speed,
            policy: BoundaryPolicy::new(),
            compositor: Compositor::new(),
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn sprite(&self) -> &SpriteImage {
        &self.sprite
    }

    pub fn escapes(&self) -> u64 {
        self.policy.escapes()
    }

    /// Apply one frame of movement, then the boundary rule.
    /// Returns true if the sprite escaped.
    pub fn update(&mut self, input: &InputSnapshot, pad: Option<&PadState>, bounds: Extent) -> bool {
        let held = |key: Keycode, button: PadButton, stick: bool| {
            input.key_down(key) || pad.is_some_and(|p| p.pressed(button)) || stick
        };
        let (sx, sy) = pad.map_or((0.0, 0.0), |p| p.left);

        let mut dx = 0;
        let mut dy = 0;
        if held(Keycode::W, PadButton::DPadUp, sy < -STICK_PRESS) {
            dy -= self.speed;
        }
        if held(Keycode::S, PadButton::DPadDown, sy > STICK_PRESS) {
            dy += self.speed;
        }
        if held(Keycode::A, PadButton::DPadLeft, sx < -STICK_PRESS) {
            dx -= self.speed;
        }
        if held(Keycode::D, PadButton::DPadRight, sx > STICK_PRESS) {
            dx += self.speed;
        }
        self.position = self.position.offset(dx, dy);

        let outcome = self
            .policy
            .evaluate(self.position, bounds, self.sprite.extent());
        self.position = outcome.position;
        outcome.escaped
    }

    /// Clear to the buffer's background and stamp the sprite
    pub fn render(&self, buffer: &mut PixelBuffer) -> BlitStats {
        buffer.clear();
        self.compositor.blit(&self.sprite, self.position, buffer)
    }

    /// One full frame: poll, update, clear, composite, present.
    pub fn frame<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        buffer: &mut PixelBuffer,
        controllers: Option<&mut Controllers>,
    ) -> Result<Step> {
        let input = surface.poll_events();
        if input.quit_requested() || input.key_down(Keycode::Escape) {
            return Ok(Step::Quit);
        }

        let pad = controllers.and_then(|c| {
            if input.controllers_changed() {
                c.probe();
            }
            c.update();
            c.first_player().map(|p| *p.state())
        });
        if pad.is_some_and(|p| p.pressed(PadButton::Back)) {
            return Ok(Step::Quit);
        }

        let escaped = self.update(&input, pad.as_ref(), buffer.extent());
        let blit = self.render(buffer);
        if escaped {
            debug!(
                x = self.position.x,
                y = self.position.y,
                written = blit.written,
                "recentred"
            );
        }
        surface.present(buffer)?;

        Ok(Step::Continue { escaped, blit })
    }
}
