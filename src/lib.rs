//! framekit: a small software-framebuffer toolkit on SDL2.
//!
//! Frames are drawn into a CPU-side [`PixelBuffer`], sprites are stamped onto
//! it with a binary alpha test by the [`Compositor`], and the finished buffer
//! is handed to a [`PresentationSurface`]. Sound, gamepads and timing sit
//! beside that pipeline; [`bounce`] ties them together into the demo the
//! binary runs.

pub mod audio;
pub mod bounce;
pub mod boundary;
pub mod compositor;
pub mod config;
pub mod display;
pub mod error;
pub mod gamepad;
pub mod geometry;
pub mod input;
pub mod sprite;
pub mod timer;

pub use audio::SoundManager;
pub use bounce::{Bounce, Step};
pub use boundary::{BoundaryOutcome, BoundaryPolicy, BoundaryState};
pub use compositor::{BlitStats, Compositor, ALPHA_THRESHOLD};
pub use config::Config;
pub use display::{Display, DisplayOptions, PixelBuffer, PresentationSurface, WindowSurface};
pub use error::{Error, Result};
pub use gamepad::{Controllers, PadButton, PadState};
pub use geometry::{Extent, Position};
pub use input::{InputEvent, InputSnapshot, InputState};
pub use sprite::{PixelLayout, SpriteImage};
pub use timer::{FpsCounter, Timer};
