//! Game controllers
//!
//! Up to [`MAX_PLAYERS`] pads are opened through SDL's game-controller layer.
//! Raw axis values are normalised once per `update`: sticks get a radial dead
//! zone and are rescaled so the edge of the dead zone reads 0 and full
//! deflection reads 1; triggers get a threshold and read 0..=1.
//!
//! Axes follow SDL's convention: +x is right, +y is down.

use sdl2::controller::{Axis, Button, GameController};
use sdl2::GameControllerSubsystem;
use sdl2::Sdl;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const MAX_PLAYERS: usize = 4;

pub const LEFT_STICK_DEADZONE: f32 = 7849.0;
pub const RIGHT_STICK_DEADZONE: f32 = 8689.0;
/// 30/255 of the trigger range
pub const TRIGGER_THRESHOLD: f32 = 3855.0;

const AXIS_MAX: f32 = 32767.0;

/// Map a raw stick to a unit-length-or-less vector with a radial dead zone
pub fn normalize_stick(raw_x: i16, raw_y: i16, deadzone: f32) -> (f32, f32) {
    let (x, y) = (raw_x as f32, raw_y as f32);
    let len = (x * x + y * y).sqrt();
    if len <= deadzone {
        return (0.0, 0.0);
    }
    let magnitude = (len.min(AXIS_MAX) - deadzone) / (AXIS_MAX - deadzone);
    (x / len * magnitude, y / len * magnitude)
}

/// Map a raw trigger (0..=32767) to 0..=1, zero below the threshold
pub fn normalize_trigger(raw: i16) -> f32 {
    let value = raw as f32;
    if value <= TRIGGER_THRESHOLD {
        return 0.0;
    }
    ((value - TRIGGER_THRESHOLD) / (AXIS_MAX - TRIGGER_THRESHOLD)).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl PadButton {
    pub const ALL: [PadButton; 14] = [
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
        PadButton::Start,
        PadButton::Back,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::LeftShoulder,
        PadButton::RightShoulder,
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
    ];

    fn sdl(self) -> Button {
        match self {
            PadButton::DPadUp => Button::DPadUp,
            PadButton::DPadDown => Button::DPadDown,
            PadButton::DPadLeft => Button::DPadLeft,
            PadButton::DPadRight => Button::DPadRight,
            PadButton::Start => Button::Start,
            PadButton::Back => Button::Back,
            PadButton::LeftStick => Button::LeftStick,
            PadButton::RightStick => Button::RightStick,
            PadButton::LeftShoulder => Button::LeftShoulder,
            PadButton::RightShoulder => Button::RightShoulder,
            PadButton::A => Button::A,
            PadButton::B => Button::B,
            PadButton::X => Button::X,
            PadButton::Y => Button::Y,
        }
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Normalised state of one pad, captured by [`Gamepad::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub left: (f32, f32),
    pub right: (f32, f32),
    pub left_trigger: f32,
    pub right_trigger: f32,
    buttons: u16,
}

impl PadState {
    /// Build from raw readings: sticks as (x, y), triggers, and held buttons
    pub fn from_raw(
        left: (i16, i16),
        right: (i16, i16),
        triggers: (i16, i16),
        held: impl IntoIterator<Item = PadButton>,
    ) -> Self {
        Self {
            left: normalize_stick(left.0, left.1, LEFT_STICK_DEADZONE),
            right: normalize_stick(right.0, right.1, RIGHT_STICK_DEADZONE),
            left_trigger: normalize_trigger(triggers.0),
            right_trigger: normalize_trigger(triggers.1),
            buttons: held.into_iter().fold(0, |acc, b| acc | b.bit()),
        }
    }

    #[inline]
    pub fn pressed(&self, button: PadButton) -> bool {
        self.buttons & button.bit() != 0
    }
}

/// One opened controller
pub struct Gamepad {
    controller: GameController,
    player: usize,
    state: PadState,
}

impl Gamepad {
    pub fn player(&self) -> usize {
        self.player
    }

    pub fn name(&self) -> String {
        self.controller.name()
    }

    pub fn instance_id(&self) -> u32 {
        self.controller.instance_id()
    }

    /// Re-read axes and buttons. SDL refreshes them while events are pumped.
    pub fn update(&mut self) {
        let c = &self.controller;
        let held = PadButton::ALL
            .into_iter()
            .filter(|b| c.button(b.sdl()));
        self.state = PadState::from_raw(
            (c.axis(Axis::LeftX), c.axis(Axis::LeftY)),
            (c.axis(Axis::RightX), c.axis(Axis::RightY)),
            (c.axis(Axis::TriggerLeft), c.axis(Axis::TriggerRight)),
            held,
        );
    }

    pub fn state(&self) -> &PadState {
        &self.state
    }

    pub fn pressed(&self, button: PadButton) -> bool {
        self.state.pressed(button)
    }

    /// Rumble both motors; `low`/`high` are 0..=1
    pub fn vibrate(&mut self, low: f32, high: f32, duration_ms: u32) {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16;
        if let Err(e) = self
            .controller
            .set_rumble(scale(low), scale(high), duration_ms)
        {
            debug!(player = self.player, error = %e, "rumble not supported");
        }
    }
}

/// Every connected pad, indexed by player slot
pub struct Controllers {
    subsystem: GameControllerSubsystem,
    pads: Vec<Option<Gamepad>>,
}

impl Controllers {
    pub fn new(sdl: &Sdl) -> Result<Self> {
        let subsystem = sdl.game_controller().map_err(Error::BackendInit)?;
        let mut controllers = Self {
            subsystem,
            pads: (0..MAX_PLAYERS).map(|_| None).collect(),
        };
        controllers.probe();
        Ok(controllers)
    }

    /// Re-open controllers after a hot-plug
    pub fn probe(&mut self) {
        self.pads.iter_mut().for_each(|p| *p = None);

        let count = match self.subsystem.num_joysticks() {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "could not enumerate joysticks");
                return;
            },
        };

        let mut player = 0;
        for index in 0..count {
            if player >= MAX_PLAYERS {
                break;
            }
            if !self.subsystem.is_game_controller(index) {
                continue;
            }
            match self.subsystem.open(index) {
                Ok(controller) => {
                    info!(player, name = %controller.name(), "controller connected");
                    self.pads[player] = Some(Gamepad {
                        controller,
                        player,
                        state: PadState::default(),
                    });
                    player += 1;
                },
                Err(e) => warn!(index, error = %e, "failed to open controller"),
            }
        }
    }

    pub fn update(&mut self) {
        for pad in self.pads.iter_mut().flatten() {
            pad.update();
        }
    }

    pub fn has_controller(&self) -> bool {
        self.pads.iter().any(Option::is_some)
    }

    pub fn player(&self, index: usize) -> Option<&Gamepad> {
        self.pads.get(index).and_then(Option::as_ref)
    }

    pub fn player_mut(&mut self, index: usize) -> Option<&mut Gamepad> {
        self.pads.get_mut(index).and_then(Option::as_mut)
    }

    /// Lowest-numbered connected pad
    pub fn first_player(&self) -> Option<&Gamepad> {
        self.pads.iter().flatten().next()
    }
}
