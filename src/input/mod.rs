//! Per-frame input snapshots
//!
//! The window drains its event queue once per frame into an [`InputState`];
//! logic code only ever sees the immutable [`InputSnapshot`] taken afterwards.
//! Key and button state is latched between polls: a key is "down" from its
//! `KeyDown` event until its `KeyUp` event.

use std::collections::HashSet;

use sdl2::keyboard::Keycode;

/// Backend-neutral event, translated from SDL by the display
#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseDown {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    MouseUp {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    MouseWheel(i32),
    ControllerAdded(u32),
    ControllerRemoved(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Middle,
    Right,
}

impl MouseButtonKind {
    fn slot(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Immutable view of the input devices for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    keys: HashSet<Keycode>,
    mouse: (i32, i32),
    buttons: [bool; 3],
    wheel: i32,
    quit: bool,
    controllers_changed: bool,
}

impl InputSnapshot {
    #[inline]
    pub fn key_down(&self, key: Keycode) -> bool {
        self.keys.contains(&key)
    }

    /// Mouse position in buffer coordinates
    #[inline]
    pub fn mouse(&self) -> (i32, i32) {
        self.mouse
    }

    #[inline]
    pub fn button_down(&self, button: MouseButtonKind) -> bool {
        self.buttons[button.slot()]
    }

    /// Accumulated wheel movement since the window was created
    #[inline]
    pub fn wheel(&self) -> i32 {
        self.wheel
    }

    /// The window was closed
    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// A gamepad was plugged in or removed since the previous snapshot
    #[inline]
    pub fn controllers_changed(&self) -> bool {
        self.controllers_changed
    }
}

/// Accumulates events between snapshots
#[derive(Debug, Default)]
pub struct InputState {
    current: InputSnapshot,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &InputEvent) {
        let s = &mut self.current;
        match *event {
            InputEvent::Quit => s.quit = true,
            InputEvent::KeyDown(key) => {
                s.keys.insert(key);
            },
            InputEvent::KeyUp(key) => {
                s.keys.remove(&key);
            },
            InputEvent::MouseMove { x, y } => s.mouse = (x, y),
            InputEvent::MouseDown { x, y, button } => {
                s.mouse = (x, y);
                s.buttons[button.slot()] = true;
            },
            InputEvent::MouseUp { x, y, button } => {
                s.mouse = (x, y);
                s.buttons[button.slot()] = false;
            },
            InputEvent::MouseWheel(dy) => s.wheel = s.wheel.saturating_add(dy),
            InputEvent::ControllerAdded(_) | InputEvent::ControllerRemoved(_) => {
                s.controllers_changed = true;
            },
        }
    }

    /// Take the frame's snapshot. Edge-style flags reset afterwards; latched
    /// key and button state carries over.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snap = self.current.clone();
        self.current.controllers_changed = false;
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_latch_until_released() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyDown(Keycode::W));
        let first = state.snapshot();
        assert!(first.key_down(Keycode::W));
        assert!(!first.key_down(Keycode::S));

        // No events this frame: still held
        assert!(state.snapshot().key_down(Keycode::W));

        state.apply(&InputEvent::KeyUp(Keycode::W));
        assert!(!state.snapshot().key_down(Keycode::W));
        // Earlier snapshot is unaffected
        assert!(first.key_down(Keycode::W));
    }

    #[test]
    fn test_mouse_buttons_and_position() {
        let mut state = InputState::new();
        state.apply(&InputEvent::MouseMove { x: 4, y: 5 });
        state.apply(&InputEvent::MouseDown {
            x: 6,
            y: 7,
            button: MouseButtonKind::Right,
        });
        let snap = state.snapshot();
        assert_eq!(snap.mouse(), (6, 7));
        assert!(snap.button_down(MouseButtonKind::Right));
        assert!(!snap.button_down(MouseButtonKind::Left));

        state.apply(&InputEvent::MouseUp {
            x: 8,
            y: 9,
            button: MouseButtonKind::Right,
        });
        assert!(!state.snapshot().button_down(MouseButtonKind::Right));
    }

    #[test]
    fn test_wheel_accumulates() {
        let mut state = InputState::new();
        state.apply(&InputEvent::MouseWheel(1));
        state.apply(&InputEvent::MouseWheel(1));
        state.apply(&InputEvent::MouseWheel(-3));
        assert_eq!(state.snapshot().wheel(), -1);
    }

    #[test]
    fn test_quit_latches_and_controller_flag_resets() {
        let mut state = InputState::new();
        state.apply(&InputEvent::ControllerAdded(0));
        state.apply(&InputEvent::Quit);
        let snap = state.snapshot();
        assert!(snap.quit_requested());
        assert!(snap.controllers_changed());

        let next = state.snapshot();
        assert!(next.quit_requested());
        assert!(!next.controllers_changed());
    }
}
