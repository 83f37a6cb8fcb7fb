//! Held-key state for both players
//!
//! Raw key identifiers are mapped to a [`Control`] by the key bindings; this
//! module only tracks which controls are currently held.

use serde::{Deserialize, Serialize};

use super::state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Shield,
}

impl Action {
    pub const COUNT: usize = 6;
    pub const ALL: [Action; Action::COUNT] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Fire,
        Action::Shield,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// One player's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Control {
    pub side: Side,
    pub action: Action,
}

/// What the host should do with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not one of ours; leave the event alone
    Ignored,
    /// The lock key: cancel the platform default, change nothing
    Suppressed,
    Handled(Control),
}

/// Pressed/released flag per control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pressed: [[bool; Action::COUNT]; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, control: Control, down: bool) {
        self.pressed[control.side.index()][control.action.index()] = down;
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed[control.side.index()][control.action.index()]
    }

    #[inline]
    pub fn held(&self, side: Side, action: Action) -> bool {
        self.is_pressed(Control { side, action })
    }

    /// Release everything (e.g. the window lost focus and key-ups will never arrive)
    pub fn clear(&mut self) {
        self.pressed = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_are_independent() {
        let mut input = InputState::new();
        let p1_left = Control {
            side: Side::One,
            action: Action::Left,
        };
        input.set(p1_left, true);

        assert!(input.held(Side::One, Action::Left));
        assert!(!input.held(Side::Two, Action::Left));
        assert!(!input.held(Side::One, Action::Right));

        input.set(p1_left, false);
        assert!(!input.is_pressed(p1_left));
    }

    #[test]
    fn test_clear_releases_all() {
        let mut input = InputState::new();
        for side in Side::BOTH {
            for action in Action::ALL {
                input.set(Control { side, action }, true);
            }
        }
        input.clear();
        assert_eq!(input, InputState::default());
    }
}
