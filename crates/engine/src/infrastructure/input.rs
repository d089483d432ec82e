//! Virtual input device.
//!
//! Holds the current movement axis and attack button state. A platform layer
//! (keyboard or touch joystick) drives it through the setters.

use std::sync::{Mutex, MutexGuard, PoisonError};

use emberfall_domain::Vec3;

use crate::infrastructure::ports::{InputMode, InputPort};

#[derive(Debug, Clone, Copy, Default)]
struct InputState {
    axis: Vec3,
    attack: bool,
}

pub struct VirtualInput {
    mode: InputMode,
    state: Mutex<InputState>,
}

impl VirtualInput {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            state: Mutex::new(InputState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, InputState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_axis(&self, axis: Vec3) {
        self.state().axis = axis;
    }

    pub fn set_attack(&self, pressed: bool) {
        self.state().attack = pressed;
    }
}

impl InputPort for VirtualInput {
    fn mode(&self) -> InputMode {
        self.mode
    }

    fn axis(&self) -> Vec3 {
        self.state().axis
    }

    fn is_attack_pressed(&self) -> bool {
        self.state().attack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_driven_state() {
        let input = VirtualInput::new(InputMode::Mobile);
        assert_eq!(input.mode(), InputMode::Mobile);
        assert_eq!(input.axis(), Vec3::ZERO);
        assert!(!input.is_attack_pressed());

        input.set_axis(Vec3::new(1.0, 0.0, 0.0));
        input.set_attack(true);
        assert_eq!(input.axis(), Vec3::new(1.0, 0.0, 0.0));
        assert!(input.is_attack_pressed());
    }

    #[test]
    fn input_mode_parses_aliases() {
        assert_eq!("Mobile".parse(), Ok(InputMode::Mobile));
        assert_eq!(" desktop ".parse(), Ok(InputMode::Standalone));
        assert_eq!("console".parse::<InputMode>(), Err(()));
    }
}
