//! XInput joystick reader
//!
//! Polls a game controller and returns its buttons and axes with deadzone
//! noise removed and the remaining travel rescaled to full range.

pub mod config;
pub mod error;
pub mod input;

pub use error::JoystickError;
pub use input::gamepad::{DeadzoneProfile, Joystick, JoystickState, RawGamepad};
