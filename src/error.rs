//! Error types for joystick access and deadzone configuration

use thiserror::Error;

/// Errors returned by the joystick reader and its input sources
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JoystickError {
    /// Controller index outside XInput's four user slots
    #[error("invalid joystick id: {0}")]
    InvalidId(i32),

    /// No controller plugged into the slot
    #[error("joystick {0} is not connected")]
    NotConnected(u32),

    /// Deadzone threshold that would leave no usable range to rescale
    #[error("invalid {axis} deadzone {value} (must be 0..{max})")]
    InvalidDeadzone {
        axis: &'static str,
        value: i32,
        max: i32,
    },

    /// Failure reported by the underlying input API
    #[error("input backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, JoystickError>;
