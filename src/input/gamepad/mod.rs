//! Gamepad input: XInput-style snapshots and deadzone normalization
//!
//! Raw readings come from a [`GamepadSource`] (XInput on Windows, gilrs with
//! the `gilrs` feature) and are cleaned up by [`DeadzoneProfile`] before
//! they reach callers.

pub mod buttons;
pub mod joystick;
pub mod normalize;
pub mod source;
pub mod state;

#[cfg(feature = "gilrs")]
pub mod gilrs_source;
#[cfg(windows)]
pub mod xinput_convert;

pub use buttons::Button;
pub use joystick::Joystick;
pub use normalize::{apply_deadzone, apply_trigger_deadzone, scale_value, DeadzoneProfile};
pub use source::GamepadSource;
pub use state::{Axis, JoystickState, PacketTracker, RawGamepad};

#[cfg(feature = "gilrs")]
pub use gilrs_source::GilrsSource;
#[cfg(windows)]
pub use xinput_convert::XInputSource;
