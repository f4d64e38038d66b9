//! XInput backend
//!
//! Polls Xbox-compatible controllers through rusty_xinput and decodes the
//! returned `XINPUT_STATE` field by field into a [`RawGamepad`].

use rusty_xinput::{XInputHandle, XInputState, XInputUsageError};
use tracing::{debug, trace};

use super::source::GamepadSource;
use super::state::RawGamepad;
use crate::error::{JoystickError, Result};

impl From<&XInputState> for RawGamepad {
    fn from(state: &XInputState) -> Self {
        Self {
            packet_number: state.raw.dwPacketNumber,
            buttons: state.raw.Gamepad.wButtons,
            left_trigger: state.left_trigger(),
            right_trigger: state.right_trigger(),
            thumb_lx: state.raw.Gamepad.sThumbLX,
            thumb_ly: state.raw.Gamepad.sThumbLY,
            thumb_rx: state.raw.Gamepad.sThumbRX,
            thumb_ry: state.raw.Gamepad.sThumbRY,
        }
    }
}

/// Poll XInput controller and return current state if available
///
/// # Returns
/// - `Ok(Some(state))` if controller is connected
/// - `Ok(None)` if controller is not connected
/// - `Err(_)` if XInput API failed
pub fn poll_xinput_controller(
    handle: &XInputHandle,
    user_index: u32,
) -> std::result::Result<Option<XInputState>, XInputUsageError> {
    match handle.get_state(user_index) {
        Ok(state) => Ok(Some(state)),
        Err(XInputUsageError::DeviceNotConnected) => Ok(None),
        Err(e) => Err(e),
    }
}

/// [`GamepadSource`] backed by the system XInput DLL
pub struct XInputSource {
    handle: XInputHandle,
}

impl XInputSource {
    /// Load the default XInput DLL (xinput1_4, falling back to older versions)
    pub fn load() -> Result<Self> {
        let handle = XInputHandle::load_default()
            .map_err(|e| JoystickError::Backend(format!("XInput library not available: {:?}", e)))?;
        debug!("XInput initialized successfully");
        Ok(Self { handle })
    }
}

impl GamepadSource for XInputSource {
    fn poll(&mut self, user_index: u32) -> Result<Option<RawGamepad>> {
        match poll_xinput_controller(&self.handle, user_index) {
            Ok(Some(state)) => {
                let raw = RawGamepad::from(&state);
                trace!("XInput {} packet {}", user_index, raw.packet_number);
                Ok(Some(raw))
            }
            Ok(None) => Ok(None),
            Err(XInputUsageError::InvalidControllerID) => {
                Err(JoystickError::InvalidId(user_index as i32))
            }
            Err(e) => Err(JoystickError::Backend(format!("XInput get_state failed: {:?}", e))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "xinput"
    }
}
