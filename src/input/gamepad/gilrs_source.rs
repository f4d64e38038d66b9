//! gilrs backend
//!
//! Cross-platform fallback for controllers that XInput can't see. gilrs
//! reports sticks as floats in -1.0..=1.0 and triggers as button values in
//! 0.0..=1.0; both are converted back to XInput's integer ranges so the same
//! deadzone normalization applies regardless of backend.

use std::collections::HashMap;

use gilrs::{Axis, Button as GilrsButton, Event, EventType, Gilrs};
use tracing::{debug, trace};

use super::buttons::Button;
use super::source::GamepadSource;
use super::state::{PacketTracker, RawGamepad};
use crate::error::{JoystickError, Result};

/// gilrs button for each XInput button bit
///
/// gilrs reports by physical position; South is the bottom face button,
/// which XInput calls A.
const BUTTON_MAP: [(GilrsButton, Button); 14] = [
    (GilrsButton::DPadUp, Button::DPadUp),
    (GilrsButton::DPadDown, Button::DPadDown),
    (GilrsButton::DPadLeft, Button::DPadLeft),
    (GilrsButton::DPadRight, Button::DPadRight),
    (GilrsButton::Start, Button::Start),
    (GilrsButton::Select, Button::Back),
    (GilrsButton::LeftThumb, Button::LeftThumb),
    (GilrsButton::RightThumb, Button::RightThumb),
    (GilrsButton::LeftTrigger, Button::LeftShoulder),
    (GilrsButton::RightTrigger, Button::RightShoulder),
    (GilrsButton::South, Button::A),
    (GilrsButton::East, Button::B),
    (GilrsButton::West, Button::X),
    (GilrsButton::North, Button::Y),
];

/// Convert a gilrs stick value (-1.0..=1.0) to an XInput stick reading
pub fn stick_to_raw(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Convert a gilrs trigger value (0.0..=1.0) to an XInput trigger reading
pub fn trigger_to_raw(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// [`GamepadSource`] backed by gilrs
///
/// The nth connected gamepad, in gilrs enumeration order, answers for user
/// index n. gilrs has no packet counter, so one is kept per user index and
/// advanced only when that slot's readings change.
pub struct GilrsSource {
    gilrs: Gilrs,
    packets: HashMap<u32, PacketTracker>,
}

impl GilrsSource {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| JoystickError::Backend(format!("gilrs initialization failed: {:?}", e)))?;
        debug!("gilrs initialized");
        Ok(Self {
            gilrs,
            packets: HashMap::new(),
        })
    }

    /// Drain pending events so cached gamepad state is current
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => debug!("gilrs gamepad connected: {:?}", id),
                EventType::Disconnected => debug!("gilrs gamepad disconnected: {:?}", id),
                _ => {}
            }
        }
    }
}

impl GamepadSource for GilrsSource {
    fn poll(&mut self, user_index: u32) -> Result<Option<RawGamepad>> {
        self.pump_events();

        let Some((id, gamepad)) = self
            .gilrs
            .gamepads()
            .filter(|(_, gp)| gp.is_connected())
            .nth(user_index as usize)
        else {
            if let Some(tracker) = self.packets.get_mut(&user_index) {
                tracker.reset();
            }
            return Ok(None);
        };

        let buttons = BUTTON_MAP
            .iter()
            .filter(|(gilrs_button, _)| gamepad.is_pressed(*gilrs_button))
            .fold(0u16, |acc, (_, button)| acc | button.mask());

        let trigger = |button: GilrsButton| {
            gamepad
                .button_data(button)
                .map(|data| trigger_to_raw(data.value()))
                .unwrap_or(0)
        };

        let raw = RawGamepad {
            packet_number: 0,
            buttons,
            left_trigger: trigger(GilrsButton::LeftTrigger2),
            right_trigger: trigger(GilrsButton::RightTrigger2),
            thumb_lx: stick_to_raw(gamepad.value(Axis::LeftStickX)),
            thumb_ly: stick_to_raw(gamepad.value(Axis::LeftStickY)),
            thumb_rx: stick_to_raw(gamepad.value(Axis::RightStickX)),
            thumb_ry: stick_to_raw(gamepad.value(Axis::RightStickY)),
        };
        let raw = self.packets.entry(user_index).or_default().stamp(raw);
        trace!("gilrs {:?} -> {:?}", id, raw);

        Ok(Some(raw))
    }

    fn backend_name(&self) -> &'static str {
        "gilrs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_to_raw() {
        assert_eq!(stick_to_raw(0.0), 0);
        assert_eq!(stick_to_raw(1.0), 32767);
        assert_eq!(stick_to_raw(-1.0), -32767);
        assert_eq!(stick_to_raw(1.5), 32767);
        assert_eq!(stick_to_raw(0.5), 16384);
    }

    #[test]
    fn test_trigger_to_raw() {
        assert_eq!(trigger_to_raw(0.0), 0);
        assert_eq!(trigger_to_raw(1.0), 255);
        assert_eq!(trigger_to_raw(-0.2), 0);
    }

    #[test]
    fn test_button_map_covers_every_bit() {
        let mask = BUTTON_MAP.iter().fold(0u16, |acc, (_, b)| acc | b.mask());
        assert_eq!(mask, 0xF3FF);
    }
}
