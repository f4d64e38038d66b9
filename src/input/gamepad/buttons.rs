//! XInput button bit flags
//!
//! rusty_xinput doesn't export individual button constants, so they are
//! defined here based on the XInput API. The same bitmask is what
//! [`JoystickState::buttons`](super::state::JoystickState::buttons) carries,
//! and the gilrs backend rebuilds it from gilrs buttons.
//!
//! ```text
//!   DPAD_UP        0x0001    LEFT_SHOULDER  0x0100
//!   DPAD_DOWN      0x0002    RIGHT_SHOULDER 0x0200
//!   DPAD_LEFT      0x0004    A              0x1000
//!   DPAD_RIGHT     0x0008    B              0x2000
//!   START          0x0010    X              0x4000
//!   BACK           0x0020    Y              0x8000
//!   LEFT_THUMB     0x0040
//!   RIGHT_THUMB    0x0080
//! ```

/// XInput reports 16 button bits, two of which are unused
pub const BUTTON_COUNT: usize = 16;

/// Named XInput button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl Button {
    /// All buttons in bit order
    pub const ALL: [Button; 14] = [
        Button::DPadUp,
        Button::DPadDown,
        Button::DPadLeft,
        Button::DPadRight,
        Button::Start,
        Button::Back,
        Button::LeftThumb,
        Button::RightThumb,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    /// Bit in the XInput `wButtons` field
    pub const fn mask(self) -> u16 {
        match self {
            Button::DPadUp => 0x0001,
            Button::DPadDown => 0x0002,
            Button::DPadLeft => 0x0004,
            Button::DPadRight => 0x0008,
            Button::Start => 0x0010,
            Button::Back => 0x0020,
            Button::LeftThumb => 0x0040,
            Button::RightThumb => 0x0080,
            Button::LeftShoulder => 0x0100,
            Button::RightShoulder => 0x0200,
            Button::A => 0x1000,
            Button::B => 0x2000,
            Button::X => 0x4000,
            Button::Y => 0x8000,
        }
    }

    /// Standardized name (matching the gilrs-style naming used in logs)
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
            Button::LeftShoulder => "lb",
            Button::RightShoulder => "rb",
            Button::Back => "minus",
            Button::Start => "plus",
            Button::LeftThumb => "l3",
            Button::RightThumb => "r3",
            Button::DPadUp => "dpad.up",
            Button::DPadDown => "dpad.down",
            Button::DPadLeft => "dpad.left",
            Button::DPadRight => "dpad.right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct_bits() {
        let mut seen = 0u16;
        for button in Button::ALL {
            let mask = button.mask();
            assert_eq!(mask.count_ones(), 1, "{:?} is not a single bit", button);
            assert_eq!(seen & mask, 0, "{:?} overlaps another button", button);
            seen |= mask;
        }
        // 0x0400 and 0x0800 are unused by XInput
        assert_eq!(seen, 0xF3FF);
    }

    #[test]
    fn test_all_is_bit_ordered() {
        let masks: Vec<u16> = Button::ALL.iter().map(|b| b.mask()).collect();
        let mut sorted = masks.clone();
        sorted.sort();
        assert_eq!(masks, sorted);
    }
}
