//! Raw and normalized gamepad snapshots

use serde::{Deserialize, Serialize};

use super::buttons::Button;

/// One poll's worth of raw readings, decoded from the input backend
///
/// Field layout follows XInput's `XINPUT_GAMEPAD`, so the packet number can
/// drive change detection the same way XInput intends it to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGamepad {
    pub packet_number: u32,
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// Assigns XInput-style packet numbers to snapshots from backends that
/// don't report one
///
/// The number advances only when some reading differs from the previous
/// snapshot, so unchanged polls keep the same packet number.
#[derive(Debug, Default)]
pub struct PacketTracker {
    last: Option<RawGamepad>,
}

impl PacketTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `raw` with the current packet number, advancing it on change
    pub fn stamp(&mut self, mut raw: RawGamepad) -> RawGamepad {
        match self.last {
            Some(last) => {
                // Compare readings only
                raw.packet_number = last.packet_number;
                if raw != last {
                    raw.packet_number = last.packet_number.wrapping_add(1);
                }
            }
            None => raw.packet_number = 1,
        }
        self.last = Some(raw);
        raw
    }

    /// Forget the last snapshot (e.g. after the device went away)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Axis positions within [`JoystickState::axes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl Axis {
    /// All axes in snapshot order
    pub const ALL: [Axis; 6] = [
        Axis::LeftX,
        Axis::LeftY,
        Axis::RightX,
        Axis::RightY,
        Axis::LeftTrigger,
        Axis::RightTrigger,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used in log output (e.g. "lx", "zl")
    pub fn short_name(self) -> &'static str {
        match self {
            Axis::LeftX => "lx",
            Axis::LeftY => "ly",
            Axis::RightX => "rx",
            Axis::RightY => "ry",
            Axis::LeftTrigger => "zl",
            Axis::RightTrigger => "zr",
        }
    }
}

/// Normalized controller state handed back to callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickState {
    /// Button bitmask, passed through from the device unchanged
    pub buttons: u32,
    /// LX, LY, RX, RY, LTrigger, RTrigger
    pub axes: [i32; 6],
}

impl JoystickState {
    pub fn axis(&self, axis: Axis) -> i32 {
        self.axes[axis.index()]
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & u32::from(button.mask()) != 0
    }

    /// Buttons currently held, in bit order
    pub fn pressed_buttons(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.is_pressed(*b))
    }
}
