//! Deadzone normalization for XInput stick and trigger values.
//!
//! Raw XInput readings jitter around their rest position. This module
//! suppresses that noise and stretches the remaining travel back over the
//! full integer range, so a stick pushed just past its deadzone reads close
//! to zero and a stick at full deflection still reads full scale.
//!
//! # Stick Normalization
//!
//! Uses a per-axis deadzone: each axis is cleaned independently of its pair.
//! The interval `[deadzone, 32767]` maps linearly onto `[0, 32767]`, and the
//! negative side mirrors it.
//!
//! # Key Functions
//!
//! - [`apply_deadzone`]: For raw stick axes (i16 range)
//! - [`apply_trigger_deadzone`]: For raw triggers (u8 range)
//! - [`DeadzoneProfile::normalize`]: Applies both to a whole snapshot

use serde::{Deserialize, Serialize};

use super::state::{JoystickState, RawGamepad};
use crate::error::{self, JoystickError};

/// XInput left thumbstick deadzone.
///
/// Values from Microsoft's XInput documentation.
pub const XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE: i32 = 7849;

/// XInput right thumbstick deadzone.
///
/// Right stick has a slightly larger deadzone than left.
pub const XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE: i32 = 8689;

/// XInput trigger threshold below which input is ignored.
pub const XINPUT_GAMEPAD_TRIGGER_THRESHOLD: i32 = 30;

/// Full-scale stick deflection.
pub const STICK_MAX: i32 = 32767;

/// Full-scale trigger travel.
pub const TRIGGER_MAX: i32 = 255;

/// Apply a deadzone to a raw stick axis.
///
/// # Arguments
/// * `value` - Raw axis value from XInput
/// * `deadzone` - Threshold magnitude treated as noise
///
/// # Returns
/// * `0` when `|value| <= deadzone`
/// * Otherwise the value rescaled so that `±32767` stays `±32767`
///
/// # Example
/// ```
/// use xinput_joystick::input::gamepad::normalize::{
///     apply_deadzone, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE
/// };
///
/// assert_eq!(apply_deadzone(7000, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE), 0);
/// assert_eq!(apply_deadzone(32767, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE), 32767);
/// assert_eq!(apply_deadzone(-32767, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE), -32767);
/// ```
pub fn apply_deadzone(value: i16, deadzone: i32) -> i32 {
    let value = i64::from(value);
    let deadzone = i64::from(deadzone);
    let stick_max = i64::from(STICK_MAX);

    let scaled = if value > deadzone {
        scale_value(value, deadzone, stick_max, 0, stick_max)
    } else if value < -deadzone {
        // Mirror the positive side so truncation rounds toward zero both ways
        -scale_value(-value, deadzone, stick_max, 0, stick_max)
    } else {
        0
    };

    // |scaled| <= |value| <= 32768
    scaled as i32
}

/// Apply a deadzone to a raw trigger value.
///
/// Maps `[deadzone, 255]` onto `[0, 255]`. Anything at or below the
/// threshold reads as released.
///
/// # Example
/// ```
/// use xinput_joystick::input::gamepad::normalize::apply_trigger_deadzone;
///
/// assert_eq!(apply_trigger_deadzone(0, 30), 0);
/// assert_eq!(apply_trigger_deadzone(30, 30), 0);
/// assert_eq!(apply_trigger_deadzone(255, 30), 255);
/// ```
pub fn apply_trigger_deadzone(value: u8, deadzone: i32) -> i32 {
    let value = i64::from(value);
    let deadzone = i64::from(deadzone);
    let trigger_max = i64::from(TRIGGER_MAX);

    if value > deadzone {
        // Result stays within 0..=255 for value <= 255
        scale_value(value, deadzone, trigger_max, 0, trigger_max) as i32
    } else {
        0
    }
}

/// Linearly map `value` from `[src_min, src_max]` onto `[tgt_min, tgt_max]`.
///
/// Works in `i64` so extrapolated inputs far outside the source range don't
/// overflow the intermediate product. Integer division truncates. Values
/// outside the source range are extrapolated, not clamped.
///
/// # Panics
/// If `src_min == src_max`. A zero-width source range can only come from a
/// broken deadzone constant; [`DeadzoneProfile::new`] rejects those up front.
pub fn scale_value(value: i64, src_min: i64, src_max: i64, tgt_min: i64, tgt_max: i64) -> i64 {
    let src_range = src_max - src_min;
    assert!(src_range != 0, "source range cannot be zero");

    let tgt_range = tgt_max - tgt_min;

    (value - src_min) * tgt_range / src_range + tgt_min
}

/// Deadzone thresholds for one controller.
///
/// Built once and validated at construction, so normalizing a snapshot never
/// hits the zero-width range fault in [`scale_value`]. Deserialization goes
/// through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedProfile")]
pub struct DeadzoneProfile {
    left_stick: i32,
    right_stick: i32,
    trigger: i32,
}

/// Wire form of [`DeadzoneProfile`] before validation
#[derive(Deserialize)]
struct UncheckedProfile {
    left_stick: i32,
    right_stick: i32,
    trigger: i32,
}

impl TryFrom<UncheckedProfile> for DeadzoneProfile {
    type Error = JoystickError;

    fn try_from(raw: UncheckedProfile) -> error::Result<Self> {
        Self::new(raw.left_stick, raw.right_stick, raw.trigger)
    }
}

impl DeadzoneProfile {
    /// Microsoft's recommended XInput deadzones (7849 / 8689 / 30).
    pub const XINPUT: Self = Self {
        left_stick: XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE,
        right_stick: XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE,
        trigger: XINPUT_GAMEPAD_TRIGGER_THRESHOLD,
    };

    /// Create a validated profile.
    ///
    /// Stick deadzones must lie in `0..32767` and the trigger deadzone in
    /// `0..255`; a threshold at full scale would leave nothing to rescale.
    pub fn new(left_stick: i32, right_stick: i32, trigger: i32) -> error::Result<Self> {
        check_deadzone("left stick", left_stick, STICK_MAX)?;
        check_deadzone("right stick", right_stick, STICK_MAX)?;
        check_deadzone("trigger", trigger, TRIGGER_MAX)?;

        Ok(Self {
            left_stick,
            right_stick,
            trigger,
        })
    }

    pub fn left_stick(&self) -> i32 {
        self.left_stick
    }

    pub fn right_stick(&self) -> i32 {
        self.right_stick
    }

    pub fn trigger(&self) -> i32 {
        self.trigger
    }

    /// Normalize every axis of a raw snapshot.
    ///
    /// Buttons pass through unchanged; axes come out in the order
    /// LX, LY, RX, RY, LTrigger, RTrigger.
    pub fn normalize(&self, raw: &RawGamepad) -> JoystickState {
        JoystickState {
            buttons: u32::from(raw.buttons),
            axes: [
                apply_deadzone(raw.thumb_lx, self.left_stick),
                apply_deadzone(raw.thumb_ly, self.left_stick),
                apply_deadzone(raw.thumb_rx, self.right_stick),
                apply_deadzone(raw.thumb_ry, self.right_stick),
                apply_trigger_deadzone(raw.left_trigger, self.trigger),
                apply_trigger_deadzone(raw.right_trigger, self.trigger),
            ],
        }
    }
}

impl Default for DeadzoneProfile {
    fn default() -> Self {
        Self::XINPUT
    }
}

fn check_deadzone(axis: &'static str, value: i32, max: i32) -> error::Result<()> {
    if (0..max).contains(&value) {
        Ok(())
    } else {
        Err(JoystickError::InvalidDeadzone { axis, value, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::state::Axis;
    use proptest::prelude::*;

    const LEFT: i32 = XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE;
    const RIGHT: i32 = XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE;

    #[test]
    fn test_apply_deadzone_centered() {
        assert_eq!(apply_deadzone(0, LEFT), 0);
    }

    #[test]
    fn test_apply_deadzone_at_threshold() {
        assert_eq!(apply_deadzone(7849, LEFT), 0);
        assert_eq!(apply_deadzone(-7849, LEFT), 0);
        assert_eq!(apply_deadzone(8689, RIGHT), 0);
    }

    #[test]
    fn test_apply_deadzone_full_scale() {
        assert_eq!(apply_deadzone(32767, LEFT), 32767);
        assert_eq!(apply_deadzone(-32767, LEFT), -32767);
        assert_eq!(apply_deadzone(32767, RIGHT), 32767);
        assert_eq!(apply_deadzone(-32767, RIGHT), -32767);
    }

    #[test]
    fn test_apply_deadzone_just_outside() {
        // 1 * 32767 / 24918 truncates to 1
        assert_eq!(apply_deadzone(7850, LEFT), 1);
        assert_eq!(apply_deadzone(-7850, LEFT), -1);
    }

    #[test]
    fn test_apply_deadzone_i16_min_extrapolates() {
        // One step past -32767, not clamped
        assert_eq!(apply_deadzone(i16::MIN, LEFT), -32768);
    }

    #[test]
    fn test_apply_deadzone_midpoint() {
        // Halfway through the live range lands near half scale
        let out = apply_deadzone(20308, LEFT);
        assert!((16380..=16386).contains(&out), "midpoint mapped to {}", out);
    }

    #[test]
    fn test_apply_deadzone_zero_deadzone_is_identity() {
        assert_eq!(apply_deadzone(1, 0), 1);
        assert_eq!(apply_deadzone(-12345, 0), -12345);
        assert_eq!(apply_deadzone(32767, 0), 32767);
    }

    #[test]
    fn test_apply_deadzone_negative_deadzone_does_not_overflow() {
        // Unvalidated thresholds are still computed without overflow
        assert_eq!(apply_deadzone(0, i32::MIN), 0);
        assert_eq!(apply_deadzone(32767, i32::MIN), 32767);
    }

    #[test]
    fn test_apply_trigger_deadzone() {
        assert_eq!(apply_trigger_deadzone(0, 30), 0);
        assert_eq!(apply_trigger_deadzone(29, 30), 0);
        assert_eq!(apply_trigger_deadzone(30, 30), 0);
        assert_eq!(apply_trigger_deadzone(31, 30), 1);
        assert_eq!(apply_trigger_deadzone(255, 30), 255);
    }

    #[test]
    fn test_scale_value() {
        assert_eq!(scale_value(5, 0, 10, 0, 100), 50);
        assert_eq!(scale_value(0, 0, 10, -50, 50), -50);
        assert_eq!(scale_value(10, 0, 10, -50, 50), 50);
        // Truncating division
        assert_eq!(scale_value(1, 0, 3, 0, 10), 3);
    }

    #[test]
    fn test_scale_value_extrapolates() {
        assert_eq!(scale_value(20, 0, 10, 0, 100), 200);
        assert_eq!(scale_value(-10, 0, 10, 0, 100), -100);
    }

    #[test]
    fn test_scale_value_extrapolates_past_i32_product() {
        // 100_000 * 32767 doesn't fit in i32
        assert_eq!(scale_value(100_000, 0, 32767, 0, 32767), 100_000);

        let max = i64::from(i32::MAX);
        assert_eq!(scale_value(max, 0, 1, 0, 2), 2 * max);
    }

    #[test]
    #[should_panic(expected = "source range cannot be zero")]
    fn test_scale_value_zero_range_panics() {
        scale_value(5, 7, 7, 0, 100);
    }

    #[test]
    fn test_profile_default_is_xinput() {
        let profile = DeadzoneProfile::default();
        assert_eq!(profile.left_stick(), 7849);
        assert_eq!(profile.right_stick(), 8689);
        assert_eq!(profile.trigger(), 30);
        assert_eq!(DeadzoneProfile::new(7849, 8689, 30), Ok(DeadzoneProfile::XINPUT));
    }

    #[test]
    fn test_profile_rejects_full_scale_stick() {
        let err = DeadzoneProfile::new(32767, 8689, 30).unwrap_err();
        assert_eq!(
            err,
            JoystickError::InvalidDeadzone {
                axis: "left stick",
                value: 32767,
                max: 32767
            }
        );
    }

    #[test]
    fn test_profile_rejects_negative_and_full_trigger() {
        assert!(matches!(
            DeadzoneProfile::new(7849, -1, 30),
            Err(JoystickError::InvalidDeadzone { axis: "right stick", .. })
        ));
        assert!(matches!(
            DeadzoneProfile::new(7849, 8689, 255),
            Err(JoystickError::InvalidDeadzone { axis: "trigger", .. })
        ));
    }

    #[test]
    fn test_profile_accepts_largest_valid() {
        let profile = DeadzoneProfile::new(32766, 32766, 254).unwrap();
        assert_eq!(apply_deadzone(32767, profile.left_stick()), 32767);
        assert_eq!(apply_trigger_deadzone(255, profile.trigger()), 255);
    }

    #[test]
    fn test_profile_deserialize_validates() {
        let err = serde_json::from_str::<DeadzoneProfile>(
            r#"{"left_stick":32767,"right_stick":8689,"trigger":30}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid left stick deadzone 32767"), "{}", err);

        assert!(serde_json::from_str::<DeadzoneProfile>(
            r#"{"left_stick":7849,"right_stick":8689,"trigger":255}"#
        )
        .is_err());
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let json = serde_json::to_string(&DeadzoneProfile::XINPUT).unwrap();
        assert_eq!(json, r#"{"left_stick":7849,"right_stick":8689,"trigger":30}"#);
        let profile: DeadzoneProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, DeadzoneProfile::XINPUT);
    }

    #[test]
    fn test_normalize_snapshot() {
        let raw = RawGamepad {
            packet_number: 42,
            buttons: 0x1010,
            left_trigger: 255,
            right_trigger: 20,
            thumb_lx: 32767,
            thumb_ly: -5000,
            thumb_rx: 8000,
            thumb_ry: -32767,
        };

        let state = DeadzoneProfile::XINPUT.normalize(&raw);

        assert_eq!(state.buttons, 0x1010);
        assert_eq!(state.axis(Axis::LeftX), 32767);
        assert_eq!(state.axis(Axis::LeftY), 0);
        // 8000 is outside the left deadzone but inside the right one
        assert_eq!(state.axis(Axis::RightX), 0);
        assert_eq!(state.axis(Axis::RightY), -32767);
        assert_eq!(state.axis(Axis::LeftTrigger), 255);
        assert_eq!(state.axis(Axis::RightTrigger), 0);
    }

    #[test]
    fn test_normalize_uses_per_stick_deadzone() {
        let raw = RawGamepad {
            thumb_lx: 8000,
            thumb_rx: 8000,
            ..RawGamepad::default()
        };
        let state = DeadzoneProfile::XINPUT.normalize(&raw);
        assert!(state.axis(Axis::LeftX) > 0);
        assert_eq!(state.axis(Axis::RightX), 0);
    }

    proptest! {
        #[test]
        fn prop_inside_deadzone_is_zero(dz in 0i32..32767, frac in 0.0f64..=1.0) {
            let v = (f64::from(dz) * frac) as i16;
            prop_assert_eq!(apply_deadzone(v, dz), 0);
            prop_assert_eq!(apply_deadzone(-v, dz), 0);
        }

        #[test]
        fn prop_symmetric(v in -32767i16..=32767, dz in 0i32..32767) {
            prop_assert_eq!(apply_deadzone(v, dz), -apply_deadzone(-v, dz));
        }

        #[test]
        fn prop_monotonic(a in any::<i16>(), b in any::<i16>(), dz in 0i32..32767) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(apply_deadzone(lo, dz) <= apply_deadzone(hi, dz));
        }

        #[test]
        fn prop_stays_in_range(v in -32767i16..=32767, dz in 0i32..32767) {
            let out = apply_deadzone(v, dz);
            prop_assert!((-32767..=32767).contains(&out));
            prop_assert!(out.abs() <= i32::from(v).abs());
        }

        #[test]
        fn prop_trigger_in_range_and_monotonic(a in any::<u8>(), b in any::<u8>(), dz in 0i32..255) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (out_lo, out_hi) = (apply_trigger_deadzone(lo, dz), apply_trigger_deadzone(hi, dz));
            prop_assert!(out_lo <= out_hi);
            prop_assert!((0..=255).contains(&out_hi));
        }
    }
}
