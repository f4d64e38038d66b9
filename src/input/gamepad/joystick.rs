//! Joystick reader: one controller slot plus its deadzone profile

use tracing::{debug, trace};

use super::buttons::BUTTON_COUNT;
use super::normalize::DeadzoneProfile;
use super::source::GamepadSource;
use super::state::{Axis, JoystickState, RawGamepad};
use crate::error::{JoystickError, Result};

/// Number of XInput user slots
pub const MAX_CONTROLLERS: u32 = 4;

/// A single controller slot read through a [`GamepadSource`]
pub struct Joystick<S: GamepadSource> {
    id: u32,
    source: S,
    profile: DeadzoneProfile,
}

impl<S: GamepadSource> Joystick<S> {
    /// Open controller slot `id` (0-3)
    ///
    /// Opening doesn't touch the device; a missing controller shows up on
    /// the first [`read`](Self::read).
    pub fn open(id: i32, source: S, profile: DeadzoneProfile) -> Result<Self> {
        let id = u32::try_from(id)
            .ok()
            .filter(|id| *id < MAX_CONTROLLERS)
            .ok_or(JoystickError::InvalidId(id))?;

        debug!(
            "Opened joystick {} via {} (deadzones: left={}, right={}, trigger={})",
            id,
            source.backend_name(),
            profile.left_stick(),
            profile.right_stick(),
            profile.trigger()
        );

        Ok(Self { id, source, profile })
    }

    /// Poll the controller and return its deadzone-normalized state
    pub fn read(&mut self) -> Result<JoystickState> {
        let raw = self.read_raw()?;
        let state = self.profile.normalize(&raw);
        trace!("Joystick {}: {:?}", self.id, state);
        Ok(state)
    }

    /// Poll the controller without normalization
    pub fn read_raw(&mut self) -> Result<RawGamepad> {
        self.source
            .poll(self.id)?
            .ok_or(JoystickError::NotConnected(self.id))
    }

    /// Release the controller
    pub fn close(self) {
        // XInput holds no per-controller resources
        debug!("Closed joystick {}", self.id);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Two thumbsticks (2x2) + two triggers
    pub fn axis_count(&self) -> usize {
        Axis::ALL.len()
    }

    pub fn button_count(&self) -> usize {
        BUTTON_COUNT
    }

    pub fn name(&self) -> String {
        format!("XInput Controller {}", self.id)
    }

    pub fn profile(&self) -> DeadzoneProfile {
        self.profile
    }

    /// Swap the deadzone profile (e.g. after a config reload)
    pub fn set_profile(&mut self, profile: DeadzoneProfile) {
        self.profile = profile;
    }

    pub fn backend_name(&self) -> &'static str {
        self.source.backend_name()
    }
}
