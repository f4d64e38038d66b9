//! Input backends that supply raw gamepad snapshots
//!
//! A [`GamepadSource`] is the only place that talks to a platform input API.
//! Everything downstream works on [`RawGamepad`] values.

use crate::error::Result;

use super::state::RawGamepad;

/// Supplies raw readings for a controller slot on demand
pub trait GamepadSource {
    /// Poll one controller slot
    ///
    /// # Returns
    /// - `Ok(Some(raw))` if a controller is connected
    /// - `Ok(None)` if the slot is empty
    /// - `Err(_)` if the backend itself failed
    fn poll(&mut self, user_index: u32) -> Result<Option<RawGamepad>>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

impl<S: GamepadSource + ?Sized> GamepadSource for Box<S> {
    fn poll(&mut self, user_index: u32) -> Result<Option<RawGamepad>> {
        (**self).poll(user_index)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
