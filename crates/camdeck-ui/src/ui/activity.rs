//! Activity pattern for mode-based navigation.
//!
//! Every [`Mode`] is backed by one activity. The dispatcher calls `enter`
//! on the first tick after a transition into the mode and `update` on every
//! tick while the mode stays current. An activity leaves by asking the
//! [`Context`] for a transition; the dispatcher commits it after `update`
//! returns and calls `exit` on the outgoing activity.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::devices::Devices;
use crate::input::InputFrame;
use crate::mode::Mode;

/// Everything an activity may touch during one tick.
pub struct Context<'a, D> {
    pub display: &'a mut D,
    pub input: &'a InputFrame,
    pub now_ms: u64,
    pub delay: &'a mut dyn DelayNs,
    pub devices: &'a mut Devices,
    pub config: &'a Config,
    transition: Option<Mode>,
}

impl<'a, D> Context<'a, D> {
    pub fn new(
        display: &'a mut D,
        input: &'a InputFrame,
        now_ms: u64,
        delay: &'a mut dyn DelayNs,
        devices: &'a mut Devices,
        config: &'a Config,
    ) -> Self {
        Self {
            display,
            input,
            now_ms,
            delay,
            devices,
            config,
            transition: None,
        }
    }

    /// Ask to leave for `mode` once this tick finishes.
    ///
    /// Repeated calls in the same tick overwrite each other; the last one wins.
    pub fn request_transition(&mut self, mode: Mode) {
        self.transition = Some(mode);
    }

    pub fn pending_transition(&self) -> Option<Mode> {
        self.transition
    }

    pub(crate) fn take_transition(&mut self) -> Option<Mode> {
        self.transition.take()
    }
}

/// Activity trait for mode-based UI architecture.
///
/// Each mode implements this trait to handle its own lifecycle, input
/// processing, and rendering. Sub-states (list/viewer, listening/thinking)
/// stay private to the implementation.
pub trait Activity<D: DrawTarget<Color = Rgb565>> {
    /// Called once on the first tick after the mode becomes current.
    ///
    /// Must fully redraw the screen and reset any per-visit state.
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error>;

    /// Called once per tick while the mode is current.
    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error>;

    /// Called after the transition away from this mode is committed.
    ///
    /// Releases anything the activity still holds. Leaves normally do this
    /// on their own Back path already, so implementations must tolerate
    /// being called with nothing left to free.
    fn exit(&mut self, _devices: &mut Devices) {}
}
