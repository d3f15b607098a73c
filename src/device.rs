//! Event producers.
//!
//! A [`Device`] is anything that turns host input into [`PlatformEvent`]s: a
//! scripted virtual pad in tests, a gilrs-backed controller, or a bridge from a
//! windowing library. [`DeviceManager`](crate::manager::DeviceManager) polls them
//! and feeds the result into a [`UnifiedInput`](crate::unified::UnifiedInput).

use crate::event::PlatformEvent;

pub trait Device {
    /// Events produced since the previous poll, oldest first.
    fn poll(&mut self) -> Vec<PlatformEvent>;
    fn name(&self) -> &str;
    /// Stable identifier, e.g. `virtual:pad0`.
    fn id(&self) -> &str;
}
