//! Device backends.
//!
//! Implementations of [`Device`](crate::device::Device) that produce
//! [`PlatformEvent`](crate::event::PlatformEvent)s.
//!
//! # Feature flags
//! - **`gilrs`**: physical gamepads through the `gilrs` crate.
//!
//! The [`virtual_input`] devices are always available; they are how the tests and
//! the demo drive the sources without hardware.

use crate::device::Device;

#[cfg(feature = "gilrs")]
#[cfg_attr(docsrs, doc(cfg(feature = "gilrs")))]
pub mod gilrs;
pub mod virtual_input;

/// Unified discovery across enabled backends.
///
/// Returns a gilrs gamepad device when the `gilrs` feature is on and gilrs
/// initializes; otherwise an empty list.
pub fn probe_devices() -> Vec<Box<dyn Device>> {
    #[allow(unused_mut)]
    let mut out: Vec<Box<dyn Device>> = Vec::new();

    #[cfg(feature = "gilrs")]
    {
        match self::gilrs::GilrsDevice::new() {
            Ok(device) => out.push(Box::new(device)),
            Err(e) => log::warn!("gilrs backend skipped: {e}"),
        }
    }

    out
}
