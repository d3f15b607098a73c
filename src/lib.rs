//! SuperControl: frame-based input state for keyboard, mouse and gamepad.
//!
//! Every tracked control (a key, a mouse button, a gamepad button or stick
//! direction) moves through four phases, `Idle → Pressed → Held → Released → Idle`,
//! driven by platform events and one [`UnifiedInput::update`] call per cycle.
//! Game logic asks "was jump pressed this frame?" instead of wiring its own
//! edge detection.
//!
//! - [`input`]: the generic per-identifier lifecycle all sources share.
//! - [`keyboard`], [`mouse`], [`gamepad`]: the three sources.
//! - [`unified`]: one aggregator over all of them with merged views.
//! - [`manager`] and [`backends`]: devices that produce [`PlatformEvent`]s.
//!
//! ```
//! use supercontrol::{InputConfig, PlatformEvent, UnifiedInput};
//!
//! let mut input = UnifiedInput::new(&InputConfig::default()).unwrap();
//! input.handle_event(&PlatformEvent::key_down(" "));
//! assert!(input.pressed().is("KeySpace"));
//!
//! input.update();
//! assert!(input.held().is("KeySpace"));
//! ```

pub mod backends;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod gamepad;
pub mod input;
pub mod keyboard;
pub mod logger;
pub mod manager;
pub mod mouse;
pub mod snapshot;
pub mod unified;

pub use config::{GamepadConfig, InputConfig, KeyboardConfig, MouseConfig};
pub use device::Device;
pub use error::{InputError, Result};
pub use event::*;
pub use eventbus::*;
pub use gamepad::{GamepadControl, GamepadInput, Stick, StickAxis, TriggerMode};
pub use input::{InputValue, Lifecycle, Phase, Slot};
pub use keyboard::KeyboardInput;
pub use manager::DeviceManager;
pub use mouse::{MouseButton, MouseInput, Scale};
pub use snapshot::Snapshot;
pub use unified::{MergedView, UnifiedInput};
