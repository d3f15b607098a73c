//! Platform events delivered to the input sources.
//!
//! The host owns the real event loop (window messages, DOM events, a gamepad
//! library) and forwards what it sees as [`PlatformEvent`]s. Sources never poll
//! the platform themselves.
//!
//! ## Value conventions
//! - **Keys** are identified by their key name (`"a"`, `"ArrowUp"`, `" "`), matched
//!   case-insensitively.
//! - **Mouse buttons** use positional codes: `0` left, `1` wheel, `2` right,
//!   `3` back, `4` forward.
//! - **Mouse coordinates** are raw frame coordinates; the mouse source divides them
//!   by its reference-frame scale.
//! - **Gamepad samples** follow the standard layout: buttons carry a pressed flag and
//!   an analog value in `[0, 1]`, axes are in `[-1, 1]` with "down" / "right" positive.

use serde::{Deserialize, Serialize};

/// Opaque id of the element mouse events are scoped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u32);

impl FrameId {
    /// The whole window/document.
    pub const ROOT: FrameId = FrameId(0);
}

/// One gamepad button reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSample {
    pub pressed: bool,
    /// Analog travel in `[0, 1]`; digital buttons report `0` or `1`.
    pub value: f32,
}

impl ButtonSample {
    pub fn released() -> Self {
        Self::default()
    }

    pub fn pressed() -> Self {
        Self {
            pressed: true,
            value: 1.0,
        }
    }
}

/// Everything a gamepad reports in one poll.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadSample {
    /// Button readings in standard-layout order.
    pub buttons: Vec<ButtonSample>,
    /// Axis readings in standard-layout order (`LX, LY, RX, RY[, LT, RT]`).
    pub axes: Vec<f32>,
}

impl GamepadSample {
    /// A resting pad with `buttons` buttons and `axes` axes.
    pub fn neutral(buttons: usize, axes: usize) -> Self {
        Self {
            buttons: vec![ButtonSample::released(); buttons],
            axes: vec![0.0; axes],
        }
    }

    #[inline]
    pub fn axis(&self, index: usize) -> Option<f32> {
        self.axes.get(index).copied()
    }

    #[inline]
    pub fn button(&self, index: usize) -> Option<ButtonSample> {
        self.buttons.get(index).copied()
    }
}

/// A notification from the host platform.
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    MouseDown {
        target: FrameId,
        button: u8,
    },
    MouseUp {
        target: FrameId,
        button: u8,
    },
    /// Absolute position plus movement since the previous move notification.
    MouseMove {
        target: FrameId,
        x: f32,
        y: f32,
        movement_x: f32,
        movement_y: f32,
    },
    Wheel {
        target: FrameId,
        delta_x: f32,
        delta_y: f32,
        delta_z: f32,
    },
    /// The platform is about to open its context menu (usually on right click).
    ContextMenu {
        target: FrameId,
    },
    GamepadConnected(GamepadSample),
    /// Fresh per-cycle reading from a connected pad.
    GamepadPolled(GamepadSample),
    GamepadDisconnected,
}

impl PlatformEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        PlatformEvent::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        PlatformEvent::KeyUp { key: key.into() }
    }

    /// Frame a mouse event was delivered to, `None` for non-mouse events.
    pub fn target(&self) -> Option<FrameId> {
        match self {
            PlatformEvent::MouseDown { target, .. }
            | PlatformEvent::MouseUp { target, .. }
            | PlatformEvent::MouseMove { target, .. }
            | PlatformEvent::Wheel { target, .. }
            | PlatformEvent::ContextMenu { target } => Some(*target),
            _ => None,
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, PlatformEvent::KeyDown { .. } | PlatformEvent::KeyUp { .. })
    }

    pub fn is_mouse(&self) -> bool {
        self.target().is_some()
    }

    pub fn is_gamepad(&self) -> bool {
        matches!(
            self,
            PlatformEvent::GamepadConnected(_)
                | PlatformEvent::GamepadPolled(_)
                | PlatformEvent::GamepadDisconnected
        )
    }
}

/// What the platform should do after dispatching an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Continue,
    /// Suppress the platform's default action (e.g. the context menu).
    PreventDefault,
}

impl Flow {
    /// `PreventDefault` is sticky across listeners.
    #[inline]
    pub fn merge(self, other: Flow) -> Flow {
        if self == Flow::PreventDefault || other == Flow::PreventDefault {
            Flow::PreventDefault
        } else {
            Flow::Continue
        }
    }

    pub fn is_default_prevented(self) -> bool {
        self == Flow::PreventDefault
    }
}
