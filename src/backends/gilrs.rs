//! Physical gamepads through `gilrs`.
//!
//! [`GilrsDevice`] follows the first pad gilrs reports and translates it into
//! standard-layout [`GamepadSample`]s, one `GamepadPolled` per poll.
//!
//! # Channel conventions
//! - Buttons are reordered into the standard layout (face buttons, bumpers,
//!   triggers, select/start, stick clicks, D-pad up/down/left/right, mode).
//! - Axes are `LX, LY, RX, RY`. gilrs reports "up" as positive Y; both Y axes
//!   are inverted here so "down" is `+1`.
//! - Triggers are reported as analog buttons 6/7, so the pad always lands in
//!   button trigger mode.

use crate::device::Device;
use crate::error::{InputError, Result};
use crate::event::{ButtonSample, GamepadSample, PlatformEvent};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use log::{debug, info};

/// gilrs buttons in standard-layout order.
const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// `(axis, invert)` in standard-layout order.
const AXES: [(Axis, bool); 4] = [
    (Axis::LeftStickX, false),
    (Axis::LeftStickY, true),
    (Axis::RightStickX, false),
    (Axis::RightStickY, true),
];

pub struct GilrsDevice {
    gilrs: Gilrs,
    active: Option<GamepadId>,
    name: String,
}

impl GilrsDevice {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| InputError::Backend(e.to_string()))?;
        info!("Successfully initialized gilrs");
        Ok(Self {
            gilrs,
            active: None,
            name: "gilrs gamepad".to_string(),
        })
    }

    fn sample(gamepad: &Gamepad<'_>) -> GamepadSample {
        let buttons = BUTTONS
            .iter()
            .map(|&button| {
                let value = gamepad.button_data(button).map_or(0.0, |d| d.value());
                ButtonSample {
                    pressed: gamepad.is_pressed(button),
                    value,
                }
            })
            .collect();
        let axes = AXES
            .iter()
            .map(|&(axis, invert)| {
                let v = gamepad.value(axis);
                if invert {
                    -v
                } else {
                    v
                }
            })
            .collect();
        GamepadSample { buttons, axes }
    }

    fn attach(&mut self, id: GamepadId, events: &mut Vec<PlatformEvent>) {
        let gamepad = self.gilrs.gamepad(id);
        info!("Selected gamepad: {} ({})", gamepad.name(), id);
        self.name = gamepad.name().to_string();
        events.push(PlatformEvent::GamepadConnected(Self::sample(&gamepad)));
        self.active = Some(id);
    }
}

impl Device for GilrsDevice {
    fn poll(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();

        if self.active.is_none() {
            let first = self.gilrs.gamepads().map(|(id, _)| id).next();
            if let Some(id) = first {
                self.attach(id, &mut events);
            }
        }

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active.is_none() => self.attach(id, &mut events),
                EventType::Disconnected if self.active == Some(id) => {
                    debug!("gilrs: gamepad {id} disconnected");
                    self.active = None;
                    events.push(PlatformEvent::GamepadDisconnected);
                }
                _ => {}
            }
        }

        if let Some(id) = self.active {
            let gamepad = self.gilrs.gamepad(id);
            events.push(PlatformEvent::GamepadPolled(Self::sample(&gamepad)));
        }
        events
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "gilrs:0"
    }
}
