//! Scripted devices.
//!
//! Both devices queue events and hand them out on the next
//! [`poll`](Device::poll). [`VirtualGamepad`] keeps a full
//! [`GamepadSample`] and emits one `GamepadPolled` per poll whenever it changed,
//! the same shape a real per-cycle gamepad reader produces.

use crate::device::Device;
use crate::event::{ButtonSample, FrameId, GamepadSample, PlatformEvent};
use crate::gamepad::BUTTON_COUNT;
use log::warn;

/// Standard-layout stick axes (`LX, LY, RX, RY`).
const STICK_AXES: usize = 4;

pub struct VirtualGamepad {
    id: String,
    name: String,
    sample: GamepadSample,
    connected: bool,
    dirty: bool,
    events: Vec<PlatformEvent>,
}

impl VirtualGamepad {
    /// A standard pad with button triggers (17 buttons, 4 axes).
    pub fn new(id: &str, name: &str) -> Self {
        Self::with_layout(id, name, BUTTON_COUNT, STICK_AXES)
    }

    /// A pad that reports its triggers on axes 4 and 5.
    pub fn with_axis_triggers(id: &str, name: &str) -> Self {
        Self::with_layout(id, name, BUTTON_COUNT, STICK_AXES + 2)
    }

    pub fn with_layout(id: &str, name: &str, buttons: usize, axes: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sample: GamepadSample::neutral(buttons, axes),
            connected: false,
            dirty: false,
            events: Vec::new(),
        }
    }

    pub fn connect(&mut self) {
        self.connected = true;
        self.dirty = false;
        self.events
            .push(PlatformEvent::GamepadConnected(self.sample.clone()));
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.dirty = false;
        self.events.push(PlatformEvent::GamepadDisconnected);
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn press(&mut self, button: usize) {
        self.set_button(button, ButtonSample::pressed());
    }

    pub fn release(&mut self, button: usize) {
        self.set_button(button, ButtonSample::released());
    }

    /// Analog button reading; `pressed` follows `value > 0`.
    pub fn set_button_value(&mut self, button: usize, value: f32) {
        self.set_button(
            button,
            ButtonSample {
                pressed: value > 0.0,
                value,
            },
        );
    }

    pub fn set_axis(&mut self, axis: usize, value: f32) {
        match self.sample.axes.get_mut(axis) {
            Some(slot) => {
                *slot = value;
                self.dirty = true;
            }
            None => warn!("{}: no axis {axis}", self.id),
        }
    }

    pub fn sample(&self) -> &GamepadSample {
        &self.sample
    }

    fn set_button(&mut self, button: usize, value: ButtonSample) {
        match self.sample.buttons.get_mut(button) {
            Some(slot) => {
                *slot = value;
                self.dirty = true;
            }
            None => warn!("{}: no button {button}", self.id),
        }
    }
}

impl Device for VirtualGamepad {
    fn poll(&mut self) -> Vec<PlatformEvent> {
        let mut events = std::mem::take(&mut self.events);
        if self.connected && self.dirty {
            events.push(PlatformEvent::GamepadPolled(self.sample.clone()));
        }
        self.dirty = false;
        events
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Keyboard and mouse in one queue, all mouse events aimed at one frame.
pub struct VirtualKeyboardMouse {
    id: String,
    name: String,
    frame: FrameId,
    x: f32,
    y: f32,
    events: Vec<PlatformEvent>,
}

impl VirtualKeyboardMouse {
    pub fn new(id: &str, name: &str) -> Self {
        Self::with_frame(id, name, FrameId::ROOT)
    }

    pub fn with_frame(id: &str, name: &str, frame: FrameId) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            frame,
            x: 0.0,
            y: 0.0,
            events: Vec::new(),
        }
    }

    pub fn feed(&mut self, event: PlatformEvent) {
        self.events.push(event);
    }

    pub fn key_down(&mut self, key: &str) {
        self.feed(PlatformEvent::key_down(key));
    }

    pub fn key_up(&mut self, key: &str) {
        self.feed(PlatformEvent::key_up(key));
    }

    /// Key down followed by key up, both delivered in the same poll.
    pub fn tap(&mut self, key: &str) {
        self.key_down(key);
        self.key_up(key);
    }

    pub fn mouse_down(&mut self, button: u8) {
        self.feed(PlatformEvent::MouseDown {
            target: self.frame,
            button,
        });
    }

    pub fn mouse_up(&mut self, button: u8) {
        self.feed(PlatformEvent::MouseUp {
            target: self.frame,
            button,
        });
    }

    /// Moves to `(x, y)` in device pixels, reporting the movement from the last position.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let (movement_x, movement_y) = (x - self.x, y - self.y);
        self.x = x;
        self.y = y;
        self.feed(PlatformEvent::MouseMove {
            target: self.frame,
            x,
            y,
            movement_x,
            movement_y,
        });
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32, delta_z: f32) {
        self.feed(PlatformEvent::Wheel {
            target: self.frame,
            delta_x,
            delta_y,
            delta_z,
        });
    }

    pub fn context_menu(&mut self) {
        self.feed(PlatformEvent::ContextMenu { target: self.frame });
    }
}

impl Device for VirtualKeyboardMouse {
    fn poll(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.events)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// One virtual pad and one virtual keyboard/mouse, both disconnected/idle.
pub fn create_virtual_devices() -> (VirtualGamepad, VirtualKeyboardMouse) {
    (
        VirtualGamepad::new("virtual:pad0", "Virtual Gamepad 0"),
        VirtualKeyboardMouse::new("virtual:kbm0", "Virtual Keyboard/Mouse 0"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamepad_coalesces_changes_into_one_sample() {
        let mut pad = VirtualGamepad::new("p", "Pad");
        pad.connect();
        pad.press(3);
        pad.set_axis(0, -0.5);

        let events = pad.poll();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PlatformEvent::GamepadConnected(_)));
        match &events[1] {
            PlatformEvent::GamepadPolled(s) => {
                assert!(s.buttons[3].pressed);
                assert_eq!(s.axes[0], -0.5);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(pad.poll().is_empty());
    }

    #[test]
    fn gamepad_changes_while_disconnected_are_not_sent() {
        let mut pad = VirtualGamepad::new("p", "Pad");
        pad.press(0);
        assert!(pad.poll().is_empty());

        // The change is still part of the sample handed over on connect.
        pad.connect();
        match pad.poll().as_slice() {
            [PlatformEvent::GamepadConnected(s)] => assert!(s.buttons[0].pressed),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_range_controls_are_ignored() {
        let mut pad = VirtualGamepad::new("p", "Pad");
        pad.connect();
        pad.poll();
        pad.press(40);
        pad.set_axis(9, 1.0);
        assert!(pad.poll().is_empty());
    }

    #[test]
    fn axis_trigger_layout() {
        let (pad, _) = create_virtual_devices();
        assert_eq!(pad.sample().axes.len(), 4);
        let pad = VirtualGamepad::with_axis_triggers("p", "Pad");
        assert_eq!(pad.sample().axes.len(), 6);
    }

    #[test]
    fn mouse_movement_is_relative_to_last_position() {
        let mut kbm = VirtualKeyboardMouse::new("k", "KBM");
        kbm.move_to(10.0, 5.0);
        kbm.move_to(4.0, 8.0);
        let events = kbm.poll();
        assert_eq!(
            events[1],
            PlatformEvent::MouseMove {
                target: FrameId::ROOT,
                x: 4.0,
                y: 8.0,
                movement_x: -6.0,
                movement_y: 3.0,
            }
        );
    }
}
