//! Mouse source.
//!
//! Buttons go through the usual lifecycle under the identifiers `mouseLeft`,
//! `mouseWheel`, `mouseRight`, `mouseBack` and `mouseForward` (button codes 0–4).
//! Position, movement and wheel deltas are plain scalars next to it:
//!
//! - `x`/`y` and `delta_x`/`delta_y` are divided by the reference-frame [`Scale`],
//!   so a 320×240 program drawn at 960×720 sets the scale to 3 and keeps working
//!   in its own coordinates.
//! - Movement and wheel deltas are one-cycle pulses: [`MouseInput::advance`]
//!   zeroes them.
//!
//! Only events targeted at the configured reference frame are observed.

use crate::config::MouseConfig;
use crate::error::Result;
use crate::event::{FrameId, Flow, PlatformEvent};
use crate::eventbus::{EventBus, EventFilter, SubscriptionId};
use crate::filtered_listener::FilteredListener;
use crate::input::{Lifecycle, Phase};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Namespace prefix of every mouse identifier.
pub const MOUSE_PREFIX: &str = "mouse";

/// Physical mouse buttons in button-code order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Wheel,
    Right,
    Back,
    Forward,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Wheel,
        MouseButton::Right,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MouseButton::Left => "mouseLeft",
            MouseButton::Wheel => "mouseWheel",
            MouseButton::Right => "mouseRight",
            MouseButton::Back => "mouseBack",
            MouseButton::Forward => "mouseForward",
        }
    }

    /// Platform button code.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl AsRef<str> for MouseButton {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Per-axis divisor applied to mouse coordinates and movement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Scale { x: 1.0, y: 1.0 }
    }
}

/// Everything the mouse listeners write to.
#[derive(Debug, Clone)]
pub struct MouseState {
    pub lifecycle: Lifecycle<bool>,
    pub scale: Scale,
    pub x: f32,
    pub y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
    pub wheel_delta_x: f32,
    pub wheel_delta_y: f32,
    pub wheel_delta_z: f32,
}

impl MouseState {
    fn reset_pulses(&mut self) {
        self.delta_x = 0.0;
        self.delta_y = 0.0;
        self.wheel_delta_x = 0.0;
        self.wheel_delta_y = 0.0;
        self.wheel_delta_z = 0.0;
    }
}

/// Tracks mouse buttons, position, movement and wheel within one frame.
pub struct MouseInput {
    state: MouseState,
    frame: FrameId,
    bus: EventBus<MouseState>,
    subscriptions: Vec<SubscriptionId>,
    disposed: bool,
}

impl MouseInput {
    /// Observes mouse events targeted at `frame`.
    pub fn new(frame: FrameId, scale: Scale) -> Result<Self> {
        let mut bus: EventBus<MouseState> = EventBus::new();
        let mut subscriptions = Vec::new();

        let lifecycle = Lifecycle::builder(MouseButton::ALL.map(MouseButton::as_str))
            .inactive_value(|_| false)
            .active_value(|_| true)
            .register(|slot, _| {
                let code = slot.index() as u8;
                subscriptions.push(bus.subscribe(
                    EventFilter::MouseOnly,
                    FilteredListener::new(
                        move |e: &PlatformEvent| {
                            matches!(e, PlatformEvent::MouseDown { target, button }
                                if *target == frame && *button == code)
                        },
                        move |s: &mut MouseState, _: &PlatformEvent| {
                            s.lifecycle.activate(slot);
                            Flow::Continue
                        },
                    ),
                ));
                subscriptions.push(bus.subscribe(
                    EventFilter::MouseOnly,
                    FilteredListener::new(
                        move |e: &PlatformEvent| {
                            matches!(e, PlatformEvent::MouseUp { target, button }
                                if *target == frame && *button == code)
                        },
                        move |s: &mut MouseState, _: &PlatformEvent| {
                            s.lifecycle.deactivate(slot);
                            Flow::Continue
                        },
                    ),
                ));
            })
            .build()?;

        // The platform context menu would swallow the right-button release.
        subscriptions.push(bus.subscribe(
            EventFilter::MouseOnly,
            move |_: &mut MouseState, e: &PlatformEvent| match e {
                PlatformEvent::ContextMenu { target } if *target == frame => Flow::PreventDefault,
                _ => Flow::Continue,
            },
        ));

        subscriptions.push(bus.subscribe(
            EventFilter::MouseOnly,
            move |s: &mut MouseState, e: &PlatformEvent| {
                match *e {
                    PlatformEvent::MouseMove {
                        target,
                        x,
                        y,
                        movement_x,
                        movement_y,
                    } if target == frame => {
                        s.x = x / s.scale.x;
                        s.y = y / s.scale.y;
                        s.delta_x = movement_x / s.scale.x;
                        s.delta_y = movement_y / s.scale.y;
                    }
                    PlatformEvent::Wheel {
                        target,
                        delta_x,
                        delta_y,
                        delta_z,
                    } if target == frame => {
                        s.wheel_delta_x = delta_x;
                        s.wheel_delta_y = delta_y;
                        s.wheel_delta_z = delta_z;
                    }
                    PlatformEvent::MouseDown { target, button }
                    | PlatformEvent::MouseUp { target, button }
                        if target == frame && MouseButton::from_code(button).is_none() =>
                    {
                        warn!("mouse: ignoring unknown button code {button}");
                    }
                    _ => {}
                }
                Flow::Continue
            },
        ));

        debug!("mouse: listening on frame {:?} with scale {:?}", frame, scale);
        Ok(Self {
            state: MouseState {
                lifecycle,
                scale,
                x: 0.0,
                y: 0.0,
                delta_x: 0.0,
                delta_y: 0.0,
                wheel_delta_x: 0.0,
                wheel_delta_y: 0.0,
                wheel_delta_z: 0.0,
            },
            frame,
            bus,
            subscriptions,
            disposed: false,
        })
    }

    pub fn from_config(config: &MouseConfig) -> Result<Self> {
        Self::new(config.reference_frame, config.scale)
    }

    /// Feeds one platform event; returns `PreventDefault` for context menus on
    /// the reference frame.
    pub fn handle_event(&mut self, event: &PlatformEvent) -> Flow {
        self.bus.emit(&mut self.state, event)
    }

    /// Per-cycle phase advance; also zeroes movement and wheel deltas.
    pub fn advance(&mut self) {
        self.state.lifecycle.advance();
        self.state.reset_pulses();
    }

    /// Drops every mouse listener. Phases and scalars keep their last value.
    pub fn dispose(&mut self) {
        if self.disposed {
            warn!("mouse: already disposed");
            return;
        }
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// `true` if the position lies in the rectangle `(x1, y1)–(x2, y2)`, edges included.
    pub fn is_in(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
        let (x, y) = (self.state.x, self.state.y);
        x >= x1 && x <= x2 && y >= y1 && y <= y2
    }

    pub fn reference_frame(&self) -> FrameId {
        self.frame
    }

    pub fn scale(&self) -> Scale {
        self.state.scale
    }

    /// Keep this in sync with the program's current display scale.
    pub fn set_scale(&mut self, scale: Scale) {
        self.state.scale = scale;
    }

    pub fn x(&self) -> f32 {
        self.state.x
    }

    pub fn y(&self) -> f32 {
        self.state.y
    }

    pub fn delta_x(&self) -> f32 {
        self.state.delta_x
    }

    pub fn delta_y(&self) -> f32 {
        self.state.delta_y
    }

    pub fn wheel_delta_x(&self) -> f32 {
        self.state.wheel_delta_x
    }

    pub fn wheel_delta_y(&self) -> f32 {
        self.state.wheel_delta_y
    }

    pub fn wheel_delta_z(&self) -> f32 {
        self.state.wheel_delta_z
    }

    pub fn state(&self) -> &MouseState {
        &self.state
    }

    pub fn lifecycle(&self) -> &Lifecycle<bool> {
        &self.state.lifecycle
    }

    pub fn bus_mut(&mut self) -> &mut EventBus<MouseState> {
        &mut self.bus
    }

    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.state.lifecycle.is(view, id)
    }

    pub fn is_button(&self, view: Phase, button: MouseButton) -> bool {
        self.is(view, button.as_str())
    }

    pub fn pressed(&self, button: MouseButton) -> bool {
        self.is_button(Phase::Pressed, button)
    }

    pub fn held(&self, button: MouseButton) -> bool {
        self.is_button(Phase::Held, button)
    }

    pub fn released(&self, button: MouseButton) -> bool {
        self.is_button(Phase::Released, button)
    }

    pub fn idle(&self, button: MouseButton) -> bool {
        self.is_button(Phase::Idle, button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse() -> MouseInput {
        MouseInput::new(FrameId::ROOT, Scale::default()).unwrap()
    }

    fn move_to(target: FrameId, x: f32, y: f32) -> PlatformEvent {
        PlatformEvent::MouseMove {
            target,
            x,
            y,
            movement_x: 0.0,
            movement_y: 0.0,
        }
    }

    #[test]
    fn tracks_position() {
        let mut m = mouse();
        m.handle_event(&move_to(FrameId::ROOT, 20.0, 30.0));
        assert_eq!(m.x(), 20.0);
        assert_eq!(m.y(), 30.0);
    }

    #[test]
    fn sets_button_states() {
        let mut m = mouse();
        m.handle_event(&PlatformEvent::MouseDown {
            target: FrameId::ROOT,
            button: 2,
        });
        assert!(m.pressed(MouseButton::Right));
        m.handle_event(&PlatformEvent::MouseUp {
            target: FrameId::ROOT,
            button: 0,
        });
        assert!(m.released(MouseButton::Left));
        assert!(m.is(Phase::Idle, "mouseWheel"));
    }

    #[test]
    fn ignores_events_for_other_frames() {
        let div = FrameId(7);
        let mut m = MouseInput::new(div, Scale::default()).unwrap();
        m.handle_event(&move_to(FrameId::ROOT, 10.0, 15.0));
        assert_eq!((m.x(), m.y()), (0.0, 0.0));
        m.handle_event(&move_to(div, 30.0, 35.0));
        assert_eq!((m.x(), m.y()), (30.0, 35.0));
    }

    #[test]
    fn scales_position() {
        let mut m = mouse();
        m.set_scale(Scale { x: 2.0, y: 4.0 });
        m.handle_event(&move_to(FrameId::ROOT, 8.0, 8.0));
        assert_eq!(m.x(), 4.0);
        assert_eq!(m.y(), 2.0);
    }

    #[test]
    fn deltas_reset_on_advance() {
        let mut m = mouse();
        m.handle_event(&PlatformEvent::MouseMove {
            target: FrameId::ROOT,
            x: 10.0,
            y: 10.0,
            movement_x: 4.0,
            movement_y: -4.0,
        });
        assert_eq!(m.delta_x(), 4.0);
        assert_eq!(m.delta_y(), -4.0);
        m.handle_event(&PlatformEvent::Wheel {
            target: FrameId::ROOT,
            delta_x: 1.0,
            delta_y: 2.0,
            delta_z: 3.0,
        });
        assert_eq!(m.wheel_delta_x(), 1.0);
        assert_eq!(m.wheel_delta_y(), 2.0);
        assert_eq!(m.wheel_delta_z(), 3.0);

        m.advance();
        assert_eq!(m.delta_x(), 0.0);
        assert_eq!(m.delta_y(), 0.0);
        assert_eq!(m.wheel_delta_x(), 0.0);
        assert_eq!(m.wheel_delta_y(), 0.0);
        assert_eq!(m.wheel_delta_z(), 0.0);
        assert_eq!((m.x(), m.y()), (10.0, 10.0));
    }

    #[test]
    fn suppresses_context_menu_on_own_frame() {
        let div = FrameId(3);
        let mut m = MouseInput::new(div, Scale::default()).unwrap();
        let flow = m.handle_event(&PlatformEvent::ContextMenu { target: div });
        assert!(flow.is_default_prevented());
        let flow = m.handle_event(&PlatformEvent::ContextMenu {
            target: FrameId::ROOT,
        });
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn is_in_is_inclusive() {
        let mut m = mouse();
        m.handle_event(&move_to(FrameId::ROOT, 5.0, 5.0));
        assert!(m.is_in(2.0, 2.0, 20.0, 20.0));
        assert!(m.is_in(1.0, 5.0, 10.0, 8.0));
        assert!(m.is_in(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn is_in_rejects_outside() {
        let mut m = mouse();
        m.handle_event(&move_to(FrameId::ROOT, 5.0, 5.0));
        assert!(!m.is_in(1.0, 1.0, 10.0, 3.0));
        assert!(!m.is_in(8.0, 1.0, 12.0, 12.0));
        assert!(!m.is_in(1.0, 10.0, 10.0, 12.0));
        assert!(!m.is_in(1.0, 2.0, 3.0, 10.0));
    }

    #[test]
    fn unknown_button_codes_do_nothing() {
        let mut m = mouse();
        m.handle_event(&PlatformEvent::MouseDown {
            target: FrameId::ROOT,
            button: 9,
        });
        for (_, phase) in m.lifecycle().iter() {
            assert_eq!(phase, Phase::Idle);
        }
    }

    #[test]
    fn dispose_releases_every_listener() {
        let mut m = mouse();
        m.dispose();
        m.handle_event(&move_to(FrameId::ROOT, 5.0, 5.0));
        m.handle_event(&PlatformEvent::MouseDown {
            target: FrameId::ROOT,
            button: 0,
        });
        let flow = m.handle_event(&PlatformEvent::ContextMenu {
            target: FrameId::ROOT,
        });
        assert_eq!(flow, Flow::Continue);
        assert_eq!(m.x(), 0.0);
        assert!(m.idle(MouseButton::Left));
        assert!(m.is_disposed());
    }
}
