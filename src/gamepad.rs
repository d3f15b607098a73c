//! Gamepad source.
//!
//! Unlike keys and mouse buttons, a gamepad does not report edges; it is sampled
//! once per cycle and [`GamepadInput::advance`] turns the difference between the
//! sample and the current phases into activate/deactivate calls.
//!
//! # Layout
//! Only the standard layout is understood: 17 buttons (face, bumpers, triggers,
//! select/start, stick clicks, D-pad, center) followed by 4 axes
//! (`LX, LY, RX, RY`, "right"/"down" positive). On top of the buttons the source
//! synthesizes eight *virtual axis buttons* (`gpLeftAxisLeft`, `gpRightAxisDown`,
//! ...) that press once a stick axis passes the press threshold in their direction.
//!
//! # Triggers
//! Some pads report the triggers as analog buttons 6/7, others as extra axes 4/5.
//! The mode is guessed on connect: exactly 6 axes means axis triggers, anything
//! else means button triggers. This is a layout heuristic, not a hardware query,
//! and can misclassify unusual pads.
//!
//! # Disconnected state
//! Without a pad every phase view reads `None`, the trigger values read `0`, and
//! [`get_axis`](GamepadInput::get_axis) returns `0`. Check
//! [`is_connected`](GamepadInput::is_connected) when the distinction matters.
//!
//! # Limitations
//! One pad at a time. Hosts with several pads must pick one to forward.

use crate::config::GamepadConfig;
use crate::error::Result;
use crate::event::{Flow, GamepadSample, PlatformEvent};
use crate::eventbus::{EventBus, EventFilter, SubscriptionId};
use crate::input::{Lifecycle, Phase};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Namespace prefix of every gamepad identifier.
pub const GAMEPAD_PREFIX: &str = "gp";

/// Number of physical buttons in the standard layout.
pub const BUTTON_COUNT: usize = 17;

/// Axis count that marks a pad as reporting its triggers on axes 4 and 5.
pub const AXIS_TRIGGER_AXES: usize = 6;

/// Every control the gamepad source tracks, in identifier order.
///
/// The first [`BUTTON_COUNT`] entries match standard-layout button indices; the
/// rest are virtual axis buttons, two per axis (negative direction first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamepadControl {
    Button0,
    Button1,
    Button2,
    Button3,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Select,
    Start,
    LeftJoystick,
    RightJoystick,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Center,
    LeftAxisLeft,
    LeftAxisRight,
    LeftAxisUp,
    LeftAxisDown,
    RightAxisLeft,
    RightAxisRight,
    RightAxisUp,
    RightAxisDown,
}

impl GamepadControl {
    pub const ALL: [GamepadControl; 25] = [
        GamepadControl::Button0,
        GamepadControl::Button1,
        GamepadControl::Button2,
        GamepadControl::Button3,
        GamepadControl::LeftBumper,
        GamepadControl::RightBumper,
        GamepadControl::LeftTrigger,
        GamepadControl::RightTrigger,
        GamepadControl::Select,
        GamepadControl::Start,
        GamepadControl::LeftJoystick,
        GamepadControl::RightJoystick,
        GamepadControl::DpadUp,
        GamepadControl::DpadDown,
        GamepadControl::DpadLeft,
        GamepadControl::DpadRight,
        GamepadControl::Center,
        GamepadControl::LeftAxisLeft,
        GamepadControl::LeftAxisRight,
        GamepadControl::LeftAxisUp,
        GamepadControl::LeftAxisDown,
        GamepadControl::RightAxisLeft,
        GamepadControl::RightAxisRight,
        GamepadControl::RightAxisUp,
        GamepadControl::RightAxisDown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GamepadControl::Button0 => "gpButton0",
            GamepadControl::Button1 => "gpButton1",
            GamepadControl::Button2 => "gpButton2",
            GamepadControl::Button3 => "gpButton3",
            GamepadControl::LeftBumper => "gpLeftBumper",
            GamepadControl::RightBumper => "gpRightBumper",
            GamepadControl::LeftTrigger => "gpLeftTrigger",
            GamepadControl::RightTrigger => "gpRightTrigger",
            GamepadControl::Select => "gpSelect",
            GamepadControl::Start => "gpStart",
            GamepadControl::LeftJoystick => "gpLeftJoystick",
            GamepadControl::RightJoystick => "gpRightJoystick",
            GamepadControl::DpadUp => "gpDpadUp",
            GamepadControl::DpadDown => "gpDpadDown",
            GamepadControl::DpadLeft => "gpDpadLeft",
            GamepadControl::DpadRight => "gpDpadRight",
            GamepadControl::Center => "gpCenter",
            GamepadControl::LeftAxisLeft => "gpLeftAxisLeft",
            GamepadControl::LeftAxisRight => "gpLeftAxisRight",
            GamepadControl::LeftAxisUp => "gpLeftAxisUp",
            GamepadControl::LeftAxisDown => "gpLeftAxisDown",
            GamepadControl::RightAxisLeft => "gpRightAxisLeft",
            GamepadControl::RightAxisRight => "gpRightAxisRight",
            GamepadControl::RightAxisUp => "gpRightAxisUp",
            GamepadControl::RightAxisDown => "gpRightAxisDown",
        }
    }

    /// Position in [`GamepadControl::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_virtual(self) -> bool {
        self.index() >= BUTTON_COUNT
    }
}

impl AsRef<str> for GamepadControl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StickAxis {
    X,
    Y,
}

/// Raw axis index of one stick axis.
#[inline]
pub fn axis_index(stick: Stick, axis: StickAxis) -> usize {
    (stick == Stick::Right) as usize * 2 + (axis == StickAxis::Y) as usize
}

/// How a pad reports its triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Analog values on buttons 6 and 7.
    Button,
    /// Raw values on axes 4 and 5.
    Axis,
}

impl TriggerMode {
    /// Best-effort guess from the axis count.
    pub fn detect(sample: &GamepadSample) -> Self {
        if sample.axes.len() == AXIS_TRIGGER_AXES {
            TriggerMode::Axis
        } else {
            TriggerMode::Button
        }
    }
}

/// Axis backing trigger button `button` in axis trigger mode.
fn trigger_axis(button: usize) -> Option<usize> {
    match button {
        6 => Some(4),
        7 => Some(5),
        _ => None,
    }
}

/// `-1`, `0` or `1`; unlike `f32::signum`, zero maps to zero.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Device-side state written by the gamepad listeners.
#[derive(Debug, Clone)]
pub struct GamepadState {
    lifecycle: Lifecycle<Option<bool>>,
    sample: Option<GamepadSample>,
    trigger_mode: Option<TriggerMode>,
    left_trigger: f32,
    right_trigger: f32,
}

impl GamepadState {
    fn connect(&mut self, sample: GamepadSample) {
        let mode = TriggerMode::detect(&sample);
        debug!(
            "gamepad: connected ({} buttons, {} axes, {:?} triggers)",
            sample.buttons.len(),
            sample.axes.len(),
            mode
        );
        self.sample = Some(sample);
        self.trigger_mode = Some(mode);
        self.left_trigger = 0.0;
        self.right_trigger = 0.0;
        self.lifecycle.reseed(&|_| Some(false), &|_| Some(true));
    }

    fn disconnect(&mut self) {
        if self.sample.is_some() {
            debug!("gamepad: disconnected");
        }
        self.sample = None;
        self.trigger_mode = None;
        self.left_trigger = 0.0;
        self.right_trigger = 0.0;
        self.lifecycle.reseed(&|_| None, &|_| None);
    }

    fn poll(&mut self, sample: GamepadSample) {
        match self.sample.as_mut() {
            Some(current) => *current = sample,
            None => trace!("gamepad: ignoring sample while disconnected"),
        }
    }
}

/// Turns one sample into lifecycle edges. Runs after the phase advance.
fn apply_sample(
    lifecycle: &mut Lifecycle<Option<bool>>,
    sample: &GamepadSample,
    mode: TriggerMode,
    settings: &GamepadConfig,
) {
    for control in GamepadControl::ALL {
        let Some(slot) = lifecycle.slot_at(control.index()) else {
            continue;
        };
        let i = control.index();
        let phase = lifecycle.phase_at(slot);

        if i < BUTTON_COUNT {
            let down = match (mode, trigger_axis(i)) {
                (TriggerMode::Axis, Some(axis)) => match sample.axis(axis) {
                    Some(v) => v > settings.trigger_press_threshold,
                    None => continue,
                },
                _ => match sample.button(i) {
                    Some(b) => b.pressed,
                    None => continue,
                },
            };

            if phase == Phase::Idle && down {
                lifecycle.activate(slot);
            } else if phase == Phase::Held && !down {
                lifecycle.deactivate(slot);
            }
        } else {
            let a = i - BUTTON_COUNT;
            let direction = if a % 2 == 0 { -1.0 } else { 1.0 };
            // Pads with fewer axes leave these idle forever.
            let Some(v) = sample.axis(a / 2) else {
                continue;
            };
            let beyond = v.abs() >= settings.press_threshold;

            if phase == Phase::Idle && beyond && sign(v) == direction {
                lifecycle.activate(slot);
            } else if phase == Phase::Held
                && ((!beyond && (sign(v) == direction || v == 0.0)) || sign(v) == -direction)
            {
                // The second clause catches a stick flicked straight across
                // center without a sample inside the press threshold.
                lifecycle.deactivate(slot);
            }
        }
    }
}

/// Tracks one standard-layout gamepad.
pub struct GamepadInput {
    state: GamepadState,
    settings: GamepadConfig,
    bus: EventBus<GamepadState>,
    subscriptions: Vec<SubscriptionId>,
    disposed: bool,
}

impl GamepadInput {
    pub fn new(settings: GamepadConfig) -> Result<Self> {
        let lifecycle = Lifecycle::builder(GamepadControl::ALL.map(GamepadControl::as_str))
            .inactive_value(|_| Some(false))
            .active_value(|_| Some(true))
            // Polled: controls are read in `advance`, nothing to subscribe per id.
            .register(|_, _| {})
            .build()?;

        let mut bus: EventBus<GamepadState> = EventBus::new();
        let subscriptions = vec![bus.subscribe(
            EventFilter::GamepadOnly,
            |s: &mut GamepadState, e: &PlatformEvent| {
                match e {
                    PlatformEvent::GamepadConnected(sample) => s.connect(sample.clone()),
                    PlatformEvent::GamepadPolled(sample) => s.poll(sample.clone()),
                    PlatformEvent::GamepadDisconnected => s.disconnect(),
                    _ => {}
                }
                Flow::Continue
            },
        )];

        let mut state = GamepadState {
            lifecycle,
            sample: None,
            trigger_mode: None,
            left_trigger: 0.0,
            right_trigger: 0.0,
        };
        state.disconnect();

        Ok(Self {
            state,
            settings,
            bus,
            subscriptions,
            disposed: false,
        })
    }

    /// Feeds connect / poll / disconnect events. Other events are ignored.
    pub fn handle_event(&mut self, event: &PlatformEvent) -> Flow {
        self.bus.emit(&mut self.state, event)
    }

    /// Attaches a pad and seeds every control idle.
    pub fn connect(&mut self, sample: GamepadSample) {
        self.state.connect(sample);
    }

    /// Detaches the pad; every view becomes `None` immediately.
    pub fn disconnect(&mut self) {
        self.state.disconnect();
    }

    /// Replaces the current reading. Ignored while disconnected.
    pub fn set_sample(&mut self, sample: GamepadSample) {
        self.state.poll(sample);
    }

    /// Per-cycle update: advances phases, then applies the current sample.
    pub fn advance(&mut self) {
        let state = &mut self.state;
        state.lifecycle.advance();

        let (Some(sample), Some(mode)) = (state.sample.as_ref(), state.trigger_mode) else {
            return;
        };
        apply_sample(&mut state.lifecycle, sample, mode, &self.settings);

        let (left, right) = match mode {
            TriggerMode::Button => (
                sample.button(6).map_or(0.0, |b| b.value),
                sample.button(7).map_or(0.0, |b| b.value),
            ),
            TriggerMode::Axis => (
                sample.axis(4).unwrap_or(0.0),
                sample.axis(5).unwrap_or(0.0),
            ),
        };
        state.left_trigger = left;
        state.right_trigger = right;
    }

    /// Dead-zoned (and optionally disk-clamped) stick axis; `0` when unavailable.
    pub fn get_axis(&self, stick: Stick, axis: StickAxis) -> f32 {
        let Some(sample) = self.state.sample.as_ref() else {
            return 0.0;
        };
        let index = axis_index(stick, axis);
        let Some(v) = sample.axis(index) else {
            return 0.0;
        };
        let dead_zone = self.settings.dead_zone;
        if v.abs() < dead_zone {
            return 0.0;
        }

        if self.settings.clamp_axes {
            // The other axis of the same stick.
            let paired = sample.axis(index ^ 1).unwrap_or(0.0);
            if paired.abs() >= dead_zone {
                let magnitude = (v * v + paired * paired).sqrt();
                if magnitude > 1.0 {
                    return v / magnitude;
                }
            }
        }
        v
    }

    /// Both axes of a stick as `(x, y)`.
    pub fn stick(&self, stick: Stick) -> (f32, f32) {
        (
            self.get_axis(stick, StickAxis::X),
            self.get_axis(stick, StickAxis::Y),
        )
    }

    /// Drops the connect/poll/disconnect listeners.
    pub fn dispose(&mut self) {
        if self.disposed {
            warn!("gamepad: already disposed");
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

    pub fn is_connected(&self) -> bool {
        self.state.sample.is_some()
    }

    /// `None` while disconnected.
    pub fn trigger_mode(&self) -> Option<TriggerMode> {
        self.state.trigger_mode
    }

    /// Current reading, if a pad is attached.
    pub fn sample(&self) -> Option<&GamepadSample> {
        self.state.sample.as_ref()
    }

    pub fn left_trigger(&self) -> f32 {
        self.state.left_trigger
    }

    pub fn right_trigger(&self) -> f32 {
        self.state.right_trigger
    }

    pub fn settings(&self) -> &GamepadConfig {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GamepadConfig {
        &mut self.settings
    }

    pub fn lifecycle(&self) -> &Lifecycle<Option<bool>> {
        &self.state.lifecycle
    }

    pub fn bus_mut(&mut self) -> &mut EventBus<GamepadState> {
        &mut self.bus
    }

    /// `Some(bool)` while connected, `None` otherwise or for unknown ids.
    pub fn value(&self, view: Phase, id: &str) -> Option<bool> {
        self.state.lifecycle.value(view, id).copied().flatten()
    }

    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.state.lifecycle.is(view, id)
    }

    pub fn is_control(&self, view: Phase, control: GamepadControl) -> bool {
        self.is(view, control.as_str())
    }

    pub fn pressed(&self, control: GamepadControl) -> bool {
        self.is_control(Phase::Pressed, control)
    }

    pub fn held(&self, control: GamepadControl) -> bool {
        self.is_control(Phase::Held, control)
    }

    pub fn released(&self, control: GamepadControl) -> bool {
        self.is_control(Phase::Released, control)
    }

    pub fn idle(&self, control: GamepadControl) -> bool {
        self.is_control(Phase::Idle, control)
    }
}
