//! Keyboard, mouse and gamepad behind one surface.
//!
//! [`UnifiedInput`] owns one of each source, built from a single
//! [`InputConfig`]. Because every identifier is namespaced (`Key*`, `mouse*`,
//! `gp*`) the merged views never collide, so a game can ask "jump pressed?" as
//! `input.any_of(Phase::Pressed, ["KeySpace", "gpButton0"])` without caring which
//! device the player uses.
//!
//! Call [`update`](UnifiedInput::update) exactly once per cycle, *after* the
//! cycle's logic has read the input.

use crate::config::InputConfig;
use crate::error::Result;
use crate::event::{Flow, PlatformEvent};
use crate::gamepad::GamepadInput;
use crate::input::Phase;
use crate::keyboard::KeyboardInput;
use crate::mouse::MouseInput;
use crate::snapshot::Snapshot;

pub struct UnifiedInput {
    keyboard: KeyboardInput,
    mouse: MouseInput,
    gamepad: GamepadInput,
}

impl UnifiedInput {
    pub fn new(config: &InputConfig) -> Result<Self> {
        Ok(Self {
            keyboard: KeyboardInput::from_config(&config.keyboard)?,
            mouse: MouseInput::from_config(&config.mouse)?,
            gamepad: GamepadInput::new(config.gamepad.clone())?,
        })
    }

    /// Forwards a platform event to every source.
    pub fn handle_event(&mut self, event: &PlatformEvent) -> Flow {
        self.keyboard
            .handle_event(event)
            .merge(self.mouse.handle_event(event))
            .merge(self.gamepad.handle_event(event))
    }

    /// Advances every source, always keyboard, then mouse, then gamepad.
    pub fn update(&mut self) {
        self.keyboard.advance();
        self.mouse.advance();
        self.gamepad.advance();
    }

    /// Releases every source's listeners.
    pub fn dispose(&mut self) {
        self.keyboard.dispose();
        self.mouse.dispose();
        self.gamepad.dispose();
    }

    pub fn keyboard(&self) -> &KeyboardInput {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardInput {
        &mut self.keyboard
    }

    pub fn mouse(&self) -> &MouseInput {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut MouseInput {
        &mut self.mouse
    }

    pub fn gamepad(&self) -> &GamepadInput {
        &self.gamepad
    }

    pub fn gamepad_mut(&mut self) -> &mut GamepadInput {
        &mut self.gamepad
    }

    pub fn view(&self, view: Phase) -> MergedView<'_> {
        MergedView { input: self, view }
    }

    pub fn pressed(&self) -> MergedView<'_> {
        self.view(Phase::Pressed)
    }

    pub fn held(&self) -> MergedView<'_> {
        self.view(Phase::Held)
    }

    pub fn released(&self) -> MergedView<'_> {
        self.view(Phase::Released)
    }

    pub fn idle(&self) -> MergedView<'_> {
        self.view(Phase::Idle)
    }

    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.view(view).is(id)
    }

    /// `true` if at least one of `ids` is in `view`. Stops at the first hit.
    pub fn any_of<I>(&self, view: Phase, ids: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let merged = self.view(view);
        ids.into_iter().any(|id| merged.is(id.as_ref()))
    }

    /// `true` if every one of `ids` is in `view`. Stops at the first miss.
    ///
    /// Mixing devices rarely makes sense here: with no gamepad attached a `gp*`
    /// id is never true, and two `Pressed` ids need a frame-perfect press.
    pub fn all_of<I>(&self, view: Phase, ids: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let merged = self.view(view);
        ids.into_iter().all(|id| merged.is(id.as_ref()))
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut phases = std::collections::BTreeMap::new();
        for (id, phase) in self.keyboard.lifecycle().iter() {
            phases.insert(id.to_string(), Some(phase));
        }
        for (id, phase) in self.mouse.lifecycle().iter() {
            phases.insert(id.to_string(), Some(phase));
        }
        let connected = self.gamepad.is_connected();
        for (id, phase) in self.gamepad.lifecycle().iter() {
            phases.insert(id.to_string(), connected.then_some(phase));
        }

        Snapshot {
            phases,
            mouse_x: self.mouse.x(),
            mouse_y: self.mouse.y(),
            gamepad_connected: connected,
            left_trigger: self.gamepad.left_trigger(),
            right_trigger: self.gamepad.right_trigger(),
        }
    }
}

/// One phase projection across all three sources.
#[derive(Clone, Copy)]
pub struct MergedView<'a> {
    input: &'a UnifiedInput,
    view: Phase,
}

impl<'a> MergedView<'a> {
    pub fn phase(&self) -> Phase {
        self.view
    }

    /// `None` for untracked ids and for gamepad ids while disconnected.
    pub fn get(&self, id: &str) -> Option<bool> {
        let input = self.input;
        input
            .keyboard
            .lifecycle()
            .value(self.view, id)
            .or_else(|| input.mouse.lifecycle().value(self.view, id))
            .copied()
            .or_else(|| input.gamepad.value(self.view, id))
    }

    pub fn is(&self, id: &str) -> bool {
        self.get(id) == Some(true)
    }

    /// Every identifier with its value, keyboard first, then mouse, then gamepad.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<bool>)> + 'a {
        let view = self.view;
        let input = self.input;
        let keyboard = input.keyboard.lifecycle();
        let mouse = input.mouse.lifecycle();
        let gamepad = input.gamepad.lifecycle();

        keyboard
            .ids()
            .iter()
            .map(move |id| (id.as_str(), keyboard.value(view, id).copied()))
            .chain(
                mouse
                    .ids()
                    .iter()
                    .map(move |id| (id.as_str(), mouse.value(view, id).copied())),
            )
            .chain(
                gamepad
                    .ids()
                    .iter()
                    .map(move |id| (id.as_str(), gamepad.value(view, id).copied().flatten())),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FrameId, GamepadSample};

    fn unified() -> UnifiedInput {
        UnifiedInput::new(&InputConfig::default()).unwrap()
    }

    #[test]
    fn merges_all_sources() {
        let mut input = unified();
        input.handle_event(&PlatformEvent::key_down("w"));
        input.handle_event(&PlatformEvent::MouseDown {
            target: FrameId::ROOT,
            button: 0,
        });
        assert!(input.pressed().is("KeyW"));
        assert!(input.pressed().is("mouseLeft"));
        assert_eq!(input.pressed().get("gpButton0"), None);
        assert_eq!(input.pressed().get("nothing"), None);

        let count = input.view(Phase::Idle).iter().count();
        assert_eq!(
            count,
            InputConfig::default().keyboard.keys.len() + 5 + 25
        );
    }

    #[test]
    fn update_advances_every_source() {
        let mut input = unified();
        input.handle_event(&PlatformEvent::GamepadConnected(GamepadSample::neutral(17, 4)));
        input.handle_event(&PlatformEvent::key_down("a"));
        input.handle_event(&PlatformEvent::MouseDown {
            target: FrameId::ROOT,
            button: 2,
        });
        let mut sample = GamepadSample::neutral(17, 4);
        sample.axes[1] = 1.0;
        input.handle_event(&PlatformEvent::GamepadPolled(sample));

        input.update();
        assert!(input.held().is("KeyA"));
        assert!(input.held().is("mouseRight"));
        assert!(input.pressed().is("gpLeftAxisDown"));

        input.update();
        assert!(input.held().is("gpLeftAxisDown"));
    }

    #[test]
    fn any_and_all() {
        let mut input = unified();
        input.handle_event(&PlatformEvent::key_down("a"));
        input.handle_event(&PlatformEvent::key_down("b"));
        input.update();

        assert!(input.any_of(Phase::Held, ["KeyA", "KeyC"]));
        assert!(!input.any_of(Phase::Held, ["KeyC", "KeyD"]));
        assert!(input.all_of(Phase::Held, ["KeyA", "KeyB"]));
        assert!(!input.all_of(Phase::Held, ["KeyA", "KeyB", "KeyC"]));
        assert!(!input.any_of(Phase::Held, Vec::<String>::new()));
        assert!(input.all_of(Phase::Held, Vec::<String>::new()));

        // No pad attached: gamepad ids never satisfy `all_of`.
        assert!(!input.all_of(Phase::Idle, ["KeyC", "gpButton0"]));
    }

    #[test]
    fn snapshot_marks_gamepad_unknown_while_disconnected() {
        let mut input = unified();
        input.handle_event(&PlatformEvent::key_down("a"));
        let snap = input.snapshot();
        assert!(snap.is(Phase::Pressed, "KeyA"));
        assert!(snap.is(Phase::Idle, "mouseLeft"));
        assert_eq!(snap.phases.get("gpButton0"), Some(&None));
        assert!(!snap.gamepad_connected);
    }

    #[test]
    fn context_menu_flow_bubbles_up() {
        let mut input = unified();
        let flow = input.handle_event(&PlatformEvent::ContextMenu {
            target: FrameId::ROOT,
        });
        assert!(flow.is_default_prevented());
    }
}
