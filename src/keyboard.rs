//! Keyboard source.
//!
//! Identifiers are key names prefixed with `Key`: `KeyA`, `Key7`, `KeyArrowUp`,
//! `KeyShift`. A key event matches an identifier when its key name equals the
//! identifier without the prefix, ignoring case, so `KeyA` tracks both `"a"` and
//! `"A"`. `KeySpace` matches the `" "` key.

use crate::config::KeyboardConfig;
use crate::error::Result;
use crate::event::{Flow, PlatformEvent};
use crate::eventbus::{EventBus, EventFilter, SubscriptionId};
use crate::filtered_listener::FilteredListener;
use crate::input::{check_namespace, Lifecycle, Phase};
use log::{debug, warn};

/// Namespace prefix of every keyboard identifier.
pub const KEY_PREFIX: &str = "Key";

/// Key name an identifier listens for.
pub fn key_name(id: &str) -> &str {
    match id.strip_prefix(KEY_PREFIX).unwrap_or(id) {
        "Space" => " ",
        name => name,
    }
}

fn same_key(name: &str, key: &str) -> bool {
    if name.is_ascii() && key.is_ascii() {
        name.eq_ignore_ascii_case(key)
    } else {
        name.to_lowercase() == key.to_lowercase()
    }
}

/// Tracks a fixed set of keys through key down/up events.
pub struct KeyboardInput {
    lifecycle: Lifecycle<bool>,
    bus: EventBus<Lifecycle<bool>>,
    subscriptions: Vec<SubscriptionId>,
    disposed: bool,
}

impl KeyboardInput {
    /// Tracks `keys`, which must all carry the `Key` prefix.
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        check_namespace(keys.iter().map(String::as_str), KEY_PREFIX)?;

        let mut bus: EventBus<Lifecycle<bool>> = EventBus::new();
        let mut subscriptions = Vec::with_capacity(keys.len() * 2);

        let lifecycle = Lifecycle::builder(keys)
            .inactive_value(|_| false)
            .active_value(|_| true)
            .register(|slot, id| {
                let down = key_name(id).to_string();
                let up = down.clone();

                subscriptions.push(bus.subscribe(
                    EventFilter::KeyboardOnly,
                    FilteredListener::new(
                        move |e: &PlatformEvent| {
                            matches!(e, PlatformEvent::KeyDown { key } if same_key(&down, key))
                        },
                        move |lc: &mut Lifecycle<bool>, _: &PlatformEvent| {
                            lc.activate(slot);
                            Flow::Continue
                        },
                    ),
                ));
                subscriptions.push(bus.subscribe(
                    EventFilter::KeyboardOnly,
                    FilteredListener::new(
                        move |e: &PlatformEvent| {
                            matches!(e, PlatformEvent::KeyUp { key } if same_key(&up, key))
                        },
                        move |lc: &mut Lifecycle<bool>, _: &PlatformEvent| {
                            lc.deactivate(slot);
                            Flow::Continue
                        },
                    ),
                ));
            })
            .build()?;

        debug!("keyboard: tracking {} key(s)", lifecycle.len());
        Ok(Self {
            lifecycle,
            bus,
            subscriptions,
            disposed: false,
        })
    }

    pub fn from_config(config: &KeyboardConfig) -> Result<Self> {
        Self::new(config.keys.iter().cloned())
    }

    /// Feeds one platform event. Non-keyboard events are ignored.
    pub fn handle_event(&mut self, event: &PlatformEvent) -> Flow {
        self.bus.emit(&mut self.lifecycle, event)
    }

    /// Per-cycle phase advance.
    pub fn advance(&mut self) {
        self.lifecycle.advance();
    }

    /// Drops every key listener. Phases keep their last value.
    pub fn dispose(&mut self) {
        if self.disposed {
            warn!("keyboard: already disposed");
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

    pub fn lifecycle(&self) -> &Lifecycle<bool> {
        &self.lifecycle
    }

    /// Bus the key listeners live on; extra listeners may be attached here.
    pub fn bus_mut(&mut self) -> &mut EventBus<Lifecycle<bool>> {
        &mut self.bus
    }

    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.lifecycle.is(view, id)
    }

    pub fn pressed(&self, id: &str) -> bool {
        self.is(Phase::Pressed, id)
    }

    pub fn held(&self, id: &str) -> bool {
        self.is(Phase::Held, id)
    }

    pub fn released(&self, id: &str) -> bool {
        self.is(Phase::Released, id)
    }

    pub fn idle(&self, id: &str) -> bool {
        self.is(Phase::Idle, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    fn keyboard() -> KeyboardInput {
        KeyboardInput::new(["KeyA", "KeySpace", "KeyArrowUp"]).unwrap()
    }

    #[test]
    fn sets_pressed_on_key_down() {
        let mut k = keyboard();
        assert!(!k.pressed("KeyA"));
        k.handle_event(&PlatformEvent::key_down("a"));
        assert!(k.pressed("KeyA"));
        assert!(!k.idle("KeyA"));
    }

    #[test]
    fn sets_released_on_key_up() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("a"));
        assert!(!k.released("KeyA"));
        k.handle_event(&PlatformEvent::key_up("a"));
        assert!(k.released("KeyA"));
        assert!(!k.pressed("KeyA"));
    }

    #[test]
    fn pressed_becomes_held_on_advance() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("a"));
        assert!(!k.held("KeyA"));
        k.advance();
        assert!(!k.pressed("KeyA"));
        assert!(k.held("KeyA"));
        k.advance();
        assert!(k.held("KeyA"));
        k.handle_event(&PlatformEvent::key_up("a"));
        assert!(!k.held("KeyA"));
    }

    #[test]
    fn released_becomes_idle_on_advance() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("a"));
        k.handle_event(&PlatformEvent::key_up("a"));
        assert!(k.released("KeyA"));
        assert!(!k.idle("KeyA"));
        k.advance();
        assert!(!k.released("KeyA"));
        assert!(k.idle("KeyA"));
        k.advance();
        assert!(k.idle("KeyA"));
    }

    #[test]
    fn matching_ignores_case_and_handles_space() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("A"));
        k.handle_event(&PlatformEvent::key_down(" "));
        k.handle_event(&PlatformEvent::key_down("arrowup"));
        assert!(k.pressed("KeyA"));
        assert!(k.pressed("KeySpace"));
        assert!(k.pressed("KeyArrowUp"));
    }

    #[test]
    fn auto_repeat_does_not_restart_a_held_key() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("a"));
        k.advance();
        k.handle_event(&PlatformEvent::key_down("a"));
        assert!(k.held("KeyA"));
        assert!(!k.pressed("KeyA"));
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut k = keyboard();
        k.handle_event(&PlatformEvent::key_down("b"));
        for (_, phase) in k.lifecycle().iter() {
            assert_eq!(phase, Phase::Idle);
        }
    }

    #[test]
    fn dispose_stops_tracking() {
        let mut k = keyboard();
        k.dispose();
        assert!(k.is_disposed());
        k.handle_event(&PlatformEvent::key_down("a"));
        assert!(k.idle("KeyA"));
        k.dispose();
    }

    #[test]
    fn rejects_unprefixed_ids() {
        let err = KeyboardInput::new(["a"]).err().unwrap();
        assert!(matches!(err, InputError::InvalidIdentifier { prefix: "Key", .. }));
    }
}
