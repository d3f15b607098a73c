//! Listener tables owned by the input sources.
//!
//! Each source keeps an [`EventBus`] over its own mutable state. Registering a
//! control subscribes one or more listeners and returns [`SubscriptionId`]s the
//! source keeps; disposing the source unsubscribes them again, so nothing keeps
//! reacting to events after the source is done.
//!
//! Listeners receive the state at emit time instead of capturing it, which keeps
//! the single-writer model explicit: whoever holds `&mut` to the source is the
//! only one touching its phases.

use crate::event::{Flow, PlatformEvent};
use std::collections::BTreeMap;

/// Reacts to platform events by mutating `S`.
pub trait Listener<S> {
    fn on_event(&mut self, state: &mut S, event: &PlatformEvent) -> Flow;
}

impl<S, F> Listener<S> for F
where
    F: FnMut(&mut S, &PlatformEvent) -> Flow,
{
    fn on_event(&mut self, state: &mut S, event: &PlatformEvent) -> Flow {
        self(state, event)
    }
}

/// Coarse pre-filter applied before a listener is called.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    KeyboardOnly,
    MouseOnly,
    GamepadOnly,
    Custom(fn(&PlatformEvent) -> bool),
}

impl EventFilter {
    pub fn accepts(&self, event: &PlatformEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::KeyboardOnly => event.is_keyboard(),
            EventFilter::MouseOnly => event.is_mouse(),
            EventFilter::GamepadOnly => event.is_gamepad(),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct ListenerEntry<S> {
    listener: Box<dyn Listener<S>>,
    enabled: bool,
    filter: EventFilter,
}

/// Ordered listener table. Listeners run in subscription order.
pub struct EventBus<S> {
    next_id: u64,
    listeners: BTreeMap<SubscriptionId, ListenerEntry<S>>,
}

impl<S> Default for EventBus<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> EventBus<S> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: BTreeMap::new(),
        }
    }

    /// Registers a listener; keep the id to unsubscribe later.
    pub fn subscribe(
        &mut self,
        filter: EventFilter,
        listener: impl Listener<S> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Re-enables a muted listener.
    pub fn enable(&mut self, id: SubscriptionId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Mutes a listener without removing it.
    pub fn disable(&mut self, id: SubscriptionId) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Sends one event to every enabled listener whose filter accepts it.
    pub fn emit(&mut self, state: &mut S, event: &PlatformEvent) -> Flow {
        let mut flow = Flow::Continue;
        for entry in self.listeners.values_mut() {
            if !entry.enabled || !entry.filter.accepts(event) {
                continue;
            }
            flow = flow.merge(entry.listener.on_event(state, event));
        }
        flow
    }

    pub fn emit_all(&mut self, state: &mut S, events: &[PlatformEvent]) -> Flow {
        events
            .iter()
            .fold(Flow::Continue, |flow, event| flow.merge(self.emit(state, event)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_keys(n: &mut u32, _: &PlatformEvent) -> Flow {
        *n += 1;
        Flow::Continue
    }

    #[test]
    fn filters_and_unsubscribes() {
        let mut bus: EventBus<u32> = EventBus::new();
        let mut hits = 0u32;
        let id = bus.subscribe(EventFilter::KeyboardOnly, count_keys);

        bus.emit(&mut hits, &PlatformEvent::key_down("a"));
        bus.emit(&mut hits, &PlatformEvent::GamepadDisconnected);
        assert_eq!(hits, 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&mut hits, &PlatformEvent::key_down("a"));
        assert_eq!(hits, 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn disabled_listeners_are_skipped() {
        let mut bus: EventBus<u32> = EventBus::new();
        let mut hits = 0u32;
        let id = bus.subscribe(EventFilter::All, count_keys);
        bus.disable(id);
        bus.emit(&mut hits, &PlatformEvent::key_up("a"));
        assert_eq!(hits, 0);
        bus.enable(id);
        bus.emit(&mut hits, &PlatformEvent::key_up("a"));
        assert_eq!(hits, 1);
    }

    #[test]
    fn prevent_default_is_sticky_and_order_is_subscription_order() {
        let mut bus: EventBus<Vec<u8>> = EventBus::new();
        bus.subscribe(EventFilter::All, |log: &mut Vec<u8>, _: &PlatformEvent| {
            log.push(1);
            Flow::PreventDefault
        });
        bus.subscribe(EventFilter::All, |log: &mut Vec<u8>, _: &PlatformEvent| {
            log.push(2);
            Flow::Continue
        });

        let mut log = Vec::new();
        let flow = bus.emit_all(
            &mut log,
            &[PlatformEvent::key_down("x"), PlatformEvent::key_up("x")],
        );
        assert_eq!(flow, Flow::PreventDefault);
        assert_eq!(log, vec![1, 2, 1, 2]);
    }
}
