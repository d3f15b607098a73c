use crate::event::{Flow, PlatformEvent};
use crate::eventbus::Listener;

/// A listener that traces every event it sees through `log`.
///
/// Subscribe it to any source's bus while debugging event delivery.
#[derive(Debug, Clone, Default)]
pub struct EventLogger {
    label: &'static str,
}

impl EventLogger {
    pub fn new(label: &'static str) -> Self {
        EventLogger { label }
    }
}

impl<S> Listener<S> for EventLogger {
    fn on_event(&mut self, _: &mut S, event: &PlatformEvent) -> Flow {
        log::trace!("[{}] {:?}", self.label, event);
        Flow::Continue
    }
}
