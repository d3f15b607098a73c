use crate::event::{Flow, PlatformEvent};
use crate::eventbus::Listener;

/// Wraps a listener and only forwards events accepted by a predicate.
///
/// Rejected events report [`Flow::Continue`].
pub struct FilteredListener<S> {
    predicate: Box<dyn Fn(&PlatformEvent) -> bool>,
    inner: Box<dyn Listener<S>>,
}

impl<S> FilteredListener<S> {
    pub fn new(
        predicate: impl Fn(&PlatformEvent) -> bool + 'static,
        inner: impl Listener<S> + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl<S> Listener<S> for FilteredListener<S> {
    fn on_event(&mut self, state: &mut S, event: &PlatformEvent) -> Flow {
        if (self.predicate)(event) {
            self.inner.on_event(state, event)
        } else {
            Flow::Continue
        }
    }
}
