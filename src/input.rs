//! Per-identifier input lifecycle.
//!
//! Every tracked control (a key, a mouse button, a gamepad button, a virtual
//! axis direction) is in exactly one [`Phase`] at any instant:
//!
//! - **pressed**: the cycle in which the control was first activated.
//! - **held**: every later cycle until it is deactivated.
//! - **released**: the cycle in which it was deactivated.
//! - **idle**: every cycle it is none of the above.
//!
//! Platform signals move a control into `Pressed` or `Released` at any point
//! between two cycles; [`Lifecycle::advance`] (called once per cycle) moves
//! `Pressed → Held` and `Released → Idle`.
//!
//! The four classic views (`pressed`, `held`, `released`, `idle`) are projections
//! of the phase. A source decides what value those views carry through two hooks:
//! an *inactive* value and an *active* value. Plain sources use `false` / `true`;
//! the gamepad uses `Option<bool>` so every view reads `None` while no device is
//! attached.
//!
//! # Example
//! ```
//! use supercontrol::input::{Lifecycle, Phase};
//!
//! let mut registered = Vec::new();
//! let mut lc = Lifecycle::builder(["one", "two"])
//!     .inactive_value(|_| false)
//!     .active_value(|_| true)
//!     .register(|_, id| registered.push(id.to_string()))
//!     .build()
//!     .unwrap();
//! assert_eq!(registered, ["one", "two"]);
//!
//! let one = lc.slot("one").unwrap();
//! lc.activate(one);
//! assert!(lc.is(Phase::Pressed, "one"));
//! lc.advance();
//! assert!(lc.is(Phase::Held, "one"));
//! ```

use crate::error::{InputError, Result};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle phase of one identifier for the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Pressed,
    Held,
    Released,
}

impl Phase {
    /// All phases, in view order.
    pub const ALL: [Phase; 4] = [Phase::Pressed, Phase::Held, Phase::Released, Phase::Idle];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Pressed => "pressed",
            Phase::Held => "held",
            Phase::Released => "released",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value carried by the phase views.
///
/// `is_active` decides whether a view counts as "true" for boolean queries.
pub trait InputValue: Clone + fmt::Debug + PartialEq {
    fn is_active(&self) -> bool;
}

impl InputValue for bool {
    #[inline]
    fn is_active(&self) -> bool {
        *self
    }
}

/// `None` means "unknown" and is never active.
impl InputValue for Option<bool> {
    #[inline]
    fn is_active(&self) -> bool {
        matches!(self, Some(true))
    }
}

/// Position of an identifier inside its source.
///
/// Slots are handed out at construction and are only valid for the lifecycle
/// that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

impl Slot {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

type ValueHook<'a, V> = Box<dyn Fn(&str) -> V + 'a>;
type RegisterHook<'a> = Box<dyn FnMut(Slot, &str) + 'a>;

/// Collects the hooks a concrete source must provide.
///
/// All three hooks are mandatory; [`build`](Self::build) fails with
/// [`InputError::IncompleteSource`] when one is missing.
pub struct LifecycleBuilder<'a, V> {
    ids: Vec<String>,
    inactive: Option<ValueHook<'a, V>>,
    active: Option<ValueHook<'a, V>>,
    register: Option<RegisterHook<'a>>,
}

impl<'a, V: InputValue> LifecycleBuilder<'a, V> {
    /// Value of every view that is not the current phase.
    pub fn inactive_value(mut self, hook: impl Fn(&str) -> V + 'a) -> Self {
        self.inactive = Some(Box::new(hook));
        self
    }

    /// Value of the view matching the current phase. `idle` starts with it.
    pub fn active_value(mut self, hook: impl Fn(&str) -> V + 'a) -> Self {
        self.active = Some(Box::new(hook));
        self
    }

    /// Called once per identifier, in order, to install its platform listeners.
    pub fn register(mut self, hook: impl FnMut(Slot, &str) + 'a) -> Self {
        self.register = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<Lifecycle<V>> {
        let inactive = self.inactive.ok_or(InputError::IncompleteSource {
            hook: "inactive_value",
        })?;
        let active = self.active.ok_or(InputError::IncompleteSource {
            hook: "active_value",
        })?;
        let mut register = self.register.ok_or(InputError::IncompleteSource { hook: "register" })?;

        let mut index = HashMap::with_capacity(self.ids.len());
        for (i, id) in self.ids.iter().enumerate() {
            if index.insert(id.clone(), Slot(i)).is_some() {
                return Err(InputError::DuplicateIdentifier(id.clone()));
            }
        }

        let mut lifecycle = Lifecycle {
            phases: vec![Phase::Idle; self.ids.len()],
            ids: self.ids,
            index,
            inactive: Vec::new(),
            active: Vec::new(),
        };
        lifecycle.reseed(&*inactive, &*active);

        for (i, id) in lifecycle.ids.iter().enumerate() {
            register(Slot(i), id.as_str());
        }

        Ok(lifecycle)
    }
}

/// Phase table for a fixed, ordered identifier set.
#[derive(Clone, Debug)]
pub struct Lifecycle<V = bool> {
    ids: Vec<String>,
    index: HashMap<String, Slot>,
    phases: Vec<Phase>,
    // Cached at seed time so resets never call back into the source.
    inactive: Vec<V>,
    active: Vec<V>,
}

impl<V: InputValue> Lifecycle<V> {
    pub fn builder<'a, I, S>(ids: I) -> LifecycleBuilder<'a, V>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LifecycleBuilder {
            ids: ids.into_iter().map(Into::into).collect(),
            inactive: None,
            active: None,
            register: None,
        }
    }

    /// Identifiers in construction order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn slot(&self, id: &str) -> Option<Slot> {
        self.index.get(id).copied()
    }

    /// Slot of the `index`-th identifier in construction order.
    pub fn slot_at(&self, index: usize) -> Option<Slot> {
        (index < self.ids.len()).then_some(Slot(index))
    }

    pub fn id(&self, slot: Slot) -> &str {
        &self.ids[slot.0]
    }

    #[inline]
    pub fn phase_at(&self, slot: Slot) -> Phase {
        self.phases[slot.0]
    }

    pub fn phase(&self, id: &str) -> Option<Phase> {
        self.slot(id).map(|s| self.phase_at(s))
    }

    /// Value of the `view` projection for `slot`.
    pub fn value_at(&self, view: Phase, slot: Slot) -> &V {
        if self.phases[slot.0] == view {
            &self.active[slot.0]
        } else {
            &self.inactive[slot.0]
        }
    }

    pub fn value(&self, view: Phase, id: &str) -> Option<&V> {
        self.slot(id).map(|s| self.value_at(view, s))
    }

    #[inline]
    pub fn is_at(&self, view: Phase, slot: Slot) -> bool {
        self.value_at(view, slot).is_active()
    }

    /// `false` for identifiers this lifecycle does not track.
    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.slot(id).is_some_and(|s| self.is_at(view, s))
    }

    /// Marks `slot` as pressed unless it is already held.
    pub fn activate(&mut self, slot: Slot) {
        let phase = &mut self.phases[slot.0];
        if *phase != Phase::Held {
            trace!("{}: {} -> pressed", self.ids[slot.0], phase);
            *phase = Phase::Pressed;
        }
    }

    /// Marks `slot` as released. The most recent activate/deactivate wins.
    pub fn deactivate(&mut self, slot: Slot) {
        let phase = &mut self.phases[slot.0];
        trace!("{}: {} -> released", self.ids[slot.0], phase);
        *phase = Phase::Released;
    }

    /// Moves every identifier to its next-cycle phase.
    ///
    /// `Pressed → Held`, `Released → Idle`; `Held` and `Idle` stay put, so a
    /// second call without intervening signals changes nothing.
    pub fn advance(&mut self) {
        for phase in &mut self.phases {
            *phase = match *phase {
                Phase::Pressed => Phase::Held,
                Phase::Released => Phase::Idle,
                other => other,
            };
        }
    }

    /// Recomputes the cached values and puts every identifier back to `Idle`.
    pub fn reseed(&mut self, inactive: &dyn Fn(&str) -> V, active: &dyn Fn(&str) -> V) {
        self.inactive = self.ids.iter().map(|id| inactive(id.as_str())).collect();
        self.active = self.ids.iter().map(|id| active(id.as_str())).collect();
        self.phases.fill(Phase::Idle);
    }

    /// `(id, phase)` pairs in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Phase)> + '_ {
        self.ids.iter().map(String::as_str).zip(self.phases.iter().copied())
    }
}

/// Rejects identifiers that would break the collision-free merge in
/// [`UnifiedInput`](crate::unified::UnifiedInput).
pub(crate) fn check_namespace<'a, I>(ids: I, prefix: &'static str) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for id in ids {
        if id.len() <= prefix.len() || !id.starts_with(prefix) {
            return Err(InputError::InvalidIdentifier {
                id: id.to_string(),
                prefix,
            });
        }
    }
    Ok(())
}
