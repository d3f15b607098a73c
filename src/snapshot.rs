//! Per-cycle snapshot of every tracked control.
//!
//! [`Snapshot`] is an **owned**, read-only copy of the merged state produced by
//! [`UnifiedInput::snapshot`](crate::unified::UnifiedInput::snapshot). Unlike
//! the live views it survives the next `update()`, so it can be handed to another
//! system, diffed against the previous cycle, or dumped as JSON for a replay log.
//!
//! # Semantics
//! - Keys are identifiers (`KeyA`, `mouseLeft`, `gpButton0`, ...).
//! - A phase of `None` means "unknown": gamepad controls while no pad is attached.
//!
//! # Examples
//! ```no_run
//! use supercontrol::{InputConfig, Phase, UnifiedInput};
//!
//! let input = UnifiedInput::new(&InputConfig::default()).unwrap();
//! let snap = input.snapshot();
//! for (id, phase) in snap.iter() {
//!     if phase == Some(Phase::Held) {
//!         println!("{id} is held");
//!     }
//! }
//! println!("{}", snap.to_json().unwrap());
//! ```

use crate::error::Result;
use crate::input::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `id → phase`, sorted by id.
    pub phases: BTreeMap<String, Option<Phase>>,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub gamepad_connected: bool,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl Snapshot {
    /// Phase of `id`; `None` if unknown or untracked.
    #[inline]
    pub fn phase(&self, id: &str) -> Option<Phase> {
        self.phases.get(id).copied().flatten()
    }

    #[inline]
    pub fn is(&self, view: Phase, id: &str) -> bool {
        self.phase(id) == Some(view)
    }

    /// Iterate `(id, phase)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Phase>)> {
        self.phases.iter().map(|(id, phase)| (id.as_str(), *phase))
    }

    /// Identifiers whose phase differs from `previous`.
    pub fn changed_since<'a>(&'a self, previous: &'a Snapshot) -> impl Iterator<Item = &'a str> {
        self.iter()
            .filter(move |(id, phase)| previous.phases.get(*id).copied().flatten() != *phase)
            .map(|(id, _)| id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn into_inner(self) -> BTreeMap<String, Option<Phase>> {
        self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(entries: &[(&str, Option<Phase>)]) -> Snapshot {
        Snapshot {
            phases: entries
                .iter()
                .map(|(id, phase)| (id.to_string(), *phase))
                .collect(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn lookups() {
        let s = snap(&[("KeyA", Some(Phase::Held)), ("gpButton0", None)]);
        assert!(s.is(Phase::Held, "KeyA"));
        assert_eq!(s.phase("gpButton0"), None);
        assert_eq!(s.phase("missing"), None);
    }

    #[test]
    fn changed_since_lists_differences() {
        let before = snap(&[("KeyA", Some(Phase::Idle)), ("KeyB", Some(Phase::Held))]);
        let after = snap(&[("KeyA", Some(Phase::Pressed)), ("KeyB", Some(Phase::Held))]);
        let changed: Vec<_> = after.changed_since(&before).collect();
        assert_eq!(changed, vec!["KeyA"]);
    }

    #[test]
    fn json_uses_lowercase_phases() {
        let s = snap(&[("KeyA", Some(Phase::Pressed)), ("gpButton0", None)]);
        let json = s.to_json().unwrap();
        assert!(json.contains(r#""KeyA":"pressed""#));
        assert!(json.contains(r#""gpButton0":null"#));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
