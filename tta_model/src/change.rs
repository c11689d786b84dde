//! The units a network advances by: one enabled edge (a choice), a merged
//! tick step, and a solver-produced environment step.

use super::*;
use serde::{Deserialize, Serialize};
use tta_domain::*;

/// One enabled edge together with its effects, evaluated once so the tick
/// resolver can test conflicts without re-running updates.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub component: String,
    pub edge: EdgeId,
    pub target: LocationId,
    pub diff: SymbolDiff,
}

impl Choice {
    /// Two choices conflict when they fire from the same component's
    /// current location, or when their updates race on a key with
    /// different values.
    pub fn conflicts_with(&self, other: &Choice) -> bool {
        self.component == other.component || self.diff.conflicts_with(&other.diff).is_some()
    }
}

/// A maximal set of non-conflicting choices summed into one step, or an
/// environment step's effect on the tables.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct StateChange {
    pub locations: Vec<(String, LocationId)>,
    pub diff: SymbolDiff,
}

impl StateChange {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.diff.is_empty()
    }

    pub fn push(&mut self, choice: &Choice) {
        self.locations
            .push((choice.component.clone(), choice.target));
        // conflict freedom inside a maximal set guarantees no write races
        self.diff.merge(&choice.diff);
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locs: Vec<_> = self
            .locations
            .iter()
            .map(|(c, l)| format!("{} -> #{}", c, l.0))
            .collect();
        write!(fmtr, "[{}] {}", locs.join(", "), self.diff)
    }
}

/// One tock candidate: a concrete assignment for the externally controlled
/// symbols, plus the clock delay that produced it, if any.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentChange {
    pub assignment: SymbolDiff,
    pub delay: Option<i64>,
}

impl fmt::Display for EnvironmentChange {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delay {
            Some(d) => write!(fmtr, "{} (delay {}ms)", self.assignment, d),
            None => write!(fmtr, "{}", self.assignment),
        }
    }
}
