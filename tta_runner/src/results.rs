//! Per-query verdicts and witness traces, printed the way the host
//! program reports them: one line per query, then the trace.

use serde::{Deserialize, Serialize};
use std::fmt;
use tta_model::State;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub query: String,
    pub satisfied: bool,
    /// The trace from the initial configuration to the deciding state: a
    /// goal state for a reachability query, a violating state for an
    /// invariant query.
    pub witness: Option<Vec<State>>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct VerificationResults {
    pub outcomes: Vec<QueryOutcome>,
    pub configurations_checked: usize,
}

impl VerificationResults {
    pub fn outcome(&self, query: &str) -> Option<&QueryOutcome> {
        self.outcomes.iter().find(|o| o.query == query)
    }
}

impl fmt::Display for VerificationResults {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in self.outcomes.iter() {
            writeln!(fmtr, "{}: {}", outcome.query, outcome.satisfied)?;
            if let Some(witness) = &outcome.witness {
                for (i, state) in witness.iter().enumerate() {
                    writeln!(fmtr, "  step {}:", i)?;
                    write!(fmtr, "{}", state)?;
                }
            }
        }
        Ok(())
    }
}
