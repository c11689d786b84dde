//! Immutable configuration snapshots used by the searcher.

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use tta_domain::*;

/// A full network configuration: every component's current location plus
/// both symbol tables. Two states are equal iff all locations and all
/// symbol values match; the hash is stable under table iteration order.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct State {
    pub locations: BTreeMap<String, String>,
    pub internal: SymbolTable,
    pub external: SymbolTable,
}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (component, location) in self.locations.iter() {
            component.hash(state);
            location.hash(state);
        }
        self.internal.hash(state);
        self.external.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (component, location) in self.locations.iter() {
            writeln!(fmtr, "  {} @ {}", component, location)?;
        }
        for (ident, value) in self.internal.sorted() {
            writeln!(fmtr, "  {} = {}", ident, value)?;
        }
        for (ident, value) in self.external.sorted() {
            writeln!(fmtr, "  {} = {} (env)", ident, value)?;
        }
        Ok(())
    }
}
