//! One component's location/edge graph. Locations and edges live in arenas
//! addressed by stable indices; the graph never changes after `build`.

use super::*;
use serde::{Deserialize, Serialize};
use tta_domain::*;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct LocationId(pub usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    outgoing: Vec<EdgeId>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub name: String,
    pub source: LocationId,
    pub target: LocationId,
    pub guard: Expression,
    pub update: UpdateSet,
}

/// A tick-tock automaton: the graph plus the single current location.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Tta {
    locations: Vec<Location>,
    edges: Vec<Edge>,
    initial: LocationId,
    current: LocationId,
}

impl Tta {
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn current(&self) -> LocationId {
        self.current
    }

    pub fn current_name(&self) -> &str {
        &self.locations[self.current.0].name
    }

    pub fn initial(&self) -> LocationId {
        self.initial
    }

    /// Outgoing edges of the current location.
    pub fn outgoing(&self) -> &[EdgeId] {
        &self.locations[self.current.0].outgoing
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.locations
            .iter()
            .position(|l| l.name == name)
            .map(LocationId)
    }

    pub(crate) fn set_current(&mut self, id: LocationId) {
        self.current = id;
    }

    pub(crate) fn set_current_by_name(&mut self, name: &str) -> TtaResult<()> {
        match self.location_id(name) {
            Some(id) => {
                self.current = id;
                Ok(())
            }
            None => Err(TtaError::Model(format!("no location named '{}'", name))),
        }
    }

    /// All identifiers read or written by any guard or update.
    pub fn support(&self) -> Vec<String> {
        let mut s = Vec::new();
        for e in self.edges.iter() {
            s.extend(e.guard.support());
            s.extend(e.update.support());
        }
        s.sort();
        s.dedup();
        s
    }
}

#[derive(Debug, Default)]
pub struct TtaBuilder {
    locations: Vec<Location>,
    edges: Vec<Edge>,
}

impl TtaBuilder {
    pub fn new() -> Self {
        TtaBuilder::default()
    }

    pub fn location(&mut self, name: &str) -> LocationId {
        self.locations.push(Location {
            name: name.to_string(),
            outgoing: vec![],
        });
        LocationId(self.locations.len() - 1)
    }

    pub fn edge(
        &mut self,
        name: &str,
        source: LocationId,
        target: LocationId,
        guard: Expression,
        update: UpdateSet,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            name: name.to_string(),
            source,
            target,
            guard,
            update,
        });
        id
    }

    pub fn build(mut self, initial: LocationId) -> TtaResult<Tta> {
        if initial.0 >= self.locations.len() {
            return Err(TtaError::Model(format!(
                "initial location {:?} is not a member of the graph",
                initial
            )));
        }
        for (i, l) in self.locations.iter().enumerate() {
            if self.locations[..i].iter().any(|o| o.name == l.name) {
                return Err(TtaError::Model(format!(
                    "duplicate location name '{}'",
                    l.name
                )));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            if e.source.0 >= self.locations.len() || e.target.0 >= self.locations.len() {
                return Err(TtaError::Model(format!(
                    "edge '{}' connects locations outside the graph",
                    e.name
                )));
            }
            self.locations[e.source.0].outgoing.push(EdgeId(i));
        }
        Ok(Tta {
            locations: self.locations,
            edges: self.edges,
            initial,
            current: initial,
        })
    }
}

impl fmt::Display for Tta {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "@ {}", self.current_name())
    }
}
