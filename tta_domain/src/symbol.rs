//! Symbol environments: named values split into an internal and an
//! external table, plus the diffs that move them forward.

use super::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    values: FxHashMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn insert(&mut self, ident: String, value: Value) {
        self.values.insert(ident, value);
    }

    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.values.get(ident)
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.values.contains_key(ident)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Entries in deterministic (sorted) order, used for hashing and display.
    pub fn sorted(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Extend with all entries of `other`, inserting new keys and
    /// overwriting old ones.
    pub fn merge(&mut self, other: SymbolTable) {
        self.values.extend(other.values);
    }

    /// Overwrite existing keys with the diff's values. Keys not present in
    /// the table are left out; a diff can never grow a table.
    pub fn overwrite_existing(&mut self, diff: &SymbolDiff) {
        for (ident, value) in diff.iter() {
            if let Some(slot) = self.values.get_mut(ident) {
                *slot = value.clone();
            }
        }
    }

    /// Advance every clock-typed value by `delay` milliseconds.
    pub fn advance_clocks(&mut self, delay: i64) {
        for value in self.values.values_mut() {
            if let Value::Clock(c) = value {
                *c += delay;
            }
        }
    }

    /// The entries of `newer` that are missing from, or differ from, this
    /// table.
    pub fn diff(&self, newer: &SymbolTable) -> SymbolDiff {
        let mut d = SymbolDiff::new();
        for (ident, value) in newer.iter() {
            if self.get(ident) != Some(value) {
                d.insert(ident.clone(), value.clone());
            }
        }
        d
    }
}

impl Hash for SymbolTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (ident, value) in self.sorted() {
            ident.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ident, value) in self.sorted() {
            writeln!(fmtr, "{} = {}", ident, value)?;
        }
        Ok(())
    }
}

/// A set of symbol writes, the result of evaluating an edge's update set or
/// of a solver-produced environment assignment.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct SymbolDiff {
    values: FxHashMap<String, Value>,
}

impl SymbolDiff {
    pub fn new() -> Self {
        SymbolDiff::default()
    }

    pub fn insert(&mut self, ident: String, value: Value) {
        self.values.insert(ident, value);
    }

    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.values.get(ident)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// The first key both diffs write with different values, if any.
    pub fn conflicts_with(&self, other: &SymbolDiff) -> Option<&str> {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        for ident in keys {
            if let Some(theirs) = other.get(ident) {
                if theirs != &self.values[ident.as_str()] {
                    return Some(ident.as_str());
                }
            }
        }
        None
    }

    /// Merge a diff known to be conflict free (checked by the tick
    /// resolver's conflict graph).
    pub fn merge(&mut self, other: &SymbolDiff) {
        for (ident, value) in other.iter() {
            self.values.insert(ident.clone(), value.clone());
        }
    }

    /// Combine diffs left to right. Writing the same key with different
    /// values is an idempotence violation: the later diff wins and a
    /// non-fatal warning is emitted.
    pub fn combine(&mut self, other: &SymbolDiff, warnings: &Warnings) {
        if let Some(ident) = self.conflicts_with(other) {
            warnings.emit(
                WarningKind::NonIdempotentUpdate,
                &format!(
                    "'{}' is written twice with different values, the later write wins",
                    ident
                ),
            );
        }
        self.merge(other);
    }
}

impl fmt::Display for SymbolDiff {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let s: Vec<_> = entries
            .iter()
            .map(|(ident, value)| format!("{} := {}", ident, value))
            .collect();
        write!(fmtr, "{}", s.join(", "))
    }
}

/// Borrowed view over a network's internal and external tables. Lookup
/// resolves in internal first, then external.
#[derive(Debug, Clone, Copy)]
pub struct Environments<'a> {
    pub internal: &'a SymbolTable,
    pub external: &'a SymbolTable,
}

impl<'a> Environments<'a> {
    pub fn new(internal: &'a SymbolTable, external: &'a SymbolTable) -> Self {
        Environments { internal, external }
    }

    pub fn value(&self, ident: &str) -> Option<&'a Value> {
        self.internal
            .get(ident)
            .or_else(|| self.external.get(ident))
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.internal.contains(ident) || self.external.contains(ident)
    }

    pub fn is_external(&self, ident: &str) -> bool {
        self.external.contains(ident)
    }

    pub fn is_clock(&self, ident: &str) -> bool {
        self.value(ident).map(|v| v.is_clock()).unwrap_or(false)
    }
}
