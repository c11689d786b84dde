//! The network of named components with its internal and external symbol
//! tables and the ordered environment generators.

use super::*;
use std::collections::BTreeMap;
use tta_domain::*;

pub struct Ntta {
    pub(crate) components: BTreeMap<String, Tta>,
    pub(crate) internal: SymbolTable,
    pub(crate) external: SymbolTable,
    pub(crate) tockers: Vec<Box<dyn Tocker>>,
}

impl Ntta {
    pub fn component(&self, name: &str) -> Option<&Tta> {
        self.components.get(name)
    }

    pub fn components(&self) -> impl Iterator<Item = (&String, &Tta)> {
        self.components.iter()
    }

    pub fn internal(&self) -> &SymbolTable {
        &self.internal
    }

    pub fn external(&self) -> &SymbolTable {
        &self.external
    }

    pub fn envs(&self) -> Environments {
        Environments::new(&self.internal, &self.external)
    }

    /// Outgoing edges of `component`'s current location whose guard holds.
    /// Evaluation failure names the component and edge and is fatal.
    pub fn enabled_edges(&self, component: &str) -> TtaResult<Vec<EdgeId>> {
        let tta = self.components.get(component).ok_or_else(|| {
            TtaError::Model(format!("no component named '{}'", component))
        })?;
        let env = self.envs();
        let mut out = vec![];
        for &eid in tta.outgoing() {
            let e = tta.edge(eid);
            let enabled = e
                .guard
                .eval_bool(&env)
                .map_err(|err| err.in_edge(component, &e.name))?;
            if enabled {
                out.push(eid);
            }
        }
        Ok(out)
    }

    /// Every enabled edge across all components, with its effects
    /// evaluated once.
    pub fn choices(&self) -> TtaResult<Vec<Choice>> {
        let env = self.envs();
        let mut out = vec![];
        for (name, tta) in self.components.iter() {
            for &eid in tta.outgoing() {
                let e = tta.edge(eid);
                let enabled = e
                    .guard
                    .eval_bool(&env)
                    .map_err(|err| err.in_edge(name, &e.name))?;
                if !enabled {
                    continue;
                }
                let diff = e
                    .update
                    .evaluate(&env)
                    .map_err(|err| err.in_edge(name, &e.name))?;
                out.push(Choice {
                    component: name.clone(),
                    edge: eid,
                    target: e.target,
                    diff,
                });
            }
        }
        Ok(out)
    }

    /// Apply one step: location changes first, then the symbol diff.
    /// Existing keys are overwritten; a diff never grows a table.
    pub fn apply(&mut self, change: &StateChange) {
        for (component, target) in change.locations.iter() {
            if let Some(tta) = self.components.get_mut(component) {
                tta.set_current(*target);
            }
        }
        self.internal.overwrite_existing(&change.diff);
        self.external.overwrite_existing(&change.diff);
    }

    /// Apply several environment changes as one step, combined left to
    /// right. Conflicting writes warn and the later change wins.
    pub fn apply_environments(&mut self, changes: &[EnvironmentChange], warnings: &Warnings) {
        let mut combined = SymbolDiff::new();
        let mut delay = 0i64;
        for change in changes {
            combined.combine(&change.assignment, warnings);
            delay += change.delay.unwrap_or(0);
        }
        if delay != 0 {
            self.internal.advance_clocks(delay);
            self.external.advance_clocks(delay);
        }
        self.internal.overwrite_existing(&combined);
        self.external.overwrite_existing(&combined);
    }

    pub fn snapshot(&self) -> State {
        let mut locations = BTreeMap::new();
        for (name, tta) in self.components.iter() {
            locations.insert(name.clone(), tta.current_name().to_string());
        }
        State {
            locations,
            internal: self.internal.clone(),
            external: self.external.clone(),
        }
    }

    pub fn restore(&mut self, state: &State) -> TtaResult<()> {
        for (component, location) in state.locations.iter() {
            let tta = self.components.get_mut(component).ok_or_else(|| {
                TtaError::Model(format!("no component named '{}'", component))
            })?;
            tta.set_current_by_name(location)?;
        }
        self.internal = state.internal.clone();
        self.external = state.external.clone();
        Ok(())
    }

    /// Guards on currently outgoing edges that depend on external or
    /// clock-typed state, syntactically deduplicated.
    pub fn interesting_guards(&self) -> Vec<Expression> {
        let mut out: Vec<Expression> = vec![];
        for (_, tta) in self.components.iter() {
            for &eid in tta.outgoing() {
                let guard = &tta.edge(eid).guard;
                let interesting = guard.support().iter().any(|ident| {
                    self.external.contains(ident)
                        || self
                            .internal
                            .get(ident)
                            .map(|v| v.is_clock())
                            .unwrap_or(false)
                });
                if interesting && !out.contains(guard) {
                    out.push(guard.clone());
                }
            }
        }
        out
    }

    /// All environment candidates of all registered tockers, in order.
    pub fn tock(&self) -> TtaResult<Vec<EnvironmentChange>> {
        let mut out = vec![];
        for tocker in self.tockers.iter() {
            out.extend(tocker.tock(self)?);
        }
        Ok(out)
    }
}

impl fmt::Display for Ntta {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "{}", self.snapshot())
    }
}

#[derive(Default)]
pub struct NttaBuilder {
    components: BTreeMap<String, Tta>,
    internal: SymbolTable,
    external: SymbolTable,
    tockers: Vec<Box<dyn Tocker>>,
    duplicates: Vec<String>,
}

impl NttaBuilder {
    pub fn new() -> Self {
        NttaBuilder::default()
    }

    pub fn add_component(&mut self, name: &str, tta: Tta) {
        if self.components.insert(name.to_string(), tta).is_some() {
            self.duplicates.push(name.to_string());
        }
    }

    pub fn add_internal(&mut self, ident: &str, value: Value) {
        self.internal.insert(ident.to_string(), value);
    }

    pub fn add_external(&mut self, ident: &str, value: Value) {
        self.external.insert(ident.to_string(), value);
    }

    pub fn add_tocker(&mut self, tocker: Box<dyn Tocker>) {
        self.tockers.push(tocker);
    }

    pub fn build(self) -> TtaResult<Ntta> {
        if let Some(name) = self.duplicates.first() {
            return Err(TtaError::Model(format!(
                "duplicate component name '{}'",
                name
            )));
        }
        for (ident, _) in self.external.iter() {
            if self.internal.contains(ident) {
                return Err(TtaError::Model(format!(
                    "'{}' is declared both internal and external",
                    ident
                )));
            }
        }
        for (name, tta) in self.components.iter() {
            for ident in tta.support() {
                if !self.internal.contains(&ident) && !self.external.contains(&ident) {
                    return Err(TtaError::Model(format!(
                        "'{}' referenced by component '{}' does not resolve",
                        ident, name
                    )));
                }
            }
        }
        Ok(Ntta {
            components: self.components,
            internal: self.internal,
            external: self.external,
            tockers: self.tockers,
        })
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;

    fn single_edge_component(guard: &str, update: &str) -> Tta {
        let mut b = TtaBuilder::new();
        let l1 = b.location("L1");
        let l2 = b.location("L2");
        b.edge(
            "L1->L2",
            l1,
            l2,
            Expression::guard(guard).unwrap(),
            UpdateSet::updates(update).unwrap(),
        );
        b.build(l1).unwrap()
    }

    #[test]
    fn duplicate_component_names_are_fatal() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("", ""));
        nb.add_component("Main", single_edge_component("", ""));
        assert!(matches!(nb.build(), Err(TtaError::Model(_))));
    }

    #[test]
    fn internal_and_external_keys_must_be_disjoint() {
        let mut nb = NttaBuilder::new();
        nb.add_internal("x", false.to_value());
        nb.add_external("x", false.to_value());
        assert!(matches!(nb.build(), Err(TtaError::Model(_))));
    }

    #[test]
    fn unresolved_identifiers_are_fatal() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("a >= 0", ""));
        assert!(matches!(nb.build(), Err(TtaError::Model(_))));
    }

    #[test]
    fn enabled_edges_follow_the_guard() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("a >= 0", "b := true"));
        nb.add_internal("a", 0.to_value());
        nb.add_internal("b", false.to_value());
        let ntta = nb.build().unwrap();

        assert_eq!(ntta.enabled_edges("Main").unwrap().len(), 1);

        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("a > 0", ""));
        nb.add_internal("a", 0.to_value());
        let ntta = nb.build().unwrap();
        assert!(ntta.enabled_edges("Main").unwrap().is_empty());
    }

    #[test]
    fn eval_failure_names_component_and_edge() {
        // b is declared as a bool, so `b > 1` fails to evaluate
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("b > 1", ""));
        nb.add_internal("b", false.to_value());
        let ntta = nb.build().unwrap();

        match ntta.enabled_edges("Main") {
            Err(TtaError::Eval(msg)) => {
                assert!(msg.contains("Main"));
                assert!(msg.contains("L1->L2"));
            }
            other => panic!("expected an eval error, got {:?}", other),
        }
    }

    #[test]
    fn apply_empty_change_is_identity() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("", ""));
        nb.add_internal("a", 5.to_value());
        let mut ntta = nb.build().unwrap();

        let before = ntta.snapshot();
        ntta.apply(&StateChange::default());
        let after = ntta.snapshot();
        assert_eq!(before, after);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut h1 = DefaultHasher::new();
        before.hash(&mut h1);
        let mut h2 = DefaultHasher::new();
        after.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn apply_never_inserts_new_keys() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("", ""));
        nb.add_internal("a", 0.to_value());
        let mut ntta = nb.build().unwrap();

        let mut diff = SymbolDiff::new();
        diff.insert("a".into(), 1.to_value());
        diff.insert("ghost".into(), 2.to_value());
        ntta.apply(&StateChange {
            locations: vec![],
            diff,
        });

        assert_eq!(ntta.internal().get("a"), Some(&Value::Int(1)));
        assert!(!ntta.internal().contains("ghost"));
        assert!(!ntta.external().contains("ghost"));
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("a >= 0", "a := a + 1"));
        nb.add_internal("a", 0.to_value());
        let mut ntta = nb.build().unwrap();

        let s0 = ntta.snapshot();
        let changes = ntta.tick().unwrap();
        ntta.apply(&changes[0]);
        assert_ne!(ntta.snapshot(), s0);

        ntta.restore(&s0).unwrap();
        assert_eq!(ntta.snapshot(), s0);
    }

    #[test]
    fn apply_environments_combines_left_to_right() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("", ""));
        nb.add_external("x", 0.to_value());
        let mut ntta = nb.build().unwrap();

        let mut first = SymbolDiff::new();
        first.insert("x".into(), 1.to_value());
        let mut second = SymbolDiff::new();
        second.insert("x".into(), 2.to_value());

        ntta.apply_environments(
            &[
                EnvironmentChange {
                    assignment: first,
                    delay: None,
                },
                EnvironmentChange {
                    assignment: second,
                    delay: None,
                },
            ],
            &Warnings::default(),
        );
        assert_eq!(ntta.external().get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn apply_environments_advances_clocks() {
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", single_edge_component("", ""));
        nb.add_internal("t", Value::Clock(100));
        let mut ntta = nb.build().unwrap();

        ntta.apply_environments(
            &[EnvironmentChange {
                assignment: SymbolDiff::new(),
                delay: Some(250),
            }],
            &Warnings::default(),
        );
        assert_eq!(ntta.internal().get("t"), Some(&Value::Clock(350)));
    }

    #[test]
    fn interesting_guards_need_external_or_clock_support() {
        let mut nb = NttaBuilder::new();
        nb.add_component("A", single_edge_component("x", ""));
        nb.add_component("B", single_edge_component("a > 0", ""));
        nb.add_component("C", single_edge_component("t >= 100", ""));
        nb.add_external("x", false.to_value());
        nb.add_internal("a", 0.to_value());
        nb.add_internal("t", Value::Clock(0));
        let ntta = nb.build().unwrap();

        let guards = ntta.interesting_guards();
        assert_eq!(guards.len(), 2);
        assert!(guards.contains(&Expression::guard("x").unwrap()));
        assert!(guards.contains(&Expression::guard("t >= 100").unwrap()));
    }
}
