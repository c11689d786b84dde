//! The tick resolver: enumerate every maximal set of mutually
//! non-conflicting enabled edges and sum each set into one step.

use super::*;
use tta_domain::*;

impl Ntta {
    /// All legal maximal-progress tick steps from the current
    /// configuration. Zero enabled edges yields an empty result (a
    /// potential deadlock); a single enabled edge yields exactly one
    /// trivial step.
    ///
    /// The enumeration is exponential in the independence number of the
    /// conflict graph in the worst case.
    pub fn tick(&self) -> TtaResult<Vec<StateChange>> {
        let choices = self.choices()?;
        let solutions = maximal_independent_sets(&choices);
        Ok(solutions
            .iter()
            .map(|set| {
                let mut change = StateChange::default();
                for &i in set.iter() {
                    change.push(&choices[i]);
                }
                change
            })
            .collect())
    }
}

/// Enumerate every inclusion-maximal independent set of the conflict graph
/// over `choices`. Members are added in increasing index order so each
/// maximal set is produced exactly once; a candidate is kept only when no
/// node at all could still join it.
pub fn maximal_independent_sets(choices: &[Choice]) -> Vec<Vec<usize>> {
    if choices.is_empty() {
        return vec![];
    }
    let n = choices.len();
    let mut conflicts = vec![vec![false; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if choices[i].conflicts_with(&choices[j]) {
                conflicts[i][j] = true;
                conflicts[j][i] = true;
            }
        }
    }

    let mut solutions = vec![];
    grow(&conflicts, vec![], 0, &mut solutions);
    solutions
}

fn grow(
    conflicts: &[Vec<bool>],
    current: Vec<usize>,
    start: usize,
    solutions: &mut Vec<Vec<usize>>,
) {
    let n = conflicts.len();
    let mut extendable = false;
    for node in 0..n {
        if current.contains(&node) {
            continue;
        }
        if current.iter().any(|&m| conflicts[m][node]) {
            continue;
        }
        extendable = true;
        if node >= start {
            let mut next = current.clone();
            next.push(node);
            grow(conflicts, next, node + 1, solutions);
        }
    }
    if !extendable {
        solutions.push(current);
    }
}

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn single_enabled_edge_gives_one_trivial_step() {
        let mut b = TtaBuilder::new();
        let l1 = b.location("L1");
        let l2 = b.location("L2");
        b.edge(
            "L1->L2",
            l1,
            l2,
            Expression::guard("a >= 0").unwrap(),
            UpdateSet::updates("b := true").unwrap(),
        );
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", b.build(l1).unwrap());
        nb.add_internal("a", 0.to_value());
        nb.add_internal("b", false.to_value());
        let mut ntta = nb.build().unwrap();

        let changes = ntta.tick().unwrap();
        assert_eq!(changes.len(), 1);

        ntta.apply(&changes[0]);
        assert_eq!(ntta.component("Main").unwrap().current_name(), "L2");
        assert_eq!(ntta.internal().get("b"), Some(&Value::Bool(true)));
    }

    #[test]
    fn zero_enabled_edges_is_a_potential_deadlock() {
        let mut b = TtaBuilder::new();
        let l1 = b.location("L1");
        let l2 = b.location("L2");
        b.edge(
            "L1->L2",
            l1,
            l2,
            Expression::guard("a > 0").unwrap(),
            UpdateSet::default(),
        );
        let mut nb = NttaBuilder::new();
        nb.add_component("Main", b.build(l1).unwrap());
        nb.add_internal("a", 0.to_value());
        let ntta = nb.build().unwrap();

        assert!(ntta.tick().unwrap().is_empty());
    }

    fn writer(name: &str, update: &str) -> Tta {
        let mut b = TtaBuilder::new();
        let l1 = b.location("L1");
        let l2 = b.location("L2");
        b.edge(
            name,
            l1,
            l2,
            Expression::TRUE,
            UpdateSet::updates(update).unwrap(),
        );
        b.build(l1).unwrap()
    }

    // Four components with edges writing shared variables x, y and z with
    // partial overlap. A's two edges exclude each other (same current
    // location); B, C and D race pairwise on x, y and z. Two choices times
    // three gives exactly 6 maximal steps.
    fn overlap_network() -> Ntta {
        let mut a = TtaBuilder::new();
        let l1 = a.location("L1");
        let l2 = a.location("L2");
        let l3 = a.location("L3");
        a.edge("a1", l1, l2, Expression::TRUE, UpdateSet::default());
        a.edge("a2", l1, l3, Expression::TRUE, UpdateSet::default());

        let mut nb = NttaBuilder::new();
        nb.add_component("A", a.build(l1).unwrap());
        nb.add_component("B", writer("b1", "x := 1; y := 1"));
        nb.add_component("C", writer("c1", "y := 2; z := 1"));
        nb.add_component("D", writer("d1", "x := 2; z := 2"));
        nb.add_internal("x", 0.to_value());
        nb.add_internal("y", 0.to_value());
        nb.add_internal("z", 0.to_value());
        nb.build().unwrap()
    }

    #[test]
    fn four_component_overlap_gives_six_steps() {
        let ntta = overlap_network();
        let changes = ntta.tick().unwrap();
        assert_eq!(changes.len(), 6);

        // all steps are distinct
        for (i, c) in changes.iter().enumerate() {
            assert!(!changes[..i].contains(c));
        }
        // every step fires A once and exactly one of B/C/D
        for c in changes.iter() {
            assert_eq!(c.locations.len(), 2);
            assert_eq!(
                c.locations
                    .iter()
                    .filter(|(component, _)| component == "A")
                    .count(),
                1
            );
        }
    }

    #[test]
    fn returned_sets_are_conflict_free_and_maximal() {
        let ntta = overlap_network();
        let choices = ntta.choices().unwrap();
        let sets = maximal_independent_sets(&choices);

        for set in sets.iter() {
            for (a, &i) in set.iter().enumerate() {
                for &j in set[a + 1..].iter() {
                    assert!(!choices[i].conflicts_with(&choices[j]));
                }
            }
            // maximality: every choice outside the set conflicts with it
            for k in 0..choices.len() {
                if set.contains(&k) {
                    continue;
                }
                assert!(set.iter().any(|&i| choices[i].conflicts_with(&choices[k])));
            }
        }
    }

    #[test]
    fn same_value_writes_do_not_conflict() {
        let mut nb = NttaBuilder::new();
        nb.add_component("A", writer("a1", "x := 1"));
        nb.add_component("B", writer("b1", "x := 1"));
        nb.add_internal("x", 0.to_value());
        let ntta = nb.build().unwrap();

        // both write x := 1, so one maximal step fires both edges
        let changes = ntta.tick().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].locations.len(), 2);
    }

    #[test]
    fn racing_writes_split_into_two_steps() {
        let mut nb = NttaBuilder::new();
        nb.add_component("A", writer("a1", "x := 1"));
        nb.add_component("B", writer("b1", "x := 2"));
        nb.add_internal("x", 0.to_value());
        let ntta = nb.build().unwrap();

        let changes = ntta.tick().unwrap();
        assert_eq!(changes.len(), 2);
        for c in changes.iter() {
            assert_eq!(c.locations.len(), 1);
        }
    }
}
