//! The forward reachability searcher: a deduplicated waiting/passed
//! exploration interleaving tick and tock steps, checking every query at
//! every visited configuration and rebuilding witnesses on success.
//!
//! Termination is only guaranteed on finite state spaces; unbounded
//! counters or clocks need the cancel token or a deadline.

use crate::results::{QueryOutcome, VerificationResults};
use rand::prelude::*;
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tta_domain::*;
use tta_formal::{searchable_form, Query, SearchMode};
use tta_model::*;

/// One compiled, validated query: the display text, the reduction mode and
/// the propositional condition checked per configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub mode: SearchMode,
    pub condition: Query,
}

impl SearchQuery {
    /// `None` when the query is not of a searchable shape.
    pub fn from_query(query: &Query) -> Option<SearchQuery> {
        searchable_form(query).map(|(mode, phi)| SearchQuery {
            text: format!("{}", query),
            mode,
            condition: phi.clone(),
        })
    }
}

/// The policy for choosing the next waiting state to expand.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum PickStrategy {
    /// Oldest inserted first (breadth-first-like).
    First,
    /// Most recently inserted first (depth-first-like).
    Last,
    /// Uniformly random over the waiting set.
    Random,
}

impl Default for PickStrategy {
    fn default() -> Self {
        PickStrategy::First
    }
}

impl std::str::FromStr for PickStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(PickStrategy::First),
            "last" => Ok(PickStrategy::Last),
            "random" => Ok(PickStrategy::Random),
            other => Err(format!("unknown pick strategy '{}'", other)),
        }
    }
}

/// Cooperative cancellation, checked once per waiting-pop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    pub pick: PickStrategy,
    pub warnings: Warnings,
    pub cancel: CancelToken,
    pub deadline: Option<Instant>,
}

#[derive(Debug)]
struct SearchNode {
    state: State,
    parent: Option<Rc<SearchNode>>,
}

fn state_hash(state: &State) -> u64 {
    let mut hasher = FxHasher::default();
    state.hash(&mut hasher);
    hasher.finish()
}

/// Hash-keyed multiset of search nodes. Membership always falls back to
/// full state equality, so colliding hashes never merge distinct
/// configurations.
#[derive(Debug, Default)]
struct StateSet {
    buckets: FxHashMap<u64, Vec<Rc<SearchNode>>>,
}

impl StateSet {
    fn contains(&self, state: &State) -> bool {
        self.buckets
            .get(&state_hash(state))
            .map(|bucket| bucket.iter().any(|node| &node.state == state))
            .unwrap_or(false)
    }

    fn insert(&mut self, node: Rc<SearchNode>) {
        self.buckets
            .entry(state_hash(&node.state))
            .or_default()
            .push(node);
    }
}

pub struct ReachabilitySearcher<'a> {
    network: &'a mut Ntta,
    queries: Vec<SearchQuery>,
    settings: SearchSettings,
    passed: StateSet,
    waiting: VecDeque<Rc<SearchNode>>,
    resolved: Vec<Option<QueryOutcome>>,
    checked: usize,
}

impl<'a> ReachabilitySearcher<'a> {
    pub fn new(
        network: &'a mut Ntta,
        queries: Vec<SearchQuery>,
        settings: SearchSettings,
    ) -> Self {
        let resolved = vec![None; queries.len()];
        ReachabilitySearcher {
            network,
            queries,
            settings,
            passed: StateSet::default(),
            waiting: VecDeque::new(),
            resolved,
            checked: 0,
        }
    }

    pub fn search(mut self) -> TtaResult<VerificationResults> {
        let s0 = self.network.snapshot();
        let root = Rc::new(SearchNode {
            state: s0.clone(),
            parent: None,
        });
        self.passed.insert(root.clone());
        self.check_node(&root)?;
        if self.all_resolved() {
            return self.finish();
        }

        self.network.restore(&s0)?;
        let tocks = self.network.tock()?;
        if tocks.is_empty() {
            self.waiting.push_back(root);
        } else {
            for change in tocks.iter() {
                self.network.restore(&s0)?;
                self.network
                    .apply_environments(std::slice::from_ref(change), &self.settings.warnings);
                let sp = self.network.snapshot();
                if !self.passed.contains(&sp) {
                    self.waiting.push_back(Rc::new(SearchNode {
                        state: sp,
                        parent: Some(root.clone()),
                    }));
                }
            }
        }

        loop {
            if self.settings.cancel.is_cancelled() {
                return Err(TtaError::Cancelled);
            }
            if let Some(deadline) = self.settings.deadline {
                if Instant::now() >= deadline {
                    return Err(TtaError::Cancelled);
                }
            }
            let node = match self.pop() {
                Some(node) => node,
                None => break,
            };

            self.passed.insert(node.clone());
            self.check_node(&node)?;
            if self.all_resolved() {
                return self.finish();
            }

            self.network.restore(&node.state)?;
            let ticks = self.network.tick()?;
            for change in ticks.iter() {
                self.network.restore(&node.state)?;
                self.network.apply(change);
                let sn_state = self.network.snapshot();
                if self.passed.contains(&sn_state) {
                    continue;
                }
                let sn = Rc::new(SearchNode {
                    state: sn_state.clone(),
                    parent: Some(node.clone()),
                });

                let tocks = self.network.tock()?;
                if tocks.is_empty() {
                    self.waiting.push_back(sn);
                    continue;
                }

                // the environment can move before further ticks: pass sn
                // now and only queue its environment variants
                self.passed.insert(sn.clone());
                self.check_node(&sn)?;
                if self.all_resolved() {
                    return self.finish();
                }
                for env_change in tocks.iter() {
                    self.network.restore(&sn_state)?;
                    self.network.apply_environments(
                        std::slice::from_ref(env_change),
                        &self.settings.warnings,
                    );
                    let sp = self.network.snapshot();
                    if !self.passed.contains(&sp) {
                        self.waiting.push_back(Rc::new(SearchNode {
                            state: sp,
                            parent: Some(sn.clone()),
                        }));
                    }
                }
            }
        }
        self.finish()
    }

    fn pop(&mut self) -> Option<Rc<SearchNode>> {
        match self.settings.pick {
            PickStrategy::First => self.waiting.pop_front(),
            PickStrategy::Last => self.waiting.pop_back(),
            PickStrategy::Random => {
                if self.waiting.is_empty() {
                    None
                } else {
                    let i = rand::thread_rng().gen_range(0..self.waiting.len());
                    self.waiting.swap_remove_back(i)
                }
            }
        }
    }

    /// Evaluate every outstanding query against one configuration.
    fn check_node(&mut self, node: &Rc<SearchNode>) -> TtaResult<()> {
        self.network.restore(&node.state)?;
        self.checked += 1;
        for (i, query) in self.queries.iter().enumerate() {
            if self.resolved[i].is_some() {
                continue;
            }
            let holds = query.condition.satisfied(self.network)?;
            let outcome = match query.mode {
                SearchMode::Reachability if holds => Some(QueryOutcome {
                    query: query.text.clone(),
                    satisfied: true,
                    witness: Some(witness(node)),
                }),
                SearchMode::Invariant if !holds => Some(QueryOutcome {
                    query: query.text.clone(),
                    satisfied: false,
                    witness: Some(witness(node)),
                }),
                _ => None,
            };
            if outcome.is_some() {
                self.resolved[i] = outcome;
            }
        }
        Ok(())
    }

    fn all_resolved(&self) -> bool {
        self.resolved.iter().all(|r| r.is_some())
    }

    /// Exhaustion resolves what is left: nothing reached a reachability
    /// goal, and nothing violated an invariant.
    fn finish(mut self) -> TtaResult<VerificationResults> {
        for (i, query) in self.queries.iter().enumerate() {
            if self.resolved[i].is_none() {
                self.resolved[i] = Some(QueryOutcome {
                    query: query.text.clone(),
                    satisfied: query.mode == SearchMode::Invariant,
                    witness: None,
                });
            }
        }
        Ok(VerificationResults {
            outcomes: self.resolved.into_iter().flatten().collect(),
            configurations_checked: self.checked,
        })
    }
}

/// The trace from the initial configuration to this node.
fn witness(node: &Rc<SearchNode>) -> Vec<State> {
    let mut trace = vec![node.state.clone()];
    let mut cursor = node.parent.clone();
    while let Some(n) = cursor {
        trace.push(n.state.clone());
        cursor = n.parent.clone();
    }
    trace.reverse();
    trace
}
