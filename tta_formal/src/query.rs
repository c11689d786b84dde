//! The restricted CTL query language.
//!
//! Modal and temporal nodes carry no temporal semantics of their own: the
//! shape validator only lets `E F phi` and `A G phi` (phi propositional)
//! reach the searcher, which reduces them to "phi holds in some / every
//! explored state".

use crate::query_parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use tta_domain::*;
use tta_model::*;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub enum Query {
    AND(Vec<Query>),
    OR(Vec<Query>),
    XOR(Vec<Query>),
    NOT(Box<Query>),
    /// True iff some component's current location has this name.
    LOCATION(String),
    /// A raw expression over the symbol tables.
    EXPR(Expression),
    EXISTS(Box<Query>),
    FORALL(Box<Query>),
    NEXT(Box<Query>),
    FINALLY(Box<Query>),
    GLOBALLY(Box<Query>),
    UNTIL(Box<Query>, Box<Query>),
    WEAKUNTIL(Box<Query>, Box<Query>),
}

impl Query {
    pub fn compile(text: &str) -> TtaResult<Query> {
        query_parser::query_parser::query(text)
            .map_err(|e| TtaError::Query(format!("bad query '{}': {}", text, e)))
    }

    /// Evaluate against one concrete configuration. Modal and temporal
    /// nodes pass through to their (rightmost) child.
    pub fn satisfied(&self, network: &Ntta) -> TtaResult<bool> {
        match self {
            Query::AND(qs) => {
                for q in qs.iter() {
                    if !q.satisfied(network)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Query::OR(qs) => {
                for q in qs.iter() {
                    if q.satisfied(network)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Query::XOR(qs) => {
                let mut c = 0;
                for q in qs.iter() {
                    if q.satisfied(network)? {
                        c += 1;
                    }
                }
                Ok(c == 1)
            }
            Query::NOT(q) => Ok(!q.satisfied(network)?),
            Query::LOCATION(name) => Ok(network
                .components()
                .any(|(_, tta)| tta.current_name() == name)),
            Query::EXPR(e) => e.eval_bool(&network.envs()),
            Query::EXISTS(q)
            | Query::FORALL(q)
            | Query::NEXT(q)
            | Query::FINALLY(q)
            | Query::GLOBALLY(q) => q.satisfied(network),
            Query::UNTIL(_, q) | Query::WEAKUNTIL(_, q) => q.satisfied(network),
        }
    }

    /// True when no modal or temporal operator occurs anywhere.
    pub fn is_propositional(&self) -> bool {
        match self {
            Query::AND(qs) | Query::OR(qs) | Query::XOR(qs) => {
                qs.iter().all(|q| q.is_propositional())
            }
            Query::NOT(q) => q.is_propositional(),
            Query::LOCATION(_) | Query::EXPR(_) => true,
            Query::EXISTS(_)
            | Query::FORALL(_)
            | Query::NEXT(_)
            | Query::FINALLY(_)
            | Query::GLOBALLY(_)
            | Query::UNTIL(_, _)
            | Query::WEAKUNTIL(_, _) => false,
        }
    }
}

/// How a searchable query is reduced onto the set of explored states.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum SearchMode {
    /// `E F phi`: satisfied as soon as one explored state satisfies phi.
    Reachability,
    /// `A G phi`: violated as soon as one explored state violates phi.
    Invariant,
}

/// Accepts exactly `E F phi` and `A G phi` with phi propositional and
/// hands back the mode and phi. Everything else is unsupported.
pub fn searchable_form(query: &Query) -> Option<(SearchMode, &Query)> {
    match query {
        Query::EXISTS(inner) => match &**inner {
            Query::FINALLY(phi) if phi.is_propositional() => {
                Some((SearchMode::Reachability, phi))
            }
            _ => None,
        },
        Query::FORALL(inner) => match &**inner {
            Query::GLOBALLY(phi) if phi.is_propositional() => {
                Some((SearchMode::Invariant, phi))
            }
            _ => None,
        },
        _ => None,
    }
}

pub fn is_searchable(query: &Query) -> bool {
    searchable_form(query).is_some()
}

impl fmt::Display for Query {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = match &self {
            Query::AND(qs) => {
                let children: Vec<_> = qs.iter().map(|q| format!("{q}")).collect();
                format!("({})", children.join(" && "))
            }
            Query::OR(qs) => {
                let children: Vec<_> = qs.iter().map(|q| format!("{q}")).collect();
                format!("({})", children.join(" || "))
            }
            Query::XOR(qs) => {
                let children: Vec<_> = qs.iter().map(|q| format!("{q}")).collect();
                format!("({})", children.join(" xor "))
            }
            Query::NOT(q) => format!("!({q})"),
            Query::LOCATION(name) => name.clone(),
            Query::EXPR(e) => format!("{e}"),
            Query::EXISTS(q) => format!("E {q}"),
            Query::FORALL(q) => format!("A {q}"),
            Query::NEXT(q) => format!("X {q}"),
            Query::FINALLY(q) => format!("F {q}"),
            Query::GLOBALLY(q) => format!("G {q}"),
            Query::UNTIL(p, q) => format!("({p} U {q})"),
            Query::WEAKUNTIL(p, q) => format!("({p} W {q})"),
        };
        write!(fmtr, "{}", &s)
    }
}

/// ********** TESTS ***************
