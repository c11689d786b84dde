//! The TTA domain
//!
//! Core types shared by the tick-tock automata network model, the formal
//! layer and the reachability runner: values, symbol tables, the guard and
//! update expression language, warnings and errors.

pub mod value;
pub use value::*;

pub mod symbol;
pub use symbol::*;

pub mod expression;
pub use expression::*;

pub mod expression_parser;

pub mod warnings;
pub use warnings::*;

pub mod logging;
pub use logging::*;

use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use std::fmt::Display;

/// Build a [`SymbolTable`] from literal entries. Mostly for tests.
#[macro_export]
macro_rules! symbols {
    ($( $key:expr => $val:expr ),* $(,)?) => {{
        let mut table = $crate::SymbolTable::new();
        $( table.insert($key.to_string(), $val.to_value()); )*
        table
    }}
}

pub type TtaResult<T> = std::result::Result<T, TtaError>;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub enum TtaError {
    /// Structural model problems. Fatal before a search starts.
    Model(String),
    /// Guard/update/query evaluation failure. Fatal, indicates a bad model.
    Eval(String),
    Query(String),
    Solver(String),
    Cancelled,
    Undefined,
}

impl std::convert::From<serde_json::Error> for TtaError {
    fn from(e: serde_json::Error) -> Self {
        TtaError::from_any(e)
    }
}

impl TtaError {
    pub fn from_any<T: Display>(x: T) -> TtaError {
        TtaError::Model(format!("{}", x))
    }

    /// Attach component/edge context to an evaluation error.
    pub fn in_edge(self, component: &str, edge: &str) -> TtaError {
        match self {
            TtaError::Eval(msg) => {
                TtaError::Eval(format!("{}/{}: {}", component, edge, msg))
            }
            e => e,
        }
    }
}

impl fmt::Display for TtaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TtaError::Model(s) => write!(f, "model error: {}", s),
            TtaError::Eval(s) => write!(f, "evaluation error: {}", s),
            TtaError::Query(s) => write!(f, "query error: {}", s),
            TtaError::Solver(s) => write!(f, "solver error: {}", s),
            TtaError::Cancelled => write!(f, "the run was cancelled"),
            TtaError::Undefined => write!(f, "an undefined TTA error!"),
        }
    }
}

impl error::Error for TtaError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}
