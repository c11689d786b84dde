//! The formal layer: constraint solving for environment generation, the
//! solver-backed tocker, and the restricted CTL query language.

pub mod solver;
pub use solver::*;

pub mod tocker;
pub use tocker::*;

pub mod query;
pub use query::*;

pub mod query_parser;
