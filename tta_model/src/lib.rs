//! The tick-tock automata network model: location/edge arenas, components,
//! the network with its symbol environments, and the tick step resolver.

pub mod automaton;
pub use automaton::*;

pub mod change;
pub use change::*;

pub mod state;
pub use state::*;

pub mod network;
pub use network::*;

pub mod tick;

pub mod tock;
pub use tock::*;

use std::fmt;
