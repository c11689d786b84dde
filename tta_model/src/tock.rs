//! Environment generators ("tockers") and the factory registry the host
//! injects them through at startup.

use super::*;
use rustc_hash::FxHashMap;
use tta_domain::*;

/// An environment generator. Given the current network configuration it
/// proposes the distinct environment assignments worth exploring.
pub trait Tocker: Send {
    fn name(&self) -> &'static str;
    fn tock(&self, network: &Ntta) -> TtaResult<Vec<EnvironmentChange>>;
}

pub type TockerFactory = Box<dyn Fn() -> Box<dyn Tocker> + Send + Sync>;

/// Named tocker factories. Hosts register factories here at startup and
/// look them up by name when building a network.
#[derive(Default)]
pub struct TockerRegistry {
    factories: FxHashMap<String, TockerFactory>,
}

impl TockerRegistry {
    pub fn new() -> Self {
        TockerRegistry::default()
    }

    pub fn register(&mut self, name: &str, factory: TockerFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> TtaResult<Box<dyn Tocker>> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(TtaError::Model(format!(
                "no tocker factory named '{}'",
                name
            ))),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(|n| n.as_str()).collect();
        names.sort();
        names
    }
}
