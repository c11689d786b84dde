//! The interesting-environment tocker: for every combination of truth
//! assignments to the interesting guards, ask the solver for a concrete
//! environment worth exploring.

use crate::solver::{BoundedSolver, ConstraintSolver};
use tta_domain::*;
use tta_model::*;

pub struct SolverTocker {
    solver: Box<dyn ConstraintSolver>,
}

impl SolverTocker {
    pub fn new(solver: Box<dyn ConstraintSolver>) -> Self {
        SolverTocker { solver }
    }
}

impl Default for SolverTocker {
    fn default() -> Self {
        SolverTocker::new(Box::new(BoundedSolver))
    }
}

impl Tocker for SolverTocker {
    fn name(&self) -> &'static str {
        "interesting"
    }

    /// One solver query per combination; the combination count is two to
    /// the power of the number of interesting guards. Unsatisfiable
    /// combinations are pruned silently.
    fn tock(&self, network: &Ntta) -> TtaResult<Vec<EnvironmentChange>> {
        let guards = network.interesting_guards();
        if guards.is_empty() {
            return Ok(vec![]);
        }
        let env = network.envs();
        let mut out = vec![];
        let mut literals = Vec::with_capacity(guards.len());
        self.combinations(&guards, &env, &mut literals, &mut out)?;
        Ok(out)
    }
}

impl SolverTocker {
    fn combinations(
        &self,
        guards: &[Expression],
        env: &Environments,
        literals: &mut Vec<Expression>,
        out: &mut Vec<EnvironmentChange>,
    ) -> TtaResult<()> {
        if literals.len() == guards.len() {
            let constraint = Expression::AND(literals.clone());
            if let Some(change) = self.solver.solve(&constraint, env)? {
                out.push(change);
            }
            return Ok(());
        }
        let guard = &guards[literals.len()];
        for literal in [guard.clone(), Expression::NOT(Box::new(guard.clone()))] {
            literals.push(literal);
            self.combinations(guards, env, literals, out)?;
            literals.pop();
        }
        Ok(())
    }
}

/// The factories a host injects at startup.
pub fn default_registry() -> TockerRegistry {
    let mut registry = TockerRegistry::new();
    registry.register(
        "interesting",
        Box::new(|| Box::new(SolverTocker::default()) as Box<dyn Tocker>),
    );
    registry
}
