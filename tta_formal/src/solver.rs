//! Constraint solving for environment generation.
//!
//! The interface is a collaborator boundary: hosts may plug in a real SMT
//! backend. The built-in [`BoundedSolver`] does small-model enumeration
//! over the constraint's free identifiers, which covers the guard shapes
//! the expression language can produce (boolean literals and comparisons
//! against constants).

use tta_domain::*;
use tta_model::*;

pub trait ConstraintSolver: Send + Sync {
    /// Find a concrete environment assignment satisfying `constraint`, or
    /// `None` when there is no model. Absence of a model is a normal,
    /// non-fatal outcome.
    fn solve(
        &self,
        constraint: &Expression,
        env: &Environments,
    ) -> TtaResult<Option<EnvironmentChange>>;
}

/// Enumerates candidate values for every free external identifier
/// (booleans exhaustively, numerics and strings from the constants the
/// constraint compares them against) and candidate shared delays for
/// clock-typed identifiers, and returns the first satisfying assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedSolver;

impl BoundedSolver {
    pub fn new() -> Self {
        BoundedSolver
    }
}

impl ConstraintSolver for BoundedSolver {
    fn solve(
        &self,
        constraint: &Expression,
        env: &Environments,
    ) -> TtaResult<Option<EnvironmentChange>> {
        let mut free = vec![];
        let mut clocks = vec![];
        for ident in constraint.support() {
            if env.is_clock(&ident) {
                clocks.push(ident);
            } else if env.is_external(&ident) {
                free.push(ident);
            }
        }

        let mut candidates = vec![];
        for ident in free.iter() {
            let current = env.value(ident).cloned().ok_or_else(|| {
                TtaError::Solver(format!("'{}' has no current value", ident))
            })?;
            candidates.push((ident.clone(), candidate_values(constraint, ident, &current, env)));
        }

        for delay in candidate_delays(constraint, &clocks, env) {
            let mut internal = env.internal.clone();
            let mut external = env.external.clone();
            if delay != 0 {
                internal.advance_clocks(delay);
                external.advance_clocks(delay);
            }
            if !try_assign(constraint, &candidates, 0, &internal, &mut external)? {
                continue;
            }

            let mut assignment = SymbolDiff::new();
            for (ident, _) in candidates.iter() {
                if let Some(value) = external.get(ident) {
                    assignment.insert(ident.clone(), value.clone());
                }
            }
            for ident in clocks.iter() {
                let advanced = internal.get(ident).or_else(|| external.get(ident));
                if let Some(value) = advanced {
                    assignment.insert(ident.clone(), value.clone());
                }
            }
            let delay = if clocks.is_empty() { None } else { Some(delay) };
            return Ok(Some(EnvironmentChange { assignment, delay }));
        }
        Ok(None)
    }
}

/// Depth-first assignment search. On success the chosen values are left in
/// the external overlay.
fn try_assign(
    constraint: &Expression,
    candidates: &[(String, Vec<Value>)],
    index: usize,
    internal: &SymbolTable,
    external: &mut SymbolTable,
) -> TtaResult<bool> {
    if index == candidates.len() {
        let env = Environments::new(internal, external);
        return constraint.eval_bool(&env);
    }
    let (ident, values) = &candidates[index];
    for value in values.iter() {
        external.insert(ident.clone(), value.clone());
        if try_assign(constraint, candidates, index + 1, internal, external)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn candidate_values(
    constraint: &Expression,
    ident: &str,
    current: &Value,
    env: &Environments,
) -> Vec<Value> {
    let constants = comparison_constants(constraint, ident, env);
    let mut values = match current {
        Value::Bool(_) => vec![Value::Bool(false), Value::Bool(true)],
        Value::Int(cur) => {
            let mut v = vec![Value::Int(*cur)];
            for c in constants {
                if let Value::Int(i) = c {
                    v.extend([Value::Int(i - 1), Value::Int(i), Value::Int(i + 1)]);
                }
            }
            v
        }
        Value::Float(cur) => {
            let mut v = vec![Value::Float(*cur)];
            for c in constants {
                if let Value::Float(f) = c {
                    v.extend([Value::Float(f - 1.0), Value::Float(f), Value::Float(f + 1.0)]);
                }
            }
            v
        }
        Value::String(cur) => {
            let mut v = vec![Value::String(cur.clone())];
            for c in constants {
                if let Value::String(s) = c {
                    v.push(Value::String(s));
                }
            }
            v
        }
        // clock identifiers go through the shared delay instead
        Value::Clock(cur) => vec![Value::Clock(*cur)],
    };
    let mut deduped: Vec<Value> = vec![];
    for v in values.drain(..) {
        if !deduped.contains(&v) {
            deduped.push(v);
        }
    }
    deduped
}

/// Candidate shared delays: zero, plus the distances from every clock's
/// current value to each constant it is compared against, widened by one.
fn candidate_delays(constraint: &Expression, clocks: &[String], env: &Environments) -> Vec<i64> {
    if clocks.is_empty() {
        return vec![0];
    }
    let mut delays = vec![0i64];
    for ident in clocks.iter() {
        let cur = match env.value(ident) {
            Some(Value::Clock(c)) => *c,
            _ => continue,
        };
        for c in comparison_constants(constraint, ident, env) {
            let target = match c {
                Value::Int(i) => i as i64,
                Value::Clock(ms) => ms,
                Value::Float(f) => f as i64,
                _ => continue,
            };
            let distance = target - cur;
            for d in [distance - 1, distance, distance + 1] {
                if d >= 0 {
                    delays.push(d);
                }
            }
        }
    }
    delays.sort_unstable();
    delays.dedup();
    delays
}

/// Constants the constraint compares `ident` against: for every comparison
/// node with `ident` alone on one side and a closed expression on the
/// other, the closed side's value.
fn comparison_constants(constraint: &Expression, ident: &str, env: &Environments) -> Vec<Value> {
    let mut out = vec![];
    collect_constants(constraint, ident, env, &mut out);
    out
}

fn collect_constants(expr: &Expression, ident: &str, env: &Environments, out: &mut Vec<Value>) {
    match expr {
        Expression::EQ(a, b)
        | Expression::NEQ(a, b)
        | Expression::GT(a, b)
        | Expression::GEQ(a, b)
        | Expression::LT(a, b)
        | Expression::LEQ(a, b) => {
            for (side, other) in [(a, b), (b, a)] {
                let is_target = matches!(&**side, Expression::VAR(v) if v == ident);
                if is_target && other.support().is_empty() {
                    if let Ok(value) = other.eval(env) {
                        out.push(value);
                    }
                }
            }
        }
        Expression::NOT(x) => collect_constants(x, ident, env, out),
        Expression::AND(xs) | Expression::OR(xs) | Expression::XOR(xs) => {
            xs.iter().for_each(|x| collect_constants(x, ident, env, out))
        }
        Expression::PLUS(a, b)
        | Expression::MINUS(a, b)
        | Expression::TIMES(a, b)
        | Expression::DIV(a, b) => {
            collect_constants(a, ident, env, out);
            collect_constants(b, ident, env, out);
        }
        Expression::TRUE
        | Expression::FALSE
        | Expression::VALUE(_)
        | Expression::VAR(_) => {}
    }
}

#[cfg(test)]
mod solver_tests {
    use super::*;

    #[test]
    fn boolean_constraints_get_a_model() {
        let internal = SymbolTable::new();
        let external = symbols!("x" => false, "y" => false);
        let env = Environments::new(&internal, &external);

        let c = Expression::guard("x && !y").unwrap();
        let model = BoundedSolver.solve(&c, &env).unwrap().unwrap();
        assert_eq!(model.assignment.get("x"), Some(&Value::Bool(true)));
        assert_eq!(model.assignment.get("y"), Some(&Value::Bool(false)));
        assert_eq!(model.delay, None);
    }

    #[test]
    fn unsatisfiable_constraints_have_no_model() {
        let internal = SymbolTable::new();
        let external = symbols!("x" => false);
        let env = Environments::new(&internal, &external);

        let c = Expression::guard("x && !x").unwrap();
        assert_eq!(BoundedSolver.solve(&c, &env).unwrap(), None);
    }

    #[test]
    fn integer_comparisons_use_constraint_constants() {
        let internal = SymbolTable::new();
        let external = symbols!("n" => 0);
        let env = Environments::new(&internal, &external);

        let c = Expression::guard("n > 41").unwrap();
        let model = BoundedSolver.solve(&c, &env).unwrap().unwrap();
        assert_eq!(model.assignment.get("n"), Some(&Value::Int(42)));
    }

    #[test]
    fn internal_identifiers_are_not_assigned() {
        let internal = symbols!("a" => 1);
        let external = symbols!("x" => false);
        let env = Environments::new(&internal, &external);

        let c = Expression::guard("x && a == 1").unwrap();
        let model = BoundedSolver.solve(&c, &env).unwrap().unwrap();
        assert_eq!(model.assignment.get("a"), None);
        assert_eq!(model.assignment.get("x"), Some(&Value::Bool(true)));

        // and the internal value cannot be bent to satisfy the constraint
        let c = Expression::guard("x && a == 2").unwrap();
        assert_eq!(BoundedSolver.solve(&c, &env).unwrap(), None);
    }

    #[test]
    fn clock_constraints_produce_a_delay() {
        let internal = symbols!("t" => Value::Clock(0));
        let external = SymbolTable::new();
        let env = Environments::new(&internal, &external);

        let c = Expression::guard("t >= 100").unwrap();
        let model = BoundedSolver.solve(&c, &env).unwrap().unwrap();
        assert_eq!(model.delay, Some(100));
        assert_eq!(model.assignment.get("t"), Some(&Value::Clock(100)));

        let c = Expression::guard("t < 100").unwrap();
        let model = BoundedSolver.solve(&c, &env).unwrap().unwrap();
        assert_eq!(model.delay, Some(0));
    }
}
