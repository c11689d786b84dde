/// This file defines both guard expressions and edge updates.
use super::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub enum Expression {
    TRUE,
    FALSE,
    VALUE(Value),
    VAR(String),
    NOT(Box<Expression>),
    AND(Vec<Expression>),
    OR(Vec<Expression>),
    XOR(Vec<Expression>),
    EQ(Box<Expression>, Box<Expression>),
    NEQ(Box<Expression>, Box<Expression>),
    GT(Box<Expression>, Box<Expression>),
    GEQ(Box<Expression>, Box<Expression>),
    LT(Box<Expression>, Box<Expression>),
    LEQ(Box<Expression>, Box<Expression>),
    PLUS(Box<Expression>, Box<Expression>),
    MINUS(Box<Expression>, Box<Expression>),
    TIMES(Box<Expression>, Box<Expression>),
    DIV(Box<Expression>, Box<Expression>),
}

impl Default for Expression {
    fn default() -> Self {
        Expression::TRUE
    }
}

impl Expression {
    /// Compile a guard. Empty text is the trivially true guard.
    pub fn guard(text: &str) -> TtaResult<Expression> {
        if text.trim().is_empty() {
            return Ok(Expression::TRUE);
        }
        expression_parser::expr_parser::guard(text)
            .map_err(|e| TtaError::Model(format!("bad guard '{}': {}", text, e)))
    }

    /// Return the identifiers this expression reads.
    pub fn support(&self) -> Vec<String> {
        let mut s = Vec::new();
        self.collect_support(&mut s);
        s.sort();
        s.dedup();
        s
    }

    fn collect_support(&self, s: &mut Vec<String>) {
        match self {
            Expression::TRUE | Expression::FALSE | Expression::VALUE(_) => {}
            Expression::VAR(ident) => s.push(ident.clone()),
            Expression::NOT(x) => x.collect_support(s),
            Expression::AND(xs) | Expression::OR(xs) | Expression::XOR(xs) => {
                xs.iter().for_each(|x| x.collect_support(s))
            }
            Expression::EQ(x, y)
            | Expression::NEQ(x, y)
            | Expression::GT(x, y)
            | Expression::GEQ(x, y)
            | Expression::LT(x, y)
            | Expression::LEQ(x, y)
            | Expression::PLUS(x, y)
            | Expression::MINUS(x, y)
            | Expression::TIMES(x, y)
            | Expression::DIV(x, y) => {
                x.collect_support(s);
                y.collect_support(s);
            }
        }
    }

    pub fn eval(&self, env: &Environments) -> TtaResult<Value> {
        match self {
            Expression::TRUE => Ok(Value::Bool(true)),
            Expression::FALSE => Ok(Value::Bool(false)),
            Expression::VALUE(v) => Ok(v.clone()),
            Expression::VAR(ident) => env.value(ident).cloned().ok_or_else(|| {
                TtaError::Eval(format!("unknown identifier '{}'", ident))
            }),
            Expression::NOT(x) => Ok(Value::Bool(!x.eval_bool(env)?)),
            Expression::AND(xs) => {
                for x in xs.iter() {
                    if !x.eval_bool(env)? {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Expression::OR(xs) => {
                for x in xs.iter() {
                    if x.eval_bool(env)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Expression::XOR(xs) => {
                let mut c = 0;
                for x in xs.iter() {
                    if x.eval_bool(env)? {
                        c += 1;
                    }
                }
                Ok(Value::Bool(c == 1))
            }
            Expression::EQ(x, y) => {
                Ok(Value::Bool(values_equal(&x.eval(env)?, &y.eval(env)?)))
            }
            Expression::NEQ(x, y) => {
                Ok(Value::Bool(!values_equal(&x.eval(env)?, &y.eval(env)?)))
            }
            Expression::GT(x, y) => compare(">", &x.eval(env)?, &y.eval(env)?)
                .map(|o| Value::Bool(o == Ordering::Greater)),
            Expression::GEQ(x, y) => compare(">=", &x.eval(env)?, &y.eval(env)?)
                .map(|o| Value::Bool(o != Ordering::Less)),
            Expression::LT(x, y) => compare("<", &x.eval(env)?, &y.eval(env)?)
                .map(|o| Value::Bool(o == Ordering::Less)),
            Expression::LEQ(x, y) => compare("<=", &x.eval(env)?, &y.eval(env)?)
                .map(|o| Value::Bool(o != Ordering::Greater)),
            Expression::PLUS(x, y) => numeric('+', &x.eval(env)?, &y.eval(env)?),
            Expression::MINUS(x, y) => numeric('-', &x.eval(env)?, &y.eval(env)?),
            Expression::TIMES(x, y) => numeric('*', &x.eval(env)?, &y.eval(env)?),
            Expression::DIV(x, y) => numeric('/', &x.eval(env)?, &y.eval(env)?),
        }
    }

    pub fn eval_bool(&self, env: &Environments) -> TtaResult<bool> {
        match self.eval(env)? {
            Value::Bool(b) => Ok(b),
            v => Err(TtaError::Eval(format!("expected a boolean, got {}", v))),
        }
    }
}

/// Numeric and clock values compare across Int/Float/Clock; everything
/// else is equal only to itself.
fn values_equal(a: &Value, b: &Value) -> bool {
    match ordering_of(a, b) {
        Some(o) => o == Ordering::Equal,
        None => a == b,
    }
}

fn ordering_of(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f32).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f32)),
        (Value::Clock(x), Value::Clock(y)) => Some(x.cmp(y)),
        (Value::Clock(x), Value::Int(y)) => Some(x.cmp(&(*y as i64))),
        (Value::Int(x), Value::Clock(y)) => Some((*x as i64).cmp(y)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare(op: &str, a: &Value, b: &Value) -> TtaResult<Ordering> {
    ordering_of(a, b).ok_or_else(|| {
        TtaError::Eval(format!("cannot compare {} {} {}", a, op, b))
    })
}

fn numeric(op: char, a: &Value, b: &Value) -> TtaResult<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if op == '/' && *y == 0 {
                return Err(TtaError::Eval("division by zero".into()));
            }
            Ok(Value::Int(match op {
                '+' => x + y,
                '-' => x - y,
                '*' => x * y,
                _ => x / y,
            }))
        }
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(float_op(op, *x, *y))),
        (Value::Int(x), Value::Float(y)) => {
            Ok(Value::Float(float_op(op, *x as f32, *y)))
        }
        (Value::Float(x), Value::Int(y)) => {
            Ok(Value::Float(float_op(op, *x, *y as f32)))
        }
        _ => Err(TtaError::Eval(format!(
            "cannot apply '{}' to {} and {}",
            op, a, b
        ))),
    }
}

fn float_op(op: char, x: f32, y: f32) -> f32 {
    match op {
        '+' => x + y,
        '-' => x - y,
        '*' => x * y,
        _ => x / y,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = match &self {
            Expression::TRUE => "true".into(),
            Expression::FALSE => "false".into(),
            Expression::VALUE(v) => format!("{v}"),
            Expression::VAR(ident) => ident.clone(),
            Expression::NOT(x) => format!("!({x})"),
            Expression::AND(xs) => {
                let children: Vec<_> = xs.iter().map(|x| format!("{x}")).collect();
                format!("({})", children.join(" && "))
            }
            Expression::OR(xs) => {
                let children: Vec<_> = xs.iter().map(|x| format!("{x}")).collect();
                format!("({})", children.join(" || "))
            }
            Expression::XOR(xs) => {
                let children: Vec<_> = xs.iter().map(|x| format!("{x}")).collect();
                format!("({})", children.join(" xor "))
            }
            Expression::EQ(x, y) => format!("{x} == {y}"),
            Expression::NEQ(x, y) => format!("{x} != {y}"),
            Expression::GT(x, y) => format!("{x} > {y}"),
            Expression::GEQ(x, y) => format!("{x} >= {y}"),
            Expression::LT(x, y) => format!("{x} < {y}"),
            Expression::LEQ(x, y) => format!("{x} <= {y}"),
            Expression::PLUS(x, y) => format!("({x} + {y})"),
            Expression::MINUS(x, y) => format!("({x} - {y})"),
            Expression::TIMES(x, y) => format!("({x} * {y})"),
            Expression::DIV(x, y) => format!("({x} / {y})"),
        };

        write!(fmtr, "{}", &s)
    }
}

/// One `ident := expr` write.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Assignment {
    pub ident: String,
    pub expr: Expression,
}

impl fmt::Display for Assignment {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmtr, "{} := {}", self.ident, self.expr)
    }
}

/// The ordered assignments of one edge. All right-hand sides are evaluated
/// against the state before the step; a later assignment to the same
/// identifier overwrites an earlier one.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct UpdateSet {
    pub assignments: Vec<Assignment>,
}

impl UpdateSet {
    /// Compile a `;`-separated update list. Empty text is the empty update.
    pub fn updates(text: &str) -> TtaResult<UpdateSet> {
        if text.trim().is_empty() {
            return Ok(UpdateSet::default());
        }
        expression_parser::expr_parser::updates(text)
            .map_err(|e| TtaError::Model(format!("bad update '{}': {}", text, e)))
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Identifiers written by the assignments.
    pub fn targets(&self) -> Vec<String> {
        let mut t: Vec<_> = self.assignments.iter().map(|a| a.ident.clone()).collect();
        t.sort();
        t.dedup();
        t
    }

    /// All identifiers this update reads or writes.
    pub fn support(&self) -> Vec<String> {
        let mut s = self.targets();
        for a in self.assignments.iter() {
            s.extend(a.expr.support());
        }
        s.sort();
        s.dedup();
        s
    }

    pub fn evaluate(&self, env: &Environments) -> TtaResult<SymbolDiff> {
        let mut diff = SymbolDiff::new();
        for a in self.assignments.iter() {
            diff.insert(a.ident.clone(), a.expr.eval(env)?);
        }
        Ok(diff)
    }
}

impl fmt::Display for UpdateSet {
    fn fmt(&self, fmtr: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<_> = self.assignments.iter().map(|a| format!("{a}")).collect();
        write!(fmtr, "{}", s.join("; "))
    }
}

/// ********** TESTS ***************
