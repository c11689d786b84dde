//! peg grammar for the query language. Bare identifiers are location
//! atoms; anything with a comparison operator is a raw expression leaf.

use crate::query::Query;
use tta_domain::{Expression, Value};

peg::parser! {
    pub grammar query_parser() for str {
        rule _() = quiet!{[' ' | '\t' | '\r' | '\n']*}

        rule kw_end() = !['a'..='z' | 'A'..='Z' | '0'..='9' | '_']

        rule ident() -> String
            = s:$(['a'..='z' | 'A'..='Z' | '_'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']*)
              { s.to_string() }

        pub rule query() -> Query
            = _ q:formula() _ { q }

        rule formula() -> Query
            = "E" kw_end() _ p:path() { Query::EXISTS(Box::new(p)) }
            / "A" kw_end() _ p:path() { Query::FORALL(Box::new(p)) }
            / implication()

        rule path() -> Query
            = "F" kw_end() _ q:formula() { Query::FINALLY(Box::new(q)) }
            / "G" kw_end() _ q:formula() { Query::GLOBALLY(Box::new(q)) }
            / "X" kw_end() _ q:formula() { Query::NEXT(Box::new(q)) }

        rule implication() -> Query
            = l:disjunction() _ "->" _ r:implication() {
                Query::OR(vec![Query::NOT(Box::new(l)), r])
            }
            / disjunction()

        rule disjunction() -> Query
            = l:conjunction() tail:(_ "||" _ r:conjunction() { r })* {
                if tail.is_empty() {
                    l
                } else {
                    let mut v = vec![l];
                    v.extend(tail);
                    Query::OR(v)
                }
            }

        rule conjunction() -> Query
            = l:unary() tail:(_ "&&" _ r:unary() { r })* {
                if tail.is_empty() {
                    l
                } else {
                    let mut v = vec![l];
                    v.extend(tail);
                    Query::AND(v)
                }
            }

        rule unary() -> Query
            = "!" _ q:unary() { Query::NOT(Box::new(q)) }
            / atom()

        rule atom() -> Query
            = e:comparison() { Query::EXPR(e) }
            / "(" _ q:formula() _ ")" { q }
            / i:ident() {
                match i.as_str() {
                    "true" => Query::EXPR(Expression::TRUE),
                    "false" => Query::EXPR(Expression::FALSE),
                    _ => Query::LOCATION(i),
                }
            }

        // expression leaves: an explicit comparison over arithmetic terms
        rule comparison() -> Expression
            = l:eadd() _ op:$("==" / "!=" / ">=" / "<=" / ">" / "<") _ r:eadd() {
                let (l, r) = (Box::new(l), Box::new(r));
                match op {
                    "==" => Expression::EQ(l, r),
                    "!=" => Expression::NEQ(l, r),
                    ">=" => Expression::GEQ(l, r),
                    "<=" => Expression::LEQ(l, r),
                    ">" => Expression::GT(l, r),
                    _ => Expression::LT(l, r),
                }
            }

        rule eadd() -> Expression
            = l:emul() tail:(_ op:$("+" / "-") _ r:emul() { (op, r) })* {
                tail.into_iter().fold(l, |acc, (op, r)| match op {
                    "+" => Expression::PLUS(Box::new(acc), Box::new(r)),
                    _ => Expression::MINUS(Box::new(acc), Box::new(r)),
                })
            }

        rule emul() -> Expression
            = l:eatom() tail:(_ op:$("*" / "/") _ r:eatom() { (op, r) })* {
                tail.into_iter().fold(l, |acc, (op, r)| match op {
                    "*" => Expression::TIMES(Box::new(acc), Box::new(r)),
                    _ => Expression::DIV(Box::new(acc), Box::new(r)),
                })
            }

        rule eatom() -> Expression
            = n:$("-"? ['0'..='9']+ "." ['0'..='9']+) { Expression::VALUE(Value::Float(n.parse().unwrap())) }
            / n:$("-"? ['0'..='9']+) { Expression::VALUE(Value::Int(n.parse().unwrap())) }
            / "\"" s:$((!"\"" [_])*) "\"" { Expression::VALUE(Value::String(s.to_string())) }
            / "(" _ e:eadd() _ ")" { e }
            / i:ident() {
                match i.as_str() {
                    "true" => Expression::TRUE,
                    "false" => Expression::FALSE,
                    _ => Expression::VAR(i),
                }
            }
    }
}
