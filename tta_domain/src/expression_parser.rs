//! peg grammar for guard expressions and `ident := expr` update lists.

use crate::expression::{Assignment, Expression, UpdateSet};
use crate::value::Value;

peg::parser! {
    pub grammar expr_parser() for str {
        rule _() = quiet!{[' ' | '\t' | '\r' | '\n']*}

        rule ident() -> String
            = s:$(['a'..='z' | 'A'..='Z' | '_'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']*)
              { s.to_string() }

        rule number() -> Value
            = n:$("-"? ['0'..='9']+ "." ['0'..='9']+) { Value::Float(n.parse().unwrap()) }
            / n:$("-"? ['0'..='9']+) { Value::Int(n.parse().unwrap()) }

        rule string_value() -> Value
            = "\"" s:$((!"\"" [_])*) "\"" { Value::String(s.to_string()) }

        rule atom() -> Expression
            = v:number() { Expression::VALUE(v) }
            / v:string_value() { Expression::VALUE(v) }
            / "(" _ e:expression() _ ")" { e }
            / i:ident() {
                match i.as_str() {
                    "true" => Expression::TRUE,
                    "false" => Expression::FALSE,
                    _ => Expression::VAR(i),
                }
            }

        rule unary() -> Expression
            = "!" _ x:unary() { Expression::NOT(Box::new(x)) }
            / atom()

        rule multiplicative() -> Expression
            = l:unary() tail:(_ op:$("*" / "/") _ r:unary() { (op, r) })* {
                tail.into_iter().fold(l, |acc, (op, r)| match op {
                    "*" => Expression::TIMES(Box::new(acc), Box::new(r)),
                    _ => Expression::DIV(Box::new(acc), Box::new(r)),
                })
            }

        rule additive() -> Expression
            = l:multiplicative() tail:(_ op:$("+" / "-") _ r:multiplicative() { (op, r) })* {
                tail.into_iter().fold(l, |acc, (op, r)| match op {
                    "+" => Expression::PLUS(Box::new(acc), Box::new(r)),
                    _ => Expression::MINUS(Box::new(acc), Box::new(r)),
                })
            }

        rule comparison() -> Expression
            = l:additive() _ op:$("==" / "!=" / ">=" / "<=" / ">" / "<") _ r:additive() {
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
            / additive()

        rule conjunction() -> Expression
            = l:comparison() tail:(_ "&&" _ r:comparison() { r })* {
                if tail.is_empty() {
                    l
                } else {
                    let mut v = vec![l];
                    v.extend(tail);
                    Expression::AND(v)
                }
            }

        rule disjunction() -> Expression
            = l:conjunction() tail:(_ "||" _ r:conjunction() { r })* {
                if tail.is_empty() {
                    l
                } else {
                    let mut v = vec![l];
                    v.extend(tail);
                    Expression::OR(v)
                }
            }

        rule expression() -> Expression
            = l:disjunction() _ "->" _ r:expression() {
                Expression::OR(vec![Expression::NOT(Box::new(l)), r])
            }
            / disjunction()

        pub rule guard() -> Expression
            = _ e:expression() _ { e }

        rule assignment() -> Assignment
            = i:ident() _ ":=" _ e:expression() { Assignment { ident: i, expr: e } }

        pub rule updates() -> UpdateSet
            = _ a:(assignment() ** (_ ";" _)) _ (";" _)? {
                UpdateSet { assignments: a }
            }
    }
}
