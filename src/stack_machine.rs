//! Postorder lowering of the expression tree, as consumed by a stack-based
//! code generator: push each literal, and after both operands of a binary
//! node have been produced, pop two values and push the result.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ast::{BinaryOp, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StackOp {
    Push(i64),
    /// Pops `rhs` then `lhs`, pushes `lhs op rhs`. Comparisons push 1 or 0.
    Apply(BinaryOp),
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackOp::Push(value) => write!(f, "push {}", value),
            StackOp::Apply(op) => f.write_str(match op {
                BinaryOp::Add => "add",
                BinaryOp::Sub => "sub",
                BinaryOp::Mul => "mul",
                BinaryOp::Div => "div",
                BinaryOp::Eq => "eq",
                BinaryOp::Ne => "ne",
                BinaryOp::Lt => "lt",
                BinaryOp::Le => "le",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("{0} values left on the stack")]
    UnbalancedStack(usize),
}

pub fn lower(node: &Node) -> Vec<StackOp> {
    let mut ops = Vec::new();
    lower_into(node, &mut ops);
    ops
}

fn lower_into(node: &Node, ops: &mut Vec<StackOp>) {
    match node {
        Node::Num { value } => ops.push(StackOp::Push(*value)),
        Node::Binary { op, lhs, rhs } => {
            lower_into(lhs, ops);
            lower_into(rhs, ops);
            ops.push(StackOp::Apply(*op));
        }
    }
}

/// Runs `ops` on an empty stack and returns the single value left on it.
///
/// Arithmetic wraps on overflow; division truncates toward zero.
pub fn run(ops: &[StackOp]) -> Result<i64, EvalError> {
    let mut stack: Vec<i64> = Vec::new();
    for op in ops {
        match *op {
            StackOp::Push(value) => stack.push(value),
            StackOp::Apply(op) => {
                let rhs = stack.pop().ok_or(EvalError::StackUnderflow)?;
                let lhs = stack.pop().ok_or(EvalError::StackUnderflow)?;
                stack.push(apply(op, lhs, rhs)?);
            }
        }
    }
    match stack[..] {
        [value] => Ok(value),
        [] => Err(EvalError::StackUnderflow),
        _ => Err(EvalError::UnbalancedStack(stack.len())),
    }
}

pub fn evaluate(node: &Node) -> Result<i64, EvalError> {
    run(&lower(node))
}

fn apply(op: BinaryOp, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
    Ok(match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::Div => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        BinaryOp::Eq => (lhs == rhs) as i64,
        BinaryOp::Ne => (lhs != rhs) as i64,
        BinaryOp::Lt => (lhs < rhs) as i64,
        BinaryOp::Le => (lhs <= rhs) as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn eval_str(source: &str) -> Result<i64, EvalError> {
        evaluate(&parse(source.as_bytes()).unwrap())
    }

    #[test]
    fn test_evaluate() {
        let testcases: Vec<(&str, i64)> = vec![
            ("0", 0),
            ("42", 42),
            ("2+3*4", 14),
            ("8-3-2", 3),
            ("(1+2)*3", 9),
            ("-5+2", -3),
            ("+5", 5),
            ("-7/2", -3),
            ("-10+20", 10),
            (" 12 + 34 - 5 ", 41),
            ("5+6*7", 47),
            ("5*(9-6)", 15),
            ("(3+5)/2", 4),
            ("0==1", 0),
            ("42==42", 1),
            ("0!=1", 1),
            ("42!=42", 0),
            ("0<1", 1),
            ("1<1", 0),
            ("2<1", 0),
            ("0<=1", 1),
            ("1<=1", 1),
            ("2<=1", 0),
            ("1>0", 1),
            ("1>1", 0),
            ("1>2", 0),
            ("1>=0", 1),
            ("1>=1", 1),
            ("1>=2", 0),
        ];
        for (source, expected) in testcases {
            assert_eq!(eval_str(source), Ok(expected), "source = {:?}", source);
        }
    }

    #[test]
    fn test_lower() {
        let node = parse(b"3>2*1").unwrap();
        assert_eq!(
            lower(&node),
            vec![
                StackOp::Push(2),
                StackOp::Push(1),
                StackOp::Apply(BinaryOp::Mul),
                StackOp::Push(3),
                StackOp::Apply(BinaryOp::Lt),
            ]
        );
        let text = lower(&node)
            .iter()
            .map(|op| op.to_string())
            .collect::<Vec<_>>();
        assert_eq!(text, vec!["push 2", "push 1", "mul", "push 3", "lt"]);
    }

    #[test]
    fn test_eval_errors() {
        assert_eq!(eval_str("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("1/(2-2)"), Err(EvalError::DivisionByZero));
        assert_eq!(
            run(&[StackOp::Apply(BinaryOp::Add)]),
            Err(EvalError::StackUnderflow)
        );
        assert_eq!(run(&[]), Err(EvalError::StackUnderflow));
        assert_eq!(
            run(&[StackOp::Push(1), StackOp::Push(2)]),
            Err(EvalError::UnbalancedStack(2))
        );
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(eval_str("9223372036854775807+1"), Ok(i64::MIN));
        assert_eq!(eval_str("-9223372036854775807-1"), Ok(i64::MIN));
        assert_eq!(eval_str("(-9223372036854775807-1)/-1"), Ok(i64::MIN));
    }
}
