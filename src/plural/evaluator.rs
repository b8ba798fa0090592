//! Evaluation of parsed plural formulas
//!
//! Integers follow the usual gettext reading with two refinements: `/` and
//! `%` use floor semantics (the quotient rounds toward negative infinity, the
//! remainder takes the sign of the divisor), and booleans count as 0/1 when
//! they appear in arithmetic. `&&`, `||` and `?:` only evaluate the operand
//! they need.

use super::parser::{parse, ArithmeticOp, CompareOp, Expr, LogicalOp};
use super::tokenizer::VARIABLE_N;
use crate::error::FormulaError;
use std::collections::BTreeMap;
use std::fmt;

/// Result of evaluating a plural formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    /// Integer view: `true` is 1, `false` is 0
    pub fn as_int(self) -> i64 {
        match self {
            Value::Int(value) => value,
            Value::Bool(flag) => i64::from(flag),
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Int(value) => value != 0,
            Value::Bool(flag) => flag,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(flag) => write!(f, "{}", flag),
        }
    }
}

/// Variable bindings available to a formula
pub type Bindings = BTreeMap<String, i64>;

/// A parsed formula that can be evaluated many times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        Ok(Self {
            source: source.to_string(),
            expr: parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with `n` bound to the given count
    pub fn evaluate(&self, n: i64) -> Result<Value, FormulaError> {
        let mut bindings = Bindings::new();
        bindings.insert(VARIABLE_N.to_string(), n);
        self.evaluate_with(&bindings)
    }

    pub fn evaluate_with(&self, bindings: &Bindings) -> Result<Value, FormulaError> {
        eval(&self.expr, bindings)
    }
}

/// Parse and evaluate `formula` for a single `n`
pub fn evaluate(formula: &str, n: i64) -> Result<Value, FormulaError> {
    Formula::parse(formula)?.evaluate(n)
}

fn eval(expr: &Expr, bindings: &Bindings) -> Result<Value, FormulaError> {
    match expr {
        Expr::Integer(value) => Ok(Value::Int(*value)),
        Expr::Variable(name) => bindings
            .get(name)
            .copied()
            .map(Value::Int)
            .ok_or_else(|| FormulaError::UndefinedVariable(name.clone())),
        Expr::Arithmetic { op, left, right } => {
            let lhs = eval(left, bindings)?.as_int();
            let rhs = eval(right, bindings)?.as_int();
            arithmetic(*op, lhs, rhs).map(Value::Int)
        }
        Expr::Not(operand) => Ok(Value::Bool(!eval(operand, bindings)?.is_truthy())),
        Expr::Compare { op, left, right } => {
            let lhs = eval(left, bindings)?.as_int();
            let rhs = eval(right, bindings)?.as_int();
            let result = match op {
                CompareOp::Eq => lhs == rhs,
                CompareOp::Neq => lhs != rhs,
                CompareOp::Lt => lhs < rhs,
                CompareOp::Lte => lhs <= rhs,
                CompareOp::Gt => lhs > rhs,
                CompareOp::Gte => lhs >= rhs,
            };
            Ok(Value::Bool(result))
        }
        Expr::Logical { op, left, right } => {
            let lhs = eval(left, bindings)?.is_truthy();
            let result = match op {
                LogicalOp::And => lhs && eval(right, bindings)?.is_truthy(),
                LogicalOp::Or => lhs || eval(right, bindings)?.is_truthy(),
            };
            Ok(Value::Bool(result))
        }
        Expr::Conditional {
            condition,
            if_true,
            if_false,
        } => {
            if eval(condition, bindings)?.is_truthy() {
                eval(if_true, bindings)
            } else {
                eval(if_false, bindings)
            }
        }
    }
}

fn arithmetic(op: ArithmeticOp, lhs: i64, rhs: i64) -> Result<i64, FormulaError> {
    match op {
        ArithmeticOp::Add => lhs.checked_add(rhs).ok_or(FormulaError::Overflow),
        ArithmeticOp::Sub => lhs.checked_sub(rhs).ok_or(FormulaError::Overflow),
        ArithmeticOp::Mul => lhs.checked_mul(rhs).ok_or(FormulaError::Overflow),
        ArithmeticOp::Div => floor_div(lhs, rhs),
        ArithmeticOp::Mod => floor_mod(lhs, rhs),
        ArithmeticOp::Pow => {
            let exponent = u32::try_from(rhs).map_err(|_| FormulaError::Overflow)?;
            lhs.checked_pow(exponent).ok_or(FormulaError::Overflow)
        }
    }
}

fn floor_div(lhs: i64, rhs: i64) -> Result<i64, FormulaError> {
    if rhs == 0 {
        return Err(FormulaError::DivisionByZero);
    }
    let quotient = lhs.checked_div(rhs).ok_or(FormulaError::Overflow)?;
    let remainder = lhs.checked_rem(rhs).ok_or(FormulaError::Overflow)?;
    if remainder != 0 && ((remainder < 0) != (rhs < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

fn floor_mod(lhs: i64, rhs: i64) -> Result<i64, FormulaError> {
    if rhs == 0 {
        return Err(FormulaError::DivisionByZero);
    }
    let remainder = lhs.checked_rem(rhs).ok_or(FormulaError::Overflow)?;
    if remainder != 0 && ((remainder < 0) != (rhs < 0)) {
        Ok(remainder + rhs)
    } else {
        Ok(remainder)
    }
}
