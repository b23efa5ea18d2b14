//! Expression trees for formula templates and restrictions.
//!
//! Templates use a small Python-like surface syntax: `+ - * / **`, unary
//! minus, parentheses, calls to a fixed set of functions and the constants
//! `pi` and `E`. Restrictions add comparisons and the boolean connectives
//! `and`, `or`, `not`.
//!
//! Lowercase `e` is an ordinary symbol (insulation thickness); Euler's number
//! is spelled `E`.

mod eval;
mod parse;
mod symbols;

use std::collections::BTreeSet;

use crate::KnownValues;

pub use eval::EvalError;
pub use parse::{ParseError, parse_condition, parse_equality, parse_expr};
pub use symbols::{RESERVED, extract_symbols, is_reserved};

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in functions callable from templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// Natural logarithm, or `log(x, base)` with two arguments.
    Log,
    Ln,
    Exp,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Abs,
    Min,
    Max,
}

impl Func {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "log" => Func::Log,
            "ln" => Func::Ln,
            "exp" => Func::Exp,
            "sqrt" => Func::Sqrt,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "Abs" | "abs" => Func::Abs,
            "min" => Func::Min,
            "max" => Func::Max,
            _ => return None,
        };
        Some(func)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Func::Log => "log",
            Func::Ln => "ln",
            Func::Exp => "exp",
            Func::Sqrt => "sqrt",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Abs => "Abs",
            Func::Min => "min",
            Func::Max => "max",
        }
    }
}

/// An arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Const(Constant),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Returns the names of all variables in this expression.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) | Expr::Const(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(inner) => inner.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
            Expr::Call { args, .. } => args.iter().for_each(|arg| arg.collect_symbols(out)),
        }
    }

    /// Counts how many times `name` occurs in this expression.
    #[must_use]
    pub fn occurrences(&self, name: &str) -> usize {
        match self {
            Expr::Num(_) | Expr::Const(_) => 0,
            Expr::Var(var) => usize::from(var == name),
            Expr::Neg(inner) => inner.occurrences(name),
            Expr::Binary { lhs, rhs, .. } => lhs.occurrences(name) + rhs.occurrences(name),
            Expr::Call { args, .. } => args.iter().map(|arg| arg.occurrences(name)).sum(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.occurrences(name) > 0
    }

    /// Replaces every variable that has a known value by that value.
    #[must_use]
    pub fn substitute(&self, values: &KnownValues) -> Expr {
        match self {
            Expr::Var(name) => values
                .get(name)
                .map_or_else(|| self.clone(), |value| Expr::Num(*value)),
            Expr::Num(_) | Expr::Const(_) => self.clone(),
            Expr::Neg(inner) => Expr::Neg(Box::new(inner.substitute(values))),
            Expr::Binary { op, lhs, rhs } => {
                Expr::binary(*op, lhs.substitute(values), rhs.substitute(values))
            }
            Expr::Call { func, args } => Expr::Call {
                func: *func,
                args: args.iter().map(|arg| arg.substitute(values)).collect(),
            },
        }
    }
}

/// A single `lhs == rhs` equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Equality {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equality {
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = self.lhs.symbols();
        out.extend(self.rhs.symbols());
        out
    }

    #[must_use]
    pub fn occurrences(&self, name: &str) -> usize {
        self.lhs.occurrences(name) + self.rhs.occurrences(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.occurrences(name) > 0
    }

    #[must_use]
    pub fn substitute(&self, values: &KnownValues) -> Equality {
        Equality {
            lhs: self.lhs.substitute(values),
            rhs: self.rhs.substitute(values),
        }
    }

    /// Evaluates `lhs - rhs` with `name` bound to `x`.
    ///
    /// Any other variable left in the equality is an [`EvalError::Unbound`].
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] if the residual cannot be evaluated.
    pub fn residual_at(&self, name: &str, x: f64) -> Result<f64, EvalError> {
        let lookup = |var: &str| (var == name).then_some(x);
        Ok(self.lhs.eval(&lookup)? - self.rhs.eval(&lookup)?)
    }
}

/// Comparison operators used by restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// A boolean restriction expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Bool(bool),
    /// A bare arithmetic expression, true when non-zero.
    Truthy(Expr),
    Compare {
        op: CmpOp,
        lhs: Expr,
        rhs: Expr,
    },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Returns the free symbols of this condition.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        match self {
            Condition::Bool(_) => BTreeSet::new(),
            Condition::Truthy(expr) => expr.symbols(),
            Condition::Compare { lhs, rhs, .. } => {
                let mut out = lhs.symbols();
                out.extend(rhs.symbols());
                out
            }
            Condition::Not(inner) => inner.symbols(),
            Condition::And(a, b) | Condition::Or(a, b) => {
                let mut out = a.symbols();
                out.extend(b.symbols());
                out
            }
        }
    }

    #[must_use]
    pub fn substitute(&self, values: &KnownValues) -> Condition {
        match self {
            Condition::Bool(b) => Condition::Bool(*b),
            Condition::Truthy(expr) => Condition::Truthy(expr.substitute(values)),
            Condition::Compare { op, lhs, rhs } => Condition::Compare {
                op: *op,
                lhs: lhs.substitute(values),
                rhs: rhs.substitute(values),
            },
            Condition::Not(inner) => Condition::Not(Box::new(inner.substitute(values))),
            Condition::And(a, b) => {
                Condition::And(Box::new(a.substitute(values)), Box::new(b.substitute(values)))
            }
            Condition::Or(a, b) => {
                Condition::Or(Box::new(a.substitute(values)), Box::new(b.substitute(values)))
            }
        }
    }
}
