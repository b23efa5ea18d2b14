use std::cmp::Ordering;

use thiserror::Error;

use super::{BinOp, CmpOp, Condition, Expr, Func};

/// Errors raised while evaluating an expression.
///
/// Arithmetic never fails here: undefined operations such as `log(-1)` or
/// `1 / 0` produce NaN or infinity, and callers decide what that means.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("symbol `{0}` has no value")]
    Unbound(String),

    #[error("`{func}` expects {expected} argument(s), got {got}")]
    Arity {
        func: &'static str,
        expected: &'static str,
        got: usize,
    },
}

impl Expr {
    /// Evaluates the expression, resolving variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Unbound`] for a variable `lookup` does not know,
    /// and [`EvalError::Arity`] for a call with the wrong argument count.
    pub fn eval(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Result<f64, EvalError> {
        match self {
            Expr::Num(value) => Ok(*value),
            Expr::Const(constant) => Ok(constant.value()),
            Expr::Var(name) => lookup(name).ok_or_else(|| EvalError::Unbound(name.clone())),
            Expr::Neg(inner) => Ok(-inner.eval(lookup)?),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(lookup)?;
                let b = rhs.eval(lookup)?;
                Ok(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                })
            }
            Expr::Call { func, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(lookup))
                    .collect::<Result<Vec<_>, _>>()?;
                call(*func, &values)
            }
        }
    }

    /// Evaluates an expression that must not contain variables.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] if a variable remains or a call is malformed.
    pub fn eval_constant(&self) -> Result<f64, EvalError> {
        self.eval(&|_: &str| None)
    }
}

fn call(func: Func, args: &[f64]) -> Result<f64, EvalError> {
    let unary = |f: fn(f64) -> f64| match args {
        [x] => Ok(f(*x)),
        _ => Err(EvalError::Arity {
            func: func.name(),
            expected: "1",
            got: args.len(),
        }),
    };

    match func {
        Func::Log => match args {
            [x] => Ok(x.ln()),
            [x, base] => Ok(x.ln() / base.ln()),
            _ => Err(EvalError::Arity {
                func: func.name(),
                expected: "1 or 2",
                got: args.len(),
            }),
        },
        Func::Ln => unary(f64::ln),
        Func::Exp => unary(f64::exp),
        Func::Sqrt => unary(f64::sqrt),
        Func::Sin => unary(f64::sin),
        Func::Cos => unary(f64::cos),
        Func::Tan => unary(f64::tan),
        Func::Abs => unary(f64::abs),
        Func::Min | Func::Max => {
            let (first, rest) = args.split_first().ok_or(EvalError::Arity {
                func: func.name(),
                expected: "at least 1",
                got: 0,
            })?;
            Ok(rest.iter().fold(*first, |acc, &x| {
                if func == Func::Min {
                    acc.min(x)
                } else {
                    acc.max(x)
                }
            }))
        }
    }
}

impl Condition {
    /// Evaluates the condition, resolving variables through `lookup`.
    ///
    /// Comparisons involving NaN are false.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] if an operand cannot be evaluated.
    pub fn eval(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Result<bool, EvalError> {
        match self {
            Condition::Bool(value) => Ok(*value),
            Condition::Truthy(expr) => {
                let value = expr.eval(lookup)?;
                Ok(value != 0.0 && !value.is_nan())
            }
            Condition::Compare { op, lhs, rhs } => {
                let ordering = lhs.eval(lookup)?.partial_cmp(&rhs.eval(lookup)?);
                Ok(match (op, ordering) {
                    (_, None) => false,
                    (CmpOp::Lt, Some(ord)) => ord == Ordering::Less,
                    (CmpOp::Le, Some(ord)) => ord != Ordering::Greater,
                    (CmpOp::Gt, Some(ord)) => ord == Ordering::Greater,
                    (CmpOp::Ge, Some(ord)) => ord != Ordering::Less,
                    (CmpOp::Eq, Some(ord)) => ord == Ordering::Equal,
                    (CmpOp::Ne, Some(ord)) => ord != Ordering::Equal,
                })
            }
            Condition::Not(inner) => Ok(!inner.eval(lookup)?),
            Condition::And(a, b) => Ok(a.eval(lookup)? && b.eval(lookup)?),
            Condition::Or(a, b) => Ok(a.eval(lookup)? || b.eval(lookup)?),
        }
    }
}
