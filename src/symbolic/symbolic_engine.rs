//! # Symbolic Engine Module
//!
//! The core symbolic expression type of the crate. A flow-rate function F(t)
//! entered as text is parsed (see `parse_expr`) into an `Expr` tree, which can
//! then be evaluated at arbitrary real points, compiled into an executable
//! closure, or integrated in closed form (see `symbolic_integration`).
//!
//! ## Main structures
//!
//! ### `Expr` enum
//! - **Variables**: `Var(String)` - symbolic variables like "t"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `Sin`, `Cos`, `Tan`
//!
//! ### Key methods
//! - `parse_expression()` - String to symbolic expression
//! - `eval_at()` - direct evaluation at a point, rejecting non-finite results
//! - `lambdify1D()` - convert to an executable Rust function
//! - `antiderivative()` / `definite_integral()` - closed-form integration

use std::fmt;
use thiserror::Error;

/// Core symbolic expression enum representing a mathematical expression as an
/// abstract syntax tree. Uses Box<Expr> for recursive structures, allowing
/// arbitrarily deep expression trees. Immutable once built; evaluation has no
/// side effects.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "t")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    Sin(Box<Expr>),
    /// Cosine function: cos(x)
    Cos(Box<Expr>),
    /// Tangent function: tan(x)
    Tan(Box<Expr>),
}

/// Substitution produced a value that is not a finite real number (log of a
/// non-positive argument, division by zero, and so on). Fatal for the whole
/// computation when raised during grid sampling.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("expression is not finite at {var} = {at}")]
pub struct EvaluationError {
    pub var: String,
    pub at: f64,
}

/// Pretty printing with parentheses for proper precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::Sin(expr) => write!(f, "sin({})", expr),
            Expr::Cos(expr) => write!(f, "cos({})", expr),
            Expr::Tan(expr) => write!(f, "tan({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Sin(expr)
            | Expr::Cos(expr)
            | Expr::Tan(expr) => expr.contains_variable(var_name),
        }
    }

    /// Returns the sorted, deduplicated free variables of the expression.
    pub fn variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, out: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => out.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Add(left, right)
                | Expr::Sub(left, right)
                | Expr::Mul(left, right)
                | Expr::Div(left, right)
                | Expr::Pow(left, right) => {
                    collect(left, out);
                    collect(right, out);
                }
                Expr::Exp(inner)
                | Expr::Ln(inner)
                | Expr::Sin(inner)
                | Expr::Cos(inner)
                | Expr::Tan(inner) => collect(inner, out),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression at `var = x` without creating a closure.
    ///
    /// More convenient than lambdification for single-use evaluation, e.g.
    /// evaluating an antiderivative at the integration bounds. Fails when the
    /// substitution does not yield a finite real number; the failure is
    /// catchable per point.
    pub fn eval_at(&self, var: &str, x: f64) -> Result<f64, EvaluationError> {
        let value = self.eval_raw(var, x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError {
                var: var.to_string(),
                at: x,
            })
        }
    }

    /// Recursive tree walk behind `eval_at`. Non-finite intermediate values
    /// (NaN, infinities) propagate through IEEE arithmetic and are caught at
    /// the top.
    fn eval_raw(&self, var: &str, x: f64) -> f64 {
        match self {
            Expr::Var(name) => {
                if name == var {
                    x
                } else {
                    f64::NAN
                }
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_raw(var, x) + rhs.eval_raw(var, x),
            Expr::Sub(lhs, rhs) => lhs.eval_raw(var, x) - rhs.eval_raw(var, x),
            Expr::Mul(lhs, rhs) => lhs.eval_raw(var, x) * rhs.eval_raw(var, x),
            Expr::Div(lhs, rhs) => lhs.eval_raw(var, x) / rhs.eval_raw(var, x),
            Expr::Pow(base, exp) => base.eval_raw(var, x).powf(exp.eval_raw(var, x)),
            Expr::Exp(expr) => expr.eval_raw(var, x).exp(),
            Expr::Ln(expr) => expr.eval_raw(var, x).ln(),
            Expr::Sin(expr) => expr.eval_raw(var, x).sin(),
            Expr::Cos(expr) => expr.eval_raw(var, x).cos(),
            Expr::Tan(expr) => expr.eval_raw(var, x).tan(),
        }
    }

    /// LAMBDIFICATION

    /// Converts a single-variable symbolic expression into an executable Rust
    /// closure for repeated evaluation over a grid.
    ///
    /// The recursive structure mirrors the expression tree; there is no
    /// runtime parsing or interpretation after construction. The caller must
    /// ensure the expression depends on at most one variable (the pipeline
    /// rejects foreign variables before sampling); any `Var` node reads the
    /// closure argument.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let t = Expr::Var("t".to_string());
    /// let f = t.pow(Expr::Const(2.0)); // t^2
    /// let func = f.lambdify1D();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64> {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D();
                let exp_fn = exp.lambdify1D();
                Box::new(move |x| base_fn(x).powf(exp_fn(x)))
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D();
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D();
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::Sin(expr) => {
                let expr_fn = expr.lambdify1D();
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::Cos(expr) => {
                let expr_fn = expr.lambdify1D();
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::Tan(expr) => {
                let expr_fn = expr.lambdify1D();
                Box::new(move |x| expr_fn(x).tan())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_display() {
        let expr = Expr::Var("t".to_string()) * Expr::Const(3.0) + Expr::Const(2.0);
        assert_eq!(expr.to_string(), "((t * 3) + 2)");
    }

    #[test]
    fn test_eval_at_polynomial() {
        let t = Expr::Var("t".to_string());
        let expr = t.clone() * t.clone() + t.clone() * Expr::Const(2.0) + Expr::Const(1.0); // t^2 + 2t + 1
        assert_eq!(expr.eval_at("t", 3.0).unwrap(), 16.0);
    }

    #[test]
    fn test_eval_at_log_of_negative_fails() {
        let expr = Expr::Var("t".to_string()).ln();
        let err = expr.eval_at("t", -1.0).unwrap_err();
        assert_eq!(err.at, -1.0);
        assert_eq!(err.var, "t");
    }

    #[test]
    fn test_eval_at_division_by_zero_fails() {
        let expr = Expr::Const(1.0) / Expr::Var("t".to_string());
        assert!(expr.eval_at("t", 0.0).is_err());
        // catchable per point: the same expression is fine elsewhere
        assert_eq!(expr.eval_at("t", 2.0).unwrap(), 0.5);
    }

    #[test]
    fn test_lambdify1d_single_variable() {
        let t = Expr::Var("t".to_string());
        let func = t.lambdify1D();
        assert_eq!(func(5.0), 5.0);
    }

    #[test]
    fn test_lambdify1d_constant() {
        let c = Expr::Const(42.0);
        let func = c.lambdify1D();
        assert_eq!(func(100.0), 42.0);
    }

    #[test]
    fn test_lambdify1d_trigonometric() {
        let t = Expr::Var("t".to_string());
        let expr = Expr::Sin(Box::new(t));
        let func = expr.lambdify1D();
        assert!((func(0.0) - 0.0).abs() < 1e-10);
        assert!((func(PI / 2.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_lambdify1d_exponential() {
        let t = Expr::Var("t".to_string());
        let expr = Expr::Exp(Box::new(t));
        let func = expr.lambdify1D();
        assert!((func(0.0) - 1.0).abs() < 1e-10);
        assert!((func(1.0) - std::f64::consts::E).abs() < 1e-10);
    }

    #[test]
    fn test_variables_sorted_and_deduplicated() {
        let expr = Expr::Var("t".to_string()) * Expr::Var("t".to_string())
            + Expr::Var("a".to_string());
        assert_eq!(expr.variables(), vec!["a".to_string(), "t".to_string()]);
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::Sin(Box::new(Expr::Var("t".to_string()))) + Expr::Const(1.0);
        assert!(expr.contains_variable("t"));
        assert!(!expr.contains_variable("x"));
    }
}
