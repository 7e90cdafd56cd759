//! SYMBOLIC INTEGRATION
//!
//! Rule-based closed-form integration used as the best-effort cross-check for
//! the trapezoidal engine. The rule table covers what a flow-rate function is
//! realistically written with: polynomials, exponentials and logarithms of
//! linear arguments, sines and cosines of linear arguments. Everything else
//! reports `UnsupportedIntegral`, a normal outcome (the primary trapezoidal
//! result never depends on it).

use crate::symbolic::symbolic_engine::Expr;
use thiserror::Error;

/// The expression has no antiderivative within the rule table (or none in
/// elementary terms at all). Not a pipeline failure; the analytic reference
/// is simply reported as absent.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("no elementary antiderivative rule for {0}")]
pub struct UnsupportedIntegral(pub String);

impl Expr {
    /// Main integration method - integrates with respect to a variable.
    /// Returns the indefinite integral (without constant of integration).
    pub fn antiderivative(&self, var: &str) -> Result<Expr, UnsupportedIntegral> {
        match self {
            // ∫ c dt = c*t
            Expr::Const(c) => Ok(Expr::Const(*c) * Expr::Var(var.to_string())),

            // ∫ t dt = t²/2
            Expr::Var(name) => {
                if name == var {
                    Ok(Expr::Pow(
                        Box::new(Expr::Var(var.to_string())),
                        Box::new(Expr::Const(2.0)),
                    ) / Expr::Const(2.0))
                } else {
                    // a foreign symbol integrates like a constant
                    Ok(Expr::Var(name.clone()) * Expr::Var(var.to_string()))
                }
            }

            // ∫ (f + g) dt = ∫ f dt + ∫ g dt
            Expr::Add(lhs, rhs) => {
                let lhs_int = lhs.antiderivative(var)?;
                let rhs_int = rhs.antiderivative(var)?;
                Ok(lhs_int + rhs_int)
            }

            // ∫ (f - g) dt = ∫ f dt - ∫ g dt
            Expr::Sub(lhs, rhs) => {
                let lhs_int = lhs.antiderivative(var)?;
                let rhs_int = rhs.antiderivative(var)?;
                Ok(lhs_int - rhs_int)
            }

            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),

            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),

            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),

            Expr::Exp(inner) => self.integrate_exponential(inner, var),

            Expr::Ln(inner) => self.integrate_logarithm(inner, var),

            Expr::Sin(inner) => self.integrate_sin(inner, var),

            Expr::Cos(inner) => self.integrate_cos(inner, var),

            Expr::Tan(inner) => self.integrate_tan(inner, var),
        }
    }

    /// Definite integration using the fundamental theorem of calculus.
    ///
    /// Returns `None` when no antiderivative rule applies or when the boundary
    /// evaluation does not yield a finite real number. This is the "analytic
    /// unavailable" outcome, distinct from every error kind.
    pub fn definite_integral(&self, var: &str, lower: f64, upper: f64) -> Option<f64> {
        let indefinite = self.antiderivative(var).ok()?;
        let upper_val = indefinite.eval_at(var, upper).ok()?;
        let lower_val = indefinite.eval_at(var, lower).ok()?;
        let value = upper_val - lower_val;
        value.is_finite().then_some(value)
    }

    /// Factors constants out of products; general products are unsupported.
    fn integrate_multiplication(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        var: &str,
    ) -> Result<Expr, UnsupportedIntegral> {
        if !lhs.contains_variable(var) {
            let rhs_int = rhs.antiderivative(var)?;
            return Ok(lhs.clone() * rhs_int);
        }

        if !rhs.contains_variable(var) {
            let lhs_int = lhs.antiderivative(var)?;
            return Ok(rhs.clone() * lhs_int);
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// Handle division: constant denominators and ∫ c/t dt = c*ln(t).
    fn integrate_division(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        var: &str,
    ) -> Result<Expr, UnsupportedIntegral> {
        // ∫ f(t)/c dt = (1/c) * ∫ f(t) dt
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.antiderivative(var)?;
            return Ok(lhs_int / rhs.clone());
        }

        // ∫ c/t dt = c*ln(t)
        if !lhs.contains_variable(var) {
            if let Expr::Var(x) = rhs {
                if x == var {
                    return Ok(lhs.clone() * Expr::Ln(Box::new(Expr::Var(var.to_string()))));
                }
            }
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// Handle power integration.
    fn integrate_power(
        &self,
        base: &Expr,
        exp: &Expr,
        var: &str,
    ) -> Result<Expr, UnsupportedIntegral> {
        // ∫ t^n dt where n is constant
        if let (Expr::Var(x), Expr::Const(n)) = (base, exp) {
            if x == var {
                if (*n - (-1.0)).abs() < f64::EPSILON {
                    // ∫ t^(-1) dt = ln(t)
                    return Ok(Expr::Ln(Box::new(Expr::Var(var.to_string()))));
                } else {
                    // ∫ t^n dt = t^(n+1)/(n+1)
                    let new_exp = Expr::Const(n + 1.0);
                    return Ok(Expr::Pow(
                        Box::new(Expr::Var(var.to_string())),
                        Box::new(new_exp.clone()),
                    ) / new_exp);
                }
            }
        }

        // ∫ c^t dt = c^t / ln(c) where c is a positive constant
        if let (Expr::Const(c), Expr::Var(x)) = (base, exp) {
            if x == var && *c > 0.0 && (*c - 1.0).abs() > f64::EPSILON {
                return Ok(Expr::Pow(
                    Box::new(Expr::Const(*c)),
                    Box::new(Expr::Var(var.to_string())),
                ) / Expr::Ln(Box::new(Expr::Const(*c))));
            }
        }

        // base and exponent both free of the variable: a constant
        if !base.contains_variable(var) && !exp.contains_variable(var) {
            return Ok(self.clone() * Expr::Var(var.to_string()));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// ∫ exp(a*t + b) dt = exp(a*t + b) / a
    fn integrate_exponential(&self, inner: &Expr, var: &str) -> Result<Expr, UnsupportedIntegral> {
        if let Some((a, _)) = inner.linear_in(var) {
            if a == 0.0 {
                return Ok(self.clone() * Expr::Var(var.to_string()));
            }
            return Ok(Expr::Exp(Box::new(inner.clone())) / Expr::Const(a));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// ∫ ln(t) dt = t*ln(t) - t (integration by parts)
    fn integrate_logarithm(&self, inner: &Expr, var: &str) -> Result<Expr, UnsupportedIntegral> {
        if let Expr::Var(x) = inner {
            if x == var {
                let t = Expr::Var(var.to_string());
                return Ok(t.clone() * Expr::Ln(Box::new(t.clone())) - t);
            }
        }

        if !inner.contains_variable(var) {
            return Ok(self.clone() * Expr::Var(var.to_string()));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// ∫ sin(a*t + b) dt = -cos(a*t + b) / a
    fn integrate_sin(&self, inner: &Expr, var: &str) -> Result<Expr, UnsupportedIntegral> {
        if let Some((a, _)) = inner.linear_in(var) {
            if a == 0.0 {
                return Ok(self.clone() * Expr::Var(var.to_string()));
            }
            return Ok(-Expr::Cos(Box::new(inner.clone())) / Expr::Const(a));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// ∫ cos(a*t + b) dt = sin(a*t + b) / a
    fn integrate_cos(&self, inner: &Expr, var: &str) -> Result<Expr, UnsupportedIntegral> {
        if let Some((a, _)) = inner.linear_in(var) {
            if a == 0.0 {
                return Ok(self.clone() * Expr::Var(var.to_string()));
            }
            return Ok(Expr::Sin(Box::new(inner.clone())) / Expr::Const(a));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// ∫ tan(a*t + b) dt = -ln(cos(a*t + b)) / a
    fn integrate_tan(&self, inner: &Expr, var: &str) -> Result<Expr, UnsupportedIntegral> {
        if let Some((a, _)) = inner.linear_in(var) {
            if a == 0.0 {
                return Ok(self.clone() * Expr::Var(var.to_string()));
            }
            return Ok(-Expr::Cos(Box::new(inner.clone())).ln() / Expr::Const(a));
        }

        Err(UnsupportedIntegral(self.to_string()))
    }

    /// Recognizes expressions of the form `a*var + b` with constant `a`, `b`
    /// and returns the coefficients. Drives the exp/sin/cos/tan rules.
    fn linear_in(&self, var: &str) -> Option<(f64, f64)> {
        match self {
            Expr::Var(name) if name == var => Some((1.0, 0.0)),
            Expr::Const(c) => Some((0.0, *c)),
            Expr::Add(lhs, rhs) => {
                let (a1, b1) = lhs.linear_in(var)?;
                let (a2, b2) = rhs.linear_in(var)?;
                Some((a1 + a2, b1 + b2))
            }
            Expr::Sub(lhs, rhs) => {
                let (a1, b1) = lhs.linear_in(var)?;
                let (a2, b2) = rhs.linear_in(var)?;
                Some((a1 - a2, b1 - b2))
            }
            Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(c), other) | (other, Expr::Const(c)) => {
                    let (a, b) = other.linear_in(var)?;
                    Some((c * a, c * b))
                }
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    /// Antiderivative correctness is checked numerically: F(b) - F(a) must
    /// match the known integral value.
    fn definite(input: &str, lower: f64, upper: f64) -> Option<f64> {
        Expr::parse_expression(input)
            .unwrap()
            .definite_integral("t", lower, upper)
    }

    #[test]
    fn test_integrate_constant() {
        // ∫ 5 dt over [0, 4] = 20
        assert_relative_eq!(definite("5", 0.0, 4.0).unwrap(), 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_integrate_variable() {
        // ∫ t dt over [0, 10] = 50
        assert_relative_eq!(
            definite("t", 0.0, 10.0).unwrap(),
            50.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_linear_flow() {
        // ∫ (3t + 2) dt over [0, 10] = 170
        assert_relative_eq!(
            definite("3*t + 2", 0.0, 10.0).unwrap(),
            170.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_square() {
        // ∫ t² dt over [0, 10] = 1000/3
        assert_relative_eq!(
            definite("t^2", 0.0, 10.0).unwrap(),
            1000.0 / 3.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_reciprocal() {
        // ∫ 1/t dt over [1, e] = 1
        assert_relative_eq!(definite("1/t", 1.0, E).unwrap(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_integrate_exponential() {
        // ∫ exp(t) dt over [0, 2] = e² - 1
        assert_relative_eq!(
            definite("exp(t)", 0.0, 2.0).unwrap(),
            E * E - 1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_exponential_linear_argument() {
        // ∫ exp(2t + 1) dt over [0, 1] = (e³ - e)/2
        assert_relative_eq!(
            definite("exp(2*t + 1)", 0.0, 1.0).unwrap(),
            (E.powi(3) - E) / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_sin_over_half_period() {
        // ∫ sin(t) dt over [0, π] = 2
        assert_relative_eq!(
            definite("sin(t)", 0.0, PI).unwrap(),
            2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_cos_scaled_argument() {
        // ∫ cos(2t) dt over [0, π/4] = 1/2
        assert_relative_eq!(
            definite("cos(2*t)", 0.0, PI / 4.0).unwrap(),
            0.5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_natural_log() {
        // ∫ ln(t) dt over [1, e] = 1
        assert_relative_eq!(
            definite("ln(t)", 1.0, E).unwrap(),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_sqrt() {
        // ∫ sqrt(t) dt over [0, 4] = 16/3
        assert_relative_eq!(
            definite("sqrt(t)", 0.0, 4.0).unwrap(),
            16.0 / 3.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_integrate_constant_base_power() {
        // ∫ 2^t dt over [0, 3] = 7/ln(2)
        assert_relative_eq!(
            definite("2^t", 0.0, 3.0).unwrap(),
            7.0 / 2.0_f64.ln(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_non_elementary_integrand_is_absent() {
        // exp(t²) has no elementary antiderivative
        assert_eq!(definite("exp(t^2)", 0.0, 1.0), None);
    }

    #[test]
    fn test_general_product_is_absent() {
        assert_eq!(definite("t * sin(t)", 0.0, 1.0), None);
    }

    #[test]
    fn test_non_finite_boundary_value_is_absent() {
        // antiderivative of 1/t is ln(t), undefined at 0
        assert_eq!(definite("1/t", 0.0, 1.0), None);
    }

    #[test]
    fn test_antiderivative_error_names_the_expression() {
        let expr = Expr::parse_expression("exp(t^2)").unwrap();
        let err = expr.antiderivative("t").unwrap_err();
        assert!(err.0.contains("exp"));
    }

    #[test]
    fn test_linear_recognition_drives_trig_rule() {
        // ∫ sin(3t - 1) dt over [a, b] = (cos(3a - 1) - cos(3b - 1))/3
        let (a, b): (f64, f64) = (0.5, 2.0);
        let expected = ((3.0 * a - 1.0).cos() - (3.0 * b - 1.0).cos()) / 3.0;
        assert_relative_eq!(
            definite("sin(3*t - 1)", a, b).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }
}
