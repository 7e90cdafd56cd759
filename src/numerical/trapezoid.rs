//! Composite trapezoidal rule over a sampled grid.
//!
//! The step parameter `h` only derives the subinterval count
//! `n = floor((b - a)/h)`; the grid itself spans `[a, b]` with `n + 1` evenly
//! spaced nodes and the formula uses the actual node spacing
//! `h_eff = (b - a)/n`. When `(b - a)` is not an exact multiple of `h` the two
//! differ, and using the raw `h` would integrate a different width than the
//! one that was sampled.

use crate::symbolic::symbolic_engine::{EvaluationError, Expr};
use nalgebra::DVector;

/// The sampled grid of one computation: `n + 1` node positions `t_0..t_n`
/// and the corresponding function values `y_0..y_n`. Owned by the current
/// computation; also handed to external renderers for the trapezoid plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    pub nodes: DVector<f64>,
    pub values: DVector<f64>,
}

impl SampleGrid {
    /// Number of grid points (`n + 1`).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of trapezoids (`n`).
    pub fn subintervals(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

/// Integrates `expr` over `[a, b]` with the composite trapezoidal rule and
/// returns the approximate volume together with the sampled grid.
///
/// The caller must have validated the request: `a < b`, `h > 0` and
/// `floor((b - a)/h) >= 1`. Any node where the function value is not finite
/// aborts the whole call; no partial grid is returned. Deterministic, O(n)
/// time and space.
pub fn trapezoid_rule(
    expr: &Expr,
    var: &str,
    a: f64,
    b: f64,
    h: f64,
) -> Result<(f64, SampleGrid), EvaluationError> {
    let n = ((b - a) / h).floor() as usize;
    debug_assert!(n >= 1, "caller must reject intervals shorter than one step");

    let h_eff = (b - a) / n as f64;
    let f = expr.lambdify1D();

    let mut nodes = DVector::zeros(n + 1);
    let mut values = DVector::zeros(n + 1);
    for i in 0..=n {
        // the last node lands on b exactly rather than accumulating rounding
        let t = if i == n { b } else { a + i as f64 * h_eff };
        let y = f(t);
        if !y.is_finite() {
            return Err(EvaluationError {
                var: var.to_string(),
                at: t,
            });
        }
        nodes[i] = t;
        values[i] = y;
    }

    let inner_sum: f64 = values.rows(1, n - 1).sum();
    let volume = (h_eff / 2.0) * (values[0] + 2.0 * inner_sum + values[n]);

    Ok((volume, SampleGrid { nodes, values }))
}
