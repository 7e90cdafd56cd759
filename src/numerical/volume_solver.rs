//! The compute pipeline of the decision-support system.
//!
//! One user action maps to one `IntegrationRequest` and one run of
//! `VolumeSolver::solve`: validate the request, parse the flow-rate text,
//! sample and integrate with the trapezoidal rule, cross-check against the
//! closed-form integral when one exists, compute the error metric and the
//! demand verdict, and assemble the immutable `IntegrationResult`. Nothing is
//! cached or shared between runs; failures surface as one discriminated
//! `SolverError` and never as partial results.

use crate::numerical::decision::{DecisionVerdict, assess_demand, relative_error_pct};
use crate::numerical::trapezoid::{SampleGrid, trapezoid_rule};
use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::{EvaluationError, Expr};
use log::info;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use thiserror::Error;

/// The single free variable every flow-rate expression is written in.
pub const TIME_VARIABLE: &str = "t";

/// Everything the core needs for one computation: the flow-rate text, the
/// interval bounds, the step size and the demand target. Immutable once
/// built; validation happens before the core is ever invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationRequest {
    pub function_text: String,
    pub a: f64,
    pub b: f64,
    pub h: f64,
    pub demand: f64,
}

/// Input validation failure. Owned by the request boundary; the numerical
/// core never sees a request that fails these checks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("step size must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("start time {0} must be less than end time {1}")]
    InvertedBounds(f64, f64),
    #[error("water demand must be non-negative, got {0}")]
    NegativeDemand(f64),
    #[error("interval is shorter than one step: floor((b - a)/h) < 1")]
    IntervalTooShort,
}

/// The one discriminated failure the caller sees. The presentation layer
/// turns these into user-facing messages; the core only reports structured
/// kinds.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolverError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("flow-rate expression may only depend on 't', found variable '{0}'")]
    ForeignVariable(String),
}

/// The assembled record of one computation, consumed by the presentation
/// layer. `analytic` and `relative_error_pct` are absent (not zero) when the
/// symbolic cross-check is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub volume: f64,
    pub analytic: Option<f64>,
    pub relative_error_pct: Option<f64>,
    pub grid: SampleGrid,
    pub verdict: DecisionVerdict,
}

impl IntegrationRequest {
    pub fn new(function_text: impl Into<String>, a: f64, b: f64, h: f64, demand: f64) -> Self {
        Self {
            function_text: function_text.into(),
            a,
            b,
            h,
            demand,
        }
    }

    /// Checks `h > 0`, `a < b`, `demand >= 0` and that the interval holds at
    /// least one full step.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !(self.h > 0.0) {
            return Err(RequestError::NonPositiveStep(self.h));
        }
        if !(self.a < self.b) {
            return Err(RequestError::InvertedBounds(self.a, self.b));
        }
        if self.demand < 0.0 {
            return Err(RequestError::NegativeDemand(self.demand));
        }
        if ((self.b - self.a) / self.h).floor() < 1.0 {
            return Err(RequestError::IntervalTooShort);
        }
        Ok(())
    }
}

/// Solver object driving one request through the pipeline. Construct, call
/// `solve`, read the result; each instance is independent and holds no state
/// shared with other computations.
pub struct VolumeSolver {
    request: IntegrationRequest,
    loglevel: Option<String>,
    result: Option<IntegrationResult>,
}

impl VolumeSolver {
    pub fn new(request: IntegrationRequest) -> Self {
        Self {
            request,
            loglevel: None,
            result: None,
        }
    }

    /// Like `new`, but initializes a terminal logger on the first `solve`.
    /// Accepted levels: "debug", "info", "warn", "error".
    pub fn with_loglevel(request: IntegrationRequest, loglevel: &str) -> Self {
        Self {
            request,
            loglevel: Some(loglevel.to_string()),
            result: None,
        }
    }

    pub fn solve(&mut self) -> Result<IntegrationResult, SolverError> {
        if let Some(level) = &self.loglevel {
            let log_option = match level.as_str() {
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                _ => panic!("loglevel must be debug, info, warn or error"),
            };
            // a second init (another solver in the same process) is fine
            let _ = CombinedLogger::init(vec![TermLogger::new(
                log_option,
                Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]);
        }
        let result = self.run()?;
        self.result = Some(result.clone());
        Ok(result)
    }

    pub fn get_result(&self) -> Option<&IntegrationResult> {
        self.result.as_ref()
    }

    fn run(&self) -> Result<IntegrationResult, SolverError> {
        let IntegrationRequest { a, b, h, demand, .. } = self.request;
        self.request.validate()?;

        let expr = Expr::parse_expression(&self.request.function_text)?;
        for name in expr.variables() {
            if name != TIME_VARIABLE {
                return Err(SolverError::ForeignVariable(name));
            }
        }
        info!("integrating F(t) = {} over [{}, {}] with h = {}", expr, a, b, h);

        let (volume, grid) = trapezoid_rule(&expr, TIME_VARIABLE, a, b, h)?;
        info!(
            "trapezoidal volume over {} subintervals: {:.4}",
            grid.subintervals(),
            volume
        );

        let analytic = expr.definite_integral(TIME_VARIABLE, a, b);
        if analytic.is_none() {
            info!("no closed-form integral for {}; skipping the cross-check", expr);
        }
        let relative_error_pct = relative_error_pct(volume, analytic);
        let verdict = assess_demand(volume, demand);
        info!(
            "demand {:.2} is {}",
            demand,
            if verdict.met { "met" } else { "not met" }
        );

        Ok(IntegrationResult {
            volume,
            analytic,
            relative_error_pct,
            grid,
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solve(request: IntegrationRequest) -> Result<IntegrationResult, SolverError> {
        VolumeSolver::new(request).solve()
    }

    #[test]
    fn test_constant_flow_misses_demand() {
        let result = solve(IntegrationRequest::new("20", 0.0, 10.0, 0.1, 500.0)).unwrap();
        assert_relative_eq!(result.volume, 200.0, max_relative = 1e-12);
        assert_relative_eq!(result.analytic.unwrap(), 200.0, max_relative = 1e-12);
        assert_relative_eq!(result.relative_error_pct.unwrap(), 0.0, epsilon = 1e-9);
        assert!(!result.verdict.met);
        assert_eq!(result.verdict.demand, 500.0);
    }

    #[test]
    fn test_linear_flow_matches_analytic_value() {
        let result = solve(IntegrationRequest::new("3*t + 2", 0.0, 10.0, 0.1, 100.0)).unwrap();
        assert_relative_eq!(result.volume, 170.0, max_relative = 1e-10);
        assert_relative_eq!(result.analytic.unwrap(), 170.0, max_relative = 1e-10);
        assert!(result.verdict.met);
    }

    #[test]
    fn test_grid_is_part_of_the_result() {
        let result = solve(IntegrationRequest::new("t", 0.0, 1.0, 0.25, 0.0)).unwrap();
        assert_eq!(result.grid.len(), 5);
        assert_eq!(result.grid.nodes[0], 0.0);
        assert_eq!(result.grid.nodes[4], 1.0);
    }

    #[test]
    fn test_analytic_absent_error_absent_not_zero() {
        let result = solve(IntegrationRequest::new("exp(t^2)", 0.0, 1.0, 0.1, 10.0)).unwrap();
        assert_eq!(result.analytic, None);
        assert_eq!(result.relative_error_pct, None);
    }

    #[test]
    fn test_zero_analytic_value_disables_error_metric() {
        // ∫ sin(t) over a full period is exactly 0 analytically
        let result = solve(IntegrationRequest::new(
            "sin(t)",
            0.0,
            2.0 * std::f64::consts::PI,
            0.01,
            1.0,
        ))
        .unwrap();
        if result.analytic == Some(0.0) {
            assert_eq!(result.relative_error_pct, None);
        }
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let err = solve(IntegrationRequest::new("t", 0.0, 10.0, 0.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            SolverError::Request(RequestError::NonPositiveStep(0.0))
        );
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = solve(IntegrationRequest::new("t", 10.0, 0.0, 0.1, 1.0)).unwrap_err();
        assert_eq!(
            err,
            SolverError::Request(RequestError::InvertedBounds(10.0, 0.0))
        );
    }

    #[test]
    fn test_rejects_negative_demand() {
        let err = solve(IntegrationRequest::new("t", 0.0, 10.0, 0.1, -5.0)).unwrap_err();
        assert_eq!(
            err,
            SolverError::Request(RequestError::NegativeDemand(-5.0))
        );
    }

    #[test]
    fn test_rejects_interval_shorter_than_one_step() {
        let err = solve(IntegrationRequest::new("t", 0.0, 1.0, 2.0, 1.0)).unwrap_err();
        assert_eq!(err, SolverError::Request(RequestError::IntervalTooShort));
    }

    #[test]
    fn test_malformed_text_is_a_parse_error() {
        let err = solve(IntegrationRequest::new("(t + 2", 0.0, 10.0, 0.1, 1.0)).unwrap_err();
        assert!(matches!(err, SolverError::Parse(_)));
    }

    #[test]
    fn test_foreign_variable_is_rejected() {
        let err = solve(IntegrationRequest::new("t + x", 0.0, 10.0, 0.1, 1.0)).unwrap_err();
        assert_eq!(err, SolverError::ForeignVariable("x".to_string()));
    }

    #[test]
    fn test_evaluation_failure_is_fatal_for_the_request() {
        // ln(t) is undefined at the node t = 0
        let err = solve(IntegrationRequest::new("ln(t)", 0.0, 10.0, 0.1, 1.0)).unwrap_err();
        assert!(matches!(err, SolverError::Evaluation(_)));
    }

    #[test]
    fn test_solver_stores_the_result() {
        let mut solver = VolumeSolver::new(IntegrationRequest::new("20", 0.0, 10.0, 0.1, 500.0));
        assert!(solver.get_result().is_none());
        let returned = solver.solve().unwrap();
        assert_eq!(solver.get_result(), Some(&returned));
    }

    #[test]
    fn test_identical_requests_give_identical_results() {
        let request = IntegrationRequest::new("2*t**2 + 4*t + 6", 0.0, 10.0, 0.1, 500.0);
        let first = solve(request.clone()).unwrap();
        let second = solve(request).unwrap();
        assert_eq!(first, second);
    }
}
