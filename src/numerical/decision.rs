//! Demand verdict and error metric of the decision-support step.

/// Outcome of comparing the computed volume against the required water
/// demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionVerdict {
    pub met: bool,
    pub demand: f64,
}

/// Relative error of the trapezoidal volume against the analytic reference,
/// as a percentage.
///
/// `None` when the analytic value is absent, and also when it is exactly
/// zero: the quotient is undefined there and the metric is reported as
/// unavailable rather than raised. Never collapses "unavailable" into `0%`.
pub fn relative_error_pct(volume: f64, analytic: Option<f64>) -> Option<f64> {
    let exact = analytic?;
    if exact == 0.0 {
        return None;
    }
    Some((volume - exact).abs() / exact.abs() * 100.0)
}

/// The demand is met when the accumulated volume reaches the target.
pub fn assess_demand(volume: f64, demand: f64) -> DecisionVerdict {
    DecisionVerdict {
        met: volume >= demand,
        demand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_error_value() {
        let error = relative_error_pct(202.0, Some(200.0)).unwrap();
        assert_relative_eq!(error, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_relative_error_is_symmetric_in_sign() {
        let below = relative_error_pct(198.0, Some(200.0)).unwrap();
        let above = relative_error_pct(202.0, Some(200.0)).unwrap();
        assert_relative_eq!(below, above, max_relative = 1e-12);
    }

    #[test]
    fn test_relative_error_absent_without_analytic_value() {
        assert_eq!(relative_error_pct(200.0, None), None);
    }

    #[test]
    fn test_relative_error_absent_for_zero_analytic_value() {
        // division-by-zero guard: unavailable, not a panic and not 0%
        assert_eq!(relative_error_pct(0.001, Some(0.0)), None);
    }

    #[test]
    fn test_demand_not_met() {
        let verdict = assess_demand(200.0, 500.0);
        assert!(!verdict.met);
        assert_eq!(verdict.demand, 500.0);
    }

    #[test]
    fn test_demand_met_exactly_at_threshold() {
        assert!(assess_demand(500.0, 500.0).met);
        assert!(assess_demand(500.1, 500.0).met);
    }
}
