//! Ready-made irrigation scenarios for demos and manual testing. Each preset
//! expands to a fully validated `IntegrationRequest`; iterate over the enum to
//! run the whole catalogue.

use crate::numerical::volume_solver::IntegrationRequest;
use strum_macros::EnumIter;

/// Flow-rate scenarios shipped with the crate. All use h = 0.1 and a demand
/// of 500 cubic meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FlowPreset {
    /// F(t) = 20 over [0, 10], a pump running at a fixed rate
    ConstantFlow,
    /// F(t) = 3*t + 2 over [0, 10], a valve opening linearly
    LinearRamp,
    /// F(t) = sin(t) over one period [0, 6.2832]
    Sinusoidal,
    /// F(t) = exp(t) over [0, 2]
    ExponentialGrowth,
}

impl FlowPreset {
    pub fn request(&self) -> IntegrationRequest {
        match self {
            FlowPreset::ConstantFlow => IntegrationRequest::new("20", 0.0, 10.0, 0.1, 500.0),
            FlowPreset::LinearRamp => IntegrationRequest::new("3*t + 2", 0.0, 10.0, 0.1, 500.0),
            FlowPreset::Sinusoidal => IntegrationRequest::new("sin(t)", 0.0, 6.2832, 0.1, 500.0),
            FlowPreset::ExponentialGrowth => IntegrationRequest::new("exp(t)", 0.0, 2.0, 0.1, 500.0),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FlowPreset::ConstantFlow => "constant flow rate from a fixed-speed pump",
            FlowPreset::LinearRamp => "linearly increasing flow as a valve opens",
            FlowPreset::Sinusoidal => "oscillating flow over one full period",
            FlowPreset::ExponentialGrowth => "exponentially growing flow",
        }
    }
}
