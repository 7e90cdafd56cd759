//MIT License
//! # Numerical layer
//! the trapezoidal integration engine, the demand decision evaluator and the
//! solver that wires the whole compute pipeline together
pub mod decision;
pub mod examples_and_utils;
pub mod trapezoid;
pub mod volume_solver;
