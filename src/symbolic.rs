//MIT License
//! # Symbolic expression layer
//! a module that
//! 1) turns a String expression into a symbolic expression tree
//! 2) evaluates the tree at arbitrary real points, or compiles it into a Rust closure
//! 3) attempts a closed-form antiderivative for the analytic cross-check
//!
//! # Example
//! ```
//! use trapflow::symbolic::symbolic_engine::Expr;
//! let expr = Expr::parse_expression("3*t + 2").unwrap();
//! let f = expr.lambdify1D();
//! assert_eq!(f(4.0), 14.0);
//! let exact = expr.definite_integral("t", 0.0, 10.0).unwrap();
//! assert!((exact - 170.0).abs() < 1e-9);
//! ```
pub mod parse_expr;
pub mod symbolic_engine;
pub mod symbolic_integration;
