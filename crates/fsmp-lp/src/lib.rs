#![doc = include_str!("../README.md")]

//! Linear feasibility checking for fractional matching programs.
//!
//! The graph layer never talks to a numeric backend directly: it builds a
//! [`program::LinearProgram`] and hands it to any
//! [`solver::FeasibilitySolver`].

pub mod backends;
pub mod program;
pub mod scalar;
pub mod solver;

pub use backends::portfolio::PortfolioSolver;
pub use backends::simplex::{ExactSimplex, FloatSimplex, SimplexSolver};
pub use program::{EqualityConstraint, LinearProgram, LpError, VarBounds};
pub use solver::{FeasibilityResult, FeasibilitySolver, Solution};
