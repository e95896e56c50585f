use crate::program::LinearProgram;

/// Result of a feasibility check.
#[derive(Debug, Clone, PartialEq)]
pub enum FeasibilityResult {
    Feasible(Solution),
    Infeasible,
    /// The backend could not decide; the reason is human-readable.
    Unknown(String),
}

impl FeasibilityResult {
    pub fn is_feasible(&self) -> bool {
        matches!(self, FeasibilityResult::Feasible(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, FeasibilityResult::Infeasible)
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            FeasibilityResult::Feasible(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A feasible point, one value per program variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: Vec<f64>,
}

impl Solution {
    pub fn value(&self, var: usize) -> Option<f64> {
        self.values.get(var).copied()
    }
}

/// Abstract feasibility backend.
///
/// Implementations must be usable from several worker threads at once, so
/// `solve` takes `&self` and keeps any scratch state local to the call.
pub trait FeasibilitySolver: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short backend name for logs and reports.
    fn name(&self) -> &'static str;

    /// Decide whether `program` has a feasible point.
    fn solve(&self, program: &LinearProgram) -> Result<FeasibilityResult, Self::Error>;
}

impl<T: FeasibilitySolver + ?Sized> FeasibilitySolver for &T {
    type Error = T::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, program: &LinearProgram) -> Result<FeasibilityResult, Self::Error> {
        (**self).solve(program)
    }
}
