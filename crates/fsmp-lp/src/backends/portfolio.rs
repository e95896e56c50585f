//! Two-backend portfolio: a fast primary backend answers, and every answer
//! other than `Feasible` is re-checked by a confirming backend.
//!
//! A feasible point from the primary is already verified against the
//! program's residual, so it is accepted as is. `Infeasible` is only
//! reported when both backends agree; a disagreement is `Unknown`.

use tracing::warn;

use crate::program::LinearProgram;
use crate::solver::{FeasibilityResult, FeasibilitySolver};

#[derive(Debug, Clone, Default)]
pub struct PortfolioSolver<P, C> {
    primary: P,
    confirm: C,
}

impl<P, C> PortfolioSolver<P, C> {
    pub fn new(primary: P, confirm: C) -> Self {
        Self { primary, confirm }
    }
}

impl<P, C> FeasibilitySolver for PortfolioSolver<P, C>
where
    P: FeasibilitySolver,
    C: FeasibilitySolver<Error = P::Error>,
{
    type Error = P::Error;

    fn name(&self) -> &'static str {
        "portfolio"
    }

    fn solve(&self, program: &LinearProgram) -> Result<FeasibilityResult, Self::Error> {
        let first = self.primary.solve(program)?;
        if first.is_feasible() {
            return Ok(first);
        }
        let second = self.confirm.solve(program)?;
        Ok(merge(
            self.primary.name(),
            first,
            self.confirm.name(),
            second,
        ))
    }
}

fn merge(
    primary_name: &str,
    primary: FeasibilityResult,
    confirm_name: &str,
    confirm: FeasibilityResult,
) -> FeasibilityResult {
    match (primary, confirm) {
        (FeasibilityResult::Infeasible, FeasibilityResult::Infeasible) => {
            FeasibilityResult::Infeasible
        }
        (FeasibilityResult::Infeasible, FeasibilityResult::Feasible(_)) => {
            warn!(
                primary = primary_name,
                confirm = confirm_name,
                "feasibility backends disagree"
            );
            FeasibilityResult::Unknown(format!(
                "portfolio disagreement: {primary_name} reported infeasible, \
                 {confirm_name} found a feasible point"
            ))
        }
        (FeasibilityResult::Infeasible, FeasibilityResult::Unknown(reason)) => {
            FeasibilityResult::Unknown(format!(
                "{confirm_name} could not confirm infeasibility: {reason}"
            ))
        }
        (FeasibilityResult::Unknown(first), FeasibilityResult::Unknown(second)) => {
            FeasibilityResult::Unknown(format!(
                "{primary_name}: {first}; {confirm_name}: {second}"
            ))
        }
        (FeasibilityResult::Unknown(_), decided) => decided,
        (FeasibilityResult::Feasible(solution), _) => FeasibilityResult::Feasible(solution),
    }
}
