//! Linear feasibility programs with integer data.
//!
//! All coefficients, bounds and right-hand sides are integers; only the
//! solution is real-valued. This keeps the exact backend's input exact and
//! lets programs be compared and hashed.

use thiserror::Error;

/// Errors raised while building or solving a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LpError {
    #[error("variable x{var} out of range for a program with {num_vars} variables")]
    UnknownVariable { var: usize, num_vars: usize },
    #[error("variable x{var} has lower bound {lower} above upper bound {upper}")]
    InvertedBounds { var: usize, lower: i64, upper: i64 },
    #[error("objective has {got} coefficients, expected {expected}")]
    ObjectiveLength { got: usize, expected: usize },
    #[error("integer overflow while normalizing constraint {row}")]
    Overflow { row: usize },
}

/// Bounds `lower <= x <= upper`; `upper = None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarBounds {
    pub lower: i64,
    pub upper: Option<i64>,
}

impl VarBounds {
    pub const NONNEGATIVE: VarBounds = VarBounds {
        lower: 0,
        upper: None,
    };
    pub const UNIT: VarBounds = VarBounds {
        lower: 0,
        upper: Some(1),
    };
}

impl Default for VarBounds {
    fn default() -> Self {
        Self::NONNEGATIVE
    }
}

/// `sum(coeff * x[var]) == rhs`, with at most one term per variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EqualityConstraint {
    pub terms: Vec<(usize, i64)>,
    pub rhs: i64,
}

impl EqualityConstraint {
    pub fn coefficient(&self, var: usize) -> i64 {
        self.terms
            .iter()
            .find(|(v, _)| *v == var)
            .map_or(0, |(_, c)| *c)
    }
}

/// Feasibility program: find `x` with `A x = b` and `l <= x <= u`.
///
/// The objective is carried for completeness but never influences a
/// feasibility answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LinearProgram {
    bounds: Vec<VarBounds>,
    constraints: Vec<EqualityConstraint>,
    objective: Vec<i64>,
}

impl LinearProgram {
    /// Program over `num_vars` nonnegative variables with no constraints.
    pub fn new(num_vars: usize) -> Self {
        Self {
            bounds: vec![VarBounds::NONNEGATIVE; num_vars],
            constraints: Vec::new(),
            objective: vec![0; num_vars],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.bounds.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn bounds(&self) -> &[VarBounds] {
        &self.bounds
    }

    pub fn constraints(&self) -> &[EqualityConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[i64] {
        &self.objective
    }

    pub fn set_bounds(&mut self, var: usize, bounds: VarBounds) -> Result<(), LpError> {
        self.check_var(var)?;
        if let Some(upper) = bounds.upper {
            if upper < bounds.lower {
                return Err(LpError::InvertedBounds {
                    var,
                    lower: bounds.lower,
                    upper,
                });
            }
        }
        self.bounds[var] = bounds;
        Ok(())
    }

    /// Add `sum(terms) == rhs`. Repeated variables are merged and zero
    /// coefficients dropped.
    pub fn add_equality(
        &mut self,
        terms: impl IntoIterator<Item = (usize, i64)>,
        rhs: i64,
    ) -> Result<(), LpError> {
        let row = self.constraints.len();
        let mut merged: Vec<(usize, i64)> = Vec::new();
        for (var, coeff) in terms {
            self.check_var(var)?;
            match merged.iter_mut().find(|(v, _)| *v == var) {
                Some((_, c)) => *c = c.checked_add(coeff).ok_or(LpError::Overflow { row })?,
                None => merged.push((var, coeff)),
            }
        }
        merged.retain(|(_, c)| *c != 0);
        merged.sort_unstable_by_key(|(v, _)| *v);
        self.constraints.push(EqualityConstraint { terms: merged, rhs });
        Ok(())
    }

    pub fn set_objective(&mut self, coefficients: Vec<i64>) -> Result<(), LpError> {
        if coefficients.len() != self.num_vars() {
            return Err(LpError::ObjectiveLength {
                got: coefficients.len(),
                expected: self.num_vars(),
            });
        }
        self.objective = coefficients;
        Ok(())
    }

    /// Largest absolute violation of any bound or constraint by `x`.
    ///
    /// Returns infinity if `x` has the wrong length.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        if x.len() != self.num_vars() {
            return f64::INFINITY;
        }
        let mut worst: f64 = 0.0;
        for (value, bounds) in x.iter().zip(&self.bounds) {
            worst = worst.max(bounds.lower as f64 - value);
            if let Some(upper) = bounds.upper {
                worst = worst.max(value - upper as f64);
            }
        }
        for constraint in &self.constraints {
            let lhs: f64 = constraint
                .terms
                .iter()
                .map(|&(var, coeff)| coeff as f64 * x[var])
                .sum();
            worst = worst.max((lhs - constraint.rhs as f64).abs());
        }
        worst
    }

    fn check_var(&self, var: usize) -> Result<(), LpError> {
        if var < self.num_vars() {
            Ok(())
        } else {
            Err(LpError::UnknownVariable {
                var,
                num_vars: self.num_vars(),
            })
        }
    }
}
