//! Dense phase-one simplex with Bland's rule.
//!
//! The program is brought to standard form `A y = b, y >= 0, b >= 0` by
//! shifting every variable by its lower bound, turning explicit upper bounds
//! into slack rows, and flipping rows with a negative right-hand side. One
//! artificial column per row gives the starting basis; minimizing the sum of
//! artificials decides feasibility. Bland's rule (lowest entering index,
//! lowest basic index on ratio ties) rules out cycling.
//!
//! Upper bounds implied by an equality row whose coefficients are all
//! nonnegative are dropped before the tableau is built. For fractional
//! matching programs this removes every `x_e <= 1` row.

use std::marker::PhantomData;

use num::BigRational;
use tracing::trace;

use crate::program::{LinearProgram, LpError};
use crate::scalar::Scalar;
use crate::solver::{FeasibilityResult, FeasibilitySolver, Solution};

/// Simplex backend over `f64` with tolerance-aware pivoting.
pub type FloatSimplex = SimplexSolver<f64>;

/// Simplex backend over arbitrary-precision rationals.
pub type ExactSimplex = SimplexSolver<BigRational>;

/// Default bound on pivots, as a multiple of `rows + columns`.
const PIVOTS_PER_DIMENSION: usize = 50;

/// Residual above which a float solution is not trusted.
const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct SimplexSolver<S> {
    max_pivots: Option<usize>,
    residual_tolerance: f64,
    _scalar: PhantomData<fn() -> S>,
}

impl<S> Default for SimplexSolver<S> {
    fn default() -> Self {
        Self {
            max_pivots: None,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            _scalar: PhantomData,
        }
    }
}

impl<S: Scalar> SimplexSolver<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up with `Unknown` after `limit` pivots.
    pub fn with_max_pivots(mut self, limit: usize) -> Self {
        self.max_pivots = Some(limit);
        self
    }

    pub fn with_residual_tolerance(mut self, tolerance: f64) -> Self {
        self.residual_tolerance = tolerance;
        self
    }
}

impl<S: Scalar> FeasibilitySolver for SimplexSolver<S> {
    type Error = LpError;

    fn name(&self) -> &'static str {
        if S::EXACT {
            "exact-simplex"
        } else {
            "float-simplex"
        }
    }

    fn solve(&self, program: &LinearProgram) -> Result<FeasibilityResult, LpError> {
        let standard = StandardForm::build(program)?;
        let mut tableau = Tableau::<S>::phase_one(&standard);
        let limit = self
            .max_pivots
            .unwrap_or(PIVOTS_PER_DIMENSION * (tableau.rows + tableau.cols).max(1));

        match tableau.optimize(limit) {
            PhaseOutcome::Optimal => {}
            PhaseOutcome::PivotLimit => {
                return Ok(FeasibilityResult::Unknown(format!(
                    "pivot limit of {limit} reached"
                )));
            }
            PhaseOutcome::Unbounded => {
                return Ok(FeasibilityResult::Unknown(
                    "phase-one objective reported unbounded".into(),
                ));
            }
        }
        trace!(
            backend = self.name(),
            pivots = tableau.pivots,
            rows = tableau.rows,
            cols = tableau.cols,
            "phase one finished"
        );

        if tableau.infeasibility().is_positive() {
            return Ok(FeasibilityResult::Infeasible);
        }

        let values = standard.recover(&tableau.structural_values());
        let residual = program.max_violation(&values);
        if residual.is_nan() || residual > self.residual_tolerance {
            return Ok(FeasibilityResult::Unknown(format!(
                "solution residual {residual:e} exceeds tolerance {:e}",
                self.residual_tolerance
            )));
        }
        Ok(FeasibilityResult::Feasible(Solution { values }))
    }
}

/// `A y = b` with `y >= 0` and `b >= 0`.
///
/// Columns `0..num_vars` are the shifted program variables; the remaining
/// columns are slacks of kept upper bounds.
#[derive(Debug)]
struct StandardForm {
    num_vars: usize,
    num_cols: usize,
    rows: Vec<StandardRow>,
    lower: Vec<i64>,
}

#[derive(Debug)]
struct StandardRow {
    terms: Vec<(usize, i64)>,
    rhs: i64,
}

impl StandardForm {
    fn build(program: &LinearProgram) -> Result<Self, LpError> {
        let num_vars = program.num_vars();
        let bounds = program.bounds();
        let lower: Vec<i64> = bounds.iter().map(|b| b.lower).collect();
        let mut rows = Vec::with_capacity(program.num_constraints());

        for (row, constraint) in program.constraints().iter().enumerate() {
            let mut rhs = constraint.rhs;
            for &(var, coeff) in &constraint.terms {
                let shift = coeff
                    .checked_mul(lower[var])
                    .ok_or(LpError::Overflow { row })?;
                rhs = rhs.checked_sub(shift).ok_or(LpError::Overflow { row })?;
            }
            rows.push(StandardRow {
                terms: constraint.terms.clone(),
                rhs,
            });
        }

        let mut num_cols = num_vars;
        for (var, bound) in bounds.iter().enumerate() {
            let Some(upper) = bound.upper else {
                continue;
            };
            if upper < bound.lower {
                return Err(LpError::InvertedBounds {
                    var,
                    lower: bound.lower,
                    upper,
                });
            }
            let width = upper
                .checked_sub(bound.lower)
                .ok_or(LpError::Overflow { row: rows.len() })?;
            if upper_bound_is_implied(&rows, var, width) {
                continue;
            }
            rows.push(StandardRow {
                terms: vec![(var, 1), (num_cols, 1)],
                rhs: width,
            });
            num_cols += 1;
        }

        for (row, standard) in rows.iter_mut().enumerate() {
            if standard.rhs < 0 {
                standard.rhs = standard
                    .rhs
                    .checked_neg()
                    .ok_or(LpError::Overflow { row })?;
                for (_, coeff) in &mut standard.terms {
                    *coeff = coeff.checked_neg().ok_or(LpError::Overflow { row })?;
                }
            }
        }

        Ok(Self {
            num_vars,
            num_cols,
            rows,
            lower,
        })
    }

    fn recover(&self, shifted: &[f64]) -> Vec<f64> {
        (0..self.num_vars)
            .map(|var| self.lower[var] as f64 + shifted[var])
            .collect()
    }
}

/// `y_var <= width` follows from some row `sum(a_j y_j) = b` with every
/// `a_j >= 0` and `a_var > 0`, since then `y_var <= b / a_var`.
fn upper_bound_is_implied(rows: &[StandardRow], var: usize, width: i64) -> bool {
    rows.iter().any(|row| {
        if row.terms.iter().any(|&(_, coeff)| coeff < 0) {
            return false;
        }
        let Some(&(_, coeff)) = row.terms.iter().find(|(v, _)| *v == var) else {
            return false;
        };
        i128::from(row.rhs) <= i128::from(width) * i128::from(coeff)
    })
}

enum PhaseOutcome {
    Optimal,
    PivotLimit,
    Unbounded,
}

/// Row-major tableau. Column `cols` holds the right-hand side; `cost` is the
/// reduced-cost row with `-w` in its last slot.
struct Tableau<S> {
    rows: usize,
    cols: usize,
    structural: usize,
    cells: Vec<S>,
    cost: Vec<S>,
    basis: Vec<usize>,
    pivots: usize,
}

impl<S: Scalar> Tableau<S> {
    fn phase_one(form: &StandardForm) -> Self {
        let rows = form.rows.len();
        let structural = form.num_cols;
        let cols = structural + rows;
        let width = cols + 1;

        let mut cells = vec![S::zero(); rows * width];
        let mut cost = vec![S::zero(); width];
        for (i, row) in form.rows.iter().enumerate() {
            for &(col, coeff) in &row.terms {
                cells[i * width + col] = S::from_i64(coeff);
            }
            cells[i * width + structural + i] = S::from_i64(1);
            cells[i * width + cols] = S::from_i64(row.rhs);

            for &(col, coeff) in &row.terms {
                cost[col] = cost[col].minus(&S::from_i64(coeff));
            }
            cost[cols] = cost[cols].minus(&S::from_i64(row.rhs));
        }

        Self {
            rows,
            cols,
            structural,
            cells,
            cost,
            basis: (structural..cols).collect(),
            pivots: 0,
        }
    }

    fn width(&self) -> usize {
        self.cols + 1
    }

    fn at(&self, row: usize, col: usize) -> &S {
        &self.cells[row * self.width() + col]
    }

    fn optimize(&mut self, limit: usize) -> PhaseOutcome {
        loop {
            // Artificial columns never re-enter once they leave the basis.
            let Some(entering) = (0..self.structural).find(|&j| self.cost[j].is_negative()) else {
                return PhaseOutcome::Optimal;
            };
            let Some(leaving) = self.ratio_test(entering) else {
                return PhaseOutcome::Unbounded;
            };
            if self.pivots >= limit {
                return PhaseOutcome::PivotLimit;
            }
            self.pivot(leaving, entering);
        }
    }

    /// Row minimizing `rhs / a[row][col]` over positive entries, ties broken
    /// by lowest basic column.
    fn ratio_test(&self, col: usize) -> Option<usize> {
        let mut best: Option<(usize, S)> = None;
        for row in 0..self.rows {
            let a = self.at(row, col);
            if !a.is_positive() {
                continue;
            }
            let ratio = self.at(row, self.cols).over(a);
            best = match best {
                None => Some((row, ratio)),
                Some((current, current_ratio)) => {
                    let better = ratio.less_than(&current_ratio)
                        || (!current_ratio.less_than(&ratio)
                            && self.basis[row] < self.basis[current]);
                    if better {
                        Some((row, ratio))
                    } else {
                        Some((current, current_ratio))
                    }
                }
            };
        }
        best.map(|(row, _)| row)
    }

    fn pivot(&mut self, pivot_row: usize, pivot_col: usize) {
        let width = self.width();
        let start = pivot_row * width;

        let divisor = self.cells[start + pivot_col].clone();
        for cell in &mut self.cells[start..start + width] {
            *cell = cell.over(&divisor);
        }
        let normalized: Vec<S> = self.cells[start..start + width].to_vec();

        for row in 0..self.rows {
            if row == pivot_row {
                continue;
            }
            let factor = self.cells[row * width + pivot_col].clone();
            if factor.is_zero() {
                continue;
            }
            let cells = &mut self.cells[row * width..(row + 1) * width];
            eliminate(cells, &normalized, &factor, pivot_col);
        }
        let factor = self.cost[pivot_col].clone();
        if !factor.is_zero() {
            eliminate(&mut self.cost, &normalized, &factor, pivot_col);
        }

        self.basis[pivot_row] = pivot_col;
        self.pivots += 1;
    }

    /// Phase-one objective `w`, the total artificial mass left.
    fn infeasibility(&self) -> S {
        S::zero().minus(&self.cost[self.cols])
    }

    fn structural_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.structural];
        for (row, &col) in self.basis.iter().enumerate() {
            if col < self.structural {
                values[col] = self.at(row, self.cols).to_f64().max(0.0);
            }
        }
        values
    }
}

/// `target -= factor * source`, forcing the pivot column to exactly zero.
fn eliminate<S: Scalar>(target: &mut [S], source: &[S], factor: &S, pivot_col: usize) {
    for (cell, value) in target.iter_mut().zip(source) {
        if !value.is_zero() {
            *cell = cell.minus(&factor.times(value));
        }
    }
    target[pivot_col] = S::zero();
}
