//! The float and exact simplex backends must agree on small integer
//! programs, and every reported point must satisfy the program.

use proptest::prelude::*;

use fsmp_lp::{
    ExactSimplex, FeasibilityResult, FeasibilitySolver, FloatSimplex, LinearProgram,
    PortfolioSolver, VarBounds,
};

fn arb_program() -> impl Strategy<Value = LinearProgram> {
    (1usize..=4, 1usize..=3).prop_flat_map(|(vars, rows)| {
        let row = (proptest::collection::vec(-3i64..=3, vars), -4i64..=4);
        let bounds = proptest::collection::vec(
            prop_oneof![Just(VarBounds::NONNEGATIVE), Just(VarBounds::UNIT)],
            vars,
        );
        (
            Just(vars),
            proptest::collection::vec(row, rows),
            bounds,
        )
            .prop_map(|(vars, rows, bounds)| {
                let mut lp = LinearProgram::new(vars);
                for (var, b) in bounds.into_iter().enumerate() {
                    lp.set_bounds(var, b).unwrap();
                }
                for (coeffs, rhs) in rows {
                    lp.add_equality(coeffs.into_iter().enumerate(), rhs).unwrap();
                }
                lp
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn float_and_exact_agree(lp in arb_program()) {
        let float = FloatSimplex::new().solve(&lp).unwrap();
        let exact = ExactSimplex::new().solve(&lp).unwrap();

        prop_assert!(!matches!(exact, FeasibilityResult::Unknown(_)), "exact backend undecided");
        if !matches!(float, FeasibilityResult::Unknown(_)) {
            prop_assert_eq!(float.is_feasible(), exact.is_feasible());
        }
        for result in [&float, &exact] {
            if let Some(solution) = result.solution() {
                prop_assert!(lp.max_violation(&solution.values) <= 1e-6);
            }
        }
    }

    #[test]
    fn portfolio_matches_exact(lp in arb_program()) {
        let portfolio = PortfolioSolver::new(FloatSimplex::new(), ExactSimplex::new());
        let merged = portfolio.solve(&lp).unwrap();
        let exact = ExactSimplex::new().solve(&lp).unwrap();
        prop_assert_eq!(merged.is_feasible(), exact.is_feasible());
        prop_assert_eq!(merged.is_infeasible(), exact.is_infeasible());
    }
}

#[test]
fn pendant_vertex_forces_its_edge() {
    // Triangle 0-1-2 with pendant 3 on vertex 0.
    // Vertex 3 forces x03 = 1, so x01 = x20 = 0 and vertex 1 needs x12 = 1,
    // which also covers vertex 2. Feasible; dropping edge 12 breaks it.
    let build = |edges: &[(usize, usize)]| {
        let mut lp = LinearProgram::new(edges.len());
        for var in 0..edges.len() {
            lp.set_bounds(var, VarBounds::UNIT).unwrap();
        }
        for vertex in 0..4 {
            let terms = edges
                .iter()
                .enumerate()
                .filter(|(_, edge)| edge.0 == vertex || edge.1 == vertex)
                .map(|(var, _)| (var, 1));
            lp.add_equality(terms, 1).unwrap();
        }
        lp
    };
    let with_chord = build(&[(0, 1), (1, 2), (2, 0), (0, 3)]);
    let without = build(&[(0, 1), (2, 0), (0, 3)]);
    assert!(FloatSimplex::new().solve(&with_chord).unwrap().is_feasible());
    assert!(ExactSimplex::new().solve(&with_chord).unwrap().is_feasible());
    assert!(FloatSimplex::new().solve(&without).unwrap().is_infeasible());
    assert!(ExactSimplex::new().solve(&without).unwrap().is_infeasible());
}
