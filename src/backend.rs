use crate::lp::{
    Comparison, LinearExpr, LinearModel, Solution, SolutionStatus, Solver, SolverError,
    SolverOutcome, VarKind,
};
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution as _,
    SolutionStatus as LpStatus, SolverModel, Variable,
};

#[cfg(not(any(feature = "highs", feature = "microlp")))]
compile_error!("enable the `highs` (default) or `microlp` feature");

/// Solveur par défaut : `good_lp` avec HiGHS (lié statiquement), ou le
/// backend pur Rust `microlp` sans la feature `highs`. `microlp` ne tient
/// pas une semaine complète au-delà de quelques personnes.
/// Le problème est reconstruit à chaque appel.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoodLpSolver;

impl Solver for GoodLpSolver {
    fn solve(&self, model: &LinearModel) -> Result<SolverOutcome, SolverError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = model
            .variables()
            .iter()
            .map(|v| {
                let def = match v.kind {
                    VarKind::Binary => variable().binary(),
                    VarKind::Continuous { lower, upper } => match upper {
                        Some(up) => variable().min(lower).max(up),
                        None => variable().min(lower),
                    },
                };
                vars.add(def.name(v.name.clone()))
            })
            .collect();

        let objective = to_expression(model.objective(), &handles);
        #[cfg(feature = "highs")]
        let mut problem = vars.minimise(objective).using(good_lp::highs);
        #[cfg(not(feature = "highs"))]
        let mut problem = vars.minimise(objective).using(good_lp::microlp);
        for c in model.constraints() {
            let lhs = to_expression(&c.lhs, &handles);
            let rhs = Expression::from(c.rhs);
            problem = problem.with(match c.cmp {
                Comparison::Eq => constraint::eq(lhs, rhs),
                Comparison::Le => constraint::leq(lhs, rhs),
                Comparison::Ge => constraint::geq(lhs, rhs),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                // HiGHS rend `GapLimit` pour un optimum prouvé à la tolérance MIP près.
                let status = match solution.status() {
                    LpStatus::Optimal | LpStatus::GapLimit => SolutionStatus::Optimal,
                    LpStatus::TimeLimit => SolutionStatus::Feasible,
                };
                let values: Vec<f64> = handles.iter().map(|h| solution.value(*h)).collect();
                let objective = model.objective().evaluate(&values);
                Ok(SolverOutcome::Solved(Solution {
                    status,
                    values,
                    objective,
                }))
            }
            Err(ResolutionError::Infeasible) => Ok(SolverOutcome::Infeasible),
            Err(ResolutionError::Unbounded) => Ok(SolverOutcome::Unbounded),
            Err(other) => Err(SolverError::Failed(other.to_string())),
        }
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for (var, coef) in &expr.terms {
        out.add_mul(*coef, handles[var.index()]);
    }
    out
}
