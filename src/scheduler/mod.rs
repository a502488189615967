mod builder;
mod extract;
mod types;
mod util;

pub use builder::{CoverageBound, ScheduleModel};
pub use extract::{coverage_gaps, ASSIGNED_THRESHOLD};
pub use types::{ConfigError, SchedError, SolveOptions, SolveOutcome};

use crate::backend::GoodLpSolver;
use crate::lp::{Solver, SolverError, SolverOutcome};
use crate::model::{ScheduleRequest, ScheduleResult};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Scheduler : construit le modèle, le soumet au solveur injecté, extrait le planning.
///
/// Ne conserve aucun état entre deux appels à [`Scheduler::solve`].
#[derive(Debug, Clone)]
pub struct Scheduler<S = GoodLpSolver> {
    solver: S,
    opts: SolveOptions,
}

impl Default for Scheduler<GoodLpSolver> {
    fn default() -> Self {
        Self::new(GoodLpSolver)
    }
}

impl<S: Solver> Scheduler<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            opts: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: SolveOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn options(&self) -> SolveOptions {
        self.opts
    }

    /// Valide la requête puis construit le modèle strict, sans le résoudre.
    pub fn build_model(&self, req: &ScheduleRequest) -> Result<ScheduleModel, SchedError> {
        let required = util::validate(req, self.opts)?;
        Ok(builder::build_model(
            req,
            required,
            self.opts,
            CoverageBound::Strict,
        ))
    }

    pub fn solve(&self, req: &ScheduleRequest) -> Result<SolveOutcome, SchedError> {
        let solve_id = Uuid::new_v4();
        let span = info_span!("solve", %solve_id, staff = req.staff.len());
        let _guard = span.enter();

        let required = util::validate(req, self.opts)?;
        let ignored = util::out_of_domain_hours(req);
        if ignored > 0 {
            debug!(ignored, "availability hours outside the day/hour domain are ignored");
        }

        let model = builder::build_model(req, required, self.opts, CoverageBound::Strict);
        debug!(
            variables = model.lp.variables().len(),
            constraints = model.lp.constraints().len(),
            "model built"
        );

        match self.solver.solve(&model.lp)? {
            SolverOutcome::Solved(solution) => {
                let result = extract::extract_result(&model, req, required, &solution);
                if !result.coverage_gaps.is_empty() {
                    warn!(
                        gaps = result.coverage_gaps.len(),
                        "solver returned a schedule with coverage gaps"
                    );
                }
                info!(
                    objective = result.objective,
                    spread = result.fairness_spread(),
                    "schedule extracted"
                );
                Ok(SolveOutcome::Scheduled {
                    status: solution.status,
                    result,
                })
            }
            SolverOutcome::Infeasible => {
                warn!(required, "model is infeasible");
                if !self.opts.relax_on_infeasible {
                    return Ok(SolveOutcome::Infeasible { relaxed: None });
                }
                let relaxed = self.solve_relaxed(req, required)?;
                Ok(SolveOutcome::Infeasible { relaxed })
            }
            SolverOutcome::Unbounded => Err(unbounded()),
        }
    }

    fn solve_relaxed(
        &self,
        req: &ScheduleRequest,
        required: u32,
    ) -> Result<Option<ScheduleResult>, SchedError> {
        let model =
            builder::build_model(req, required, self.opts, CoverageBound::CappedToAvailable);
        match self.solver.solve(&model.lp)? {
            SolverOutcome::Solved(solution) => {
                let result = extract::extract_result(&model, req, required, &solution);
                info!(
                    gaps = result.coverage_gaps.len(),
                    "relaxed schedule extracted"
                );
                Ok(Some(result))
            }
            SolverOutcome::Infeasible => {
                warn!("relaxed model is infeasible too");
                Ok(None)
            }
            SolverOutcome::Unbounded => Err(unbounded()),
        }
    }
}

fn unbounded() -> SchedError {
    SchedError::Solver(SolverError::Failed(
        "model reported unbounded".to_string(),
    ))
}
