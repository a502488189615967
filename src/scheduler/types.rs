use crate::lp::{SolutionStatus, SolverError};
use crate::model::{Day, Hour, ScheduleResult, StaffId};
use thiserror::Error;

/// Options de résolution
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Poids du total d'heures dans l'objectif (départage secondaire).
    pub epsilon: f64,
    /// Sur infaisabilité, résoudre un modèle relâché pour produire un diagnostic.
    pub relax_on_infeasible: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            relax_on_infeasible: true,
        }
    }
}

/// Issue d'une résolution. L'infaisabilité est un résultat métier, pas une erreur.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Scheduled {
        status: SolutionStatus,
        result: ScheduleResult,
    },
    Infeasible {
        /// Planning issu du modèle relâché, lacunes calculées sur le seuil d'origine.
        relaxed: Option<ScheduleResult>,
    },
}

impl SolveOutcome {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible { .. })
    }

    pub fn result(&self) -> Option<&ScheduleResult> {
        match self {
            SolveOutcome::Scheduled { result, .. } => Some(result),
            SolveOutcome::Infeasible { relaxed } => relaxed.as_ref(),
        }
    }

    pub fn into_result(self) -> Option<ScheduleResult> {
        match self {
            SolveOutcome::Scheduled { result, .. } => Some(result),
            SolveOutcome::Infeasible { relaxed } => relaxed,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("staff list is empty")]
    EmptyStaff,
    #[error("day domain is empty")]
    EmptyDays,
    #[error("hour domain is empty")]
    EmptyHours,
    #[error("required_per_slot must be >= 0 (got {0})")]
    NegativeRequirement(i64),
    #[error("required_per_slot too large: {0}")]
    RequirementTooLarge(i64),
    #[error("day out of range 0..=6: {0}")]
    DayOutOfRange(Day),
    #[error("hour out of range 0..=23: {0}")]
    HourOutOfRange(Hour),
    #[error("duplicate day in domain: {0}")]
    DuplicateDay(Day),
    #[error("duplicate hour in domain: {0}")]
    DuplicateHour(Hour),
    #[error("duplicate staff id: {0}")]
    DuplicateStaff(StaffId),
    #[error("epsilon must be finite and >= 0 (got {0})")]
    InvalidEpsilon(f64),
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}
