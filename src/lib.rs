#![forbid(unsafe_code)]
//! Effectifs — planification horaire du personnel par programmation linéaire en nombres entiers.
//!
//! - Une binaire par (personne, jour, heure), fixée à 0 hors disponibilité.
//! - Couverture minimale par créneau, équité (écart max − min des heures).
//! - Solveur injectable ([`Solver`]) ; `good_lp`/HiGHS par défaut.
//! - Lacunes de couverture toujours recalculées depuis le planning extrait.

pub mod availability;
pub mod backend;
pub mod io;
pub mod lp;
pub mod model;
pub mod report;
pub mod scheduler;

pub use availability::{AvailabilitySupplier, HourWindow, WeeklySlotsSupplier};
pub use backend::GoodLpSolver;
pub use lp::{LinearModel, Solution, SolutionStatus, Solver, SolverError, SolverOutcome};
pub use model::{
    CoverageGap, Day, Hour, ScheduleRequest, ScheduleResult, StaffAvailability, StaffId,
};
pub use report::{Summary, SummaryRenderer, TextSummary};
pub use scheduler::{ConfigError, SchedError, Scheduler, SolveOptions, SolveOutcome};
