use super::builder::ScheduleModel;
use crate::lp::Solution;
use crate::model::{CoverageGap, Day, Hour, ScheduleRequest, ScheduleResult, StaffId};
use std::collections::BTreeMap;

/// Seuil au-delà duquel une binaire renvoyée par le solveur vaut « affecté ».
pub const ASSIGNED_THRESHOLD: f64 = 0.5;

pub(super) fn extract_result(
    model: &ScheduleModel,
    req: &ScheduleRequest,
    required: u32,
    solution: &Solution,
) -> ScheduleResult {
    let mut assignments: BTreeMap<StaffId, BTreeMap<Day, Vec<Hour>>> = BTreeMap::new();
    for (si, s) in req.staff.iter().enumerate() {
        let staff_days = assignments.entry(s.id.clone()).or_default();
        for (di, d) in req.days.iter().enumerate() {
            let mut hours: Vec<Hour> = req
                .hours
                .iter()
                .enumerate()
                .filter(|(hi, _)| {
                    solution.value(model.assign_var(si, di, *hi)) > ASSIGNED_THRESHOLD
                })
                .map(|(_, h)| *h)
                .collect();
            hours.sort_unstable();
            staff_days.insert(*d, hours);
        }
    }

    let coverage_gaps = coverage_gaps(&assignments, &req.days, &req.hours, required);

    let hours_by_staff = assignments
        .iter()
        .map(|(id, days)| {
            let total: usize = days.values().map(Vec::len).sum();
            (id.clone(), total as u32)
        })
        .collect();

    ScheduleResult {
        assignments,
        coverage_gaps,
        hours_by_staff,
        objective: solution.objective,
    }
}

/// Recalcule la couverture à partir des affectations extraites uniquement.
pub fn coverage_gaps(
    assignments: &BTreeMap<StaffId, BTreeMap<Day, Vec<Hour>>>,
    days: &[Day],
    hours: &[Hour],
    required: u32,
) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();
    for &day in days {
        for &hour in hours {
            let covered = assignments
                .values()
                .filter(|staff_days| {
                    staff_days
                        .get(&day)
                        .is_some_and(|assigned| assigned.contains(&hour))
                })
                .count() as u32;
            if covered < required {
                gaps.push(CoverageGap { day, hour, covered });
            }
        }
    }
    gaps
}
