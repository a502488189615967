use super::{ConfigError, SolveOptions};
use crate::model::{Day, Hour, ScheduleRequest};
use std::collections::HashSet;

/// Valide la requête avant toute construction de modèle ; renvoie le seuil.
pub(super) fn validate(req: &ScheduleRequest, opts: SolveOptions) -> Result<u32, ConfigError> {
    if req.staff.is_empty() {
        return Err(ConfigError::EmptyStaff);
    }
    if req.days.is_empty() {
        return Err(ConfigError::EmptyDays);
    }
    if req.hours.is_empty() {
        return Err(ConfigError::EmptyHours);
    }
    if req.required_per_slot < 0 {
        return Err(ConfigError::NegativeRequirement(req.required_per_slot));
    }
    let required = u32::try_from(req.required_per_slot)
        .map_err(|_| ConfigError::RequirementTooLarge(req.required_per_slot))?;
    if !opts.epsilon.is_finite() || opts.epsilon < 0.0 {
        return Err(ConfigError::InvalidEpsilon(opts.epsilon));
    }

    let mut seen_days = HashSet::new();
    for &d in &req.days {
        if d > 6 {
            return Err(ConfigError::DayOutOfRange(d));
        }
        if !seen_days.insert(d) {
            return Err(ConfigError::DuplicateDay(d));
        }
    }
    let mut seen_hours = HashSet::new();
    for &h in &req.hours {
        if h > 23 {
            return Err(ConfigError::HourOutOfRange(h));
        }
        if !seen_hours.insert(h) {
            return Err(ConfigError::DuplicateHour(h));
        }
    }
    let mut seen_staff = HashSet::new();
    for s in &req.staff {
        if !seen_staff.insert(&s.id) {
            return Err(ConfigError::DuplicateStaff(s.id.clone()));
        }
    }
    Ok(required)
}

/// Nombre d'heures de disponibilité situées hors du domaine configuré.
pub(super) fn out_of_domain_hours(req: &ScheduleRequest) -> usize {
    req.staff
        .iter()
        .flat_map(|s| s.availability.iter())
        .map(|(day, hours)| {
            if !req.days.contains(day) {
                return hours.len();
            }
            hours.iter().filter(|h| !req.hours.contains(h)).count()
        })
        .sum()
}

/// Personnes disponibles sur le créneau (`day`, `hour`).
pub(super) fn available_count(req: &ScheduleRequest, day: Day, hour: Hour) -> u32 {
    req.staff
        .iter()
        .filter(|s| s.is_available(day, hour))
        .count() as u32
}
