//! Fourniture des disponibilités (côté amont du scheduler).
//!
//! Les sources stockent des créneaux « occupés » sur une semaine, à plat :
//! `7 * len(fenêtre)` booléens. Toute la normalisation (troncature,
//! complétion, inversion, découpage par jour) se fait ici.

use crate::io::{self, SlotsRow, StaffRow};
use crate::model::{Day, Hour, StaffAvailability};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DAYS_PER_WEEK: usize = 7;

/// Fenêtre horaire quotidienne `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: Hour,
    pub end: Hour,
}

impl HourWindow {
    pub fn new(start: Hour, end: Hour) -> Result<Self> {
        if end > 24 {
            bail!("end hour must be <= 24 (got {end})");
        }
        if end < start {
            bail!("end hour must not precede start hour ({start}..{end})");
        }
        Ok(Self { start, end })
    }

    /// Ramène la fenêtre dans `[0, 24]` ; une fin avant le début donne une fenêtre vide.
    pub fn clamped(start: Hour, end: Hour) -> Self {
        let start = start.min(24);
        Self {
            start,
            end: end.min(24).max(start),
        }
    }

    pub fn hours(&self) -> Vec<Hour> {
        (self.start..self.end).collect()
    }
}

/// Source de disponibilités pour une résolution.
pub trait AvailabilitySupplier {
    fn fetch(&self) -> Result<Vec<StaffAvailability>>;
}

pub fn invert_busy(flags: &[bool]) -> Vec<bool> {
    flags.iter().map(|busy| !busy).collect()
}

/// Tronque ou complète avec `false` jusqu'à `expected_len`.
pub fn normalize_flags(raw: &[bool], expected_len: usize) -> Vec<bool> {
    let mut out: Vec<bool> = raw.iter().take(expected_len).copied().collect();
    out.resize(expected_len, false);
    out
}

/// Découpe des drapeaux « disponible » à plat en heures par jour (0..=6).
pub fn reshape_daily(flags: &[bool], window: &[Hour]) -> BTreeMap<Day, BTreeSet<Hour>> {
    let per_day = window.len();
    (0..DAYS_PER_WEEK)
        .map(|d| {
            let hours = window
                .iter()
                .enumerate()
                .filter(|(idx, _)| flags.get(d * per_day + idx).copied().unwrap_or(false))
                .map(|(_, h)| *h)
                .collect();
            (d as Day, hours)
        })
        .collect()
}

/// Drapeaux « occupé » bruts -> disponibilités journalières.
pub fn availability_from_busy(busy: &[bool], window: HourWindow) -> BTreeMap<Day, BTreeSet<Hour>> {
    let hours = window.hours();
    let padded = normalize_flags(busy, DAYS_PER_WEEK * hours.len());
    reshape_daily(&invert_busy(&padded), &hours)
}

/// Lit les drapeaux d'une cellule JSON ; illisible ou absent = aucun drapeau.
pub fn parse_slots_json(raw: Option<&str>) -> Vec<bool> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values.iter().map(truthy).collect(),
        Err(err) => {
            warn!(%err, "unparsable slots_json, treated as empty");
            Vec::new()
        }
    }
}

fn truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Null => false,
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Construit les disponibilités de la semaine `week_start` à partir d'un
/// export du personnel et des créneaux hebdomadaires.
pub fn weekly_availability(
    staff: &[StaffRow],
    slots: &[SlotsRow],
    week_start: NaiveDate,
    default_window: HourWindow,
) -> Vec<StaffAvailability> {
    let mut out = Vec::new();
    for person in staff.iter().filter(|p| !p.is_disabled()) {
        let row = slots
            .iter()
            .find(|r| r.week_start == week_start && r.staff_id == person.id);

        let (window, busy) = match row {
            Some(r) => {
                let start = r.start_hour.unwrap_or(default_window.start);
                let end = r.end_hour.unwrap_or(default_window.end);
                let window = HourWindow::clamped(start, end);
                if (window.start, window.end) != (start, end) {
                    warn!(staff = %person.id, start, end, "inconsistent slots window, clamped");
                }
                (window, parse_slots_json(r.slots_json.as_deref()))
            }
            None => {
                debug!(staff = %person.id, "no slots row for week, staff fully available");
                (default_window, Vec::new())
            }
        };

        let name = match person.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => person.id.clone(),
        };
        let mut availability = StaffAvailability::new(&person.id, name);
        availability.availability = availability_from_busy(&busy, window);
        out.push(availability);
    }
    out
}

/// Fournisseur lisant deux exports CSV (personnel + créneaux hebdomadaires).
#[derive(Debug, Clone)]
pub struct WeeklySlotsSupplier {
    pub staff_csv: PathBuf,
    pub slots_csv: PathBuf,
    pub week_start: NaiveDate,
    pub window: HourWindow,
}

impl AvailabilitySupplier for WeeklySlotsSupplier {
    fn fetch(&self) -> Result<Vec<StaffAvailability>> {
        let staff = io::import_staff_csv(&self.staff_csv)?;
        let slots = io::import_slots_csv(&self.slots_csv)?;
        Ok(weekly_availability(&staff, &slots, self.week_start, self.window))
    }
}
