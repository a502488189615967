use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Jour de la semaine (0..=6).
pub type Day = u8;
/// Heure de la journée (0..=23).
pub type Hour = u8;

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Disponibilités d'une personne pour une résolution.
///
/// `availability[jour]` contient les heures travaillables ce jour-là. Les
/// heures hors du domaine configuré sont ignorées à la construction du modèle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAvailability {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub availability: BTreeMap<Day, BTreeSet<Hour>>,
}

impl StaffAvailability {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            availability: BTreeMap::new(),
        }
    }

    /// Ajoute des heures disponibles pour un jour (builder).
    pub fn with_hours<H: IntoIterator<Item = Hour>>(mut self, day: Day, hours: H) -> Self {
        self.availability.entry(day).or_default().extend(hours);
        self
    }

    pub fn is_available(&self, day: Day, hour: Hour) -> bool {
        self.availability
            .get(&day)
            .is_some_and(|hours| hours.contains(&hour))
    }
}

/// Créneau sous-couvert : moins de personnes que le seuil requis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub day: Day,
    pub hour: Hour,
    pub covered: u32,
}

/// Résultat d'une résolution (instantané immuable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScheduleResult {
    pub assignments: BTreeMap<StaffId, BTreeMap<Day, Vec<Hour>>>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub hours_by_staff: BTreeMap<StaffId, u32>,
    pub objective: f64,
}

impl ScheduleResult {
    /// Heures affectées à `staff` le jour `day` (vide si inconnu).
    pub fn hours_for(&self, staff: &StaffId, day: Day) -> &[Hour] {
        self.assignments
            .get(staff)
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Écart entre la personne la plus et la moins planifiée.
    pub fn fairness_spread(&self) -> u32 {
        let max = self.hours_by_staff.values().max().copied().unwrap_or(0);
        let min = self.hours_by_staff.values().min().copied().unwrap_or(0);
        max - min
    }

    pub fn total_hours(&self) -> u32 {
        self.hours_by_staff.values().sum()
    }

    pub fn is_fully_covered(&self) -> bool {
        self.coverage_gaps.is_empty()
    }
}

/// Entrée d'une résolution : personnel, domaine jours/heures et seuil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub staff: Vec<StaffAvailability>,
    pub days: Vec<Day>,
    pub hours: Vec<Hour>,
    /// Signé pour que la validation puisse rejeter un seuil négatif.
    pub required_per_slot: i64,
}

impl ScheduleRequest {
    pub fn new(
        staff: Vec<StaffAvailability>,
        days: Vec<Day>,
        hours: Vec<Hour>,
        required_per_slot: i64,
    ) -> Self {
        Self {
            staff,
            days,
            hours,
            required_per_slot,
        }
    }
}
