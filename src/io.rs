use crate::model::{Day, Hour, ScheduleRequest, ScheduleResult, StaffAvailability, StaffId};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Plage horaire du fichier d'entrée (fin exclue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSpec {
    #[serde(default = "default_start")]
    pub start: Hour,
    #[serde(default = "default_end")]
    pub end: Hour,
}

impl Default for HoursSpec {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_start() -> Hour {
    9
}
fn default_end() -> Hour {
    18
}
fn default_days() -> Vec<Day> {
    (0..7).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub availability: BTreeMap<Day, BTreeSet<Hour>>,
}

/// Fichier d'entrée JSON : `{ hours: {start, end}, days: [..], staff: [..] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(default)]
    pub hours: HoursSpec,
    #[serde(default = "default_days")]
    pub days: Vec<Day>,
    #[serde(default)]
    pub staff: Vec<StaffEntry>,
}

impl ScheduleInput {
    pub fn hours(&self) -> Vec<Hour> {
        (self.hours.start..self.hours.end).collect()
    }

    pub fn staff(&self) -> Vec<StaffAvailability> {
        self.staff
            .iter()
            .map(|e| StaffAvailability {
                id: StaffId::new(&e.id),
                name: e.name.clone().unwrap_or_else(|| e.id.clone()),
                availability: e.availability.clone(),
            })
            .collect()
    }

    pub fn into_request(self, required_per_slot: i64) -> ScheduleRequest {
        let staff = self.staff();
        let hours = self.hours();
        ScheduleRequest::new(staff, self.days, hours, required_per_slot)
    }
}

pub fn load_input_json<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleInput> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let input: ScheduleInput = serde_json::from_slice(&data)
        .with_context(|| format!("parsing input {}", path.display()))?;
    Ok(input)
}

/// Export JSON du planning (jolie mise en forme, écriture atomique)
pub fn export_schedule_json<P: AsRef<Path>>(
    path: P,
    result: &ScheduleResult,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;

    let json = serde_json::to_vec_pretty(result)?;
    let mut tmp = NamedTempFile::new_in(parent).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

pub fn load_schedule_json<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleResult> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let result = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule {}", path.display()))?;
    Ok(result)
}

/// Export CSV des affectations: header `staff_id,day,hour`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    result: &ScheduleResult,
) -> anyhow::Result<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["staff_id", "day", "hour"])?;
    for (staff, days) in &result.assignments {
        for (day, hours) in days {
            let day = day.to_string();
            for hour in hours {
                let hour = hour.to_string();
                w.write_record([staff.as_str(), day.as_str(), hour.as_str()])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Ligne de l'export du personnel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRow {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
}

impl StaffRow {
    pub fn is_disabled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("disabled"))
    }
}

/// Ligne de l'export des créneaux hebdomadaires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotsRow {
    pub staff_id: String,
    pub week_start: NaiveDate,
    pub start_hour: Option<Hour>,
    pub end_hour: Option<Hour>,
    pub slots_json: Option<String>,
}

/// Import du personnel: header `id,name[,status]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        if id.is_empty() {
            bail!("invalid staff row (empty id)");
        }
        out.push(StaffRow {
            id: id.to_string(),
            name: non_empty(rec.get(1)),
            status: non_empty(rec.get(2)),
        });
    }
    Ok(out)
}

/// Import des créneaux: header `staff_id,week_start,start_hour,end_hour,slots_json`
pub fn import_slots_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SlotsRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let staff_id = rec.get(0).context("missing staff_id")?.trim().to_string();
        let week_raw = rec.get(1).context("missing week_start")?.trim();
        let week_start = NaiveDate::parse_from_str(week_raw, "%Y-%m-%d")
            .with_context(|| format!("invalid week_start: {week_raw}"))?;
        let start_hour = parse_hour(rec.get(2)).context("start_hour")?;
        let end_hour = parse_hour(rec.get(3)).context("end_hour")?;
        out.push(SlotsRow {
            staff_id,
            week_start,
            start_hour,
            end_hour,
            slots_json: non_empty(rec.get(4)),
        });
    }
    Ok(out)
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Vide ou 0 = valeur par défaut de la fenêtre.
fn parse_hour(field: Option<&str>) -> anyhow::Result<Option<Hour>> {
    match non_empty(field) {
        None => Ok(None),
        Some(raw) => {
            let h: Hour = raw.parse().with_context(|| format!("invalid hour: {raw}"))?;
            Ok((h != 0).then_some(h))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_follow_loader_conventions() {
        let input: ScheduleInput =
            serde_json::from_str(r#"{"staff":[{"id":"s1","availability":{"2":[9,10]}}]}"#).unwrap();
        assert_eq!(input.hours(), (9..18).collect::<Vec<_>>());
        assert_eq!(input.days, vec![0, 1, 2, 3, 4, 5, 6]);

        let staff = input.staff();
        assert_eq!(staff[0].name, "s1");
        assert!(staff[0].is_available(2, 10));
        assert!(!staff[0].is_available(1, 10));
    }

    #[test]
    fn zero_hour_falls_back_to_window() {
        assert_eq!(parse_hour(Some("0")).unwrap(), None);
        assert_eq!(parse_hour(Some(" 8 ")).unwrap(), Some(8));
        assert_eq!(parse_hour(Some("")).unwrap(), None);
        assert!(parse_hour(Some("x")).is_err());
    }
}
