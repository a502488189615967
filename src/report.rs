use crate::model::ScheduleResult;
use std::fmt::Write as _;

/// Résumé affiché après une résolution.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    pub output: &'a str,
    pub result: &'a ScheduleResult,
    /// Le modèle strict était infaisable ; `result` vient du modèle relâché.
    pub relaxed: bool,
}

/// Permet de customiser le rendu du résumé (console, log, etc.).
pub trait SummaryRenderer {
    fn render(&self, summary: &Summary<'_>) -> String;
}

/// Rendu texte pour la console.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummary;

impl SummaryRenderer for TextSummary {
    fn render(&self, summary: &Summary<'_>) -> String {
        let result = summary.result;
        let mut out = String::new();
        let _ = writeln!(out, "Wrote schedule to {}", summary.output);
        if summary.relaxed {
            let _ = writeln!(out, "Warning: coverage target infeasible, relaxed schedule written");
        }
        let _ = writeln!(out, "Objective: {}", result.objective);
        let _ = writeln!(out, "Coverage gaps: {}", result.coverage_gaps.len());
        for gap in &result.coverage_gaps {
            let _ = writeln!(
                out,
                "  day {} {:02}:00 covered by {}",
                gap.day, gap.hour, gap.covered
            );
        }
        for (staff, hours) in &result.hours_by_staff {
            let _ = writeln!(out, "Staff {staff}: {hours}h");
        }
        let _ = writeln!(out, "Spread: {}h", result.fairness_spread());
        out
    }
}
