use super::{util, SolveOptions};
use crate::lp::{Comparison, LinearExpr, LinearModel, VarId};
use crate::model::{Day, Hour, ScheduleRequest};

/// Borne de couverture appliquée à chaque créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageBound {
    /// `Σ x >= required` partout.
    Strict,
    /// `Σ x >= min(required, disponibles sur le créneau)` : toujours réalisable.
    CappedToAvailable,
}

/// Modèle construit + correspondance (personne, jour, heure) -> variable.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub lp: LinearModel,
    assign: Vec<VarId>,
    days_len: usize,
    hours_len: usize,
    pub max_hours: VarId,
    pub min_hours: VarId,
}

impl ScheduleModel {
    /// Variable d'affectation, par positions dans la requête.
    pub fn assign_var(&self, staff: usize, day: usize, hour: usize) -> VarId {
        self.assign[(staff * self.days_len + day) * self.hours_len + hour]
    }

    pub fn assign_var_count(&self) -> usize {
        self.assign.len()
    }
}

/// Construit le modèle PLNE d'une requête déjà validée.
pub(super) fn build_model(
    req: &ScheduleRequest,
    required: u32,
    opts: SolveOptions,
    bound: CoverageBound,
) -> ScheduleModel {
    let mut lp = LinearModel::new("staff_scheduling");

    let mut assign: Vec<VarId> =
        Vec::with_capacity(req.staff.len() * req.days.len() * req.hours.len());
    for s in &req.staff {
        for d in &req.days {
            for h in &req.hours {
                assign.push(lp.add_binary(var_name(s.id.as_str(), *d, *h)));
            }
        }
    }
    let at = |si: usize, di: usize, hi: usize| {
        assign[(si * req.days.len() + di) * req.hours.len() + hi]
    };

    // Disponibilités : la variable existe toujours, elle est fixée à 0 si indisponible.
    for (si, s) in req.staff.iter().enumerate() {
        for (di, d) in req.days.iter().enumerate() {
            for (hi, h) in req.hours.iter().enumerate() {
                if !s.is_available(*d, *h) {
                    lp.add_constraint(
                        format!("not_avail_{}_{d}_{h}", s.id),
                        LinearExpr::sum([at(si, di, hi)]),
                        Comparison::Eq,
                        0.0,
                    );
                }
            }
        }
    }

    // Couverture minimale par créneau (borne basse seulement).
    for (di, d) in req.days.iter().enumerate() {
        for (hi, h) in req.hours.iter().enumerate() {
            let rhs = match bound {
                CoverageBound::Strict => required,
                CoverageBound::CappedToAvailable => {
                    required.min(util::available_count(req, *d, *h))
                }
            };
            lp.add_constraint(
                format!("coverage_{d}_{h}"),
                LinearExpr::sum((0..req.staff.len()).map(|si| at(si, di, hi))),
                Comparison::Ge,
                f64::from(rhs),
            );
        }
    }

    let workloads: Vec<LinearExpr> = (0..req.staff.len())
        .map(|si| {
            LinearExpr::sum(
                (0..req.days.len())
                    .flat_map(|di| (0..req.hours.len()).map(move |hi| (di, hi)))
                    .map(|(di, hi)| at(si, di, hi)),
            )
        })
        .collect();

    let max_hours = lp.add_continuous("max_hours", 0.0, None);
    let min_hours = lp.add_continuous("min_hours", 0.0, None);

    for (s, work) in req.staff.iter().zip(&workloads) {
        let mut upper = work.clone();
        upper.add_term(max_hours, -1.0);
        lp.add_constraint(format!("max_hours_{}", s.id), upper, Comparison::Le, 0.0);

        let mut lower = work.clone();
        lower.add_term(min_hours, -1.0);
        lp.add_constraint(format!("min_hours_{}", s.id), lower, Comparison::Ge, 0.0);
    }

    // Équité d'abord, puis léger coût sur le total pour éviter le sur-effectif.
    let mut objective = LinearExpr::new();
    objective.add_term(max_hours, 1.0).add_term(min_hours, -1.0);
    for work in &workloads {
        objective.add_scaled(work, opts.epsilon);
    }
    lp.set_objective(objective);

    ScheduleModel {
        lp,
        assign,
        days_len: req.days.len(),
        hours_len: req.hours.len(),
        max_hours,
        min_hours,
    }
}

fn var_name(staff: &str, day: Day, hour: Hour) -> String {
    format!("assign_{staff}_{day}_{hour}")
}
