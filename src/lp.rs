//! Modèle linéaire générique et frontière avec le solveur PLNE.
//!
//! Le modèle est une simple description (variables, contraintes, objectif à
//! minimiser) ; la recherche elle-même est déléguée à une implémentation de
//! [`Solver`], injectée par l'appelant.

use std::fmt::Write as _;
use thiserror::Error;

/// Indice d'une variable dans un [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lower: f64, upper: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
}

/// Expression affine `Σ coef·x + constant`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        self.terms.push((var, coef));
        self
    }

    /// Ajoute `coef · other` à l'expression.
    pub fn add_scaled(&mut self, other: &LinearExpr, coef: f64) -> &mut Self {
        self.terms
            .extend(other.terms.iter().map(|(v, c)| (*v, c * coef)));
        self.constant += other.constant * coef;
        self
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Le,
    Ge,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub lhs: LinearExpr,
    pub cmp: Comparison,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(values);
        match self.cmp {
            Comparison::Eq => (lhs - self.rhs).abs() <= tolerance,
            Comparison::Le => lhs <= self.rhs + tolerance,
            Comparison::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// Problème de minimisation linéaire en variables binaires/réelles bornées.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl LinearModel {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::default(),
        }
    }

    pub fn add_binary<S: Into<String>>(&mut self, name: S) -> VarId {
        self.add_variable(name.into(), VarKind::Binary)
    }

    pub fn add_continuous<S: Into<String>>(
        &mut self,
        name: S,
        lower: f64,
        upper: Option<f64>,
    ) -> VarId {
        self.add_variable(name.into(), VarKind::Continuous { lower, upper })
    }

    fn add_variable(&mut self, name: String, kind: VarKind) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable { name, kind });
        id
    }

    pub fn add_constraint<S: Into<String>>(
        &mut self,
        name: S,
        lhs: LinearExpr,
        cmp: Comparison,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            lhs,
            cmp,
            rhs,
        });
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Contraintes non respectées par `values` (à `tolerance` près).
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .collect()
    }

    /// Rendu texte proche du format LP (diagnostic uniquement).
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\\* {} *\\", self.name);
        let _ = writeln!(out, "Minimize");
        let _ = writeln!(out, " OBJ: {}", self.render_expr(&self.objective));
        let _ = writeln!(out, "Subject To");
        for c in &self.constraints {
            let _ = writeln!(
                out,
                " {}: {} {} {}",
                c.name,
                self.render_expr(&c.lhs),
                c.cmp.symbol(),
                c.rhs
            );
        }
        let _ = writeln!(out, "Bounds");
        for v in &self.variables {
            if let VarKind::Continuous { lower, upper } = v.kind {
                match upper {
                    Some(up) => {
                        let _ = writeln!(out, " {lower} <= {} <= {up}", v.name);
                    }
                    None => {
                        let _ = writeln!(out, " {} >= {lower}", v.name);
                    }
                }
            }
        }
        let _ = writeln!(out, "Binaries");
        for v in self.variables.iter().filter(|v| v.kind == VarKind::Binary) {
            let _ = writeln!(out, " {}", v.name);
        }
        let _ = writeln!(out, "End");
        out
    }

    fn render_expr(&self, expr: &LinearExpr) -> String {
        let mut parts: Vec<String> = expr
            .terms
            .iter()
            .map(|(v, c)| {
                let name = &self.variables[v.0].name;
                if *c == 1.0 {
                    format!("+ {name}")
                } else if *c == -1.0 {
                    format!("- {name}")
                } else if *c < 0.0 {
                    format!("- {} {name}", -c)
                } else {
                    format!("+ {c} {name}")
                }
            })
            .collect();
        if expr.constant != 0.0 {
            parts.push(format!("+ {}", expr.constant));
        }
        if parts.is_empty() {
            return "0".to_string();
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    /// Solution réalisable, optimalité non prouvée (arrêt heuristique).
    Feasible,
}

/// Valeurs renvoyées par le solveur, indexées par [`VarId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolutionStatus,
    pub values: Vec<f64>,
    pub objective: f64,
}

impl Solution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverOutcome {
    Solved(Solution),
    Infeasible,
    Unbounded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("solver unavailable: {0}")]
    Unavailable(String),
    #[error("solver failed: {0}")]
    Failed(String),
}

/// Capacité de résolution PLNE (externe, interchangeable).
///
/// Chaque appel doit être autonome : aucun état partagé entre deux modèles,
/// afin que plusieurs résolutions puissent tourner en parallèle.
pub trait Solver: Send + Sync {
    fn solve(&self, model: &LinearModel) -> Result<SolverOutcome, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn solve(&self, model: &LinearModel) -> Result<SolverOutcome, SolverError> {
        (**self).solve(model)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&self, model: &LinearModel) -> Result<SolverOutcome, SolverError> {
        (**self).solve(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_evaluates_terms_and_constant() {
        let mut m = LinearModel::new("t");
        let a = m.add_binary("a");
        let b = m.add_continuous("b", 0.0, None);
        let mut e = LinearExpr::sum([a, b]);
        e.constant = 1.5;
        assert_eq!(e.evaluate(&[1.0, 2.0]), 4.5);
    }

    #[test]
    fn violations_respect_tolerance() {
        let mut m = LinearModel::new("t");
        let a = m.add_binary("a");
        m.add_constraint("fix", LinearExpr::sum([a]), Comparison::Eq, 0.0);
        m.add_constraint("cover", LinearExpr::sum([a]), Comparison::Ge, 1.0);
        assert_eq!(m.violations(&[1e-9], 1e-6).len(), 1);
        assert_eq!(m.violations(&[1e-9], 1e-6)[0].name, "cover");
        assert_eq!(m.violations(&[0.5], 1e-6).len(), 2);
    }

    #[test]
    fn lp_dump_lists_sections() {
        let mut m = LinearModel::new("demo");
        let a = m.add_binary("a");
        let hi = m.add_continuous("hi", 0.0, None);
        let mut lhs = LinearExpr::sum([a]);
        lhs.add_term(hi, -1.0);
        m.add_constraint("cap", lhs, Comparison::Le, 0.0);
        m.set_objective(LinearExpr::sum([hi]));
        let dump = m.to_lp_string();
        assert!(dump.contains(" cap: + a - hi <= 0"));
        assert!(dump.contains(" hi >= 0"));
        assert!(dump.contains("Binaries\n a\n"));
    }
}
