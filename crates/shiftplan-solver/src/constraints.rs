//! Hard constraints
//!
//! - **Coverage**: per slot, the number of assigned employees is at least the
//!   required headcount.
//! - **Hour cap**: per employee, the number of assigned slots is at most the
//!   weekly hour cap.
//! - **Availability**: per pinned variable, the value is zero. This mirrors the
//!   structural pinning in the variable model so an assignment can be checked
//!   without consulting it.

use shiftplan_core::StaffingProblem;

use crate::variables::{Assignment, VarIndex, VariableModel};

/// Comparison between the sum of terms and the right-hand side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    AtLeast,
    AtMost,
    EqualTo,
}

impl Relation {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::AtLeast => lhs >= rhs,
            Relation::AtMost => lhs <= rhs,
            Relation::EqualTo => lhs == rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Relation::AtLeast => ">=",
            Relation::AtMost => "<=",
            Relation::EqualTo => "==",
        }
    }
}

/// What a constraint protects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Coverage { slot: usize },
    HourCap { employee: usize },
    Availability { var: VarIndex },
}

/// `sum(terms) <relation> rhs` over boolean variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<VarIndex>,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn lhs(&self, assignment: &Assignment) -> i64 {
        self.terms.iter().filter(|&&v| assignment.get(v)).count() as i64
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.relation.holds(self.lhs(assignment), self.rhs)
    }
}

/// A constraint an assignment fails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub kind: ConstraintKind,
    pub lhs: i64,
    pub relation: Relation,
    pub rhs: i64,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            ConstraintKind::Coverage { slot } => format!("coverage of slot #{}", slot),
            ConstraintKind::HourCap { employee } => format!("hour cap of employee #{}", employee),
            ConstraintKind::Availability { var } => format!("availability of variable #{}", var.0),
        };
        write!(
            f,
            "{}: {} {} {} does not hold",
            what,
            self.lhs,
            self.relation.symbol(),
            self.rhs
        )
    }
}

/// Every hard constraint of one problem
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    constraints: Vec<LinearConstraint>,
}

impl ConstraintSet {
    pub fn build(problem: &StaffingProblem, variables: &VariableModel) -> Self {
        let mut constraints = Vec::with_capacity(
            problem.forecast.len() + problem.employees.len() + variables.len(),
        );

        for (s, slot) in problem.forecast.iter().enumerate() {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Coverage { slot: s },
                terms: variables.slot_vars(s).collect(),
                relation: Relation::AtLeast,
                rhs: i64::from(slot.required_staff),
            });
        }

        for (e, employee) in problem.employees.iter().enumerate() {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::HourCap { employee: e },
                terms: variables.employee_vars(e).collect(),
                relation: Relation::AtMost,
                rhs: i64::from(employee.max_hours_per_week),
            });
        }

        for (idx, var) in variables.iter() {
            if var.fixed == Some(false) {
                constraints.push(LinearConstraint {
                    kind: ConstraintKind::Availability { var: idx },
                    terms: vec![idx],
                    relation: Relation::EqualTo,
                    rhs: 0,
                });
            }
        }

        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter()
    }

    pub fn coverage(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Coverage { .. }))
    }

    pub fn hour_caps(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.iter()
            .filter(|c| matches!(c.kind, ConstraintKind::HourCap { .. }))
    }

    pub fn availability(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Availability { .. }))
    }

    /// Every constraint the assignment fails
    pub fn violations(&self, assignment: &Assignment) -> Vec<Violation> {
        self.constraints
            .iter()
            .filter_map(|c| {
                let lhs = c.lhs(assignment);
                (!c.relation.holds(lhs, c.rhs)).then(|| Violation {
                    kind: c.kind,
                    lhs,
                    relation: c.relation,
                    rhs: c.rhs,
                })
            })
            .collect()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied_by(assignment))
    }
}
