//! The assembled optimisation model
//!
//! `ShiftModel` bundles the variables, hard constraints and objective built
//! from one `StaffingProblem`, plus the slot and roster data the solvers need
//! to report back in domain terms.

use std::collections::HashSet;

use shiftplan_core::{day_name, DemandSlot, EmployeeId, StaffingProblem, HOURS_PER_DAY};

use crate::availability::EligibilityMatrix;
use crate::constraints::ConstraintSet;
use crate::objective::LinearObjective;
use crate::variables::{Assignment, VarIndex, VariableModel};
use crate::SolverError;

#[derive(Clone, Debug)]
pub struct ShiftModel {
    pub variables: VariableModel,
    pub constraints: ConstraintSet,
    pub objective: LinearObjective,
    eligibility: EligibilityMatrix,
    slots: Vec<DemandSlot>,
    employee_ids: Vec<EmployeeId>,
    hour_caps: Vec<u32>,
}

impl ShiftModel {
    /// Build the model; `cost_scale` is the objective units per currency unit
    pub fn build(problem: &StaffingProblem, cost_scale: i64) -> Result<Self, SolverError> {
        check_structure(problem)?;
        let eligibility = EligibilityMatrix::evaluate(problem);
        let variables = VariableModel::build(problem, &eligibility);
        let constraints = ConstraintSet::build(problem, &variables);
        let objective = LinearObjective::build(problem, &variables, cost_scale)?;

        Ok(Self {
            variables,
            constraints,
            objective,
            eligibility,
            slots: problem.forecast.clone(),
            employee_ids: problem.employees.iter().map(|e| e.id.clone()).collect(),
            hour_caps: problem
                .employees
                .iter()
                .map(|e| e.max_hours_per_week)
                .collect(),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn employee_count(&self) -> usize {
        self.employee_ids.len()
    }

    pub fn slot(&self, slot: usize) -> &DemandSlot {
        &self.slots[slot]
    }

    pub fn slots(&self) -> &[DemandSlot] {
        &self.slots
    }

    pub fn employee_id(&self, employee: usize) -> &str {
        &self.employee_ids[employee]
    }

    pub fn required(&self, slot: usize) -> u32 {
        self.slots[slot].required_staff
    }

    pub fn hour_cap(&self, employee: usize) -> u32 {
        self.hour_caps[employee]
    }

    pub fn is_eligible(&self, employee: usize, slot: usize) -> bool {
        self.eligibility.is_eligible(employee, slot)
    }

    pub fn eligibility(&self) -> &EligibilityMatrix {
        &self.eligibility
    }

    /// Staff-hours demanded across the week
    pub fn total_demand(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.required_staff)).sum()
    }

    pub fn cost(&self, index: VarIndex) -> i64 {
        self.objective.coefficient(index)
    }

    /// Employees eligible for a slot, in roster order
    pub fn eligible_employees(&self, slot: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.employee_count()).filter(move |&e| self.is_eligible(e, slot))
    }

    /// Cost no feasible assignment can undercut.
    ///
    /// Each slot is covered at least by its cheapest eligible employees; the
    /// hour caps are relaxed away.
    pub fn coverage_lower_bound(&self) -> i64 {
        let mut costs = Vec::with_capacity(self.employee_count());
        (0..self.slot_count())
            .map(|s| {
                costs.clear();
                costs.extend(
                    self.eligible_employees(s)
                        .map(|e| self.objective.employee_cost(e)),
                );
                costs.sort_unstable();
                costs.iter().take(self.required(s) as usize).sum::<i64>()
            })
            .sum()
    }

    pub fn empty_assignment(&self) -> Assignment {
        Assignment::empty(self.variables.len())
    }
}

/// Reject problems the request boundary would have refused: slot hours
/// outside the day, repeated slots and repeated employee IDs.
fn check_structure(problem: &StaffingProblem) -> Result<(), SolverError> {
    let mut slots = HashSet::with_capacity(problem.forecast.len());
    for slot in &problem.forecast {
        if slot.hour >= HOURS_PER_DAY {
            return Err(SolverError::InvalidModel(format!(
                "slot hour {} on {} is outside 0-23",
                slot.hour,
                day_name(slot.day)
            )));
        }
        if !slots.insert((slot.day, slot.hour)) {
            return Err(SolverError::InvalidModel(format!(
                "duplicate demand slot {}",
                slot.label()
            )));
        }
    }
    let mut ids = HashSet::with_capacity(problem.employees.len());
    for employee in &problem.employees {
        if !ids.insert(employee.id.as_str()) {
            return Err(SolverError::InvalidModel(format!(
                "duplicate employee id '{}'",
                employee.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rust_decimal_macros::dec;
    use shiftplan_core::{Employee, HourRange};

    #[test]
    fn lower_bound_relaxes_caps() {
        let mut p = StaffingProblem::new();
        p.forecast = vec![
            DemandSlot::new(Weekday::Mon, 8, 2),
            DemandSlot::new(Weekday::Mon, 9, 1),
        ];
        p.employees = vec![
            Employee::new("cheap")
                .hourly_rate(dec!(10))
                .max_hours_per_week(1)
                .available(Weekday::Mon, HourRange::new(8, 10)),
            Employee::new("dear")
                .hourly_rate(dec!(30))
                .max_hours_per_week(5)
                .available(Weekday::Mon, HourRange::new(8, 10)),
        ];
        let model = ShiftModel::build(&p, 1).unwrap();

        assert_eq!(model.total_demand(), 3);
        assert_eq!(model.coverage_lower_bound(), 10 + 30 + 10);
        assert_eq!(model.eligible_employees(1).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(model.employee_id(1), "dear");
        assert_eq!(model.hour_cap(0), 1);
    }

    #[test]
    fn structural_defects_are_rejected() {
        let ok = Employee::new("a").available(Weekday::Mon, HourRange::new(0, 24));

        let mut p = StaffingProblem::new();
        p.forecast = vec![DemandSlot::new(Weekday::Mon, 24, 1)];
        p.employees = vec![ok.clone()];
        let err = ShiftModel::build(&p, 1).unwrap_err();
        assert_eq!(
            err,
            SolverError::InvalidModel("slot hour 24 on Monday is outside 0-23".to_string())
        );

        p.forecast = vec![
            DemandSlot::new(Weekday::Mon, 8, 1),
            DemandSlot::new(Weekday::Mon, 8, 2),
        ];
        let err = ShiftModel::build(&p, 1).unwrap_err();
        assert_eq!(
            err,
            SolverError::InvalidModel("duplicate demand slot Monday 08:00".to_string())
        );

        p.forecast.pop();
        p.employees.push(ok);
        assert!(matches!(
            ShiftModel::build(&p, 1),
            Err(SolverError::InvalidModel(m)) if m.contains("duplicate employee id 'a'")
        ));
    }
}
