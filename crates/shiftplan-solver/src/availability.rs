//! Availability evaluation
//!
//! Decides, per (employee, slot), whether the employee may be assigned.
//! An employee is eligible for a slot iff some declared range on the slot's
//! weekday contains the slot hour (`[start, end)`). A day without ranges is
//! ineligible all day, and a range with `start > end` contributes no hours.

use shiftplan_core::{DemandSlot, Employee, StaffingProblem};

/// Whether `employee` may work `slot`
pub fn is_eligible(employee: &Employee, slot: &DemandSlot) -> bool {
    employee.is_available(slot.day, slot.hour)
}

/// Dense employee x slot eligibility table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibilityMatrix {
    slot_count: usize,
    cells: Vec<bool>,
}

impl EligibilityMatrix {
    /// Evaluate every (employee, slot) pair of the problem
    pub fn evaluate(problem: &StaffingProblem) -> Self {
        let slot_count = problem.forecast.len();
        let cells = problem
            .employees
            .iter()
            .flat_map(|e| problem.forecast.iter().map(move |s| is_eligible(e, s)))
            .collect();
        Self { slot_count, cells }
    }

    pub fn is_eligible(&self, employee: usize, slot: usize) -> bool {
        self.cells[employee * self.slot_count + slot]
    }

    /// Number of forecast slots the employee could work
    pub fn eligible_hours(&self, employee: usize) -> usize {
        let start = employee * self.slot_count;
        self.cells[start..start + self.slot_count]
            .iter()
            .filter(|&&c| c)
            .count()
    }

    /// Number of employees who could work the slot
    pub fn eligible_staff(&self, slot: usize) -> usize {
        self.cells
            .iter()
            .skip(slot)
            .step_by(self.slot_count.max(1))
            .filter(|&&c| c)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use shiftplan_core::HourRange;

    fn problem() -> StaffingProblem {
        let mut p = StaffingProblem::new();
        p.forecast = vec![
            DemandSlot::new(Weekday::Mon, 7, 1),
            DemandSlot::new(Weekday::Mon, 8, 1),
            DemandSlot::new(Weekday::Mon, 19, 1),
            DemandSlot::new(Weekday::Tue, 8, 1),
        ];
        p.employees = vec![
            Employee::new("a").available(Weekday::Mon, HourRange::new(8, 20)),
            Employee::new("b").available(Weekday::Tue, HourRange::new(0, 24)),
            Employee::new("c").available(Weekday::Mon, HourRange::new(20, 8)),
        ];
        p
    }

    #[test]
    fn end_is_exclusive() {
        let p = problem();
        let alice = &p.employees[0];
        assert!(!is_eligible(alice, &p.forecast[0]));
        assert!(is_eligible(alice, &p.forecast[1]));
        assert!(is_eligible(alice, &p.forecast[2]));
        assert!(!is_eligible(alice, &DemandSlot::new(Weekday::Mon, 20, 1)));
    }

    #[test]
    fn day_without_ranges_is_ineligible() {
        let p = problem();
        assert!(!is_eligible(&p.employees[0], &p.forecast[3]));
        assert!(!is_eligible(&p.employees[1], &p.forecast[1]));
    }

    #[test]
    fn degenerate_range_yields_nothing() {
        let p = problem();
        let m = EligibilityMatrix::evaluate(&p);
        assert_eq!(m.eligible_hours(2), 0);
    }

    #[test]
    fn matrix_counts() {
        let m = EligibilityMatrix::evaluate(&problem());
        assert_eq!(m.eligible_hours(0), 2);
        assert_eq!(m.eligible_hours(1), 1);
        assert_eq!(m.eligible_staff(0), 0);
        assert_eq!(m.eligible_staff(1), 1);
        assert_eq!(m.eligible_staff(3), 1);
        assert!(m.is_eligible(1, 3));
    }
}
