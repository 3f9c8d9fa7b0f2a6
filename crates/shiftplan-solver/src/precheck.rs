//! Cheap infeasibility detection
//!
//! Two necessary conditions are checked before any search:
//!
//! 1. every slot has at least `required_staff` eligible employees;
//! 2. total demand does not exceed what the roster can supply, where each
//!    employee supplies `min(max_hours_per_week, eligible forecast hours)`.
//!
//! Passing both does not imply feasibility.

use crate::model::ShiftModel;

/// Prefix of every infeasibility reason
pub const INFEASIBLE: &str = "No feasible schedule found";

/// Explain why the model is trivially infeasible, if it is
pub fn find_infeasibility(model: &ShiftModel) -> Option<String> {
    for s in 0..model.slot_count() {
        let required = model.required(s) as usize;
        let available = model.eligibility().eligible_staff(s);
        if available < required {
            return Some(format!(
                "{}: {} needs {} staff but only {} employee{} available",
                INFEASIBLE,
                model.slot(s).label(),
                required,
                available,
                if available == 1 { " is" } else { "s are" }
            ));
        }
    }

    let demand = model.total_demand();
    let supply: u64 = (0..model.employee_count())
        .map(|e| {
            let eligible = model.eligibility().eligible_hours(e) as u64;
            eligible.min(u64::from(model.hour_cap(e)))
        })
        .sum();
    if demand > supply {
        return Some(format!(
            "{}: forecast needs {} staff-hours but the roster can supply at most {} within availability and weekly hour caps",
            INFEASIBLE, demand, supply
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use shiftplan_core::{DemandSlot, Employee, HourRange, StaffingProblem};

    fn employee(id: &str, cap: u32, from: u8, to: u8) -> Employee {
        Employee::new(id)
            .max_hours_per_week(cap)
            .available(Weekday::Mon, HourRange::new(from, to))
    }

    fn model(forecast: Vec<DemandSlot>, employees: Vec<Employee>) -> ShiftModel {
        let mut p = StaffingProblem::new();
        p.forecast = forecast;
        p.employees = employees;
        ShiftModel::build(&p, 100).unwrap()
    }

    #[test]
    fn slot_short_of_eligible_staff() {
        let m = model(
            vec![DemandSlot::new(Weekday::Mon, 8, 5)],
            vec![employee("a", 40, 8, 20), employee("b", 40, 8, 20)],
        );
        assert_eq!(
            find_infeasibility(&m).unwrap(),
            "No feasible schedule found: Monday 08:00 needs 5 staff but only 2 employees are available"
        );
    }

    #[test]
    fn caps_short_of_total_demand() {
        let m = model(
            vec![
                DemandSlot::new(Weekday::Mon, 8, 1),
                DemandSlot::new(Weekday::Mon, 9, 1),
                DemandSlot::new(Weekday::Mon, 10, 1),
            ],
            vec![employee("a", 2, 8, 20)],
        );
        let reason = find_infeasibility(&m).unwrap();
        assert!(reason.starts_with(INFEASIBLE));
        assert!(reason.contains("needs 3 staff-hours"));
        assert!(reason.contains("at most 2"));
    }

    #[test]
    fn zero_demand_passes() {
        let m = model(vec![DemandSlot::new(Weekday::Mon, 3, 0)], vec![]);
        assert_eq!(find_infeasibility(&m), None);
    }

    #[test]
    fn necessary_conditions_hold() {
        let m = model(
            vec![DemandSlot::new(Weekday::Mon, 8, 1), DemandSlot::new(Weekday::Mon, 9, 1)],
            vec![employee("a", 1, 8, 10), employee("b", 1, 8, 10)],
        );
        assert_eq!(find_infeasibility(&m), None);
    }
}
