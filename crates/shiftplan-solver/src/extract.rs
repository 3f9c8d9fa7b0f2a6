//! Solution extraction
//!
//! Turns a solved assignment into a `Schedule`: one single-hour shift per
//! true variable, employees in roster order then slots in forecast order.

use rust_decimal::Decimal;
use shiftplan_core::{Optimality, Schedule, ScheduledShift, StaffingProblem};

use crate::model::ShiftModel;
use crate::solve::Solution;

/// Health score of a solution.
///
/// 100 when proven optimal; otherwise `floor(100 * lower_bound / objective)`,
/// capped at 99 so a best-found schedule never looks proven.
pub fn health_score(objective_value: i64, lower_bound: i64, optimality: Optimality) -> u8 {
    match optimality {
        Optimality::Proven => shiftplan_core::result::OPTIMAL_HEALTH_SCORE,
        Optimality::BestFound if objective_value <= 0 => 99,
        Optimality::BestFound => {
            let ratio = i128::from(lower_bound.max(0)) * 100 / i128::from(objective_value);
            ratio.min(99) as u8
        }
    }
}

pub fn extract_schedule(
    problem: &StaffingProblem,
    model: &ShiftModel,
    solution: &Solution,
    optimality: Optimality,
) -> Schedule {
    let mut labor_cost = Decimal::ZERO;
    let shifts: Vec<ScheduledShift> = solution
        .assignment
        .true_indices()
        .map(|idx| {
            let var = model.variables.get(idx);
            let employee = &problem.employees[var.employee];
            let slot = model.slot(var.slot);
            labor_cost += employee.hourly_rate;
            ScheduledShift {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                role: employee.role.clone(),
                day: slot.day,
                start_hour: slot.hour,
                end_hour: slot.hour + 1,
            }
        })
        .collect();

    Schedule {
        total_hours: shifts.len() as u32,
        shifts,
        labor_cost,
        objective_value: solution.objective_value,
        lower_bound: solution.lower_bound,
        health_score: health_score(solution.objective_value, solution.lower_bound, optimality),
        optimality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use shiftplan_core::{DemandSlot, Employee, HourRange};

    #[test]
    fn health_scores() {
        assert_eq!(health_score(420, 420, Optimality::Proven), 100);
        assert_eq!(health_score(500, 400, Optimality::BestFound), 80);
        assert_eq!(health_score(401, 400, Optimality::BestFound), 99);
        assert_eq!(health_score(300, 0, Optimality::BestFound), 0);
        assert_eq!(health_score(0, 0, Optimality::BestFound), 99);
    }

    #[test]
    fn one_shift_per_true_variable_in_roster_order() {
        let mut p = StaffingProblem::new();
        p.forecast = vec![
            DemandSlot::new(Weekday::Tue, 23, 1),
            DemandSlot::new(Weekday::Mon, 8, 1),
        ];
        p.employees = vec![
            Employee::new("1")
                .name("Alice")
                .role("Manager")
                .hourly_rate(dec!(30.50))
                .max_hours_per_week(10)
                .available(Weekday::Tue, HourRange::new(0, 24)),
            Employee::new("2")
                .name("Bob")
                .role("Crew")
                .hourly_rate(dec!(15))
                .max_hours_per_week(10)
                .available(Weekday::Mon, HourRange::new(0, 24))
                .available(Weekday::Tue, HourRange::new(0, 24)),
        ];
        let model = ShiftModel::build(&p, 100).unwrap();
        let mut assignment = model.empty_assignment();
        assignment.set(model.variables.index_of(1, 1), true);
        assignment.set(model.variables.index_of(1, 0), true);
        assignment.set(model.variables.index_of(0, 0), true);
        let solution = Solution {
            objective_value: model.objective.value(&assignment),
            lower_bound: 0,
            assignment,
        };

        let schedule = extract_schedule(&p, &model, &solution, Optimality::BestFound);
        let labels: Vec<_> = schedule
            .shifts
            .iter()
            .map(|s| (s.name.as_str(), s.day, s.label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Alice", Weekday::Tue, "23:00-24:00".to_string()),
                ("Bob", Weekday::Tue, "23:00-24:00".to_string()),
                ("Bob", Weekday::Mon, "8:00-9:00".to_string()),
            ]
        );
        assert_eq!(schedule.labor_cost, dec!(60.50));
        assert_eq!(schedule.objective_value, 6050);
        assert_eq!(schedule.total_hours, 3);
        assert_eq!(schedule.health_score, 0);
    }
}
