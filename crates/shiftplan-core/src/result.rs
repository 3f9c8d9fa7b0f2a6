//! Schedule results
//!
//! `Schedule` is the rich, in-process view of a solved week. `ScheduleResult`
//! is the payload handed back to the caller:
//!
//! ```json
//! {"status": "success", "generated_schedule": [{"name": "Bob", "role": "Crew",
//!   "shift": "8:00-9:00", "day": "Monday"}], "health_score": 100,
//!   "labor_cost": 15.0, "total_hours": 1, "optimality": "proven"}
//! ```
//!
//! or `{"status": "failed", "reason": "..."}` when no feasible schedule exists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{day_name, Day, EmployeeId};

/// Health score reported for a proven-optimal schedule
pub const OPTIMAL_HEALTH_SCORE: u8 = 100;

/// How strong the cost claim of a schedule is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimality {
    /// No cheaper feasible schedule exists under the integer objective.
    ///
    /// The objective truncates hourly rates to `cost_precision` decimal
    /// places, so rates differing only beyond that precision count as equal
    /// and `labor_cost` may exceed the exact minimum by that residue.
    Proven,
    /// Feasible, but the search stopped before proving optimality
    BestFound,
}

/// A block of consecutive hours worked by one employee on one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledShift {
    pub employee_id: EmployeeId,
    pub name: String,
    pub role: String,
    pub day: Day,
    pub start_hour: u8,
    /// Exclusive
    pub end_hour: u8,
}

impl ScheduledShift {
    /// Number of hours covered
    pub fn hours(&self) -> u32 {
        u32::from(self.end_hour.saturating_sub(self.start_hour))
    }

    /// Hour range label, e.g. "8:00-9:00"
    pub fn label(&self) -> String {
        format!("{}:00-{}:00", self.start_hour, self.end_hour)
    }
}

/// A solved week
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Shifts, employees in roster order then slots in forecast order
    pub shifts: Vec<ScheduledShift>,
    /// Sum of hours worked times exact hourly rate
    pub labor_cost: Decimal,
    /// Objective value in minor cost units
    pub objective_value: i64,
    /// Cost no feasible schedule can undercut, in minor cost units
    pub lower_bound: i64,
    /// Total staff-hours assigned
    pub total_hours: u32,
    /// 100 when proven optimal, lower for best-found schedules
    pub health_score: u8,
    pub optimality: Optimality,
}

impl Schedule {
    pub fn is_proven_optimal(&self) -> bool {
        self.optimality == Optimality::Proven
    }

    /// Hours assigned to an employee
    pub fn hours_for(&self, employee_id: &str) -> u32 {
        self.shifts
            .iter()
            .filter(|s| s.employee_id == employee_id)
            .map(ScheduledShift::hours)
            .sum()
    }

    /// Headcount working `hour` on `day`
    pub fn headcount(&self, day: Day, hour: u8) -> usize {
        self.shifts
            .iter()
            .filter(|s| s.day == day && s.start_hour <= hour && hour < s.end_hour)
            .count()
    }
}

/// One line of the generated schedule as shown to the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedShift {
    pub name: String,
    pub role: String,
    /// Hour range label, e.g. "8:00-9:00"
    pub shift: String,
    /// Full weekday name, e.g. "Monday"
    pub day: String,
}

impl From<&ScheduledShift> for GeneratedShift {
    fn from(shift: &ScheduledShift) -> Self {
        Self {
            name: shift.name.clone(),
            role: shift.role.clone(),
            shift: shift.label(),
            day: day_name(shift.day).to_string(),
        }
    }
}

/// Result payload of one scheduling invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScheduleResult {
    Success {
        generated_schedule: Vec<GeneratedShift>,
        health_score: u8,
        #[serde(with = "rust_decimal::serde::float")]
        labor_cost: Decimal,
        total_hours: u32,
        optimality: Optimality,
    },
    Failed {
        reason: String,
    },
}

impl ScheduleResult {
    pub fn failed(reason: impl Into<String>) -> Self {
        ScheduleResult::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScheduleResult::Success { .. })
    }

    /// Failure reason, if the result is a failure
    pub fn reason(&self) -> Option<&str> {
        match self {
            ScheduleResult::Failed { reason } => Some(reason),
            ScheduleResult::Success { .. } => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Schedule> for ScheduleResult {
    fn from(schedule: &Schedule) -> Self {
        ScheduleResult::Success {
            generated_schedule: schedule.shifts.iter().map(GeneratedShift::from).collect(),
            health_score: schedule.health_score,
            labor_cost: schedule.labor_cost,
            total_hours: schedule.total_hours,
            optimality: schedule.optimality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn shift(id: &str, day: Day, start: u8, end: u8) -> ScheduledShift {
        ScheduledShift {
            employee_id: id.into(),
            name: id.to_uppercase(),
            role: "Crew".into(),
            day,
            start_hour: start,
            end_hour: end,
        }
    }

    fn schedule() -> Schedule {
        Schedule {
            shifts: vec![
                shift("bob", Weekday::Mon, 8, 9),
                shift("bob", Weekday::Mon, 9, 10),
                shift("cat", Weekday::Mon, 9, 12),
            ],
            labor_cost: dec!(75),
            objective_value: 7500,
            lower_bound: 7500,
            total_hours: 5,
            health_score: OPTIMAL_HEALTH_SCORE,
            optimality: Optimality::Proven,
        }
    }

    #[test]
    fn shift_label_has_no_padding() {
        let s = shift("bob", Weekday::Mon, 8, 9);
        assert_eq!(s.label(), "8:00-9:00");
        assert_eq!(s.hours(), 1);
        assert_eq!(shift("bob", Weekday::Mon, 9, 17).label(), "9:00-17:00");
    }

    #[test]
    fn schedule_queries() {
        let s = schedule();
        assert!(s.is_proven_optimal());
        assert_eq!(s.hours_for("bob"), 2);
        assert_eq!(s.hours_for("cat"), 3);
        assert_eq!(s.headcount(Weekday::Mon, 9), 2);
        assert_eq!(s.headcount(Weekday::Mon, 12), 0);
    }

    #[test]
    fn success_payload_shape() {
        let result = ScheduleResult::from(&schedule());
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["health_score"], 100);
        assert_eq!(value["labor_cost"].as_f64(), Some(75.0));
        assert_eq!(value["total_hours"], 5);
        assert_eq!(value["optimality"], "proven");
        assert_eq!(
            value["generated_schedule"][0],
            serde_json::json!({"name": "BOB", "role": "Crew", "shift": "8:00-9:00", "day": "Monday"})
        );
    }

    #[test]
    fn failed_payload_shape() {
        let result = ScheduleResult::failed("No feasible schedule found");
        assert!(!result.is_success());
        assert_eq!(result.reason(), Some("No feasible schedule found"));
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"status":"failed","reason":"No feasible schedule found"}"#
        );
    }
}
