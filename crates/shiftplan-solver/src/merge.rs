//! Contiguous shift merging
//!
//! Pure post-pass: consecutive hours worked by the same employee on the same
//! day become one shift (`8:00-9:00` + `9:00-10:00` -> `8:00-10:00`). Output
//! is sorted by employee (first appearance), then day, then start hour.

use std::collections::HashMap;

use shiftplan_core::ScheduledShift;

pub fn merge_contiguous(shifts: &[ScheduledShift]) -> Vec<ScheduledShift> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for shift in shifts {
        let next = first_seen.len();
        first_seen.entry(shift.employee_id.as_str()).or_insert(next);
    }

    let mut sorted: Vec<&ScheduledShift> = shifts.iter().collect();
    sorted.sort_by_key(|s| {
        (
            first_seen[s.employee_id.as_str()],
            s.day.num_days_from_monday(),
            s.start_hour,
        )
    });

    let mut merged: Vec<ScheduledShift> = Vec::with_capacity(sorted.len());
    for shift in sorted {
        match merged.last_mut() {
            Some(last)
                if last.employee_id == shift.employee_id
                    && last.day == shift.day
                    && last.end_hour == shift.start_hour =>
            {
                last.end_hour = shift.end_hour;
            }
            _ => merged.push(shift.clone()),
        }
    }
    merged
}
