//! # shiftplan-core
//!
//! Core domain model for the shiftplan workforce scheduling engine.
//!
//! This crate provides:
//! - Domain types: `Employee`, `DemandSlot`, `Availability`, `StaffingProblem`
//! - Input records and their validation (`input`)
//! - The result payload handed back to the caller (`result`)
//! - Engine configuration (`config`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::Weekday;
//! use rust_decimal::Decimal;
//! use shiftplan_core::{DemandSlot, Employee, HourRange, StaffingProblem};
//!
//! let mut problem = StaffingProblem::new();
//! problem.employees.push(
//!     Employee::new("1")
//!         .name("Bob")
//!         .role("Crew")
//!         .hourly_rate(Decimal::from(15))
//!         .max_hours_per_week(40)
//!         .available(Weekday::Mon, HourRange::new(8, 20)),
//! );
//! problem.forecast.push(DemandSlot::new(Weekday::Mon, 8, 1));
//!
//! assert_eq!(problem.total_demand(), 1);
//! assert!(problem.employees[0].is_available(Weekday::Mon, 8));
//! ```

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub mod config;
pub mod input;
pub mod result;

pub use config::{ConfigError, EngineConfig, SolverStrategy};
pub use input::{EmployeeRecord, ForecastRecord, RecordId, ScheduleInput};
pub use result::{GeneratedShift, Optimality, Schedule, ScheduleResult, ScheduledShift};

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for an employee
pub type EmployeeId = String;

/// Day of the week a demand slot belongs to
pub type Day = Weekday;

/// Number of hours in a day; slot hours are `0..HOURS_PER_DAY`
pub const HOURS_PER_DAY: u8 = 24;

/// All weekdays, Monday first
pub const WEEK: [Day; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday, as used on the wire ("Monday")
pub fn day_name(day: Day) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday name. Accepts full or abbreviated English names in any case.
pub fn parse_day(s: &str) -> Option<Day> {
    s.trim().parse::<Weekday>().ok()
}

// ============================================================================
// Availability
// ============================================================================

/// Error parsing an `HH:MM-HH:MM` availability range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("expected HH:MM-HH:MM")]
    MissingSeparator,

    #[error("'{0}' is not a HH:MM time")]
    InvalidTime(String),

    #[error("hour {0} is outside 0-24")]
    HourOutOfRange(u32),

    #[error("'{0}' is not on the hour (only :00 is supported)")]
    NotOnTheHour(String),
}

/// Whole-hour time window within a day, `end` exclusive.
///
/// A range with `start > end` is kept as given and contains no hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u8,
    pub end: u8,
}

impl HourRange {
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// Whether `hour` falls within `[start, end)`
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Number of whole hours covered (0 for degenerate ranges)
    pub fn hours(&self) -> u8 {
        self.end.saturating_sub(self.start)
    }

    /// True when `start > end`
    pub fn is_degenerate(&self) -> bool {
        self.start > self.end
    }
}

fn parse_clock_hour(s: &str) -> Result<u8, TimeRangeError> {
    let s = s.trim();
    let (hh, mm) = s
        .split_once(':')
        .ok_or_else(|| TimeRangeError::InvalidTime(s.to_string()))?;
    if hh.is_empty() || mm.len() != 2 {
        return Err(TimeRangeError::InvalidTime(s.to_string()));
    }
    let hour: u32 = hh
        .parse()
        .map_err(|_| TimeRangeError::InvalidTime(s.to_string()))?;
    let minutes: u32 = mm
        .parse()
        .map_err(|_| TimeRangeError::InvalidTime(s.to_string()))?;
    if minutes != 0 {
        return Err(TimeRangeError::NotOnTheHour(s.to_string()));
    }
    if hour > u32::from(HOURS_PER_DAY) {
        return Err(TimeRangeError::HourOutOfRange(hour));
    }
    Ok(hour as u8)
}

impl FromStr for HourRange {
    type Err = TimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or(TimeRangeError::MissingSeparator)?;
        Ok(Self {
            start: parse_clock_hour(start)?,
            end: parse_clock_hour(end)?,
        })
    }
}

impl std::fmt::Display for HourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

/// Weekly availability: an ordered list of hour ranges per weekday
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    days: [Vec<HourRange>; 7],
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a range for a day, keeping the given order
    pub fn add(&mut self, day: Day, range: HourRange) {
        self.days[day.num_days_from_monday() as usize].push(range);
    }

    /// Ranges declared for a day, in declaration order
    pub fn ranges(&self, day: Day) -> &[HourRange] {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// Whether any range on `day` contains `hour`
    pub fn covers(&self, day: Day, hour: u8) -> bool {
        self.ranges(day).iter().any(|r| r.contains(hour))
    }

    /// True when no range is declared on any day
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

// ============================================================================
// Employee
// ============================================================================

/// A schedulable member of staff
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier
    pub id: EmployeeId,
    /// Display name
    pub name: String,
    /// Job role (e.g. "Crew", "Manager")
    pub role: String,
    /// Wage per hour worked, non-negative
    pub hourly_rate: Decimal,
    /// Upper bound on hours assigned in the week
    pub max_hours_per_week: u32,
    /// When the employee can work
    pub availability: Availability,
}

impl Employee {
    /// Create an employee with the given ID, no availability and no hours
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            role: String::new(),
            hourly_rate: Decimal::ZERO,
            max_hours_per_week: 0,
            availability: Availability::new(),
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the hourly rate
    pub fn hourly_rate(mut self, rate: Decimal) -> Self {
        self.hourly_rate = rate;
        self
    }

    /// Set the weekly hour cap
    pub fn max_hours_per_week(mut self, hours: u32) -> Self {
        self.max_hours_per_week = hours;
        self
    }

    /// Add an availability window
    pub fn available(mut self, day: Day, range: HourRange) -> Self {
        self.availability.add(day, range);
        self
    }

    /// Whether the employee can work `hour` on `day`
    pub fn is_available(&self, day: Day, hour: u8) -> bool {
        self.availability.covers(day, hour)
    }
}

// ============================================================================
// Demand
// ============================================================================

/// Staffing requirement for one hour of one day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandSlot {
    pub day: Day,
    /// Hour of day, 0-23
    pub hour: u8,
    /// Minimum headcount
    pub required_staff: u32,
}

impl DemandSlot {
    pub const fn new(day: Day, hour: u8, required_staff: u32) -> Self {
        Self {
            day,
            hour,
            required_staff,
        }
    }

    /// Human-readable label, e.g. "Monday 08:00"
    pub fn label(&self) -> String {
        format!("{} {:02}:00", day_name(self.day), self.hour)
    }
}

/// One week of demand and the roster available to cover it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffingProblem {
    /// Demand slots, in forecast order
    pub forecast: Vec<DemandSlot>,
    /// Employees, in roster order
    pub employees: Vec<Employee>,
}

impl StaffingProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an employee by ID
    pub fn get_employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Sum of required staff over all slots (staff-hours)
    pub fn total_demand(&self) -> u64 {
        self.forecast.iter().map(|s| u64::from(s.required_staff)).sum()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Input record that failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("request is not valid JSON: {0}")]
    Syntax(String),

    #[error("{record} #{index}: missing required field '{field}'")]
    MissingField {
        record: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{record} #{index}: invalid '{field}': {message}")]
    InvalidValue {
        record: &'static str,
        index: usize,
        field: &'static str,
        message: String,
    },

    #[error("employee '{employee}': invalid availability range '{range}' on {day}: {source}")]
    InvalidTimeRange {
        employee: EmployeeId,
        day: String,
        range: String,
        source: TimeRangeError,
    },

    #[error("employee '{employee}': unknown day '{day}' in availability")]
    UnknownDay { employee: EmployeeId, day: String },

    #[error("duplicate employee id '{0}'")]
    DuplicateEmployee(EmployeeId),

    #[error("duplicate demand slot {0}")]
    DuplicateSlot(String),
}

/// Error aborting a scheduling invocation.
///
/// An infeasible problem is not an error: it is reported as a failed
/// `ScheduleResult`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed input: {0}")]
    InputMalformed(#[from] InputError),

    #[error("Solver internal error: {0}")]
    SolverInternal(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub fn is_input_malformed(&self) -> bool {
        matches!(self, EngineError::InputMalformed(_))
    }

    pub fn is_solver_internal(&self) -> bool {
        matches!(self, EngineError::SolverInternal(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn hour_range_parse() {
        let r: HourRange = "08:00-16:00".parse().unwrap();
        assert_eq!(r, HourRange::new(8, 16));
        assert_eq!(r.hours(), 8);
        assert!(r.contains(8));
        assert!(r.contains(15));
        assert!(!r.contains(16));
        assert!(!r.contains(7));
    }

    #[test]
    fn hour_range_allows_midnight_end() {
        let r: HourRange = "18:00-24:00".parse().unwrap();
        assert_eq!(r, HourRange::new(18, 24));
        assert!(r.contains(23));
    }

    #[test]
    fn hour_range_rejects_garbage() {
        assert_eq!(
            "0800".parse::<HourRange>(),
            Err(TimeRangeError::MissingSeparator)
        );
        assert_eq!(
            "8-16".parse::<HourRange>(),
            Err(TimeRangeError::InvalidTime("8".into()))
        );
        assert_eq!(
            "08:30-16:00".parse::<HourRange>(),
            Err(TimeRangeError::NotOnTheHour("08:30".into()))
        );
        assert_eq!(
            "08:00-25:00".parse::<HourRange>(),
            Err(TimeRangeError::HourOutOfRange(25))
        );
        assert!("ab:00-10:00".parse::<HourRange>().is_err());
    }

    #[test]
    fn degenerate_range_has_no_hours() {
        let r: HourRange = "20:00-08:00".parse().unwrap();
        assert!(r.is_degenerate());
        assert_eq!(r.hours(), 0);
        assert!((0..HOURS_PER_DAY).all(|h| !r.contains(h)));
    }

    #[test]
    fn availability_per_day() {
        let e = Employee::new("1")
            .available(Weekday::Mon, HourRange::new(8, 12))
            .available(Weekday::Mon, HourRange::new(14, 18));

        assert!(e.is_available(Weekday::Mon, 9));
        assert!(!e.is_available(Weekday::Mon, 12));
        assert!(e.is_available(Weekday::Mon, 17));
        assert!(!e.is_available(Weekday::Tue, 9));
        assert_eq!(e.availability.ranges(Weekday::Mon).len(), 2);
    }

    #[test]
    fn empty_availability() {
        let e = Employee::new("ghost");
        assert!(e.availability.is_empty());
        assert!(WEEK
            .iter()
            .all(|&d| (0..HOURS_PER_DAY).all(|h| !e.is_available(d, h))));
    }

    #[test]
    fn day_names_round_trip() {
        for day in WEEK {
            assert_eq!(parse_day(day_name(day)), Some(day));
        }
        assert_eq!(parse_day("mon"), Some(Weekday::Mon));
        assert_eq!(parse_day(" Friday "), Some(Weekday::Fri));
        assert_eq!(parse_day("Funday"), None);
    }

    #[test]
    fn employee_builder() {
        let e = Employee::new("7")
            .name("Alice")
            .role("Manager")
            .hourly_rate(dec!(30))
            .max_hours_per_week(40);

        assert_eq!(e.id, "7");
        assert_eq!(e.name, "Alice");
        assert_eq!(e.role, "Manager");
        assert_eq!(e.hourly_rate, dec!(30));
        assert_eq!(e.max_hours_per_week, 40);
    }

    #[test]
    fn problem_total_demand() {
        let mut p = StaffingProblem::new();
        p.forecast.push(DemandSlot::new(Weekday::Mon, 8, 2));
        p.forecast.push(DemandSlot::new(Weekday::Mon, 9, 3));
        p.employees.push(Employee::new("a"));

        assert_eq!(p.total_demand(), 5);
        assert!(p.get_employee("a").is_some());
        assert!(p.get_employee("b").is_none());
        assert_eq!(p.forecast[0].label(), "Monday 08:00");
    }

    #[test]
    fn engine_error_classification() {
        let err = EngineError::from(InputError::DuplicateEmployee("1".into()));
        assert!(err.is_input_malformed());
        assert!(!err.is_solver_internal());
        assert_eq!(
            err.to_string(),
            "Malformed input: duplicate employee id '1'"
        );

        let err = EngineError::SolverInternal("time limit reached".into());
        assert!(err.is_solver_internal());
    }
}
