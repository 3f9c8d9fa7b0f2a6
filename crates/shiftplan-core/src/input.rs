//! Request records and their validation
//!
//! A request arrives as loosely structured JSON. Every field is optional at
//! the serde level so that a missing field surfaces as a precise
//! `InputError::MissingField` instead of a generic deserialization error.
//! `ScheduleInput::validate` turns the records into a `StaffingProblem` or
//! fails before any model is built.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    day_name, parse_day, Availability, DemandSlot, Employee, EngineConfig, HourRange, InputError,
    StaffingProblem, HOURS_PER_DAY,
};

/// Employee identifier as sent by the caller: a string or an integer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One forecast entry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub day: Option<String>,
    pub hour: Option<i64>,
    #[serde(alias = "required_staff")]
    pub required_staff: Option<i64>,
    /// Informational only; not used by the optimizer
    #[serde(alias = "projected_sales")]
    pub projected_sales: Option<f64>,
}

/// One roster entry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "hourly_rate")]
    pub hourly_rate: Option<Decimal>,
    #[serde(alias = "max_hours_per_week")]
    pub max_hours_per_week: Option<i64>,
    /// Day name -> list of "HH:MM-HH:MM"; absent means never available
    pub availability: Option<BTreeMap<String, Vec<String>>>,
}

/// A scheduling request: forecast plus roster
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub forecast: Option<Vec<ForecastRecord>>,
    pub employees: Option<Vec<EmployeeRecord>>,
}

impl ScheduleInput {
    /// Parse a JSON request body
    pub fn from_json(s: &str) -> Result<Self, InputError> {
        serde_json::from_str(s).map_err(|e| InputError::Syntax(e.to_string()))
    }

    /// Check required fields and value ranges, producing the domain problem.
    pub fn validate(&self, config: &EngineConfig) -> Result<StaffingProblem, InputError> {
        let forecast = self.forecast.as_ref().ok_or(InputError::MissingField {
            record: "request",
            index: 0,
            field: "forecast",
        })?;
        let employees = self.employees.as_ref().ok_or(InputError::MissingField {
            record: "request",
            index: 0,
            field: "employees",
        })?;

        let mut problem = StaffingProblem::new();

        let mut seen_slots = HashSet::new();
        for (index, record) in forecast.iter().enumerate() {
            let slot = record.validate(index, config.default_required_staff)?;
            if !seen_slots.insert((slot.day, slot.hour)) {
                return Err(InputError::DuplicateSlot(slot.label()));
            }
            problem.forecast.push(slot);
        }

        let mut seen_ids = HashSet::new();
        for (index, record) in employees.iter().enumerate() {
            let employee = record.validate(index)?;
            if !seen_ids.insert(employee.id.clone()) {
                return Err(InputError::DuplicateEmployee(employee.id));
            }
            problem.employees.push(employee);
        }

        Ok(problem)
    }
}

impl ForecastRecord {
    fn validate(&self, index: usize, default_required_staff: u32) -> Result<DemandSlot, InputError> {
        const RECORD: &str = "forecast";

        let day_str = self.day.as_deref().ok_or(InputError::MissingField {
            record: RECORD,
            index,
            field: "day",
        })?;
        let day = parse_day(day_str).ok_or_else(|| InputError::InvalidValue {
            record: RECORD,
            index,
            field: "day",
            message: format!("'{}' is not a weekday", day_str),
        })?;

        let hour = self.hour.ok_or(InputError::MissingField {
            record: RECORD,
            index,
            field: "hour",
        })?;
        if !(0..i64::from(HOURS_PER_DAY)).contains(&hour) {
            return Err(InputError::InvalidValue {
                record: RECORD,
                index,
                field: "hour",
                message: format!("{} is outside 0-23", hour),
            });
        }

        let required_staff = match self.required_staff {
            None => default_required_staff,
            Some(n) => u32::try_from(n).map_err(|_| InputError::InvalidValue {
                record: RECORD,
                index,
                field: "requiredStaff",
                message: format!("{} is not a non-negative headcount", n),
            })?,
        };

        Ok(DemandSlot::new(day, hour as u8, required_staff))
    }
}

impl EmployeeRecord {
    fn validate(&self, index: usize) -> Result<Employee, InputError> {
        const RECORD: &str = "employee";
        let missing = |field| InputError::MissingField {
            record: RECORD,
            index,
            field,
        };

        let id = self.id.as_ref().ok_or_else(|| missing("id"))?.to_string();
        if id.trim().is_empty() {
            return Err(InputError::InvalidValue {
                record: RECORD,
                index,
                field: "id",
                message: "must not be empty".to_string(),
            });
        }
        let name = self.name.clone().ok_or_else(|| missing("name"))?;
        let role = self.role.clone().ok_or_else(|| missing("role"))?;

        let hourly_rate = self.hourly_rate.ok_or_else(|| missing("hourlyRate"))?;
        if hourly_rate < Decimal::ZERO {
            return Err(InputError::InvalidValue {
                record: RECORD,
                index,
                field: "hourlyRate",
                message: format!("{} is negative", hourly_rate),
            });
        }

        let max_hours = self
            .max_hours_per_week
            .ok_or_else(|| missing("maxHoursPerWeek"))?;
        let max_hours_per_week =
            u32::try_from(max_hours).map_err(|_| InputError::InvalidValue {
                record: RECORD,
                index,
                field: "maxHoursPerWeek",
                message: format!("{} is not a non-negative hour count", max_hours),
            })?;

        let mut availability = Availability::new();
        if let Some(days) = &self.availability {
            for (day_str, ranges) in days {
                let day = parse_day(day_str).ok_or_else(|| InputError::UnknownDay {
                    employee: id.clone(),
                    day: day_str.clone(),
                })?;
                for range in ranges {
                    let parsed: HourRange =
                        range.parse().map_err(|source| InputError::InvalidTimeRange {
                            employee: id.clone(),
                            day: day_name(day).to_string(),
                            range: range.clone(),
                            source,
                        })?;
                    availability.add(day, parsed);
                }
            }
        }

        Ok(Employee {
            id,
            name,
            role,
            hourly_rate,
            max_hours_per_week,
            availability,
        })
    }
}
