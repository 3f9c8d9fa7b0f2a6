//! Labor cost objective
//!
//! Minimise `sum(rate_units(e) * x[e][s])` over all decision variables.
//! Rates are scaled by `10^cost_precision` and truncated toward zero, so the
//! objective is integral; the reported labor cost uses the exact rates.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shiftplan_core::StaffingProblem;

use crate::variables::{Assignment, VarIndex, VariableModel};
use crate::SolverError;

/// Truncate a rate to integer objective units
pub fn rate_units(rate: Decimal, scale: i64) -> Result<i64, SolverError> {
    rate.checked_mul(Decimal::from(scale))
        .and_then(|v| v.trunc().to_i64())
        .ok_or_else(|| {
            SolverError::Overflow(format!(
                "hourly rate {} does not fit the objective at scale {}",
                rate, scale
            ))
        })
}

/// Integer linear objective over the decision variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearObjective {
    coefficients: Vec<i64>,
    employee_units: Vec<i64>,
    scale: i64,
}

impl LinearObjective {
    pub fn build(
        problem: &StaffingProblem,
        variables: &VariableModel,
        scale: i64,
    ) -> Result<Self, SolverError> {
        if let Some(e) = problem
            .employees
            .iter()
            .find(|e| e.hourly_rate < Decimal::ZERO)
        {
            return Err(SolverError::InvalidModel(format!(
                "employee '{}' has a negative hourly rate",
                e.id
            )));
        }
        let employee_units = problem
            .employees
            .iter()
            .map(|e| rate_units(e.hourly_rate, scale))
            .collect::<Result<Vec<_>, _>>()?;

        // Every employee working every slot must still fit in i64.
        let slots = i64::try_from(variables.slot_count()).unwrap_or(i64::MAX);
        employee_units.iter().try_fold(0_i64, |acc, &u| {
            u.checked_mul(slots)
                .and_then(|row| acc.checked_add(row))
                .ok_or_else(|| SolverError::Overflow("total labor cost exceeds i64".to_string()))
        })?;

        let coefficients = variables
            .iter()
            .map(|(_, v)| employee_units[v.employee])
            .collect();

        Ok(Self {
            coefficients,
            employee_units,
            scale,
        })
    }

    /// Cost of one variable being true
    pub fn coefficient(&self, index: VarIndex) -> i64 {
        self.coefficients[index.0]
    }

    /// Cost of one hour of an employee
    pub fn employee_cost(&self, employee: usize) -> i64 {
        self.employee_units[employee]
    }

    /// Units per currency unit
    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn value(&self, assignment: &Assignment) -> i64 {
        assignment
            .true_indices()
            .map(|v| self.coefficient(v))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::EligibilityMatrix;
    use chrono::Weekday;
    use rust_decimal_macros::dec;
    use shiftplan_core::{DemandSlot, Employee, HourRange};

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(rate_units(dec!(15.999), 1).unwrap(), 15);
        assert_eq!(rate_units(dec!(15.999), 100).unwrap(), 1599);
        assert_eq!(rate_units(dec!(12.5), 100).unwrap(), 1250);
        assert_eq!(rate_units(dec!(0), 100).unwrap(), 0);
    }

    #[test]
    fn huge_rate_overflows() {
        let err = rate_units(dec!(79228162514264337593543950335), 1_000_000).unwrap_err();
        assert!(matches!(err, SolverError::Overflow(_)));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut p = StaffingProblem::new();
        p.employees = vec![Employee::new("a").hourly_rate(dec!(-1))];
        let vars = VariableModel::build(&p, &EligibilityMatrix::evaluate(&p));
        assert!(matches!(
            LinearObjective::build(&p, &vars, 100),
            Err(SolverError::InvalidModel(_))
        ));
    }

    #[test]
    fn value_sums_true_variables() {
        let mut p = StaffingProblem::new();
        p.forecast = vec![
            DemandSlot::new(Weekday::Mon, 8, 1),
            DemandSlot::new(Weekday::Mon, 9, 1),
        ];
        p.employees = vec![
            Employee::new("a")
                .hourly_rate(dec!(10.25))
                .available(Weekday::Mon, HourRange::new(8, 10)),
            Employee::new("b")
                .hourly_rate(dec!(20))
                .available(Weekday::Mon, HourRange::new(8, 10)),
        ];
        let vars = VariableModel::build(&p, &EligibilityMatrix::evaluate(&p));
        let obj = LinearObjective::build(&p, &vars, 100).unwrap();

        let mut a = Assignment::empty(vars.len());
        a.set(vars.index_of(0, 0), true);
        a.set(vars.index_of(0, 1), true);
        a.set(vars.index_of(1, 1), true);
        assert_eq!(obj.value(&a), 1025 + 1025 + 2000);
        assert_eq!(obj.employee_cost(1), 2000);
        assert_eq!(obj.scale(), 100);
    }
}
