//! Decision variables
//!
//! One boolean variable per (employee, slot) pair of the full cross product.
//! Pairs the employee cannot work are kept, pinned to false, so that every
//! per-slot and per-employee sum ranges over a complete index space.

use std::collections::HashMap;

use shiftplan_core::{day_name, Day, EmployeeId, StaffingProblem};

use crate::availability::EligibilityMatrix;

/// Dense index of a decision variable: `employee * slot_count + slot`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIndex(pub usize);

/// Identity of a variable, derivable from the input alone
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableKey {
    pub employee_id: EmployeeId,
    pub day: Day,
    pub hour: u8,
}

impl std::fmt::Display for VariableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shift_e{}_d{}_h{}",
            self.employee_id,
            day_name(self.day),
            self.hour
        )
    }
}

/// A boolean decision: does `employee` work `slot`?
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionVariable {
    pub key: VariableKey,
    /// Position of the employee in the roster
    pub employee: usize,
    /// Position of the slot in the forecast
    pub slot: usize,
    /// `Some(false)` when the employee is unavailable for the slot
    pub fixed: Option<bool>,
}

impl DecisionVariable {
    /// Whether the solver may choose this variable's value
    pub fn is_free(&self) -> bool {
        self.fixed.is_none()
    }
}

/// All decision variables of one problem
#[derive(Clone, Debug)]
pub struct VariableModel {
    employee_count: usize,
    slot_count: usize,
    variables: Vec<DecisionVariable>,
    by_key: HashMap<VariableKey, VarIndex>,
}

impl VariableModel {
    pub fn build(problem: &StaffingProblem, eligibility: &EligibilityMatrix) -> Self {
        let employee_count = problem.employees.len();
        let slot_count = problem.forecast.len();
        let mut variables = Vec::with_capacity(employee_count * slot_count);
        let mut by_key = HashMap::with_capacity(employee_count * slot_count);

        for (e, employee) in problem.employees.iter().enumerate() {
            for (s, slot) in problem.forecast.iter().enumerate() {
                let key = VariableKey {
                    employee_id: employee.id.clone(),
                    day: slot.day,
                    hour: slot.hour,
                };
                by_key.insert(key.clone(), VarIndex(variables.len()));
                variables.push(DecisionVariable {
                    key,
                    employee: e,
                    slot: s,
                    fixed: (!eligibility.is_eligible(e, s)).then_some(false),
                });
            }
        }

        Self {
            employee_count,
            slot_count,
            variables,
            by_key,
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn employee_count(&self) -> usize {
        self.employee_count
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Index of the variable for (employee, slot) positions
    pub fn index_of(&self, employee: usize, slot: usize) -> VarIndex {
        debug_assert!(employee < self.employee_count && slot < self.slot_count);
        VarIndex(employee * self.slot_count + slot)
    }

    pub fn get(&self, index: VarIndex) -> &DecisionVariable {
        &self.variables[index.0]
    }

    /// Look a variable up by its identity
    pub fn lookup(&self, key: &VariableKey) -> Option<VarIndex> {
        self.by_key.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarIndex, &DecisionVariable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VarIndex(i), v))
    }

    /// Variables of one employee, in slot order
    pub fn employee_vars(&self, employee: usize) -> impl Iterator<Item = VarIndex> + '_ {
        (0..self.slot_count).map(move |s| self.index_of(employee, s))
    }

    /// Variables of one slot, in roster order
    pub fn slot_vars(&self, slot: usize) -> impl Iterator<Item = VarIndex> + '_ {
        (0..self.employee_count).map(move |e| self.index_of(e, slot))
    }

    /// Number of variables not pinned by availability
    pub fn free_count(&self) -> usize {
        self.variables.iter().filter(|v| v.is_free()).count()
    }
}

/// A value for every decision variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    /// All variables false
    pub fn empty(len: usize) -> Self {
        Self {
            values: vec![false; len],
        }
    }

    pub fn get(&self, index: VarIndex) -> bool {
        self.values[index.0]
    }

    pub fn set(&mut self, index: VarIndex, value: bool) {
        self.values[index.0] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Indices of variables valued true, ascending
    pub fn true_indices(&self) -> impl Iterator<Item = VarIndex> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| VarIndex(i))
    }

    pub fn count_true(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }
}
