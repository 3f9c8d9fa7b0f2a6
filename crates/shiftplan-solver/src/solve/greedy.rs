//! Heuristic solver
//!
//! 1. **Construction**: slots are filled tightest-first (least eligible
//!    staff beyond the requirement), each with the cheapest eligible
//!    employees that still have hours left.
//! 2. **Repair**: when a slot runs out of candidates, an employee who is
//!    eligible but out of hours is moved off another slot, which is handed
//!    to someone with hours to spare.
//! 3. **Improvement**: an assignment is replaced by a cheaper eligible
//!    employee with hours left, or by a booked one whose other slot can be
//!    handed over more cheaply, until no move helps or the budget runs out.
//!
//! The result is reported against the coverage lower bound; it is only
//! `Optimal` when it meets that bound.

use tracing::debug;

use super::{classify, ShiftSolver, Solution, SolveOutcome};
use crate::limits::{SearchBudget, SolveLimits};
use crate::model::ShiftModel;
use crate::variables::Assignment;
use crate::SolverError;

/// Construction, repair and local improvement
#[derive(Clone, Copy, Debug)]
pub struct GreedySolver {
    improve: bool,
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedySolver {
    pub fn new() -> Self {
        Self { improve: true }
    }

    /// Skip the improvement phase
    pub fn construction_only() -> Self {
        Self { improve: false }
    }
}

struct State<'m> {
    model: &'m ShiftModel,
    assignment: Assignment,
    /// Hours assigned per employee
    load: Vec<u32>,
    /// Staff assigned per slot
    staffed: Vec<u32>,
}

impl<'m> State<'m> {
    fn new(model: &'m ShiftModel) -> Self {
        Self {
            model,
            assignment: model.empty_assignment(),
            load: vec![0; model.employee_count()],
            staffed: vec![0; model.slot_count()],
        }
    }

    fn has(&self, employee: usize, slot: usize) -> bool {
        self.assignment
            .get(self.model.variables.index_of(employee, slot))
    }

    fn has_spare(&self, employee: usize) -> bool {
        self.load[employee] < self.model.hour_cap(employee)
    }

    fn cost(&self, employee: usize) -> i64 {
        self.model.objective.employee_cost(employee)
    }

    fn assign(&mut self, employee: usize, slot: usize) {
        let var = self.model.variables.index_of(employee, slot);
        debug_assert!(!self.assignment.get(var));
        self.assignment.set(var, true);
        self.load[employee] += 1;
        self.staffed[slot] += 1;
    }

    fn unassign(&mut self, employee: usize, slot: usize) {
        let var = self.model.variables.index_of(employee, slot);
        debug_assert!(self.assignment.get(var));
        self.assignment.set(var, false);
        self.load[employee] -= 1;
        self.staffed[slot] -= 1;
    }

    /// Cheapest eligible employee not yet on `slot` with hours left.
    /// Ties go to the employee with the most hours left, then roster order.
    fn cheapest_candidate(&self, slot: usize) -> Option<usize> {
        self.model
            .eligible_employees(slot)
            .filter(|&e| !self.has(e, slot) && self.has_spare(e))
            .min_by_key(|&e| {
                let left = i64::from(self.model.hour_cap(e)) - i64::from(self.load[e]);
                (self.cost(e), -left, e)
            })
    }

    /// Cheapest employee who could take over `slot` from `leaving`
    fn cheapest_handover(&self, slot: usize, leaving: usize) -> Option<usize> {
        self.model
            .eligible_employees(slot)
            .filter(|&r| r != leaving && !self.has(r, slot) && self.has_spare(r))
            .min_by_key(|&r| (self.cost(r), r))
    }

    /// Cheapest way to put a fully booked, eligible employee on `slot`:
    /// `(booked, their other slot, who takes that slot over)`.
    fn cheapest_chain(&self, slot: usize, skip: Option<usize>) -> Option<(i64, usize, usize, usize)> {
        let mut best: Option<(i64, usize, usize, usize)> = None;
        for p in self.model.eligible_employees(slot) {
            if Some(p) == skip || self.has(p, slot) || self.has_spare(p) {
                continue;
            }
            for t in 0..self.model.slot_count() {
                if t == slot || !self.has(p, t) {
                    continue;
                }
                if let Some(q) = self.cheapest_handover(t, p) {
                    // p's own cost moves with p and cancels out.
                    let added = self.cost(q);
                    if best.map_or(true, |(c, ..)| added < c) {
                        best = Some((added, p, t, q));
                    }
                }
            }
        }
        best
    }

    fn apply_chain(&mut self, slot: usize, (_, p, t, q): (i64, usize, usize, usize)) {
        self.unassign(p, t);
        self.assign(q, t);
        self.assign(p, slot);
    }

    /// Fill every slot tightest-first, repairing with chain moves when a
    /// slot runs out of candidates. Returns the number of chain moves.
    fn construct(&mut self, budget: &SearchBudget<'_>) -> Result<usize, SolverError> {
        let model = self.model;
        let mut order: Vec<usize> = (0..model.slot_count())
            .filter(|&s| model.required(s) > 0)
            .collect();
        order.sort_by_key(|&s| {
            let slack =
                model.eligibility().eligible_staff(s) as i64 - i64::from(model.required(s));
            (slack, s)
        });

        let mut ejections = 0_usize;
        for s in order {
            budget.check()?;
            while self.staffed[s] < model.required(s) {
                if let Some(e) = self.cheapest_candidate(s) {
                    self.assign(e, s);
                } else if let Some(chain) = self.cheapest_chain(s, None) {
                    self.apply_chain(s, chain);
                    ejections += 1;
                } else {
                    debug!(slot = %model.slot(s).label(), "construction stuck");
                    return Err(SolverError::NoSolutionFound { strategy: "greedy" });
                }
            }
        }
        Ok(ejections)
    }

    /// One pass of cost-reducing moves over every assignment. Stops at the
    /// first slot boundary after the budget runs out. Returns the number of
    /// moves made.
    fn improve_pass(&mut self, budget: &SearchBudget<'_>) -> usize {
        let mut moves = 0;
        for s in 0..self.model.slot_count() {
            if budget.is_exhausted() {
                break;
            }
            for e in 0..self.model.employee_count() {
                if !self.has(e, s) {
                    continue;
                }
                if let Some(r) = self.cheapest_candidate(s) {
                    if self.cost(r) < self.cost(e) {
                        self.unassign(e, s);
                        self.assign(r, s);
                        moves += 1;
                        continue;
                    }
                }
                if let Some(chain) = self.cheapest_chain(s, Some(e)) {
                    if chain.0 < self.cost(e) {
                        self.unassign(e, s);
                        self.apply_chain(s, chain);
                        moves += 1;
                    }
                }
            }
        }
        moves
    }

    /// Repeat improvement passes until one makes no move or the budget runs
    /// out. The assignment stays feasible throughout.
    fn improve(&mut self, budget: &SearchBudget<'_>) -> usize {
        let mut moves = 0;
        while !budget.is_exhausted() {
            let n = self.improve_pass(budget);
            moves += n;
            if n == 0 {
                break;
            }
        }
        moves
    }
}

impl ShiftSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, model: &ShiftModel, limits: &SolveLimits) -> Result<SolveOutcome, SolverError> {
        let budget = SearchBudget::start(limits);
        let mut state = State::new(model);

        let ejections = state.construct(&budget)?;
        let moves = if self.improve {
            state.improve(&budget)
        } else {
            0
        };

        let objective_value = model.objective.value(&state.assignment);
        let lower_bound = model.coverage_lower_bound();
        debug!(
            objective_value,
            lower_bound,
            ejections,
            moves,
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "greedy search finished"
        );

        Ok(classify(Solution {
            assignment: state.assignment,
            objective_value,
            lower_bound,
        }))
    }
}
