//! Constraint programming solver (pumpkin)
//!
//! Posts the model as a 0/1 integer program and minimises a cost variable
//! bounded below by the labor cost, using linear SAT-UNSAT search. Pinned
//! variables are never created. Requires the `cp-solver` feature.
//!
//! Coefficients must fit in `i32`; larger objectives fail with
//! `SolverError::Overflow` and should use the flow solver instead.

use std::time::Duration;

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::{DomainId, TransformableVariable};
use pumpkin_solver::Solver;
use tracing::debug;

use super::{ShiftSolver, Solution, SolveOutcome};
use crate::limits::{SearchBudget, SolveLimits};
use crate::model::ShiftModel;
use crate::precheck::INFEASIBLE;
use crate::variables::VarIndex;
use crate::SolverError;

/// Budget used when no time limit is configured
const UNLIMITED: Duration = Duration::from_secs(u32::MAX as u64);

#[derive(Clone, Copy, Debug, Default)]
pub struct CpSolver;

impl CpSolver {
    pub fn new() -> Self {
        Self
    }
}

fn to_i32(value: i64, what: &str) -> Result<i32, SolverError> {
    i32::try_from(value)
        .map_err(|_| SolverError::Overflow(format!("{} {} exceeds the CP integer range", what, value)))
}

fn infeasible() -> SolveOutcome {
    SolveOutcome::Infeasible {
        reason: format!(
            "{}: coverage cannot be met within availability and weekly hour caps",
            INFEASIBLE
        ),
    }
}

impl ShiftSolver for CpSolver {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn solve(&self, model: &ShiftModel, limits: &SolveLimits) -> Result<SolveOutcome, SolverError> {
        let budget = SearchBudget::start(limits);
        budget.check()?;

        let mut solver = Solver::default();
        let tag = solver.new_constraint_tag();

        let mut decisions: Vec<(VarIndex, DomainId)> = Vec::new();
        let mut by_var: Vec<Option<DomainId>> = vec![None; model.variables.len()];
        for (idx, var) in model.variables.iter() {
            if var.is_free() {
                let x = solver.new_bounded_integer(0, 1);
                decisions.push((idx, x));
                by_var[idx.0] = Some(x);
            }
        }

        // sum(x[., s]) >= required
        for s in 0..model.slot_count() {
            let terms: Vec<_> = model
                .variables
                .slot_vars(s)
                .filter_map(|v| by_var[v.0])
                .map(|x| x.scaled(1))
                .collect();
            let required = to_i32(i64::from(model.required(s)), "required staff")?;
            if terms.len() < required as usize {
                return Ok(infeasible());
            }
            if required > 0
                && solver
                    .add_constraint(cp::greater_than_or_equals(terms, required, tag))
                    .post()
                    .is_err()
            {
                return Ok(infeasible());
            }
        }

        // -sum(x[e, .]) >= -cap
        for e in 0..model.employee_count() {
            let terms: Vec<_> = model
                .variables
                .employee_vars(e)
                .filter_map(|v| by_var[v.0])
                .map(|x| x.scaled(-1))
                .collect();
            let cap = to_i32(i64::from(model.hour_cap(e)), "hour cap")?;
            if terms.len() > cap as usize
                && solver
                    .add_constraint(cp::greater_than_or_equals(terms, -cap, tag))
                    .post()
                    .is_err()
            {
                return Ok(infeasible());
            }
        }

        // cost - sum(c * x) >= 0
        let mut upper = 0_i64;
        let mut terms = Vec::with_capacity(decisions.len() + 1);
        for &(idx, x) in &decisions {
            let c = model.cost(idx);
            upper += c;
            terms.push(x.scaled(-to_i32(c, "hourly cost")?));
        }
        let cost = solver.new_bounded_integer(0, to_i32(upper, "labor cost bound")?);
        terms.push(cost.scaled(1));
        if solver
            .add_constraint(cp::greater_than_or_equals(terms, 0, tag))
            .post()
            .is_err()
        {
            return Ok(infeasible());
        }

        let mut brancher = solver.default_brancher();
        let mut termination = TimeBudget::starting_now(budget.remaining().unwrap_or(UNLIMITED));

        fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Minimise, cost, noop_callback),
        );

        let (values, proven): (Vec<bool>, bool) = match result {
            OptimisationResult::Optimal(solution) => (
                decisions
                    .iter()
                    .map(|&(_, x)| solution.get_integer_value(x) == 1)
                    .collect(),
                true,
            ),
            OptimisationResult::Satisfiable(solution) => (
                decisions
                    .iter()
                    .map(|&(_, x)| solution.get_integer_value(x) == 1)
                    .collect(),
                false,
            ),
            OptimisationResult::Unsatisfiable => return Ok(infeasible()),
            OptimisationResult::Unknown => {
                budget.check()?;
                return Err(SolverError::LimitReached(
                    limits.time_limit.unwrap_or(UNLIMITED),
                ));
            }
        };

        let mut assignment = model.empty_assignment();
        for (&(idx, _), value) in decisions.iter().zip(values) {
            assignment.set(idx, value);
        }
        let objective_value = model.objective.value(&assignment);
        let lower_bound = if proven {
            objective_value
        } else {
            model.coverage_lower_bound()
        };

        debug!(
            objective_value,
            lower_bound,
            proven,
            variables = decisions.len(),
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "cp search finished"
        );

        let solution = Solution {
            assignment,
            objective_value,
            lower_bound,
        };
        Ok(if proven {
            SolveOutcome::Optimal(solution)
        } else {
            super::classify(solution)
        })
    }
}
