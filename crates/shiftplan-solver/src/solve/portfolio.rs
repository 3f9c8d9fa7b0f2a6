//! Parallel portfolio
//!
//! Runs every member solver on its own rayon worker against the same model
//! and limits, then keeps the strongest answer: a proof (optimal or
//! infeasible) beats a best-found schedule, a cheaper best-found schedule
//! beats a dearer one, and an error is only reported when every member
//! failed. Ties go to the earlier member.

use rayon::prelude::*;
use tracing::{debug, warn};

use super::{FlowSolver, GreedySolver, ShiftSolver, SolveOutcome};
use crate::limits::SolveLimits;
use crate::model::ShiftModel;
use crate::SolverError;

pub struct PortfolioSolver {
    members: Vec<Box<dyn ShiftSolver>>,
}

impl std::fmt::Debug for PortfolioSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|m| m.name()))
            .finish()
    }
}

impl PortfolioSolver {
    pub fn new(members: Vec<Box<dyn ShiftSolver>>) -> Self {
        Self { members }
    }

    /// Flow and greedy, plus CP when built with `cp-solver`
    pub fn with_default_members() -> Self {
        #[allow(unused_mut)]
        let mut members: Vec<Box<dyn ShiftSolver>> =
            vec![Box::new(FlowSolver::new()), Box::new(GreedySolver::new())];
        #[cfg(feature = "cp-solver")]
        members.push(Box::new(super::CpSolver::new()));
        Self::new(members)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Lower is better
fn rank(result: &Result<SolveOutcome, SolverError>) -> (u8, i64) {
    match result {
        Ok(SolveOutcome::Optimal(s)) => (0, s.objective_value),
        Ok(SolveOutcome::Infeasible { .. }) => (0, 0),
        Ok(SolveOutcome::Feasible(s)) => (1, s.objective_value),
        Err(_) => (2, 0),
    }
}

impl ShiftSolver for PortfolioSolver {
    fn name(&self) -> &'static str {
        "portfolio"
    }

    fn solve(&self, model: &ShiftModel, limits: &SolveLimits) -> Result<SolveOutcome, SolverError> {
        let results: Vec<(&'static str, Result<SolveOutcome, SolverError>)> = self
            .members
            .par_iter()
            .map(|member| (member.name(), member.solve(model, limits)))
            .collect();

        for (name, result) in &results {
            match result {
                Ok(outcome) => debug!(
                    member = name,
                    optimal = outcome.is_optimal(),
                    infeasible = outcome.is_infeasible(),
                    objective = ?outcome.objective_value(),
                    "portfolio member finished"
                ),
                Err(e) => debug!(member = name, error = %e, "portfolio member failed"),
            }
        }

        let proofs: Vec<bool> = results
            .iter()
            .filter_map(|(_, r)| match r {
                Ok(SolveOutcome::Optimal(_)) => Some(true),
                Ok(SolveOutcome::Infeasible { .. }) => Some(false),
                _ => None,
            })
            .collect();
        if proofs.windows(2).any(|w| w[0] != w[1]) {
            warn!("portfolio members disagree on feasibility");
            return Err(SolverError::Backend(
                "portfolio members disagree on feasibility".to_string(),
            ));
        }

        results
            .into_iter()
            .enumerate()
            .min_by_key(|(i, (_, r))| (rank(r), *i))
            .map(|(_, (_, r))| r)
            .unwrap_or(Err(SolverError::NoSolutionFound {
                strategy: "portfolio",
            }))
    }
}
