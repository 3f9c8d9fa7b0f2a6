//! Search strategies
//!
//! Every strategy implements [`ShiftSolver`] over the same [`ShiftModel`]:
//!
//! - [`FlowSolver`]: exact min-cost flow; proves optimality or infeasibility
//! - [`GreedySolver`]: fast construction plus local repair; best-found only
//! - `CpSolver`: constraint programming via pumpkin (feature `cp-solver`)
//! - [`PortfolioSolver`]: runs several strategies in parallel

mod flow;
mod greedy;
mod portfolio;

#[cfg(feature = "cp-solver")]
mod cp;

pub use flow::FlowSolver;
pub use greedy::GreedySolver;
pub use portfolio::PortfolioSolver;

#[cfg(feature = "cp-solver")]
pub use cp::CpSolver;

use shiftplan_core::SolverStrategy;

use crate::limits::SolveLimits;
use crate::model::ShiftModel;
use crate::variables::Assignment;
use crate::SolverError;

/// A feasible assignment and what is known about its cost
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub assignment: Assignment,
    /// Objective value of `assignment`
    pub objective_value: i64,
    /// Cost no feasible assignment can undercut
    pub lower_bound: i64,
}

/// How a search ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Feasible and proven minimal
    Optimal(Solution),
    /// Feasible, optimality unproven
    Feasible(Solution),
    /// Proven to have no feasible assignment
    Infeasible { reason: String },
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Optimal(s) | SolveOutcome::Feasible(s) => Some(s),
            SolveOutcome::Infeasible { .. } => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible { .. })
    }

    pub fn objective_value(&self) -> Option<i64> {
        self.solution().map(|s| s.objective_value)
    }
}

/// Trait for shift assignment search procedures
pub trait ShiftSolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Search for a minimum-cost feasible assignment.
    ///
    /// Returns `Err` when no feasible assignment was found and infeasibility
    /// was not proven either (limits hit, heuristic gave up, backend failure).
    fn solve(&self, model: &ShiftModel, limits: &SolveLimits) -> Result<SolveOutcome, SolverError>;
}

/// Classify a feasible solution by comparing it with its lower bound
pub(crate) fn classify(solution: Solution) -> SolveOutcome {
    if solution.objective_value <= solution.lower_bound {
        SolveOutcome::Optimal(solution)
    } else {
        SolveOutcome::Feasible(solution)
    }
}

/// Instantiate the solver for a configured strategy
pub fn solver_for(strategy: SolverStrategy) -> Result<Box<dyn ShiftSolver>, SolverError> {
    match strategy {
        SolverStrategy::Exact => Ok(Box::new(FlowSolver::new())),
        SolverStrategy::Heuristic => Ok(Box::new(GreedySolver::new())),
        SolverStrategy::Portfolio => Ok(Box::new(PortfolioSolver::with_default_members())),
        #[cfg(feature = "cp-solver")]
        SolverStrategy::Cp => Ok(Box::new(CpSolver::new())),
        #[cfg(not(feature = "cp-solver"))]
        SolverStrategy::Cp => Err(SolverError::Unavailable(
            "cp (rebuild with the `cp-solver` feature)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names() {
        assert_eq!(solver_for(SolverStrategy::Exact).unwrap().name(), "flow");
        assert_eq!(solver_for(SolverStrategy::Heuristic).unwrap().name(), "greedy");
        assert_eq!(solver_for(SolverStrategy::Portfolio).unwrap().name(), "portfolio");
    }

    #[cfg(not(feature = "cp-solver"))]
    #[test]
    fn cp_needs_feature() {
        assert!(matches!(
            solver_for(SolverStrategy::Cp),
            Err(SolverError::Unavailable(_))
        ));
    }

    #[test]
    fn classify_by_bound() {
        let sol = |obj, lb| Solution {
            assignment: Assignment::empty(0),
            objective_value: obj,
            lower_bound: lb,
        };
        assert!(classify(sol(10, 10)).is_optimal());
        assert!(!classify(sol(12, 10)).is_optimal());
        assert_eq!(classify(sol(12, 10)).objective_value(), Some(12));
    }
}
