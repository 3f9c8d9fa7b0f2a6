//! # shiftplan-solver
//!
//! Constraint model and search for weekly shift scheduling.
//!
//! This crate provides:
//! - Availability evaluation (`availability`)
//! - The boolean decision-variable model (`variables`)
//! - Coverage, hour-cap and availability constraints (`constraints`)
//! - The labor-cost objective (`objective`)
//! - Search strategies: exact min-cost flow, greedy heuristic, CP (feature
//!   `cp-solver`) and a parallel portfolio (`solve`)
//! - Extraction into a displayable schedule (`extract`, `merge`)
//! - End-to-end orchestration (`ShiftEngine`)
//!
//! ## Example
//!
//! ```rust
//! use shiftplan_core::EngineConfig;
//! use shiftplan_solver::ShiftEngine;
//!
//! let body = r#"{
//!     "forecast": [{"day": "Monday", "hour": 8, "requiredStaff": 1}],
//!     "employees": [{"id": 1, "name": "Bob", "role": "Crew", "hourlyRate": 15,
//!                    "maxHoursPerWeek": 40, "availability": {"Monday": ["08:00-20:00"]}}]
//! }"#;
//!
//! let engine = ShiftEngine::new(EngineConfig::default())?;
//! let result = engine.solve_json(body)?;
//! assert!(result.is_success());
//! # Ok::<(), shiftplan_core::EngineError>(())
//! ```

use std::time::Duration;

use shiftplan_core::EngineError;
use thiserror::Error;

pub mod availability;
pub mod constraints;
pub mod engine;
pub mod extract;
pub mod limits;
pub mod merge;
pub mod model;
pub mod objective;
pub mod precheck;
pub mod solve;
pub mod variables;

pub use engine::{generate_schedule, PlanOutcome, ShiftEngine};
pub use limits::SolveLimits;
pub use model::ShiftModel;
pub use solve::{solver_for, ShiftSolver, Solution, SolveOutcome};
pub use solve::{FlowSolver, GreedySolver, PortfolioSolver};

#[cfg(feature = "cp-solver")]
pub use solve::CpSolver;

/// Search failure unrelated to the feasibility of the problem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("time limit of {0:?} reached before a feasible schedule was found")]
    LimitReached(Duration),

    #[error("search interrupted")]
    Interrupted,

    #[error("{strategy} found no feasible schedule; the problem may still be feasible")]
    NoSolutionFound { strategy: &'static str },

    #[error("numeric overflow: {0}")]
    Overflow(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("solver backend failure: {0}")]
    Backend(String),

    #[error("strategy {0} is not available in this build")]
    Unavailable(String),
}

impl From<SolverError> for EngineError {
    fn from(e: SolverError) -> Self {
        EngineError::SolverInternal(e.to_string())
    }
}
