//! Engine orchestration
//!
//! `ShiftEngine` runs one invocation end to end:
//! validate input -> build model -> pre-check -> solve -> verify -> extract.

use shiftplan_core::{
    ConfigError, EngineConfig, EngineError, Optimality, Schedule, ScheduleInput, ScheduleResult,
    StaffingProblem,
};
use tracing::{debug, info, info_span, warn};

use crate::extract::extract_schedule;
use crate::limits::SolveLimits;
use crate::merge::merge_contiguous;
use crate::model::ShiftModel;
use crate::precheck::find_infeasibility;
use crate::solve::{solver_for, ShiftSolver, SolveOutcome};

/// What one invocation produced
#[derive(Clone, Debug, PartialEq)]
pub enum PlanOutcome {
    Scheduled(Schedule),
    Infeasible { reason: String },
}

impl PlanOutcome {
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            PlanOutcome::Scheduled(s) => Some(s),
            PlanOutcome::Infeasible { .. } => None,
        }
    }
}

impl From<&PlanOutcome> for ScheduleResult {
    fn from(outcome: &PlanOutcome) -> Self {
        match outcome {
            PlanOutcome::Scheduled(schedule) => ScheduleResult::from(schedule),
            PlanOutcome::Infeasible { reason } => ScheduleResult::failed(reason.clone()),
        }
    }
}

/// Configured scheduling engine. Holds no state between invocations.
pub struct ShiftEngine {
    config: EngineConfig,
    solver: Box<dyn ShiftSolver>,
}

impl std::fmt::Debug for ShiftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftEngine")
            .field("config", &self.config)
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl ShiftEngine {
    /// Validate the configuration and instantiate its strategy
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let solver = solver_for(config.strategy)
            .map_err(|e| EngineError::Config(ConfigError::Invalid(e.to_string())))?;
        Ok(Self { config, solver })
    }

    /// Use a custom strategy instead of the configured one
    pub fn with_solver(config: EngineConfig, solver: Box<dyn ShiftSolver>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Limits derived from the configuration
    pub fn default_limits(&self) -> SolveLimits {
        SolveLimits {
            time_limit: self.config.time_limit(),
            interrupt: None,
        }
    }

    /// Solve a raw JSON request body
    pub fn solve_json(&self, body: &str) -> Result<ScheduleResult, EngineError> {
        let input = ScheduleInput::from_json(body)?;
        self.solve_input(&input)
    }

    /// Validate and solve parsed input records
    pub fn solve_input(&self, input: &ScheduleInput) -> Result<ScheduleResult, EngineError> {
        let problem = input.validate(&self.config)?;
        self.solve(&problem)
    }

    /// Solve a validated problem under the configured limits
    pub fn solve(&self, problem: &StaffingProblem) -> Result<ScheduleResult, EngineError> {
        self.plan(problem, &self.default_limits())
            .map(|outcome| ScheduleResult::from(&outcome))
    }

    /// Solve a validated problem, returning the rich schedule
    pub fn plan(
        &self,
        problem: &StaffingProblem,
        limits: &SolveLimits,
    ) -> Result<PlanOutcome, EngineError> {
        let span = info_span!(
            "plan",
            strategy = self.solver.name(),
            employees = problem.employees.len(),
            slots = problem.forecast.len()
        );
        let _enter = span.enter();

        let model = ShiftModel::build(problem, self.config.cost_scale())?;
        debug!(
            variables = model.variables.len(),
            free = model.variables.free_count(),
            constraints = model.constraints.len(),
            demand = model.total_demand(),
            "model built"
        );

        if let Some(reason) = find_infeasibility(&model) {
            info!(%reason, "infeasible before search");
            return Ok(PlanOutcome::Infeasible { reason });
        }

        let outcome = self.solver.solve(&model, limits).map_err(|e| {
            warn!(error = %e, "search failed");
            EngineError::from(e)
        })?;

        let (solution, optimality) = match outcome {
            SolveOutcome::Infeasible { reason } => {
                info!(%reason, "infeasible");
                return Ok(PlanOutcome::Infeasible { reason });
            }
            SolveOutcome::Optimal(s) => (s, Optimality::Proven),
            SolveOutcome::Feasible(s) => (s, Optimality::BestFound),
        };

        let violations = model.constraints.violations(&solution.assignment);
        if let Some(first) = violations.first() {
            return Err(EngineError::SolverInternal(format!(
                "{} returned an assignment violating {} constraint(s), first: {}",
                self.solver.name(),
                violations.len(),
                first
            )));
        }

        let mut schedule = extract_schedule(problem, &model, &solution, optimality);
        if self.config.merge_contiguous_shifts {
            schedule.shifts = merge_contiguous(&schedule.shifts);
        }

        info!(
            objective = schedule.objective_value,
            lower_bound = schedule.lower_bound,
            labor_cost = %schedule.labor_cost,
            hours = schedule.total_hours,
            health = schedule.health_score,
            "schedule found"
        );
        Ok(PlanOutcome::Scheduled(schedule))
    }
}

/// Solve a JSON request with the default configuration
pub fn generate_schedule(body: &str) -> Result<ScheduleResult, EngineError> {
    ShiftEngine::new(EngineConfig::default())?.solve_json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::{Solution, SolveOutcome};
    use crate::variables::Assignment;
    use crate::SolverError;
    use shiftplan_core::SolverStrategy;

    struct Broken;

    impl ShiftSolver for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn solve(&self, model: &ShiftModel, _: &SolveLimits) -> Result<SolveOutcome, SolverError> {
            Ok(SolveOutcome::Optimal(Solution {
                assignment: Assignment::empty(model.variables.len()),
                objective_value: 0,
                lower_bound: 0,
            }))
        }
    }

    const ONE_SLOT: &str = r#"{
        "forecast": [{"day": "Monday", "hour": 8, "requiredStaff": 1}],
        "employees": [{"id": 1, "name": "Bob", "role": "Crew", "hourlyRate": 15,
                       "maxHoursPerWeek": 40, "availability": {"Monday": ["08:00-20:00"]}}]
    }"#;

    #[test]
    fn verifies_solver_output() {
        let engine = ShiftEngine::with_solver(EngineConfig::default(), Box::new(Broken)).unwrap();
        let err = engine.solve_json(ONE_SLOT).unwrap_err();
        assert!(err.is_solver_internal());
        assert!(err.to_string().contains("violating 1 constraint"));
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = generate_schedule("{not json").unwrap_err();
        assert!(err.is_input_malformed());
    }

    #[test]
    fn one_slot_round_trip() {
        let result = generate_schedule(ONE_SLOT).unwrap();
        assert!(result.is_success());
    }

    #[cfg(not(feature = "cp-solver"))]
    #[test]
    fn cp_without_feature_is_a_config_error() {
        let err = ShiftEngine::new(EngineConfig::default().with_strategy(SolverStrategy::Cp))
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = ShiftEngine::new(EngineConfig::default().with_cost_precision(9)).unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::Invalid(_))));
    }
}
