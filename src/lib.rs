//! # vrp_engine
//!
//! A depot-based vehicle-routing engine that turns a depot, a customer
//! list, and a vehicle fleet into ordered routes with computed arrival
//! times, loads, distances, and costs.
//!
//! Three solving strategies are tried in a fixed priority order: a
//! deterministic greedy partitioner that guarantees fleet-wide
//! utilization, an adapter around an external generative solver, and a
//! bounded-time constraint-programming search. The first strategy to
//! produce a solution wins and the remaining ones are skipped.

pub mod cp;
pub mod external;
pub mod geo;
pub mod greedy;
pub mod matrix;
pub mod problem;
pub mod solution;
pub mod stats;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use crate::cp::CpSolver;
use crate::external::{ExternalSolverAdapter, GenerativeBackend};
use crate::greedy::GreedySolver;
use crate::problem::Problem;
use crate::solution::Solution;
use crate::stats::SolveStats;

/// Why a solve produced no solution.
///
/// Each strategy reports its own failure through this type instead of
/// raising; the orchestrator inspects the tag to decide whether to fall
/// through to the next strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveFailure {
    /// The problem has no vehicles or no customers.
    EmptyInput,
    /// No assignment satisfies the active constraints.
    Infeasible(String),
    /// The external collaborator failed at transport or parse time.
    Backend(String),
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::EmptyInput => write!(f, "problem has no vehicles or no customers"),
            SolveFailure::Infeasible(detail) => write!(f, "no feasible assignment: {}", detail),
            SolveFailure::Backend(detail) => write!(f, "external solver failed: {}", detail),
        }
    }
}

impl std::error::Error for SolveFailure {}

/// Orchestrates the strategy fallback chain and the shared statistics.
pub struct Engine {
    external: Option<ExternalSolverAdapter>,
    stats: Arc<SolveStats>,
}

impl Engine {
    /// Create an engine without an external generative backend; the
    /// fallback chain then runs the greedy and constraint-programming
    /// strategies only.
    pub fn new(stats: Arc<SolveStats>) -> Self {
        Engine {
            external: None,
            stats,
        }
    }

    /// Attach a generative backend as the second strategy in the chain.
    pub fn with_backend(mut self, backend: Box<dyn GenerativeBackend>) -> Self {
        self.external = Some(ExternalSolverAdapter::new(backend));
        self
    }

    /// The shared statistics counters.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Solve a problem by trying the strategies in their fixed priority
    /// order. The first success wins; when every strategy fails, the last
    /// strategy's failure is the caller-visible outcome.
    pub fn solve(&self, problem: &Problem) -> Result<Solution, SolveFailure> {
        self.stats.record_request();
        let start = Instant::now();

        info!(
            "solve started: {} customers, {} vehicles, objective {:?}, hint {:?}",
            problem.customers.len(),
            problem.vehicles.len(),
            problem.options.optimization_objective,
            problem.options.algorithm
        );

        let result = self.run_chain(problem);

        match &result {
            Ok(solution) => {
                self.stats.record_success(start.elapsed());
                info!(
                    "solve completed by {}: {} vehicles used, {} customers served, total distance {} km",
                    solution.algorithm,
                    solution.vehicles_used,
                    solution.customers_served,
                    solution.total_distance
                );
            }
            Err(failure) => {
                self.stats.record_failure();
                warn!("solve failed: {}", failure);
            }
        }

        result
    }

    fn run_chain(&self, problem: &Problem) -> Result<Solution, SolveFailure> {
        match GreedySolver::solve(problem) {
            Ok(solution) => return Ok(solution),
            Err(failure) => {
                warn!("greedy strategy failed ({}), trying external solver", failure);
            }
        }

        if let Some(adapter) = &self.external {
            match adapter.solve(problem) {
                Ok(solution) => return Ok(solution),
                Err(failure) => {
                    warn!(
                        "external strategy failed ({}), trying constraint programming",
                        failure
                    );
                }
            }
        }

        CpSolver::solve(problem)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Arc::new(SolveStats::new()))
    }
}
