//! Constraint-programming strategy: a bounded-time routing search over
//! the constraint matrices.
//!
//! The model places one start and one end per vehicle at the depot, uses
//! the distance matrix as the arc cost, and enforces the capacity and
//! time dimensions when the corresponding constraint families are
//! enabled. This is the last and most expensive strategy in the fallback
//! chain; its failure is the request's failure.

pub mod model;
pub mod search;

pub use model::{Plan, RoutingModel};

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::geo::seconds_to_time;
use crate::matrix::Matrices;
use crate::problem::Problem;
use crate::solution::{Route, RouteStop, Solution, StopKind};
use crate::SolveFailure;

/// Algorithm label recorded on solutions produced by this strategy.
pub const ALGORITHM: &str = "Constraint Programming";

/// Hard ceiling on the search budget in seconds, regardless of the
/// requested solving time.
const MAX_SEARCH_SECONDS: u64 = 30;

/// Bounded-time exact/heuristic solver over the routing model.
pub struct CpSolver;

impl CpSolver {
    /// Solve the problem within `min(max_solving_time, 30)` seconds.
    ///
    /// The search takes the first complete solution produced by the
    /// cheapest-arc construction, then spends whatever budget remains on
    /// local-search improvement. Vehicles whose route serves no customer
    /// are dropped from the solution.
    pub fn solve(problem: &Problem) -> Result<Solution, SolveFailure> {
        if problem.vehicles.is_empty() || problem.customers.is_empty() {
            return Err(SolveFailure::EmptyInput);
        }

        let start = Instant::now();
        let budget =
            Duration::from_secs(problem.options.max_solving_time.min(MAX_SEARCH_SECONDS));
        let deadline = start + budget;

        let matrices = Matrices::build(problem);
        info!(
            "cp solve started: {} nodes, {} vehicles, budget {}s",
            matrices.node_count(),
            problem.vehicles.len(),
            budget.as_secs()
        );

        let model = RoutingModel::new(problem, &matrices);

        let Some(mut plan) = search::construct(&model, deadline) else {
            let total_demand: i64 = matrices.demands.iter().sum();
            let capacities: Vec<i64> = problem.vehicles.iter().map(|v| v.capacity).collect();
            warn!(
                "no feasible assignment: total demand {} vs vehicle capacities {:?}",
                total_demand, capacities
            );

            let detail = if Instant::now() >= deadline {
                format!(
                    "time limit of {}s reached before a complete assignment",
                    budget.as_secs()
                )
            } else {
                format!(
                    "total demand {} cannot be served by vehicle capacities {:?} under the active constraints",
                    total_demand, capacities
                )
            };
            return Err(SolveFailure::Infeasible(detail));
        };

        search::improve(&model, &mut plan, deadline);

        let routes = extract_routes(problem, &matrices, &plan);
        let solution = Solution::from_routes(routes, start.elapsed().as_secs_f64(), ALGORITHM);
        info!(
            "cp solution: {} vehicles used, {} customers served",
            solution.vehicles_used, solution.customers_served
        );
        Ok(solution)
    }
}

/// Materialize the plan's non-empty routes.
fn extract_routes(problem: &Problem, matrices: &Matrices, plan: &Plan) -> Vec<Route> {
    plan.iter()
        .enumerate()
        .filter(|(_, nodes)| !nodes.is_empty())
        .map(|(vehicle_index, nodes)| build_route(problem, matrices, vehicle_index, nodes))
        .collect()
}

/// Build one vehicle's stop sequence, simulating the clock over the
/// travel-time matrix and waiting out window starts when windows are
/// enabled.
fn build_route(
    problem: &Problem,
    matrices: &Matrices,
    vehicle_index: usize,
    nodes: &[usize],
) -> Route {
    let vehicle = &problem.vehicles[vehicle_index];

    let mut stops = vec![RouteStop::depot(problem.depot, 0, "00:00")];

    let mut clock = 0i64;
    let mut travel_seconds = 0i64;
    let mut distance_meters = 0i64;
    let mut load = 0i64;
    let mut previous = 0usize;

    for &node in nodes {
        let customer = &problem.customers[node - 1];
        let leg_time = matrices.travel_times[previous][node];
        distance_meters += matrices.distances[previous][node];
        travel_seconds += leg_time;

        let arrival = clock + leg_time;
        let (window_start, _) = matrices.time_windows[node];
        let wait = (window_start - arrival).max(0);
        let service_seconds = matrices.service_times[node];

        load += customer.demand;
        stops.push(RouteStop {
            kind: StopKind::Customer,
            id: customer.id.clone(),
            name: customer.name.clone(),
            coordinate: customer.coordinate,
            demand: customer.demand,
            load,
            arrival_time: seconds_to_time(arrival),
            departure_time: seconds_to_time(arrival + wait + service_seconds),
            service_time: customer.service_time,
            wait_time: wait / 60,
        });

        clock = arrival + wait + service_seconds;
        previous = node;
    }

    let return_time = matrices.travel_times[previous][0];
    distance_meters += matrices.distances[previous][0];
    travel_seconds += return_time;
    clock += return_time;
    stops.push(RouteStop::depot(problem.depot, load, &seconds_to_time(clock)));

    let km = distance_meters as f64 / 1000.0;
    let mut route = Route {
        vehicle_id: format!("V{:03}", vehicle_index + 1),
        vehicle_name: vehicle.name.clone(),
        vehicle_type: vehicle.kind.clone(),
        capacity: vehicle.capacity,
        stops,
        total_distance: km,
        total_cost: km * vehicle.cost_per_km,
        total_load: load,
        total_time: travel_seconds as f64 / 3600.0,
        utilization_rate: 0.0,
        efficiency: 0.0,
    };
    route.update_rates();
    route
}
