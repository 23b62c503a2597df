//! Routing model state for the constraint-programming strategy.

use std::iter::once;

use itertools::Itertools;

use crate::matrix::{Matrices, DAY_SECONDS};
use crate::problem::Problem;

/// A candidate assignment: one customer-node sequence per vehicle, in
/// vehicle order. An empty sequence means the vehicle stays at the depot.
pub type Plan = Vec<Vec<usize>>;

/// The routing search problem: arc costs over the distance matrix, the
/// capacity and time dimensions, and per-vehicle fixed activation costs.
pub struct RoutingModel<'a> {
    pub problem: &'a Problem,
    pub matrices: &'a Matrices,
    /// Strictly increasing fixed cost per vehicle index (0, 1, 2, ...),
    /// biasing the search toward spreading customers across more
    /// vehicles instead of collapsing onto one. A nudge, not a guarantee.
    pub fixed_costs: Vec<i64>,
    capacity_enabled: bool,
    time_enabled: bool,
}

impl<'a> RoutingModel<'a> {
    /// Build the model for a problem and its matrices.
    pub fn new(problem: &'a Problem, matrices: &'a Matrices) -> Self {
        let fixed_costs = (0..problem.vehicles.len() as i64).collect();
        RoutingModel {
            problem,
            matrices,
            fixed_costs,
            capacity_enabled: problem.options.use_capacity_constraints,
            time_enabled: problem.options.use_time_windows,
        }
    }

    /// Arc cost between two nodes in meters.
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        self.matrices.distances[from][to]
    }

    /// Total demand carried on a route.
    pub fn route_load(&self, route: &[usize]) -> i64 {
        route.iter().map(|&n| self.matrices.demands[n]).sum()
    }

    /// Cost of a route (depot -> ... -> depot legs) plus the vehicle's
    /// fixed activation cost when the route is non-empty.
    pub fn route_cost(&self, route: &[usize], vehicle: usize) -> i64 {
        if route.is_empty() {
            return 0;
        }

        let legs: i64 = once(0)
            .chain(route.iter().copied())
            .chain(once(0))
            .tuple_windows()
            .map(|(a, b)| self.matrices.distances[a][b])
            .sum();

        legs + self.fixed_costs[vehicle]
    }

    /// Total cost of a plan.
    pub fn plan_cost(&self, plan: &Plan) -> i64 {
        plan.iter()
            .enumerate()
            .map(|(vehicle, route)| self.route_cost(route, vehicle))
            .sum()
    }

    /// Whether a route is feasible for a vehicle under the enabled
    /// dimensions.
    pub fn route_feasible(&self, route: &[usize], vehicle: usize) -> bool {
        if self.capacity_enabled
            && self.route_load(route) > self.problem.vehicles[vehicle].capacity
        {
            return false;
        }
        if self.time_enabled && self.simulate_times(route).is_none() {
            return false;
        }
        true
    }

    /// Forward time simulation with unlimited waiting.
    ///
    /// The cumulative transit of a leg is its travel time plus the origin
    /// node's service time. Returns the (arrival, wait) pair per customer
    /// node, or `None` when a window end or the 24 h per-vehicle ceiling
    /// cannot be met.
    pub fn simulate_times(&self, route: &[usize]) -> Option<Vec<(i64, i64)>> {
        let mut times = Vec::with_capacity(route.len());
        let mut clock = 0i64;
        let mut previous = 0usize;

        for &node in route {
            let arrival = clock
                + self.matrices.travel_times[previous][node]
                + self.matrices.service_times[previous];
            let (start, end) = self.matrices.time_windows[node];
            if arrival > end {
                return None;
            }
            let wait = (start - arrival).max(0);
            times.push((arrival, wait));
            clock = arrival + wait;
            previous = node;
        }

        let back = clock
            + self.matrices.service_times[previous]
            + self.matrices.travel_times[previous][0];
        if back > DAY_SECONDS {
            return None;
        }

        Some(times)
    }
}
