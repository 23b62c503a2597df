//! Greedy multi-vehicle strategy: even partition plus nearest-neighbor walks.
//!
//! This is the first strategy in the fallback chain. It is the only one
//! that deterministically gives every vehicle at least one customer when
//! there are at least as many customers as vehicles, which is why it runs
//! before the more sophisticated strategies rather than after them.

use std::time::Instant;

use log::info;

use crate::geo::{haversine_km, minutes_to_time, REFERENCE_SPEED_KMH};
use crate::problem::{Coordinate, Customer, Problem, Vehicle};
use crate::solution::{Route, RouteStop, Solution, StopKind};
use crate::SolveFailure;

/// Algorithm label recorded on solutions produced by this strategy.
pub const ALGORITHM: &str = "Simple Multi-Vehicle";

/// Start of the simulated working day, in minutes since midnight.
const DAY_START_MINUTES: i64 = 8 * 60;

/// Evenly partitions customers across the whole fleet and orders each
/// partition with a nearest-neighbor walk from the depot.
pub struct GreedySolver;

impl GreedySolver {
    /// Solve the problem.
    ///
    /// Customers are dealt out in input order, `max(1, customers / vehicles)`
    /// per vehicle; the last vehicle absorbs the remainder of the integer
    /// division so no customer is ever dropped.
    pub fn solve(problem: &Problem) -> Result<Solution, SolveFailure> {
        if problem.vehicles.is_empty() || problem.customers.is_empty() {
            return Err(SolveFailure::EmptyInput);
        }

        info!(
            "greedy solve started: {} customers, {} vehicles",
            problem.customers.len(),
            problem.vehicles.len()
        );
        let start = Instant::now();

        let per_vehicle = (problem.customers.len() / problem.vehicles.len()).max(1);
        let mut remaining: Vec<&Customer> = problem.customers.iter().collect();
        let mut routes = Vec::new();

        for (vehicle_index, vehicle) in problem.vehicles.iter().enumerate() {
            let take = if vehicle_index == problem.vehicles.len() - 1 {
                remaining.len()
            } else {
                per_vehicle.min(remaining.len())
            };
            let assigned: Vec<&Customer> = remaining.drain(..take).collect();

            if !assigned.is_empty() {
                routes.push(Self::build_route(
                    vehicle_index,
                    vehicle,
                    assigned,
                    &problem.depot,
                ));
            }
        }

        let solution = Solution::from_routes(routes, start.elapsed().as_secs_f64(), ALGORITHM);
        info!(
            "greedy solution: {} routes, {} customers served",
            solution.vehicles_used, solution.customers_served
        );
        Ok(solution)
    }

    /// Build one vehicle's route over its assigned customers with a
    /// nearest-neighbor walk starting at the depot.
    fn build_route(
        vehicle_index: usize,
        vehicle: &Vehicle,
        assigned: Vec<&Customer>,
        depot: &Coordinate,
    ) -> Route {
        let mut stops = vec![RouteStop::depot(*depot, 0, "08:00")];

        let mut remaining = assigned;
        let mut current = *depot;
        let mut clock = DAY_START_MINUTES;
        let mut distance = 0.0;
        let mut load = 0;

        while !remaining.is_empty() {
            // First minimum wins, so ties keep input order.
            let mut nearest = 0;
            let mut nearest_distance = f64::INFINITY;
            for (i, customer) in remaining.iter().enumerate() {
                let d = haversine_km(&current, &customer.coordinate);
                if d < nearest_distance {
                    nearest_distance = d;
                    nearest = i;
                }
            }

            let customer = remaining.remove(nearest);
            load += customer.demand;
            stops.push(RouteStop {
                kind: StopKind::Customer,
                id: customer.id.clone(),
                name: customer.name.clone(),
                coordinate: customer.coordinate,
                demand: customer.demand,
                load,
                arrival_time: minutes_to_time(clock),
                departure_time: minutes_to_time(clock + customer.service_time),
                service_time: customer.service_time,
                wait_time: 0,
            });

            distance += nearest_distance;
            clock += customer.service_time
                + (nearest_distance * 60.0 / REFERENCE_SPEED_KMH).round() as i64;
            current = customer.coordinate;
        }

        let return_distance = haversine_km(&current, depot);
        distance += return_distance;
        clock += (return_distance * 60.0 / REFERENCE_SPEED_KMH).round() as i64;
        stops.push(RouteStop::depot(*depot, load, &minutes_to_time(clock)));

        let mut route = Route {
            vehicle_id: format!("V{:03}", vehicle_index + 1),
            vehicle_name: vehicle.name.clone(),
            vehicle_type: vehicle.kind.clone(),
            capacity: vehicle.capacity,
            stops,
            total_distance: distance,
            total_cost: distance * vehicle.cost_per_km,
            total_load: load,
            total_time: distance / REFERENCE_SPEED_KMH,
            utilization_rate: 0.0,
            efficiency: 0.0,
        };
        route.update_rates();
        route
    }
}
