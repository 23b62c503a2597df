//! Route and solution representations produced by the solving strategies.
//!
//! The serialized form of these types is the engine's one externally
//! observable format contract: camel-case field names with the stop kind
//! surfaced as `"type"`.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::geo::{round1, round2};
use crate::problem::Coordinate;

/// Whether a stop is the depot or a customer visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Depot,
    Customer,
}

/// A single stop on a vehicle's route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub demand: i64,
    /// Cumulative vehicle load at departure from this stop.
    pub load: i64,
    pub arrival_time: String,
    pub departure_time: String,
    /// Service time at this stop in minutes.
    pub service_time: i64,
    pub wait_time: i64,
}

impl RouteStop {
    /// A depot stop with the given load and clock time.
    pub fn depot(coordinate: Coordinate, load: i64, time: &str) -> Self {
        RouteStop {
            kind: StopKind::Depot,
            id: "DEPOT".to_string(),
            name: "Depot".to_string(),
            coordinate,
            demand: 0,
            load,
            arrival_time: time.to_string(),
            departure_time: time.to_string(),
            service_time: 0,
            wait_time: 0,
        }
    }
}

/// One vehicle's ordered stop sequence with its aggregate metrics.
///
/// The stop sequence always starts and ends with a depot stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub vehicle_type: String,
    pub capacity: i64,
    pub stops: Vec<RouteStop>,
    /// Total route distance in kilometers.
    pub total_distance: f64,
    pub total_cost: f64,
    pub total_load: i64,
    /// Total route time in hours.
    pub total_time: f64,
    pub utilization_rate: f64,
    pub efficiency: f64,
}

impl Route {
    /// Number of customer stops on this route.
    pub fn customer_stops(&self) -> usize {
        self.stops
            .iter()
            .filter(|s| s.kind == StopKind::Customer)
            .count()
    }

    /// Recompute utilization and efficiency from the current load and
    /// distance. Efficiency is 0 for a zero-distance route.
    pub fn update_rates(&mut self) {
        self.utilization_rate = if self.capacity > 0 {
            self.total_load as f64 / self.capacity as f64
        } else {
            0.0
        };
        self.efficiency = if self.total_distance > 0.0 {
            self.total_load as f64 / self.total_distance
        } else {
            0.0
        };
    }
}

/// A complete solution: the kept routes plus solution-level aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub routes: Vec<Route>,
    pub total_distance: f64,
    pub total_cost: f64,
    pub total_time: f64,
    pub vehicles_used: usize,
    pub customers_served: usize,
    /// Mean per-route utilization as a percentage.
    pub average_utilization: f64,
    pub average_efficiency: f64,
    /// Wall-clock solving time in seconds.
    pub solving_time: f64,
    pub status: String,
    pub algorithm: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub timestamp: String,
}

impl Solution {
    /// Assemble a solution from built routes.
    ///
    /// Only routes serving at least one customer are kept; the aggregates
    /// are recomputed over the kept routes.
    pub fn from_routes(routes: Vec<Route>, solving_time: f64, algorithm: &str) -> Self {
        let routes: Vec<Route> = routes
            .into_iter()
            .filter(|r| r.customer_stops() > 0)
            .collect();

        let total_distance: f64 = routes.iter().map(|r| r.total_distance).sum();
        let total_cost: f64 = routes.iter().map(|r| r.total_cost).sum();
        let total_time: f64 = routes.iter().map(|r| r.total_time).sum();
        let customers_served: usize = routes.iter().map(|r| r.customer_stops()).sum();

        let count = routes.len();
        let (average_utilization, average_efficiency) = if count > 0 {
            (
                routes.iter().map(|r| r.utilization_rate).sum::<f64>() / count as f64,
                routes.iter().map(|r| r.efficiency).sum::<f64>() / count as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Solution {
            vehicles_used: count,
            customers_served,
            total_distance: round2(total_distance),
            total_cost: round2(total_cost),
            total_time: round2(total_time),
            average_utilization: round1(average_utilization * 100.0),
            average_efficiency: round2(average_efficiency),
            solving_time: round2(solving_time),
            status: "success".to_string(),
            algorithm: algorithm.to_string(),
            warnings: Vec::new(),
            timestamp: now_timestamp(),
            routes,
        }
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS`.
pub(crate) fn now_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_default()
}
