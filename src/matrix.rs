//! Derived constraint inputs: all-pairs matrices and per-node arrays.

use crate::geo::{haversine_km, time_to_seconds, REFERENCE_SPEED_KMH};
use crate::problem::Problem;

/// Seconds in a day; also the open time window applied to every node when
/// time windows are disabled.
pub const DAY_SECONDS: i64 = 86_400;

/// Constraint matrices and arrays shared by the solving strategies.
///
/// Node 0 is the depot; node `i` (i >= 1) is customer `i - 1`, matching
/// [`Problem::location`]. Construction is deterministic: building twice
/// from the same problem yields identical matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrices {
    /// Pairwise distances in meters.
    pub distances: Vec<Vec<i64>>,
    /// Pairwise travel times in seconds at the reference speed.
    pub travel_times: Vec<Vec<i64>>,
    /// Demand per node; 0 for the depot.
    pub demands: Vec<i64>,
    /// Service time per node in seconds; 0 for the depot.
    pub service_times: Vec<i64>,
    /// (start, end) service window per node in seconds since midnight.
    pub time_windows: Vec<(i64, i64)>,
}

impl Matrices {
    /// Build all matrices and arrays for a problem.
    pub fn build(problem: &Problem) -> Self {
        let n = problem.node_count();
        let mut distances = vec![vec![0i64; n]; n];
        let mut travel_times = vec![vec![0i64; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let km = haversine_km(problem.location(i), problem.location(j));
                    distances[i][j] = (km * 1000.0) as i64;
                    travel_times[i][j] = (km * 3600.0 / REFERENCE_SPEED_KMH) as i64;
                }
            }
        }

        let mut demands = vec![0i64];
        let mut service_times = vec![0i64];
        let mut time_windows = vec![(0, DAY_SECONDS)];

        for customer in &problem.customers {
            demands.push(customer.demand);
            service_times.push(customer.service_time * 60);

            let window = if problem.options.use_time_windows {
                customer
                    .time_window
                    .as_ref()
                    .map(|w| (time_to_seconds(&w.start), time_to_seconds(&w.end)))
            } else {
                None
            };
            time_windows.push(window.unwrap_or((0, DAY_SECONDS)));
        }

        Matrices {
            distances,
            travel_times,
            demands,
            service_times,
            time_windows,
        }
    }

    /// Number of nodes covered by the matrices.
    pub fn node_count(&self) -> usize {
        self.demands.len()
    }
}
