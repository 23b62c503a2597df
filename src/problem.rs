//! Problem definition and data structures for the routing engine.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}

/// A delivery time window with wall-clock HH:MM bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    /// Create a new time window.
    pub fn new(start: &str, end: &str) -> Self {
        TimeWindow {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// A customer to be served from the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub demand: i64,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    /// Service time at the customer in minutes.
    #[serde(default = "default_service_time")]
    pub service_time: i64,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub special_requirements: Vec<String>,
}

impl Customer {
    /// Create a customer with default service time and priority and no
    /// time window.
    pub fn new(id: &str, name: &str, coordinate: Coordinate, demand: i64) -> Self {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            coordinate,
            demand,
            time_window: None,
            service_time: default_service_time(),
            priority: default_priority(),
            special_requirements: Vec::new(),
        }
    }
}

/// A vehicle available at the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    /// Average speed in km/h.
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_cost_per_km")]
    pub cost_per_km: f64,
    #[serde(default)]
    pub max_distance: Option<i64>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub fuel_consumption: Option<f64>,
    #[serde(default)]
    pub road_restrictions: Vec<String>,
    #[serde(default)]
    pub is_eco_friendly: bool,
    #[serde(default)]
    pub driver_cost: Option<f64>,
    #[serde(default)]
    pub maintenance_cost: Option<f64>,
}

impl Vehicle {
    /// Create a vehicle with default speed and cost parameters.
    pub fn new(id: &str, name: &str, kind: &str, capacity: i64) -> Self {
        Vehicle {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            capacity,
            speed: default_speed(),
            cost_per_km: default_cost_per_km(),
            max_distance: None,
            fuel_type: None,
            fuel_consumption: None,
            road_restrictions: Vec::new(),
            is_eco_friendly: false,
            driver_cost: None,
            maintenance_cost: None,
        }
    }
}

/// What the search should optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Distance,
    Cost,
    Time,
    Balanced,
}

/// Requested solving algorithm. The engine treats this as a hint only;
/// the strategy fallback chain runs in its fixed order regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmHint {
    NearestNeighbor,
    Genetic,
    Ortools,
}

/// Per-request solver options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverOptions {
    /// Maximum solving time in seconds.
    pub max_solving_time: u64,
    pub optimization_objective: Objective,
    pub use_time_windows: bool,
    pub use_capacity_constraints: bool,
    pub use_distance_constraints: bool,
    pub algorithm: AlgorithmHint,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            max_solving_time: 300,
            optimization_objective: Objective::Balanced,
            use_time_windows: false,
            use_capacity_constraints: true,
            use_distance_constraints: true,
            algorithm: AlgorithmHint::Ortools,
        }
    }
}

impl SolverOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        SolverOptions::default()
    }

    /// Set the maximum solving time in seconds.
    pub fn with_max_solving_time(mut self, seconds: u64) -> Self {
        self.max_solving_time = seconds;
        self
    }

    /// Set the optimization objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.optimization_objective = objective;
        self
    }

    /// Enable or disable time window constraints.
    pub fn with_time_windows(mut self, enabled: bool) -> Self {
        self.use_time_windows = enabled;
        self
    }

    /// Enable or disable capacity constraints.
    pub fn with_capacity_constraints(mut self, enabled: bool) -> Self {
        self.use_capacity_constraints = enabled;
        self
    }

    /// Enable or disable distance constraints.
    pub fn with_distance_constraints(mut self, enabled: bool) -> Self {
        self.use_distance_constraints = enabled;
        self
    }

    /// Set the algorithm hint.
    pub fn with_algorithm(mut self, hint: AlgorithmHint) -> Self {
        self.algorithm = hint;
        self
    }
}

/// A normalized routing problem: one depot, customers, vehicles, options.
///
/// Node index 0 is always the depot and node index `i` (i >= 1) is
/// customer `i - 1`. Every matrix and every strategy relies on this
/// indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub depot: Coordinate,
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub options: SolverOptions,
}

impl Problem {
    /// Create a new problem.
    pub fn new(
        depot: Coordinate,
        customers: Vec<Customer>,
        vehicles: Vec<Vehicle>,
        options: SolverOptions,
    ) -> Self {
        Problem {
            depot,
            customers,
            vehicles,
            options,
        }
    }

    /// Number of nodes including the depot.
    pub fn node_count(&self) -> usize {
        self.customers.len() + 1
    }

    /// Location of a node; node 0 is the depot, node `i` is customer `i - 1`.
    pub fn location(&self, node: usize) -> &Coordinate {
        if node == 0 {
            &self.depot
        } else {
            &self.customers[node - 1].coordinate
        }
    }
}

fn default_service_time() -> i64 {
    15
}

fn default_priority() -> u8 {
    5
}

fn default_speed() -> f64 {
    50.0
}

fn default_cost_per_km() -> f64 {
    2.5
}
