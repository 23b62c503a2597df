//! Adapter around an external generative solving collaborator.
//!
//! The adapter sends a structured solving request through a
//! [`GenerativeBackend`], parses the collaborator's JSON reply, and
//! reconciles it against the authoritative problem records. Any transport
//! or parse failure is reported as a typed failure so the orchestrator
//! can fall through to the next strategy; nothing here panics.

use std::fmt;
use std::time::Duration;

use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::problem::{Problem, Vehicle};
use crate::solution::{now_timestamp, Route, RouteStop, Solution, StopKind};
use crate::SolveFailure;

/// Algorithm label recorded on solutions produced by this strategy.
pub const ALGORITHM: &str = "Generative AI";

/// Default timeout applied to backend calls. The whole fallback chain is
/// latency-bounded, so the network call must be too.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A transport or protocol failure reported by a backend.
#[derive(Debug)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendError {}

/// Transport to the external generative solving collaborator.
///
/// Implementations receive the structured solving request and return the
/// collaborator's raw textual reply.
pub trait GenerativeBackend {
    /// Send a solving request and return the raw reply text.
    fn complete(&self, request: &str) -> Result<String, BackendError>;
}

/// HTTP backend posting the request as a JSON body and reading the reply
/// from the response body.
pub struct HttpGenerativeBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpGenerativeBackend {
    /// Create a backend with the default timeout.
    pub fn new(endpoint: &str) -> Result<Self, BackendError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a backend with an explicit request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpGenerativeBackend {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl GenerativeBackend for HttpGenerativeBackend {
    fn complete(&self, request: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "prompt": request }))
            .send()
            .map_err(|e| BackendError(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError(format!("backend returned status {}", status)));
        }

        response
            .text()
            .map_err(|e| BackendError(format!("failed to read response body: {}", e)))
    }
}

/// Reconciles the collaborator's freeform JSON answer into the canonical
/// solution shape.
pub struct ExternalSolverAdapter {
    backend: Box<dyn GenerativeBackend>,
}

impl ExternalSolverAdapter {
    /// Create an adapter over the given backend.
    pub fn new(backend: Box<dyn GenerativeBackend>) -> Self {
        ExternalSolverAdapter { backend }
    }

    /// Solve the problem through the external collaborator.
    pub fn solve(&self, problem: &Problem) -> Result<Solution, SolveFailure> {
        if problem.vehicles.is_empty() || problem.customers.is_empty() {
            return Err(SolveFailure::EmptyInput);
        }

        info!(
            "external solve started: {} customers, {} vehicles",
            problem.customers.len(),
            problem.vehicles.len()
        );

        let request = build_request(problem);
        let reply = self.backend.complete(&request).map_err(|e| {
            error!("backend call failed: {}", e);
            SolveFailure::Backend(e.to_string())
        })?;

        let solution = parse_reply(&reply, problem)?;
        info!(
            "external solution parsed: {} vehicles, {} customers",
            solution.vehicles_used, solution.customers_served
        );
        Ok(solution)
    }
}

/// Build the structured solving request sent to the collaborator.
///
/// The request carries the problem data, the business instructions (all
/// vehicles must be used), and the exact reply shape expected back.
fn build_request(problem: &Problem) -> String {
    let customers: Vec<_> = problem
        .customers
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "coordinate": c.coordinate,
                "demand": c.demand,
                "serviceTime": c.service_time,
            })
        })
        .collect();

    let vehicles: Vec<_> = problem
        .vehicles
        .iter()
        .map(|v| {
            json!({
                "id": v.id,
                "name": v.name,
                "type": v.kind,
                "capacity": v.capacity,
                "speed": v.speed,
                "costPerKm": v.cost_per_km,
            })
        })
        .collect();

    json!({
        "task": "vehicle-routing",
        "depot": problem.depot,
        "customers": customers,
        "vehicles": vehicles,
        "instructions": [
            "Visit every customer exactly once.",
            "Never exceed a vehicle's capacity.",
            "Use ALL vehicles: every vehicle must serve at least one customer.",
            "Distribute customers evenly across the vehicles.",
            "Minimize the total distance.",
            "Reply with a single JSON object in the replyFormat shape and nothing else.",
        ],
        "replyFormat": {
            "routes": [{
                "vehicleId": "V001",
                "vehicleName": "Vehicle 1",
                "stops": [{
                    "type": "depot or customer",
                    "name": "stop name",
                    "coordinate": { "lat": 0.0, "lng": 0.0 },
                    "demand": 0
                }],
                "totalDistance": 0.0,
                "totalCost": 0.0,
                "totalLoad": 0
            }],
            "totalDistance": 0.0,
            "totalCost": 0.0,
            "vehiclesUsed": 0,
            "customersServed": 0
        }
    })
    .to_string()
}

/// Strip a leading/trailing markdown code fence from the reply, if any.
fn strip_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplySolution {
    #[serde(default)]
    routes: Vec<ReplyRoute>,
    #[serde(default)]
    total_distance: f64,
    #[serde(default)]
    total_cost: f64,
    #[serde(default)]
    vehicles_used: Option<usize>,
    #[serde(default)]
    customers_served: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRoute {
    #[serde(default)]
    vehicle_id: Option<String>,
    #[serde(default)]
    vehicle_name: Option<String>,
    #[serde(default)]
    stops: Vec<ReplyStop>,
    #[serde(default)]
    total_distance: f64,
    #[serde(default)]
    total_cost: f64,
    #[serde(default)]
    total_load: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyStop {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    demand: Option<i64>,
}

/// Parse the collaborator's reply into a solution.
fn parse_reply(reply: &str, problem: &Problem) -> Result<Solution, SolveFailure> {
    let text = strip_fences(reply);
    let parsed: ReplySolution = serde_json::from_str(text).map_err(|e| {
        warn!("failed to parse backend reply: {}", e);
        SolveFailure::Backend(format!("malformed reply: {}", e))
    })?;

    let mut warnings = Vec::new();
    let routes: Vec<Route> = parsed
        .routes
        .iter()
        .map(|r| reconcile_route(r, problem, &mut warnings))
        .collect();

    let vehicles_used = parsed.vehicles_used.unwrap_or(routes.len());

    Ok(Solution {
        routes,
        total_distance: parsed.total_distance,
        total_cost: parsed.total_cost,
        // Not reported by the collaborator.
        total_time: 0.0,
        vehicles_used,
        customers_served: parsed.customers_served,
        average_utilization: 0.0,
        average_efficiency: 0.0,
        solving_time: 0.0,
        status: "success".to_string(),
        algorithm: ALGORITHM.to_string(),
        warnings,
        timestamp: now_timestamp(),
    })
}

/// Rebuild one route, substituting authoritative vehicle and customer
/// records for the collaborator's loose references.
fn reconcile_route(reply: &ReplyRoute, problem: &Problem, warnings: &mut Vec<String>) -> Route {
    let vehicle = match_vehicle(reply, &problem.vehicles);

    let mut stops = Vec::new();
    for stop in &reply.stops {
        if stop.kind == "depot" {
            stops.push(RouteStop::depot(problem.depot, 0, "08:00"));
            continue;
        }

        // Customer stops are matched by display name; an unmatched stop is
        // dropped and surfaced as a data-loss warning on the solution.
        let name = stop.name.as_deref().unwrap_or("");
        match problem.customers.iter().find(|c| c.name == name) {
            Some(customer) => stops.push(RouteStop {
                kind: StopKind::Customer,
                id: customer.id.clone(),
                name: customer.name.clone(),
                coordinate: customer.coordinate,
                demand: customer.demand,
                load: stop.demand.unwrap_or(customer.demand),
                arrival_time: "09:00".to_string(),
                departure_time: "09:15".to_string(),
                service_time: customer.service_time,
                wait_time: 0,
            }),
            None => {
                warn!("unmatched customer stop '{}' dropped from reply", name);
                warnings.push(format!(
                    "customer stop '{}' did not match any known customer and was dropped",
                    name
                ));
            }
        }
    }

    let mut route = Route {
        vehicle_id: reply
            .vehicle_id
            .clone()
            .unwrap_or_else(|| vehicle.id.clone()),
        vehicle_name: reply
            .vehicle_name
            .clone()
            .unwrap_or_else(|| vehicle.name.clone()),
        vehicle_type: vehicle.kind.clone(),
        capacity: vehicle.capacity,
        stops,
        total_distance: reply.total_distance,
        total_cost: reply.total_cost,
        total_load: reply.total_load,
        total_time: 0.0,
        utilization_rate: 0.0,
        efficiency: 0.0,
    };
    route.update_rates();
    route
}

/// Match a reply route back to an authoritative vehicle: by name first,
/// then by id, defaulting to the first vehicle.
fn match_vehicle<'a>(reply: &ReplyRoute, vehicles: &'a [Vehicle]) -> &'a Vehicle {
    vehicles
        .iter()
        .find(|v| Some(&v.name) == reply.vehicle_name.as_ref())
        .or_else(|| {
            vehicles
                .iter()
                .find(|v| Some(&v.id) == reply.vehicle_id.as_ref())
        })
        .unwrap_or(&vehicles[0])
}
