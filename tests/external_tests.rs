//! Unit tests for the external generative-solver adapter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vrp_engine::external::{BackendError, ExternalSolverAdapter, GenerativeBackend, ALGORITHM};
use vrp_engine::problem::{Coordinate, Customer, Problem, SolverOptions, Vehicle};
use vrp_engine::solution::StopKind;
use vrp_engine::SolveFailure;

/// Backend returning a canned reply.
struct StubBackend {
    reply: String,
}

impl GenerativeBackend for StubBackend {
    fn complete(&self, _request: &str) -> Result<String, BackendError> {
        Ok(self.reply.clone())
    }
}

/// Backend that fails and counts how often it was asked.
struct FailingBackend {
    calls: Arc<AtomicUsize>,
}

impl GenerativeBackend for FailingBackend {
    fn complete(&self, _request: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError("connection refused".to_string()))
    }
}

fn create_problem() -> Problem {
    let depot = Coordinate::new(41.009, 28.957);
    let customers = vec![
        Customer::new("C001", "Customer 1", Coordinate::new(41.02, 28.96), 30),
        Customer::new("C002", "Customer 2", Coordinate::new(41.03, 28.98), 20),
    ];
    let vehicles = vec![
        Vehicle::new("V001", "Vehicle 1", "truck", 60),
        Vehicle::new("V002", "Vehicle 2", "van", 80),
    ];
    Problem::new(depot, customers, vehicles, SolverOptions::new())
}

fn two_route_reply() -> String {
    r#"{
        "routes": [
            {
                "vehicleId": "V001",
                "vehicleName": "Vehicle 1",
                "stops": [
                    {"type": "depot", "name": "Depot"},
                    {"type": "customer", "name": "Customer 1", "demand": 30},
                    {"type": "depot", "name": "Depot"}
                ],
                "totalDistance": 10.0,
                "totalCost": 25.0,
                "totalLoad": 30
            },
            {
                "vehicleId": "V002",
                "vehicleName": "Vehicle 2",
                "stops": [
                    {"type": "depot", "name": "Depot"},
                    {"type": "customer", "name": "Customer 2", "demand": 20},
                    {"type": "depot", "name": "Depot"}
                ],
                "totalDistance": 8.0,
                "totalCost": 20.0,
                "totalLoad": 20
            }
        ],
        "totalDistance": 18.0,
        "totalCost": 45.0,
        "vehiclesUsed": 2,
        "customersServed": 2
    }"#
    .to_string()
}

#[test]
fn test_fenced_reply_parsed() {
    let reply = format!("```json\n{}\n```", two_route_reply());
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend { reply }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();

    assert_eq!(solution.algorithm, ALGORITHM);
    assert_eq!(solution.routes.len(), 2);
    assert_eq!(solution.vehicles_used, 2);
    assert_eq!(solution.customers_served, 2);
    assert_eq!(solution.total_distance, 18.0);
    assert_eq!(solution.total_cost, 45.0);
    assert!(solution.warnings.is_empty());
}

#[test]
fn test_bare_reply_parsed() {
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: two_route_reply(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();
    assert_eq!(solution.routes.len(), 2);
}

#[test]
fn test_route_rates_recomputed_locally() {
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: two_route_reply(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();
    let route = &solution.routes[0];

    assert_eq!(route.capacity, 60);
    assert!((route.utilization_rate - 30.0 / 60.0).abs() < 1e-6);
    assert!((route.efficiency - 30.0 / 10.0).abs() < 1e-6);
}

#[test]
fn test_customer_stops_carry_placeholder_times() {
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: two_route_reply(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();
    for route in &solution.routes {
        for stop in &route.stops {
            if stop.kind == StopKind::Customer {
                assert_eq!(stop.arrival_time, "09:00");
                assert_eq!(stop.departure_time, "09:15");
            }
        }
    }
}

#[test]
fn test_vehicle_matched_by_id_when_name_unknown() {
    let reply = r#"{
        "routes": [{
            "vehicleId": "V002",
            "vehicleName": "Some Other Name",
            "stops": [
                {"type": "depot", "name": "Depot"},
                {"type": "customer", "name": "Customer 1", "demand": 30},
                {"type": "depot", "name": "Depot"}
            ],
            "totalDistance": 5.0,
            "totalCost": 12.5,
            "totalLoad": 30
        }],
        "totalDistance": 5.0,
        "totalCost": 12.5,
        "vehiclesUsed": 1,
        "customersServed": 1
    }"#;
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: reply.to_string(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();

    // Capacity comes from the authoritative V002 record.
    assert_eq!(solution.routes[0].capacity, 80);
    assert_eq!(solution.routes[0].vehicle_type, "van");
}

#[test]
fn test_unmatched_vehicle_defaults_to_first() {
    let reply = r#"{
        "routes": [{
            "vehicleId": "V999",
            "vehicleName": "Phantom",
            "stops": [
                {"type": "depot", "name": "Depot"},
                {"type": "customer", "name": "Customer 2", "demand": 20},
                {"type": "depot", "name": "Depot"}
            ],
            "totalDistance": 4.0,
            "totalCost": 10.0,
            "totalLoad": 20
        }],
        "totalDistance": 4.0,
        "totalCost": 10.0,
        "vehiclesUsed": 1,
        "customersServed": 1
    }"#;
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: reply.to_string(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();

    assert_eq!(solution.routes[0].capacity, 60);
    // The collaborator's loose references survive on the route itself.
    assert_eq!(solution.routes[0].vehicle_id, "V999");
}

#[test]
fn test_unmatched_customer_stop_dropped_with_warning() {
    let reply = r#"{
        "routes": [{
            "vehicleId": "V001",
            "vehicleName": "Vehicle 1",
            "stops": [
                {"type": "depot", "name": "Depot"},
                {"type": "customer", "name": "Ghost Customer", "demand": 10},
                {"type": "customer", "name": "Customer 1", "demand": 30},
                {"type": "depot", "name": "Depot"}
            ],
            "totalDistance": 10.0,
            "totalCost": 25.0,
            "totalLoad": 40
        }],
        "totalDistance": 10.0,
        "totalCost": 25.0,
        "vehiclesUsed": 1,
        "customersServed": 2
    }"#;
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: reply.to_string(),
    }));
    let problem = create_problem();

    let solution = adapter.solve(&problem).unwrap();

    assert_eq!(solution.routes[0].customer_stops(), 1);
    assert_eq!(solution.warnings.len(), 1);
    assert!(solution.warnings[0].contains("Ghost Customer"));
}

#[test]
fn test_malformed_reply_is_backend_failure() {
    let adapter = ExternalSolverAdapter::new(Box::new(StubBackend {
        reply: "no routes for you".to_string(),
    }));
    let problem = create_problem();

    assert!(matches!(
        adapter.solve(&problem),
        Err(SolveFailure::Backend(_))
    ));
}

#[test]
fn test_transport_failure_is_backend_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let adapter = ExternalSolverAdapter::new(Box::new(FailingBackend {
        calls: calls.clone(),
    }));
    let problem = create_problem();

    let result = adapter.solve(&problem);

    assert!(matches!(result, Err(SolveFailure::Backend(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_input_skips_backend() {
    let calls = Arc::new(AtomicUsize::new(0));
    let adapter = ExternalSolverAdapter::new(Box::new(FailingBackend {
        calls: calls.clone(),
    }));
    let problem = Problem::new(
        Coordinate::new(0.0, 0.0),
        Vec::new(),
        vec![Vehicle::new("V001", "Vehicle 1", "truck", 60)],
        SolverOptions::new(),
    );

    assert!(matches!(
        adapter.solve(&problem),
        Err(SolveFailure::EmptyInput)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
