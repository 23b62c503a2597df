//! Integration tests for the solving orchestrator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vrp_engine::external::{BackendError, GenerativeBackend};
use vrp_engine::problem::{Coordinate, Customer, Problem, SolverOptions, Vehicle};
use vrp_engine::stats::SolveStats;
use vrp_engine::{Engine, SolveFailure};

/// Backend that records calls and always fails.
struct CountingBackend {
    calls: Arc<AtomicUsize>,
}

impl GenerativeBackend for CountingBackend {
    fn complete(&self, _request: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError("unreachable backend".to_string()))
    }
}

fn create_problem(customer_count: usize, vehicle_count: usize) -> Problem {
    let depot = Coordinate::new(41.009, 28.957);

    let customers = (0..customer_count)
        .map(|i| {
            Customer::new(
                &format!("C{:03}", i + 1),
                &format!("Customer {}", i + 1),
                Coordinate::new(41.009 + 0.01 * (i + 1) as f64, 28.957),
                10,
            )
        })
        .collect();

    let vehicles = (0..vehicle_count)
        .map(|i| {
            Vehicle::new(
                &format!("V{:03}", i + 1),
                &format!("Vehicle {}", i + 1),
                "truck",
                100,
            )
        })
        .collect();

    Problem::new(depot, customers, vehicles, SolverOptions::new())
}

#[test]
fn test_greedy_strategy_wins_first() {
    let engine = Engine::default();
    let problem = create_problem(6, 2);

    let solution = engine.solve(&problem).unwrap();

    assert_eq!(solution.algorithm, "Simple Multi-Vehicle");
    assert_eq!(solution.vehicles_used, 2);
    assert_eq!(solution.customers_served, 6);
}

#[test]
fn test_backend_not_consulted_when_greedy_succeeds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = Engine::new(Arc::new(SolveStats::new())).with_backend(Box::new(
        CountingBackend {
            calls: calls.clone(),
        },
    ));
    let problem = create_problem(4, 2);

    let solution = engine.solve(&problem).unwrap();

    assert_eq!(solution.algorithm, "Simple Multi-Vehicle");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_problem_fails_every_strategy() {
    let engine = Engine::default();
    let problem = create_problem(0, 2);

    assert!(matches!(
        engine.solve(&problem),
        Err(SolveFailure::EmptyInput)
    ));
}

#[test]
fn test_stats_count_successes_and_failures() {
    let stats = Arc::new(SolveStats::new());
    let engine = Engine::new(stats.clone());

    engine.solve(&create_problem(4, 2)).unwrap();
    engine.solve(&create_problem(3, 1)).unwrap();
    let _ = engine.solve(&create_problem(0, 1));

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.total_requests, 3);
    assert_eq!(snapshot.successful_solves, 2);
    assert_eq!(snapshot.failed_solves, 1);
    assert!(snapshot.total_solving_time >= 0.0);
    assert!(snapshot.average_solving_time >= 0.0);
}

#[test]
fn test_solution_serializes_with_camel_case_contract() {
    let engine = Engine::default();
    let solution = engine.solve(&create_problem(2, 1)).unwrap();

    let value = serde_json::to_value(&solution).unwrap();

    assert!(value.get("totalDistance").is_some());
    assert!(value.get("totalCost").is_some());
    assert!(value.get("vehiclesUsed").is_some());
    assert!(value.get("customersServed").is_some());
    assert!(value.get("averageUtilization").is_some());
    assert!(value.get("solvingTime").is_some());

    let route = &value["routes"][0];
    assert!(route.get("vehicleId").is_some());
    assert!(route.get("vehicleName").is_some());
    assert!(route.get("vehicleType").is_some());
    assert!(route.get("totalLoad").is_some());
    assert!(route.get("utilizationRate").is_some());

    let stop = &route["stops"][0];
    assert_eq!(stop["type"], "depot");
    assert!(stop.get("arrivalTime").is_some());
    assert!(stop.get("departureTime").is_some());
    assert!(stop.get("waitTime").is_some());
    assert_eq!(stop["coordinate"]["lat"], 41.009);
}

#[test]
fn test_problem_deserializes_from_camel_case_request() {
    let json = r#"{
        "depot": {"lat": 41.009, "lng": 28.957},
        "customers": [{
            "id": "C001",
            "name": "Customer 1",
            "coordinate": {"lat": 41.02, "lng": 28.96},
            "demand": 30,
            "timeWindow": {"start": "09:00", "end": "12:00"},
            "serviceTime": 20,
            "priority": 7
        }],
        "vehicles": [{
            "id": "V001",
            "name": "Vehicle 1",
            "type": "truck",
            "capacity": 100,
            "costPerKm": 3.0,
            "isEcoFriendly": true
        }],
        "options": {
            "maxSolvingTime": 60,
            "optimizationObjective": "distance",
            "useTimeWindows": true,
            "useCapacityConstraints": true,
            "useDistanceConstraints": false,
            "algorithm": "ortools"
        }
    }"#;

    let problem: Problem = serde_json::from_str(json).unwrap();

    assert_eq!(problem.customers[0].service_time, 20);
    assert_eq!(problem.customers[0].priority, 7);
    assert!(problem.customers[0].time_window.is_some());
    assert_eq!(problem.vehicles[0].cost_per_km, 3.0);
    assert!(problem.vehicles[0].is_eco_friendly);
    assert_eq!(problem.options.max_solving_time, 60);
    assert!(problem.options.use_time_windows);

    let solution = Engine::default().solve(&problem).unwrap();
    assert_eq!(solution.customers_served, 1);
}

#[test]
fn test_failure_messages_are_human_readable() {
    assert_eq!(
        SolveFailure::EmptyInput.to_string(),
        "problem has no vehicles or no customers"
    );
    assert!(SolveFailure::Infeasible("demand 10 vs capacity 5".to_string())
        .to_string()
        .starts_with("no feasible assignment"));
    assert!(SolveFailure::Backend("timeout".to_string())
        .to_string()
        .starts_with("external solver failed"));
}
