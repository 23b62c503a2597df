//! Search procedure: cheapest-arc construction plus bounded improvement.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::model::{Plan, RoutingModel};

/// Seed for the improvement-pass shuffles; fixed so runs are reproducible.
const SHUFFLE_SEED: u64 = 0x5eed;

/// Build a first complete plan by repeatedly taking the globally cheapest
/// feasible extension from a vehicle's route end to an unvisited customer.
/// Extending an empty vehicle adds its fixed activation cost to the
/// candidate cost. Returns `None` when some customer cannot be placed on
/// any vehicle, or when the deadline passes first.
pub fn construct(model: &RoutingModel<'_>, deadline: Instant) -> Option<Plan> {
    let vehicle_count = model.problem.vehicles.len();
    let node_count = model.matrices.node_count();
    let mut plan: Plan = vec![Vec::new(); vehicle_count];
    let mut unvisited: Vec<usize> = (1..node_count).collect();

    while !unvisited.is_empty() {
        if Instant::now() >= deadline {
            return None;
        }

        // (cost, vehicle, position in unvisited); first minimum wins.
        let mut best: Option<(i64, usize, usize)> = None;

        for vehicle in 0..vehicle_count {
            let last = plan[vehicle].last().copied().unwrap_or(0);

            for (idx, &node) in unvisited.iter().enumerate() {
                if !extension_feasible(model, &plan[vehicle], vehicle, node) {
                    continue;
                }

                let mut cost = model.arc_cost(last, node);
                if plan[vehicle].is_empty() {
                    cost += model.fixed_costs[vehicle];
                }

                if best.map_or(true, |(c, _, _)| cost < c) {
                    best = Some((cost, vehicle, idx));
                }
            }
        }

        let (_, vehicle, idx) = best?;
        let node = unvisited.remove(idx);
        plan[vehicle].push(node);
    }

    Some(plan)
}

fn extension_feasible(
    model: &RoutingModel<'_>,
    route: &[usize],
    vehicle: usize,
    node: usize,
) -> bool {
    let mut extended = route.to_vec();
    extended.push(node);
    model.route_feasible(&extended, vehicle)
}

/// Improve the plan in place until a sweep over all neighborhoods finds
/// nothing better or the deadline passes.
pub fn improve(model: &RoutingModel<'_>, plan: &mut Plan, deadline: Instant) {
    let mut rng = ChaCha8Rng::seed_from_u64(SHUFFLE_SEED);

    let mut improvement = true;
    while improvement && Instant::now() < deadline {
        improvement = false;
        improvement |= relocate_pass(model, plan, &mut rng, deadline);
        improvement |= swap_pass(model, plan, &mut rng, deadline);
        improvement |= two_opt_pass(model, plan, &mut rng, deadline);
    }
}

/// Move one customer to a cheaper position on another vehicle's route.
/// Applies the first improving move found and reports whether one was.
fn relocate_pass(
    model: &RoutingModel<'_>,
    plan: &mut Plan,
    rng: &mut ChaCha8Rng,
    deadline: Instant,
) -> bool {
    let vehicle_count = plan.len();
    let mut route_order: Vec<usize> = (0..vehicle_count).collect();
    route_order.shuffle(rng);

    for &r1 in &route_order {
        if plan[r1].is_empty() {
            continue;
        }

        let mut positions: Vec<usize> = (0..plan[r1].len()).collect();
        positions.shuffle(rng);

        for &pos in &positions {
            if Instant::now() >= deadline {
                return false;
            }

            for r2 in 0..vehicle_count {
                if r2 == r1 {
                    continue;
                }

                if let Some(insert_pos) = evaluate_relocate(model, plan, r1, pos, r2) {
                    let node = plan[r1].remove(pos);
                    plan[r2].insert(insert_pos, node);
                    return true;
                }
            }
        }
    }

    false
}

/// Best improving insertion position for moving `plan[r1][pos]` onto
/// route `r2`, or `None` when no feasible improving position exists.
fn evaluate_relocate(
    model: &RoutingModel<'_>,
    plan: &Plan,
    r1: usize,
    pos: usize,
    r2: usize,
) -> Option<usize> {
    let node = plan[r1][pos];
    let mut source = plan[r1].clone();
    source.remove(pos);

    // Removing a customer never breaks capacity or windows, so only the
    // target route needs a feasibility check.
    let old_cost = model.route_cost(&plan[r1], r1) + model.route_cost(&plan[r2], r2);
    let source_cost = model.route_cost(&source, r1);

    let mut best: Option<(i64, usize)> = None;
    for insert_pos in 0..=plan[r2].len() {
        let mut target = plan[r2].clone();
        target.insert(insert_pos, node);

        if !model.route_feasible(&target, r2) {
            continue;
        }

        let delta = source_cost + model.route_cost(&target, r2) - old_cost;
        if delta < 0 && best.map_or(true, |(d, _)| delta < d) {
            best = Some((delta, insert_pos));
        }
    }

    best.map(|(_, insert_pos)| insert_pos)
}

/// Exchange two customers between two routes when that shortens the plan.
/// Applies the first improving exchange found.
fn swap_pass(
    model: &RoutingModel<'_>,
    plan: &mut Plan,
    rng: &mut ChaCha8Rng,
    deadline: Instant,
) -> bool {
    let vehicle_count = plan.len();
    let mut route_order: Vec<usize> = (0..vehicle_count).collect();
    route_order.shuffle(rng);

    for (a, &r1) in route_order.iter().enumerate() {
        for &r2 in &route_order[a + 1..] {
            if plan[r1].is_empty() || plan[r2].is_empty() {
                continue;
            }

            if Instant::now() >= deadline {
                return false;
            }

            for i in 0..plan[r1].len() {
                for j in 0..plan[r2].len() {
                    let old_cost =
                        model.route_cost(&plan[r1], r1) + model.route_cost(&plan[r2], r2);

                    let mut first = plan[r1].clone();
                    let mut second = plan[r2].clone();
                    std::mem::swap(&mut first[i], &mut second[j]);

                    if !model.route_feasible(&first, r1) || !model.route_feasible(&second, r2) {
                        continue;
                    }

                    let new_cost = model.route_cost(&first, r1) + model.route_cost(&second, r2);
                    if new_cost < old_cost {
                        plan[r1] = first;
                        plan[r2] = second;
                        return true;
                    }
                }
            }
        }
    }

    false
}

/// Reverse a segment inside a single route when the reconnected edges are
/// shorter. Applies the first improving reversal found.
fn two_opt_pass(
    model: &RoutingModel<'_>,
    plan: &mut Plan,
    rng: &mut ChaCha8Rng,
    deadline: Instant,
) -> bool {
    let vehicle_count = plan.len();
    let mut route_order: Vec<usize> = (0..vehicle_count).collect();
    route_order.shuffle(rng);

    for &r_idx in &route_order {
        let route = &plan[r_idx];
        if route.len() < 4 {
            continue;
        }

        if Instant::now() >= deadline {
            return false;
        }

        let n = route.len();
        for i in 0..n - 1 {
            for j in i + 2..n {
                let i_node = route[i];
                let i_next = route[i + 1];
                let j_node = route[j];
                let j_next = if j + 1 < n { route[j + 1] } else { 0 };

                let old_cost =
                    model.arc_cost(i_node, i_next) + model.arc_cost(j_node, j_next);
                let new_cost =
                    model.arc_cost(i_node, j_node) + model.arc_cost(i_next, j_next);

                if new_cost >= old_cost {
                    continue;
                }

                let mut reversed = route.clone();
                reversed[i + 1..=j].reverse();
                if !model.route_feasible(&reversed, r_idx) {
                    continue;
                }

                plan[r_idx] = reversed;
                return true;
            }
        }
    }

    false
}
