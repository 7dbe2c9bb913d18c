//! Insertion and removal probing shared by the repair operators.
//!
//! A probe applies a tentative edit, evaluates only the touched route, reads
//! off the resulting quality, and undoes the edit. This beats copying the
//! solution because every evaluation stays on route basis. A probe that
//! trips the pseudo-capacity cap surfaces [`Infeasibility`] after rolling
//! back, letting the caller skip the rest of the route: positions further
//! right only stack more load onto the same overflow.

use crate::error::Infeasibility;
use crate::instance::Instance;
use crate::solution::{Penalties, Solution};

/// Sentinel cost for "no feasible slot in this route". Kept finite so
/// regret arithmetic over such entries stays well defined.
pub const NO_SLOT: f64 = f64::MAX;

/// Quality of the solution with `customer` inserted at the position, probed
/// and rolled back.
pub fn probe_insertion(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    route_id: usize,
    customer: usize,
    position: usize,
) -> Result<f64, Infeasibility> {
    solution.routes[route_id].insert(position, customer);
    solution.route_of[customer] = route_id;

    if solution
        .evaluate_local(instance, route_id, position + 1, penalties)
        .is_err()
    {
        solution.routes[route_id].remove(position);
        solution
            .evaluate_local(instance, route_id, position, penalties)
            .expect("reverting a probe restores a state within the capacity cap");
        return Err(Infeasibility);
    }

    let probed_quality = solution.solution_quality;

    solution.routes[route_id].remove(position);
    solution
        .evaluate_local(instance, route_id, position, penalties)
        .expect("reverting a probe restores a state within the capacity cap");

    Ok(probed_quality)
}

/// Quality of the solution with a whole block inserted at the position,
/// probed and rolled back. Order of the block is preserved.
pub fn probe_block(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    route_id: usize,
    customers: &[usize],
    position: usize,
) -> Result<f64, Infeasibility> {
    for (offset, &customer) in customers.iter().enumerate() {
        solution.routes[route_id].insert(position + offset, customer);
        solution.route_of[customer] = route_id;
    }

    if solution
        .evaluate_local(instance, route_id, position + customers.len(), penalties)
        .is_err()
    {
        for _ in 0..customers.len() {
            solution.routes[route_id].remove(position);
        }
        solution
            .evaluate_local(instance, route_id, position, penalties)
            .expect("reverting a probe restores a state within the capacity cap");
        return Err(Infeasibility);
    }

    let probed_quality = solution.solution_quality;

    for _ in 0..customers.len() {
        solution.routes[route_id].remove(position);
    }
    solution
        .evaluate_local(instance, route_id, position, penalties)
        .expect("reverting a probe restores a state within the capacity cap");

    Ok(probed_quality)
}

/// Quality of the solution with the customer at the position taken out,
/// probed and rolled back. Removals cannot overflow, so this is infallible.
pub fn probe_removal(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    route_id: usize,
    position: usize,
) -> f64 {
    let customer = solution.routes[route_id].remove(position);
    solution
        .evaluate_local(instance, route_id, position, penalties)
        .expect("a removal cannot overflow the capacity cap");

    let probed_quality = solution.solution_quality;

    solution.routes[route_id].insert(position, customer);
    solution.route_of[customer] = route_id;
    solution
        .evaluate_local(instance, route_id, position + 1, penalties)
        .expect("restoring a removed customer matches the previous state");

    probed_quality
}

/// Best insertion of a customer over a single route or over all routes:
/// `(quality delta, route, position)`, or `None` when no position stays
/// under the overflow cap. Depot legs are covered implicitly by the first
/// and last positions.
pub fn best_insertion(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
    scope: Option<usize>,
) -> Option<(f64, usize, usize)> {
    let (start, stop) = match scope {
        Some(route_id) => (route_id, route_id + 1),
        None => (0, solution.routes.len()),
    };

    let mut best: Option<(f64, usize, usize)> = None;

    for route_id in start..stop {
        for position in 0..=solution.routes[route_id].len() {
            match probe_insertion(instance, solution, penalties, route_id, customer, position) {
                Ok(quality) => {
                    let delta = quality - solution.solution_quality;
                    if best.map_or(true, |(cost, _, _)| delta < cost) {
                        best = Some((delta, route_id, position));
                    }
                }
                Err(Infeasibility) => break,
            }
        }
    }

    best
}

/// Insert the customer at a previously probed spot and refresh the caches.
pub fn commit_insertion(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
    route_id: usize,
    position: usize,
) {
    solution.routes[route_id].insert(position, customer);
    solution.route_of[customer] = route_id;
    solution
        .evaluate_local(instance, route_id, position + 1, penalties)
        .expect("committed insertions were probed within the capacity cap");
}

/// Last resort when no route can take the customer under the overflow cap:
/// the front of route 0, evaluated from scratch so the aborting incremental
/// path is bypassed. Returns the route that changed.
pub fn commit_unplaceable(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
) -> usize {
    solution.routes[0].insert(0, customer);
    solution.route_of[customer] = 0;
    solution.evaluate_full(instance, penalties);
    0
}
