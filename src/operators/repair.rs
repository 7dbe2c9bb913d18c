//! Greedy repair operators.

use rand::Rng;

use crate::instance::Instance;
use crate::solution::{Penalties, Solution};

use super::{insertion, OperatorContext};

/// Insert the customers in removal-list order, each at its best global
/// position.
pub fn basic_greedy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    removed: Vec<usize>,
) {
    for customer in removed {
        place_at_best(ctx.instance, solution, &ctx.penalties, customer);
    }
}

/// Insert the customers in uniformly random order, each at its best global
/// position.
pub fn random_greedy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    mut removed: Vec<usize>,
) {
    while !removed.is_empty() {
        let pick = ctx.rng.gen_range(0..removed.len());
        let customer = removed.remove(pick);
        place_at_best(ctx.instance, solution, &ctx.penalties, customer);
    }
}

/// Always insert the globally cheapest (customer, position) pair next.
///
/// The per-route cost table is filled once, and after each insertion only
/// the modified route's column is recomputed; insertions elsewhere cannot
/// change a route's own best position.
pub fn deep_greedy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    mut removed: Vec<usize>,
) {
    if removed.is_empty() {
        return;
    }

    let n_routes = solution.routes.len();
    let mut table: Vec<Vec<(f64, usize)>> = Vec::with_capacity(removed.len());
    for index in 0..removed.len() {
        let row = route_costs(ctx.instance, solution, &ctx.penalties, removed[index], n_routes);
        table.push(row);
    }

    while !removed.is_empty() {
        let mut best_customer = 0;
        let mut best_route = 0;
        let mut best_cost = insertion::NO_SLOT;

        for (customer_index, row) in table.iter().enumerate() {
            for (route_id, &(cost, _)) in row.iter().enumerate() {
                if cost < best_cost {
                    best_cost = cost;
                    best_customer = customer_index;
                    best_route = route_id;
                }
            }
        }

        let customer = removed[best_customer];
        let changed_route = if best_cost < insertion::NO_SLOT {
            let position = table[best_customer][best_route].1;
            insertion::commit_insertion(
                ctx.instance,
                solution,
                &ctx.penalties,
                customer,
                best_route,
                position,
            );
            best_route
        } else {
            insertion::commit_unplaceable(ctx.instance, solution, &ctx.penalties, customer)
        };

        removed.remove(best_customer);
        table.remove(best_customer);

        for index in 0..removed.len() {
            table[index][changed_route] = best_route_cost(
                ctx.instance,
                solution,
                &ctx.penalties,
                removed[index],
                changed_route,
            );
        }
    }
}

/// Best global insertion for one customer, committed immediately. Returns
/// the route that changed.
pub(crate) fn place_at_best(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
) -> usize {
    match insertion::best_insertion(instance, solution, penalties, customer, None) {
        Some((_, route_id, position)) => {
            insertion::commit_insertion(instance, solution, penalties, customer, route_id, position);
            route_id
        }
        None => insertion::commit_unplaceable(instance, solution, penalties, customer),
    }
}

/// Best insertion cost and position of a customer per route.
pub(crate) fn route_costs(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
    n_routes: usize,
) -> Vec<(f64, usize)> {
    (0..n_routes)
        .map(|route_id| best_route_cost(instance, solution, penalties, customer, route_id))
        .collect()
}

/// Best insertion cost and position of a customer within one route;
/// [`insertion::NO_SLOT`] when the route cannot take it.
pub(crate) fn best_route_cost(
    instance: &Instance,
    solution: &mut Solution,
    penalties: &Penalties,
    customer: usize,
    route_id: usize,
) -> (f64, usize) {
    match insertion::best_insertion(instance, solution, penalties, customer, Some(route_id)) {
        Some((cost, _, position)) => (cost, position),
        None => (insertion::NO_SLOT, 0),
    }
}
