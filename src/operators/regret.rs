//! k-regret repair: insert first where postponing would hurt the most.

use rand::Rng;
use std::cmp::Ordering;

use crate::solution::Solution;

use super::{insertion, repair, OperatorContext};

/// For each removed customer collect its best insertion cost per route; the
/// regret is the summed cost gap between its best slot and the k−1 next
/// ones. The customer with the largest regret is inserted at its best slot,
/// then only the modified route's column and the regrets are refreshed.
pub fn k_regret<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    mut removed: Vec<usize>,
    k: usize,
) {
    if removed.is_empty() {
        return;
    }

    let n_routes = solution.routes.len();
    let mut table: Vec<Vec<(f64, usize)>> = Vec::with_capacity(removed.len());
    for index in 0..removed.len() {
        let row = repair::route_costs(ctx.instance, solution, &ctx.penalties, removed[index], n_routes);
        table.push(row);
    }

    while !removed.is_empty() {
        let mut best_customer = 0;
        let mut best_regret = f64::MIN;

        for (index, row) in table.iter().enumerate() {
            let regret = regret_value(row, k);
            if regret > best_regret {
                best_regret = regret;
                best_customer = index;
            }
        }

        let row = &table[best_customer];
        let mut best_route = 0;
        for route_id in 1..row.len() {
            if row[route_id].0 < row[best_route].0 {
                best_route = route_id;
            }
        }

        let customer = removed[best_customer];
        let changed_route = if row[best_route].0 < insertion::NO_SLOT {
            let position = row[best_route].1;
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
            table[index][changed_route] = repair::best_route_cost(
                ctx.instance,
                solution,
                &ctx.penalties,
                removed[index],
                changed_route,
            );
        }
    }
}

/// Regret over the k cheapest route costs of one customer.
fn regret_value(row: &[(f64, usize)], k: usize) -> f64 {
    let mut costs: Vec<f64> = row.iter().map(|&(cost, _)| cost).collect();
    costs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let considered = k.min(costs.len());
    let mut regret = 0.0;
    for index in 1..considered {
        regret += costs[index] - costs[index - 1];
    }

    regret
}
