//! Shaw destroy: remove a cluster of mutually related customers
//! (Shaw 1998, Ropke & Pisinger 2006).

use rand::Rng;

use crate::evaluate;
use crate::solution::Solution;

use super::{destroy, OperatorContext, ShawWeights};

/// Seed with one random customer, then repeatedly pick a random already
/// removed customer and pull in the unremoved customer most related to it.
/// Relatedness is a weighted sum of normalized distance, window, and demand
/// similarity, plus a same-route term, perturbed by `U^ρ`; smaller scores
/// are more related.
pub fn shaw_destroy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    weights: &ShawWeights,
) -> Vec<usize> {
    let count = destroy::sample_removal_count(ctx);

    let mut candidates: Vec<usize> = (0..ctx.instance.n_customers).collect();
    let seed = ctx.rng.gen_range(0..ctx.instance.n_customers);
    let mut removed = Vec::with_capacity(count.max(1));
    removed.push(seed);
    candidates.remove(seed);

    for _ in 1..count {
        let reference = removed[ctx.rng.gen_range(0..removed.len())];

        let mut best_index = 0;
        let mut best_score = f64::MAX;

        for (index, &candidate) in candidates.iter().enumerate() {
            // The distance matrix is node-indexed, the rest customer-indexed.
            let mut relatedness = weights.distance
                * ctx.instance.norm_distance[reference + 1][candidate + 1]
                + weights.window * ctx.instance.norm_start_window[reference][candidate]
                + weights.window * ctx.instance.norm_end_window[reference][candidate]
                + weights.demand * ctx.instance.norm_demand[reference][candidate];

            if solution.route_of[candidate] == solution.route_of[reference] {
                relatedness += weights.vehicle;
            }

            relatedness *= destroy::perturb(ctx.rng, ctx.random_noise);

            if relatedness < best_score {
                best_score = relatedness;
                best_index = index;
            }
        }

        removed.push(candidates[best_index]);
        candidates.remove(best_index);
    }

    for &customer in &removed {
        let route_id = solution.route_of[customer];
        let position = evaluate::customer_position(&solution.routes[route_id], customer);
        solution.routes[route_id].remove(position);
    }

    solution.evaluate_full(ctx.instance, &ctx.penalties);
    removed
}
