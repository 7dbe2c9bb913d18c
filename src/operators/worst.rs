//! Worst removal: iteratively take out the customer whose removal improves
//! the solution the most (Ropke & Pisinger).

use rand::Rng;

use crate::evaluate;
use crate::solution::Solution;

use super::{destroy, insertion, OperatorContext};

/// Greedy iterative removal. Gains are computed per placed customer at its
/// current position, perturbed by `U^ρ`; after each removal only the
/// affected route's gains are refreshed.
pub fn worst_removal<R: Rng>(ctx: &mut OperatorContext<R>, solution: &mut Solution) -> Vec<usize> {
    let count = destroy::sample_removal_count(ctx);
    let mut removed = Vec::with_capacity(count);

    if count == 0 {
        return removed;
    }

    let mut candidates: Vec<usize> = (0..ctx.instance.n_customers).collect();
    let mut gains: Vec<f64> = Vec::with_capacity(candidates.len());
    for index in 0..candidates.len() {
        let gain = removal_gain(ctx, solution, candidates[index]);
        gains.push(gain);
    }

    while removed.len() < count {
        let mut best = 0;
        for index in 1..gains.len() {
            if gains[index] > gains[best] {
                best = index;
            }
        }

        let customer = candidates[best];
        let route_id = solution.route_of[customer];
        let position = evaluate::customer_position(&solution.routes[route_id], customer);

        solution.routes[route_id].remove(position);
        solution
            .evaluate_local(ctx.instance, route_id, position, &ctx.penalties)
            .expect("a removal cannot overflow the capacity cap");

        removed.push(customer);
        candidates.remove(best);
        gains.remove(best);

        // Only the hit route's geometry changed; everything else keeps its
        // gain from before.
        for index in 0..candidates.len() {
            if solution.route_of[candidates[index]] == route_id {
                gains[index] = removal_gain(ctx, solution, candidates[index]);
            }
        }
    }

    removed
}

fn removal_gain<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    customer: usize,
) -> f64 {
    let route_id = solution.route_of[customer];
    let position = evaluate::customer_position(&solution.routes[route_id], customer);
    let probed_quality =
        insertion::probe_removal(ctx.instance, solution, &ctx.penalties, route_id, position);

    (solution.solution_quality - probed_quality) * destroy::perturb(ctx.rng, ctx.random_noise)
}
