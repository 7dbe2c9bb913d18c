//! Randomized and rank-driven destroy operators.
//!
//! The demand, travel-time, and node-pair operators share one skeleton: rank
//! the customers by some badness measure, perturb each rank by `U^ρ`, and
//! remove the customers with the largest perturbed ranks. The removal count
//! is drawn from a normal distribution around the driver's `mean_removal`.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::evaluate;
use crate::history::SearchHistory;
use crate::instance::Instance;
use crate::solution::Solution;
use crate::utils;

use super::OperatorContext;

/// Remove each customer independently with probability
/// `mean_removal / n_customers`, then re-evaluate from scratch.
pub fn random_destroy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
) -> Vec<usize> {
    let n_customers = ctx.instance.n_customers;
    let mut removed = Vec::new();

    for route in &mut solution.routes {
        route.retain(|&customer| {
            let draw = ctx.rng.gen_range(0..=n_customers);
            if draw as f64 <= ctx.mean_removal {
                removed.push(customer);
                false
            } else {
                true
            }
        });
    }

    solution.evaluate_full(ctx.instance, &ctx.penalties);
    removed
}

/// Empty one uniformly chosen route.
pub fn route_destroy<R: Rng>(ctx: &mut OperatorContext<R>, solution: &mut Solution) -> Vec<usize> {
    let route_id = ctx.rng.gen_range(0..solution.routes.len());
    let removed = std::mem::take(&mut solution.routes[route_id]);

    solution.evaluate_full(ctx.instance, &ctx.penalties);
    removed
}

/// Remove the customers with the largest perturbed ranks.
pub fn ranked_destroy<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    ranks: &[usize],
) -> Vec<usize> {
    let count = sample_removal_count(ctx);

    let skewed: Vec<f64> = ranks
        .iter()
        .map(|&rank| rank as f64 * perturb(ctx.rng, ctx.random_noise))
        .collect();
    let order = utils::sorted_indices(&skewed);
    let removed: Vec<usize> = order[order.len() - count..].to_vec();

    for &customer in &removed {
        let route_id = solution.route_of[customer];
        let position = evaluate::customer_position(&solution.routes[route_id], customer);
        solution.routes[route_id].remove(position);
    }

    solution.evaluate_full(ctx.instance, &ctx.penalties);
    removed
}

/// Rank customers by the travel time they cause in their current route:
/// the arc into them at their load level plus the arc they send onward.
pub fn travel_time_ranks(instance: &Instance, solution: &Solution) -> Vec<usize> {
    let mut travel_times = vec![0.0; instance.n_customers];

    for route in &solution.routes {
        let mut prev_node = 0;
        let mut prev_customer: Option<usize> = None;

        for &customer in route {
            let node = customer + 1;
            let leg = instance.travel_time(solution.load_levels[customer], prev_node, node);

            travel_times[customer] += leg;
            if let Some(prev) = prev_customer {
                travel_times[prev] += leg;
            }

            prev_node = node;
            prev_customer = Some(customer);
        }

        if let Some(last) = prev_customer {
            travel_times[last] += instance.travel_time(0, last + 1, 0);
        }
    }

    utils::ranks(&travel_times)
}

/// Rank customers by the historical potential of the arcs they sit on: the
/// best driving time ever observed with each adjacent arc, summed. High
/// sums mean the position never appeared in a good solution.
pub fn node_pair_ranks(
    instance: &Instance,
    solution: &Solution,
    history: &SearchHistory,
) -> Vec<usize> {
    let mut potentials = vec![0.0; instance.n_customers];

    for route in &solution.routes {
        let mut prev_node = 0;
        let mut prev_customer: Option<usize> = None;

        for &customer in route {
            let node = customer + 1;
            let potential = history.potential[prev_node][node];

            potentials[customer] += potential;
            if let Some(prev) = prev_customer {
                potentials[prev] += potential;
            }

            prev_node = node;
            prev_customer = Some(customer);
        }

        if let Some(last) = prev_customer {
            potentials[last] += history.potential[last + 1][0];
        }
    }

    utils::ranks(&potentials)
}

/// Draw the number of customers to remove: Normal(mean, mean/2) rounded and
/// clipped to `[0, n_customers - 1]`.
pub fn sample_removal_count<R: Rng>(ctx: &mut OperatorContext<R>) -> usize {
    let normal = Normal::new(ctx.mean_removal, ctx.mean_removal / 2.0)
        .expect("removal count distribution parameters are finite");
    let draw = normal.sample(ctx.rng).round();
    let max = ctx.instance.n_customers.saturating_sub(1);

    draw.clamp(0.0, max as f64) as usize
}

/// Rank perturbation factor `U^ρ`.
pub fn perturb<R: Rng>(rng: &mut R, noise: f64) -> f64 {
    rng.gen::<f64>().powf(noise)
}
