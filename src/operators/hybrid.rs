//! β-hybrid repair: small removal sets are reinserted as one contiguous
//! block; everything else falls back to randomized greedy.

use rand::Rng;

use crate::error::Infeasibility;
use crate::solution::Solution;

use super::{insertion, repair, OperatorContext};

/// Try to insert the whole removed list (reversed with probability 0.5) as
/// a contiguous block at its best feasible position in any route. The
/// fallback fires exactly when no block commit happened: the block phase
/// only runs for lists no longer than β, and within it only when some
/// position stays under the overflow cap.
pub fn beta_hybrid<R: Rng>(
    ctx: &mut OperatorContext<R>,
    solution: &mut Solution,
    mut removed: Vec<usize>,
    beta: usize,
) {
    if removed.is_empty() {
        return;
    }

    if removed.len() <= beta {
        if ctx.rng.gen_bool(0.5) {
            removed.reverse();
        }

        let mut best: Option<(f64, usize, usize)> = None;

        for route_id in 0..solution.routes.len() {
            for position in 0..=solution.routes[route_id].len() {
                match insertion::probe_block(
                    ctx.instance,
                    solution,
                    &ctx.penalties,
                    route_id,
                    &removed,
                    position,
                ) {
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

        if let Some((_, route_id, position)) = best {
            for (offset, &customer) in removed.iter().enumerate() {
                solution.routes[route_id].insert(position + offset, customer);
                solution.route_of[customer] = route_id;
            }
            solution
                .evaluate_local(ctx.instance, route_id, position + removed.len(), &ctx.penalties)
                .expect("committed block insertions were probed within the capacity cap");
            return;
        }
    }

    repair::random_greedy(ctx, solution, removed);
}
