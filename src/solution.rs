//! Solution representation with incrementally maintained evaluation caches.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Infeasibility;
use crate::evaluate;
use crate::instance::Instance;

/// Weights applied to the constraint violations in the quality objective.
/// The search driver adapts them over time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Penalties {
    pub capa_weight: f64,
    pub frame_weight: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Penalties {
            capa_weight: 1.0,
            frame_weight: 1.0,
        }
    }
}

/// A complete routing state.
///
/// `routes` is the primary representation: one ordered customer sequence per
/// vehicle, empty sequences allowed. Everything else is a cache kept
/// consistent with it, either by a full re-evaluation or by the incremental
/// single-route update after an insertion or removal.
#[derive(Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Customer ids per vehicle, in visit order.
    pub routes: Vec<Vec<usize>>,
    /// Inverted index: customer id to route index. Entries of customers
    /// currently removed from all routes are stale until reinsertion.
    pub route_of: Vec<usize>,
    /// Cumulative remaining demand from each customer through its route end.
    pub loads: Vec<f64>,
    /// Load bucket per customer, derived from `loads`.
    pub load_levels: Vec<usize>,
    pub arrival_times: Vec<f64>,
    pub departure_times: Vec<f64>,
    pub start_times: Vec<f64>,
    pub route_driving_times: Vec<f64>,
    pub route_capa_errors: Vec<f64>,
    pub route_frame_errors: Vec<f64>,
    pub route_qualities: Vec<f64>,
    pub driving_time: f64,
    pub capa_error: f64,
    pub frame_error: f64,
    pub solution_quality: f64,
    pub is_feasible: bool,
}

impl Solution {
    /// Create a solution from a route assignment and evaluate it.
    pub fn new(instance: &Instance, routes: Vec<Vec<usize>>, penalties: &Penalties) -> Self {
        let n_routes = routes.len();
        let n_customers = instance.n_customers;

        let mut solution = Solution {
            routes,
            route_of: vec![0; n_customers],
            loads: vec![0.0; n_customers],
            load_levels: vec![0; n_customers],
            arrival_times: vec![0.0; n_customers],
            departure_times: vec![0.0; n_customers],
            start_times: vec![0.0; n_routes],
            route_driving_times: vec![0.0; n_routes],
            route_capa_errors: vec![0.0; n_routes],
            route_frame_errors: vec![0.0; n_routes],
            route_qualities: vec![0.0; n_routes],
            driving_time: 0.0,
            capa_error: 0.0,
            frame_error: 0.0,
            solution_quality: 0.0,
            is_feasible: false,
        };

        solution.evaluate_full(instance, penalties);
        solution
    }

    /// Recompute every cache from scratch in O(n). Used at initialization
    /// and after wholesale destroys.
    pub fn evaluate_full(&mut self, instance: &Instance, penalties: &Penalties) {
        let mut driving_time = 0.0;
        let mut capa_error = 0.0;
        let mut frame_error = 0.0;
        let mut solution_quality = 0.0;

        for (route_id, route) in self.routes.iter().enumerate() {
            for &customer in route {
                self.route_of[customer] = route_id;
            }

            evaluate::update_load_levels(
                &mut self.loads,
                &mut self.load_levels,
                route,
                route.len(),
                instance,
            );

            let starting_time = evaluate::route_starting_time(route, &self.load_levels, instance);
            let route_time = evaluate::update_visit_times(
                &mut self.arrival_times,
                &mut self.departure_times,
                route,
                &self.load_levels,
                starting_time,
                instance,
            );
            let route_capa = evaluate::capa_error(route, &self.loads, instance);
            let route_frame = evaluate::frame_error(route, &self.arrival_times, instance);
            let route_quality = evaluate::quality(route_time, route_capa, route_frame, penalties);

            self.start_times[route_id] = starting_time;
            self.route_driving_times[route_id] = route_time;
            self.route_capa_errors[route_id] = route_capa;
            self.route_frame_errors[route_id] = route_frame;
            self.route_qualities[route_id] = route_quality;

            driving_time += route_time;
            capa_error += route_capa;
            frame_error += route_frame;
            solution_quality += route_quality;
        }

        self.driving_time = driving_time;
        self.capa_error = capa_error;
        self.frame_error = frame_error;
        self.solution_quality = solution_quality;
        self.is_feasible = capa_error <= 0.0 && frame_error <= 0.0;
    }

    /// Re-evaluate one route after a single insertion or removal.
    ///
    /// `end` is the exclusive upper bound of route positions whose loads
    /// changed: `position + 1` after inserting at `position`, `position`
    /// after removing there.
    ///
    /// The capacity check runs before the costlier time recomputation. When
    /// the route's overflow reaches the pseudo-capacity cap, the capacity
    /// caches are updated and `Infeasibility` is returned with the time
    /// caches left stale; the caller must undo the edit and re-evaluate, or
    /// rebuild from scratch.
    pub fn evaluate_local(
        &mut self,
        instance: &Instance,
        route_id: usize,
        end: usize,
        penalties: &Penalties,
    ) -> Result<(), Infeasibility> {
        self.capa_error -= self.route_capa_errors[route_id];

        evaluate::update_load_levels(
            &mut self.loads,
            &mut self.load_levels,
            &self.routes[route_id],
            end,
            instance,
        );

        let route_capa = evaluate::capa_error(&self.routes[route_id], &self.loads, instance);
        self.capa_error += route_capa;

        if route_capa >= instance.pseudo_capacity {
            // Keep the route cache consistent with the aggregate so the
            // caller's revert pass restores both exactly.
            self.route_capa_errors[route_id] = route_capa;
            return Err(Infeasibility);
        }

        self.driving_time -= self.route_driving_times[route_id];
        self.frame_error -= self.route_frame_errors[route_id];
        self.solution_quality -= self.route_qualities[route_id];

        let starting_time =
            evaluate::route_starting_time(&self.routes[route_id], &self.load_levels, instance);
        let route_time = evaluate::update_visit_times(
            &mut self.arrival_times,
            &mut self.departure_times,
            &self.routes[route_id],
            &self.load_levels,
            starting_time,
            instance,
        );
        let route_frame =
            evaluate::frame_error(&self.routes[route_id], &self.arrival_times, instance);
        let route_quality = evaluate::quality(route_time, route_capa, route_frame, penalties);

        self.driving_time += route_time;
        self.frame_error += route_frame;
        self.solution_quality += route_quality;

        self.start_times[route_id] = starting_time;
        self.route_driving_times[route_id] = route_time;
        self.route_capa_errors[route_id] = route_capa;
        self.route_frame_errors[route_id] = route_frame;
        self.route_qualities[route_id] = route_quality;

        self.is_feasible = self.capa_error <= 0.0 && self.frame_error <= 0.0;
        Ok(())
    }

    /// Recompute the quality aggregate from the cached route errors, e.g.
    /// after the driver changed the penalty weights.
    pub fn set_quality(&mut self, penalties: &Penalties) {
        let mut solution_quality = 0.0;

        for route_id in 0..self.routes.len() {
            let route_quality = evaluate::quality(
                self.route_driving_times[route_id],
                self.route_capa_errors[route_id],
                self.route_frame_errors[route_id],
                penalties,
            );
            self.route_qualities[route_id] = route_quality;
            solution_quality += route_quality;
        }

        self.solution_quality = solution_quality;
    }

    /// How unusual this solution's arcs are relative to the search history.
    ///
    /// Each traversed arc contributes `1 - usage / (iteration + 1)`; the sum
    /// is normalized by the number of customers plus the non-empty routes.
    pub fn diversity(&self, usage: &[Vec<u64>], iteration: u32) -> f64 {
        let new_iter = (iteration + 1) as f64;
        let mut norm = self.route_of.len();
        let mut diversity = 0.0;

        for route in &self.routes {
            if route.is_empty() {
                continue;
            }
            norm += 1;

            let mut prev_node = 0;
            for &customer in route {
                let node = customer + 1;
                diversity += 1.0 - usage[prev_node][node] as f64 / new_iter;
                prev_node = node;
            }
            diversity += 1.0 - usage[prev_node][0] as f64 / new_iter;
        }

        diversity / norm as f64
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Quality: {:.2}", self.solution_quality)?;
        writeln!(f, "  Driving Time: {:.2}", self.driving_time)?;
        writeln!(f, "  Capacity Error: {:.2}", self.capa_error)?;
        writeln!(f, "  Frame Error: {:.2}", self.frame_error)?;
        writeln!(f, "  Feasible: {}", self.is_feasible)?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  Route {}: {:?} (Time: {:.2})",
                i, route, self.route_driving_times[i]
            )?;
        }

        Ok(())
    }
}
