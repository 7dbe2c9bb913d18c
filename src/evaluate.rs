//! Route-level evaluation primitives.
//!
//! These functions maintain the per-customer and per-route caches for a
//! single route slice. They are the innermost loop of every insertion probe,
//! so they update the caches in place instead of rebuilding them.

use crate::instance::Instance;
use crate::solution::Penalties;

/// Recompute `loads` and `load_levels` for the route positions `0..end`
/// in reverse. Positions at and after `end` must already be correct; the
/// running load is seeded from the first untouched position.
pub fn update_load_levels(
    loads: &mut [f64],
    load_levels: &mut [usize],
    route: &[usize],
    end: usize,
    instance: &Instance,
) {
    if route.is_empty() || end == 0 {
        return;
    }

    let mut load = if end < route.len() {
        loads[route[end]]
    } else {
        0.0
    };

    for pos in (0..end).rev() {
        let customer = route[pos];
        load += instance.demand[customer];
        loads[customer] = load;
        load_levels[customer] = instance.bucket(load);
    }
}

/// Latest possible departure from the depot so that the first customer is
/// served right at the opening of its window, floored at time zero.
pub fn route_starting_time(route: &[usize], load_levels: &[usize], instance: &Instance) -> f64 {
    match route.first() {
        Some(&first) => {
            let approach = instance.travel_time(load_levels[first], 0, first + 1);
            (instance.start_window[first] - approach).max(0.0)
        }
        None => 0.0,
    }
}

/// Walk the route forward, updating arrival and departure times, and return
/// the route's driving time including the return arc to the depot (driven
/// empty, bucket 0). Early arrivals wait for the window to open.
pub fn update_visit_times(
    arrival_times: &mut [f64],
    departure_times: &mut [f64],
    route: &[usize],
    load_levels: &[usize],
    starting_time: f64,
    instance: &Instance,
) -> f64 {
    let mut driving_time = 0.0;
    let mut current_time = starting_time;
    let mut prev_node = 0;

    for &customer in route {
        let node = customer + 1;
        let leg = instance.travel_time(load_levels[customer], prev_node, node);
        current_time += leg;
        driving_time += leg;

        current_time = current_time.max(instance.start_window[customer]);
        arrival_times[customer] = current_time;

        current_time += instance.service_times[customer];
        departure_times[customer] = current_time;

        prev_node = node;
    }

    if !route.is_empty() {
        driving_time += instance.travel_time(0, prev_node, 0);
    }

    driving_time
}

/// Capacity overflow of a route. The first stop carries the whole load.
pub fn capa_error(route: &[usize], loads: &[f64], instance: &Instance) -> f64 {
    match route.first() {
        Some(&first) => (loads[first] - instance.vehicle_capacity).max(0.0),
        None => 0.0,
    }
}

/// Accumulated lateness against the soft end windows. Early service is not
/// possible (the vehicle waits), so late arrival is the only violation.
pub fn frame_error(route: &[usize], arrival_times: &[f64], instance: &Instance) -> f64 {
    route
        .iter()
        .map(|&customer| (arrival_times[customer] - instance.end_window[customer]).max(0.0))
        .sum()
}

/// Weighted route quality.
pub fn quality(driving_time: f64, capa_error: f64, frame_error: f64, penalties: &Penalties) -> f64 {
    driving_time + penalties.capa_weight * capa_error + penalties.frame_weight * frame_error
}

/// Position of a customer within a route.
///
/// Panics when the customer is absent: the caches promised it was here, so
/// this is an unrecoverable bookkeeping failure.
pub fn customer_position(route: &[usize], customer: usize) -> usize {
    route
        .iter()
        .position(|&c| c == customer)
        .unwrap_or_else(|| panic!("customer {} not found in its recorded route", customer))
}
