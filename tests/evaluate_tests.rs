//! Unit tests for the route-level evaluator and the travel-time model.

use alns_vrpldtt::instance::{Instance, LoadBuckets};
use alns_vrpldtt::solution::{Penalties, Solution};
use alns_vrpldtt::tensor;

/// Single-level tensor with a uniform travel time between distinct nodes.
fn uniform_tensor(n_nodes: usize, travel: f64) -> Vec<Vec<Vec<f64>>> {
    let mut matrix = vec![vec![travel; n_nodes]; n_nodes];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    vec![matrix]
}

#[test]
fn test_single_customer_timing() {
    // One customer, demand 5, window [10, 20], travel 3 each way, service 2.
    let instance = Instance::vrptw(
        1,
        vec![5.0],
        vec![2.0],
        vec![10.0],
        vec![20.0],
        uniform_tensor(2, 3.0),
        10.0,
    );

    let solution = Solution::new(&instance, vec![vec![0]], &Penalties::default());

    // The vehicle leaves as late as possible and serves the customer right
    // at the window opening.
    assert!((solution.start_times[0] - 7.0).abs() < 1e-6);
    assert!((solution.arrival_times[0] - 10.0).abs() < 1e-6);
    assert!((solution.departure_times[0] - 12.0).abs() < 1e-6);
    assert!((solution.driving_time - 6.0).abs() < 1e-6);
    assert!(solution.is_feasible);
}

#[test]
fn test_waiting_for_window_opening() {
    let instance = Instance::vrptw(
        1,
        vec![1.0, 1.0],
        vec![1.0, 1.0],
        vec![5.0, 0.0],
        vec![20.0, 20.0],
        uniform_tensor(3, 1.0),
        10.0,
    );

    let solution = Solution::new(&instance, vec![vec![0, 1]], &Penalties::default());

    // Start at 4, serve customer 0 at its opening, roll on to customer 1.
    assert!((solution.start_times[0] - 4.0).abs() < 1e-6);
    assert!((solution.arrival_times[0] - 5.0).abs() < 1e-6);
    assert!((solution.arrival_times[1] - 7.0).abs() < 1e-6);
    // Waiting and service do not count as driving time.
    assert!((solution.driving_time - 3.0).abs() < 1e-6);
}

#[test]
fn test_route_starting_time_floors_at_zero() {
    let instance = Instance::vrptw(
        1,
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![10.0],
        uniform_tensor(2, 3.0),
        10.0,
    );

    let solution = Solution::new(&instance, vec![vec![0]], &Penalties::default());

    // The window opens before the travel time allows; leave immediately.
    assert_eq!(solution.start_times[0], 0.0);
    assert!((solution.arrival_times[0] - 3.0).abs() < 1e-6);
}

#[test]
fn test_frame_error_accumulates_lateness() {
    let instance = Instance::vrptw(
        1,
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
        vec![1.0, 2.0],
        uniform_tensor(3, 2.0),
        10.0,
    );

    let solution = Solution::new(&instance, vec![vec![0, 1]], &Penalties::default());

    // Arrivals at 2 and 4 against end windows 1 and 2: lateness 1 + 2.
    assert!((solution.frame_error - 3.0).abs() < 1e-6);
    assert!(!solution.is_feasible);
}

#[test]
fn test_loads_decrease_along_route() {
    let instance = Instance::vrptw(
        1,
        vec![3.0, 1.0, 2.0],
        vec![0.0; 3],
        vec![0.0; 3],
        vec![100.0; 3],
        uniform_tensor(4, 1.0),
        10.0,
    );

    let route = vec![0, 1, 2];
    let solution = Solution::new(&instance, vec![route.clone()], &Penalties::default());

    // The first stop carries the whole route demand.
    assert!((solution.loads[route[0]] - 6.0).abs() < 1e-6);
    for pair in route.windows(2) {
        assert!(solution.loads[pair[0]] >= solution.loads[pair[1]]);
    }
    assert!((solution.loads[route[2]] - 2.0).abs() < 1e-6);
}

#[test]
fn test_bucket_upper_bound_falls_into_lower_bucket() {
    let n_nodes = 3;
    let instance = Instance::vrpldtt(
        1,
        vec![10.0, 5.0],
        vec![0.0; 2],
        vec![0.0; 2],
        vec![100.0; 2],
        vec![vec![0.0; n_nodes]; n_nodes],
        vec![vec![1.0; n_nodes]; n_nodes],
        LoadBuckets::Width(10.0),
        140.0,
        20.0,
    )
    .unwrap();

    // pseudo capacity 10, so three buckets cover [0, 30]
    assert_eq!(instance.time_tensor.len(), 3);
    assert_eq!(instance.bucket(10.0), 0);
    assert_eq!(instance.bucket(10.4), 1);
    assert_eq!(instance.bucket(0.1), 0);
    // loads beyond the tensor clamp to the last level
    assert_eq!(instance.bucket(1000.0), 2);
}

#[test]
fn test_bucket_count_sets_width() {
    let n_nodes = 2;
    let instance = Instance::vrpldtt(
        1,
        vec![5.0],
        vec![0.0],
        vec![0.0],
        vec![100.0],
        vec![vec![0.0; n_nodes]; n_nodes],
        vec![vec![1.0; n_nodes]; n_nodes],
        LoadBuckets::Count(4),
        140.0,
        20.0,
    )
    .unwrap();

    assert!((instance.load_bucket_size - 5.0).abs() < 1e-9);
}

#[test]
fn test_invalid_bucket_config_is_fatal() {
    let n_nodes = 2;
    let result = Instance::vrpldtt(
        1,
        vec![5.0],
        vec![0.0],
        vec![0.0],
        vec![100.0],
        vec![vec![0.0; n_nodes]; n_nodes],
        vec![vec![1.0; n_nodes]; n_nodes],
        LoadBuckets::Width(0.0),
        140.0,
        20.0,
    );

    assert!(result.is_err());
}

#[test]
fn test_velocity_model() {
    // Downhill rides at the cap.
    assert_eq!(tensor::velocity(200.0, -0.05), 25.0);
    // A flat road leaves the power budget unspent at the cap.
    assert_eq!(tensor::velocity(140.0, 0.0), 25.0);

    // Uphill is slow, and heavier is slower.
    let light = tensor::velocity(150.0, 0.1);
    let heavy = tensor::velocity(200.0, 0.1);
    assert!(light < 25.0);
    assert!(heavy < light);
    assert!(heavy > 0.0);
}

#[test]
fn test_slope_matrix_rise_over_run() {
    let distance = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
    let elevation = vec![vec![0.0, 100.0], vec![-100.0, 0.0]];

    let slopes = tensor::slope_matrix(&distance, &elevation);

    // 100 m rise over 1 km: ground distance sqrt(1000^2 - 100^2)
    let ground = (1000.0_f64 * 1000.0 - 100.0 * 100.0).sqrt();
    assert!((slopes[0][1] - 100.0 / ground).abs() < 1e-9);
    assert!((slopes[1][0] + 100.0 / ground).abs() < 1e-9);
    assert_eq!(slopes[0][0], 0.0);
}

#[test]
fn test_load_dependent_visit_order_changes_driving_time() {
    // Two customers up a hill; the heavy leg moves with the visit order.
    let heights = [0.0, 50.0, 100.0];
    let n_nodes = 3;
    let mut elevation = vec![vec![0.0; n_nodes]; n_nodes];
    let mut distance = vec![vec![1.0; n_nodes]; n_nodes];
    for i in 0..n_nodes {
        for j in 0..n_nodes {
            elevation[i][j] = heights[j] - heights[i];
        }
        distance[i][i] = 0.0;
    }

    let instance = Instance::vrpldtt(
        1,
        vec![10.0, 1.0],
        vec![0.0; 2],
        vec![0.0; 2],
        vec![10_000.0; 2],
        elevation,
        distance,
        LoadBuckets::Width(5.0),
        140.0,
        15.0,
    )
    .unwrap();

    let penalties = Penalties::default();
    let heavy_first = Solution::new(&instance, vec![vec![0, 1]], &penalties);
    let light_first = Solution::new(&instance, vec![vec![1, 0]], &penalties);

    assert!((heavy_first.driving_time - light_first.driving_time).abs() > 1e-9);
}
