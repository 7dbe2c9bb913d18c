//! End-to-end tests for the simulated-annealing search driver.

use alns_vrpldtt::config::Config;
use alns_vrpldtt::error::Error;
use alns_vrpldtt::instance::Instance;
use alns_vrpldtt::Alns;

/// Single-level tensor with Euclidean travel times between the points.
fn euclidean_tensor(points: &[(f64, f64)]) -> Vec<Vec<Vec<f64>>> {
    let n = points.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            let dx = points[i].0 - points[j].0;
            let dy = points[i].1 - points[j].1;
            matrix[i][j] = (dx * dx + dy * dy).sqrt();
        }
    }
    vec![matrix]
}

fn quick_config(seed: u64, max_iterations: u32) -> Config {
    Config::new()
        .with_max_time(30.0)
        .with_max_iterations(max_iterations)
        .with_seed(seed)
}

#[test]
fn test_unit_square_finds_two_adjacent_pairs() {
    // Depot at the origin, customers at the corners of a square. Capacity
    // forces two routes of two customers; pairing adjacent corners is
    // optimal at 4 + 4·sqrt(2).
    let points = [(0.0, 0.0), (1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)];
    let instance = Instance::vrptw(
        2,
        vec![10.0; 4],
        vec![1.0; 4],
        vec![0.0; 4],
        vec![100.0; 4],
        euclidean_tensor(&points),
        25.0,
    );

    let mut solver = Alns::new(instance, quick_config(42, 500)).unwrap();
    let best = solver.solve().expect("a feasible solution exists");

    assert!(best.is_feasible);
    let optimum = 4.0 + 4.0 * 2.0_f64.sqrt();
    assert!(
        (best.driving_time - optimum).abs() < 1e-6,
        "driving time {} vs optimum {}",
        best.driving_time,
        optimum
    );

    let mut sizes: Vec<usize> = best.routes.iter().map(|r| r.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 2]);
}

#[test]
fn test_capacity_tight_instance_needs_three_routes() {
    // Three customers of demand 15 against capacity 20: every feasible
    // solution runs three singleton routes.
    let points = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];
    let instance = Instance::vrptw(
        3,
        vec![15.0; 3],
        vec![1.0; 3],
        vec![0.0; 3],
        vec![100.0; 3],
        euclidean_tensor(&points),
        20.0,
    );

    let mut solver = Alns::new(instance, quick_config(7, 400)).unwrap();
    let best = solver.solve().expect("a feasible solution exists");

    assert!(best.is_feasible);
    assert_eq!(best.capa_error, 0.0);
    for route in &best.routes {
        assert_eq!(route.len(), 1);
    }
    // Three round trips: 2 + 2 + 2.
    assert!((best.driving_time - 6.0).abs() < 1e-6);
}

#[test]
fn test_driver_prefers_window_split() {
    // Non-overlapping windows with a huge connecting arc: any shared route
    // is late somewhere, the split is feasible.
    let n_nodes = 3;
    let mut matrix = vec![vec![150.0; n_nodes]; n_nodes];
    for i in 0..n_nodes {
        matrix[i][i] = 0.0;
        matrix[0][i] = if i == 0 { 0.0 } else { 1.0 };
        matrix[i][0] = if i == 0 { 0.0 } else { 1.0 };
    }
    let instance = Instance::vrptw(
        2,
        vec![1.0, 1.0],
        vec![0.0, 0.0],
        vec![0.0, 100.0],
        vec![5.0, 110.0],
        vec![matrix],
        10.0,
    );

    let mut solver = Alns::new(instance, quick_config(13, 2000)).unwrap();
    let best = solver.solve().expect("the split solution is feasible");

    assert!(best.is_feasible);
    assert_eq!(best.frame_error, 0.0);
    for route in &best.routes {
        assert!(route.len() <= 1);
    }
    assert!((best.driving_time - 4.0).abs() < 1e-6);
}

#[test]
fn test_fixed_seed_is_deterministic() {
    let points = [(0.0, 0.0), (2.0, 1.0), (1.0, 3.0), (-2.0, 2.0), (-1.0, -2.0), (3.0, -1.0)];
    let build = || {
        Instance::vrptw(
            2,
            vec![4.0, 3.0, 5.0, 2.0, 6.0],
            vec![1.0; 5],
            vec![0.0; 5],
            vec![200.0; 5],
            euclidean_tensor(&points),
            12.0,
        )
    };

    // A long wheel memory keeps the weight updates out of the run, so the
    // timing-normalized rewards cannot perturb the operator draws.
    let config = quick_config(99, 150).with_wheel_memory_length(1000);

    let mut first = Alns::new(build(), config.clone()).unwrap();
    let mut second = Alns::new(build(), config).unwrap();

    let best_first = first.solve().cloned();
    let best_second = second.solve().cloned();

    assert_eq!(first.iterations, second.iterations);
    let best_first = best_first.expect("feasible");
    let best_second = best_second.expect("feasible");
    assert_eq!(best_first.routes, best_second.routes);
    assert!((best_first.driving_time - best_second.driving_time).abs() < 1e-12);
}

#[test]
fn test_solver_reports_kpis() {
    let points = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
    let instance = Instance::vrptw(
        2,
        vec![5.0, 5.0],
        vec![1.0; 2],
        vec![0.0; 2],
        vec![100.0; 2],
        euclidean_tensor(&points),
        10.0,
    );

    let mut solver = Alns::new(instance, quick_config(1, 100)).unwrap();
    solver.solve();

    assert!(solver.iterations > 0);
    assert!(solver.solve_time.as_nanos() > 0);
    assert!(solver.best_solution.is_some());
}

#[test]
fn test_unknown_operator_names_are_fatal() {
    let points = [(0.0, 0.0), (1.0, 0.0)];
    let build = || {
        Instance::vrptw(
            1,
            vec![1.0],
            vec![0.0],
            vec![0.0],
            vec![10.0],
            euclidean_tensor(&points),
            10.0,
        )
    };

    let config = Config::new().with_destroy_operators(["no_such_destroy"]);
    match Alns::new(build(), config) {
        Err(Error::UnknownDestroyOperator(name)) => assert_eq!(name, "no_such_destroy"),
        other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
    }

    let config = Config::new().with_repair_operators(["no_such_repair"]);
    match Alns::new(build(), config) {
        Err(Error::UnknownRepairOperator(name)) => assert_eq!(name, "no_such_repair"),
        other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_overfull_instance_is_fatal() {
    let points = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
    let instance = Instance::vrptw(
        1,
        vec![50.0, 50.0],
        vec![0.0; 2],
        vec![0.0; 2],
        vec![100.0; 2],
        euclidean_tensor(&points),
        10.0,
    );

    match Alns::new(instance, Config::new()) {
        Err(Error::InsufficientFleetCapacity) => {}
        other => panic!("expected a capacity error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_operator_lists_fall_back_to_defaults() {
    let points = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
    let instance = Instance::vrptw(
        2,
        vec![5.0, 5.0],
        vec![1.0; 2],
        vec![0.0; 2],
        vec![100.0; 2],
        euclidean_tensor(&points),
        10.0,
    );

    let config = quick_config(3, 50)
        .with_destroy_operators(Vec::<String>::new())
        .with_repair_operators(Vec::<String>::new());

    let mut solver = Alns::new(instance, config).unwrap();
    assert!(solver.solve().is_some());
}
