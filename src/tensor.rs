//! Travel-time precomputation for the load-dependent routing model.
//!
//! Travel speed is derived from a cyclist power balance: a fixed power
//! budget works against air drag, rolling resistance, and gravity on the
//! arc's slope, with the total mass including the current cargo. Each load
//! bucket is evaluated at its interval midpoint, producing the 3-D tensor
//! `[bucket][from][to] -> minutes`.

const MAX_SPEED_KMH: f64 = 25.0;
const POWER_W: f64 = 350.0;
const KMH_TO_MS: f64 = 3.6;
const GRAVITY: f64 = 9.81;
const DRAG_COEFFICIENT: f64 = 1.18;
const RIDER_SURFACE: f64 = 0.83;
const AIR_DENSITY: f64 = 1.18;
const ROLLING_COEFFICIENT: f64 = 0.01;
const AIR_RESISTANCE_CONSTANT: f64 = (AIR_DENSITY * DRAG_COEFFICIENT * RIDER_SURFACE) / 2.0;
const DRIVETRAIN_EFFICIENCY: f64 = 0.95;

/// Steady-state speed in km/h for the given total mass (kg) and slope
/// (rise over run). Downhill arcs ride at the speed cap.
pub fn velocity(mass: f64, slope: f64) -> f64 {
    if slope < 0.0 {
        return MAX_SPEED_KMH;
    }

    let rolling = ROLLING_COEFFICIENT * mass * GRAVITY * slope.atan().cos();
    let gravity = mass * GRAVITY * slope.atan().sin();

    // Scan speeds upward until the power budget is exhausted. The half-step
    // start keeps the final rounding symmetric.
    let accuracy = 0.01;
    let mut velocity = accuracy / 1.99;

    loop {
        let drag = AIR_RESISTANCE_CONSTANT * (velocity / KMH_TO_MS).powi(2);
        let demanded = (drag + rolling + gravity) * velocity / KMH_TO_MS / DRIVETRAIN_EFFICIENCY;

        if demanded >= POWER_W {
            break;
        }
        velocity += accuracy;
    }

    if velocity < MAX_SPEED_KMH {
        velocity - accuracy / 1.99
    } else {
        MAX_SPEED_KMH
    }
}

/// Slope (rise over run) per arc from the distance (km) and elevation (m)
/// matrices. Zero-distance arcs are flat.
pub fn slope_matrix(
    distance_matrix: &[Vec<f64>],
    elevation_matrix: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let n_nodes = distance_matrix.len();
    let mut slopes = vec![vec![0.0; n_nodes]; n_nodes];

    for i in 0..n_nodes {
        for j in 0..n_nodes {
            let elevation = elevation_matrix[i][j];
            let distance = distance_matrix[i][j];

            if distance > 0.0 {
                let ground = ((distance * 1000.0).powi(2) - elevation.powi(2)).sqrt();
                slopes[i][j] = elevation / ground;
            }
        }
    }

    slopes
}

/// Travel-time tensor `[bucket][from][to]` in minutes.
///
/// The bucket count covers `vehicle_capacity + pseudo_capacity`; each bucket
/// is evaluated with the cargo mass at its interval midpoint, capped at that
/// total.
pub fn time_tensor(
    distance_matrix: &[Vec<f64>],
    slope_matrix: &[Vec<f64>],
    vehicle_weight: f64,
    vehicle_capacity: f64,
    pseudo_capacity: f64,
    bucket_size: f64,
) -> Vec<Vec<Vec<f64>>> {
    let max_load = vehicle_capacity + pseudo_capacity;
    let n_buckets = (max_load / bucket_size).ceil() as usize;
    let n_nodes = distance_matrix.len();

    let mut tensor = vec![vec![vec![0.0; n_nodes]; n_nodes]; n_buckets];

    for (bucket, times) in tensor.iter_mut().enumerate() {
        let cargo = (bucket as f64 * bucket_size + bucket_size / 2.0).min(max_load);

        // The slope matrix is direction dependent, so ij and ji differ.
        for i in 0..n_nodes {
            for j in 0..n_nodes {
                let speed = velocity(vehicle_weight + cargo, slope_matrix[i][j]);
                times[i][j] = distance_matrix[i][j] / speed * 60.0;
            }
        }
    }

    tensor
}
