//! Problem definition and derived data for the VRPLDTT and VRPTW.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Error;
use crate::tensor;

/// How the cargo-load discretization is specified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LoadBuckets {
    /// Fixed bucket width in demand units.
    Width(f64),
    /// Number of buckets spanning the vehicle capacity.
    Count(usize),
}

/// An immutable problem instance.
///
/// Node indices run over `0..n_nodes` with 0 as the depot; customer ids run
/// over `0..n_customers` and map to node `id + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub n_vehicles: usize,
    pub n_nodes: usize,
    pub n_customers: usize,
    pub demand: Vec<f64>,
    pub service_times: Vec<f64>,
    pub start_window: Vec<f64>,
    pub end_window: Vec<f64>,
    pub vehicle_weight: f64,
    pub vehicle_capacity: f64,
    /// Per-route overflow allowance equal to the largest single demand,
    /// rounded up. Caps how far repair may temporarily exceed the capacity.
    pub pseudo_capacity: f64,
    pub load_bucket_size: f64,
    pub distance_matrix: Vec<Vec<f64>>,
    pub slope_matrix: Vec<Vec<f64>>,
    /// Travel times indexed by `[load bucket][from node][to node]`.
    pub time_tensor: Vec<Vec<Vec<f64>>>,
    pub norm_distance: Vec<Vec<f64>>,
    pub norm_start_window: Vec<Vec<f64>>,
    pub norm_end_window: Vec<Vec<f64>>,
    pub norm_demand: Vec<Vec<f64>>,
}

impl Instance {
    /// Build a load-dependent instance. The slope matrix and the travel-time
    /// tensor are derived from the distance and elevation matrices.
    #[allow(clippy::too_many_arguments)]
    pub fn vrpldtt(
        n_vehicles: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        elevation_matrix: Vec<Vec<f64>>,
        distance_matrix: Vec<Vec<f64>>,
        buckets: LoadBuckets,
        vehicle_weight: f64,
        vehicle_capacity: f64,
    ) -> Result<Self, Error> {
        let load_bucket_size = match buckets {
            LoadBuckets::Width(width) if width > 0.0 => width,
            LoadBuckets::Count(count) if count > 0 => vehicle_capacity / count as f64,
            _ => return Err(Error::InvalidBucketConfig),
        };

        info!(n_customers = demand.len(), "instance preprocessing started");

        let pseudo_capacity = max_demand(&demand).ceil();
        let slope_matrix = tensor::slope_matrix(&distance_matrix, &elevation_matrix);
        let time_tensor = tensor::time_tensor(
            &distance_matrix,
            &slope_matrix,
            vehicle_weight,
            vehicle_capacity,
            pseudo_capacity,
            load_bucket_size,
        );

        let instance = Self::assemble(
            n_vehicles,
            demand,
            service_times,
            start_window,
            end_window,
            distance_matrix,
            slope_matrix,
            time_tensor,
            load_bucket_size,
            vehicle_weight,
            vehicle_capacity,
            pseudo_capacity,
        );

        info!(
            n_buckets = instance.time_tensor.len(),
            "instance preprocessing done"
        );
        Ok(instance)
    }

    /// Build a time-window instance with an explicit travel-time tensor.
    ///
    /// The tensor's first level doubles as the distance matrix for the
    /// similarity-based operators. The bucket width is set to twice the
    /// capacity so every reachable load falls into bucket 0.
    pub fn vrptw(
        n_vehicles: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        time_tensor: Vec<Vec<Vec<f64>>>,
        vehicle_capacity: f64,
    ) -> Self {
        let distance_matrix = time_tensor[0].clone();
        let n_nodes = distance_matrix.len();
        let slope_matrix = vec![vec![0.0; n_nodes]; n_nodes];
        let pseudo_capacity = max_demand(&demand).ceil();

        Self::assemble(
            n_vehicles,
            demand,
            service_times,
            start_window,
            end_window,
            distance_matrix,
            slope_matrix,
            time_tensor,
            vehicle_capacity * 2.0,
            0.0,
            vehicle_capacity,
            pseudo_capacity,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        n_vehicles: usize,
        demand: Vec<f64>,
        service_times: Vec<f64>,
        start_window: Vec<f64>,
        end_window: Vec<f64>,
        distance_matrix: Vec<Vec<f64>>,
        slope_matrix: Vec<Vec<f64>>,
        time_tensor: Vec<Vec<Vec<f64>>>,
        load_bucket_size: f64,
        vehicle_weight: f64,
        vehicle_capacity: f64,
        pseudo_capacity: f64,
    ) -> Self {
        let n_customers = demand.len();
        let norm_distance = normalized_copy(&distance_matrix);
        let norm_start_window = value_similarity_matrix(&start_window);
        let norm_end_window = value_similarity_matrix(&end_window);
        let norm_demand = value_similarity_matrix(&demand);

        Instance {
            n_vehicles,
            n_nodes: n_customers + 1,
            n_customers,
            demand,
            service_times,
            start_window,
            end_window,
            vehicle_weight,
            vehicle_capacity,
            pseudo_capacity,
            load_bucket_size,
            distance_matrix,
            slope_matrix,
            time_tensor,
            norm_distance,
            norm_start_window,
            norm_end_window,
            norm_demand,
        }
    }

    /// Bucket index for a cumulative load. The small offset puts an exact
    /// interval bound into the lower bucket.
    pub fn bucket(&self, load: f64) -> usize {
        let index = ((load - 0.3) / self.load_bucket_size).max(0.0) as usize;
        index.min(self.time_tensor.len() - 1)
    }

    /// Travel time between two node indices at a load bucket.
    pub fn travel_time(&self, level: usize, from: usize, to: usize) -> f64 {
        self.time_tensor[level][from][to]
    }
}

fn max_demand(demand: &[f64]) -> f64 {
    demand.iter().fold(0.0_f64, |acc, &d| acc.max(d))
}

/// Min-max normalize a matrix into [0, 1]. Degenerate (constant) matrices
/// normalize to zeros.
fn normalized_copy(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut min = f64::MAX;
    let mut max = f64::MIN;

    for row in matrix {
        for &value in row {
            min = min.min(value);
            max = max.max(value);
        }
    }

    let base = max - min;
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&value| if base > 0.0 { (value - min) / base } else { 0.0 })
                .collect()
        })
        .collect()
}

/// Square matrix of normalized pairwise differences `|v[i] - v[j]|`.
fn value_similarity_matrix(values: &[f64]) -> Vec<Vec<f64>> {
    let n = values.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..n {
            matrix[i][j] = (values[i] - values[j]).abs();
        }
    }

    normalized_copy(&matrix)
}
