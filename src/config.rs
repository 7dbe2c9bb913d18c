//! Configuration parameters for the ALNS solver.

use serde::{Deserialize, Serialize};

/// Destroy operator names accepted in [`Config::destroy_operators`].
pub const DESTROY_OPERATOR_NAMES: [&str; 10] = [
    "random_destroy",
    "route_destroy",
    "demand_destroy",
    "time_destroy",
    "worst_destroy",
    "node_pair_destroy",
    "shaw_destroy",
    "distance_similarity",
    "window_similarity",
    "demand_similarity",
];

/// Repair operator names accepted in [`Config::repair_operators`].
pub const REPAIR_OPERATOR_NAMES: [&str; 7] = [
    "basic_greedy",
    "random_greedy",
    "deep_greedy",
    "2_regret",
    "3_regret",
    "5_regret",
    "beta_hybrid",
];

/// Tunable settings for the simulated-annealing search and the adaptive
/// operator selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wall-clock budget in seconds.
    pub max_time: f64,
    /// Iterations without a new best before the search stops.
    pub max_iterations: u32,
    /// Initial temperature as a fraction of the starting solution quality.
    pub init_temp_factor: f64,
    /// Geometric cooling factor applied once per iteration.
    pub cooling_rate: f64,
    /// Iterations per operator between two weight updates.
    pub wheel_memory_length: u32,
    /// Share of the period's average score folded into a weight (λ).
    pub wheel_decay: f64,
    /// Weight floor keeping every operator selectable.
    pub wheel_min_weight: f64,
    /// Reward for finding a new overall best solution.
    pub reward_best: f64,
    /// Reward for beating the current incumbent.
    pub reward_accept_better: f64,
    /// Reward for reaching a solution not seen before.
    pub reward_unique: f64,
    /// Scale of the diversity-based reward for rejected solutions.
    pub reward_divers: f64,
    /// Flat score adjustment for non-improving iterations.
    pub reward_penalty: f64,
    /// Rank perturbation exponent ρ for the randomized destroy operators.
    pub random_noise: f64,
    /// Target share of infeasible solutions per 100 iterations.
    pub target_infeasibility: f64,
    /// Log base controlling how fast stagnation inflates the removal count.
    /// Non-positive disables the shakeup.
    pub shakeup_log: f64,
    /// Log base for the baseline mean removal count.
    pub mean_removal_log: f64,
    /// Seed for the search's random stream.
    pub seed: u64,
    /// Destroy operator names; an empty list falls back to `random_destroy`.
    pub destroy_operators: Vec<String>,
    /// Repair operator names; an empty list falls back to `basic_greedy`.
    pub repair_operators: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_time: 600.0,
            max_iterations: 10_000,
            init_temp_factor: 0.01,
            cooling_rate: 0.99975,
            wheel_memory_length: 20,
            wheel_decay: 0.1,
            wheel_min_weight: 1.0,
            reward_best: 33.0,
            reward_accept_better: 13.0,
            reward_unique: 9.0,
            reward_divers: 9.0,
            reward_penalty: 0.0,
            random_noise: 0.0,
            target_infeasibility: 0.2,
            shakeup_log: 20.0,
            mean_removal_log: 2.0,
            seed: 42,
            destroy_operators: DESTROY_OPERATOR_NAMES.iter().map(|s| s.to_string()).collect(),
            repair_operators: REPAIR_OPERATOR_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the wall-clock budget in seconds.
    pub fn with_max_time(mut self, seconds: f64) -> Self {
        self.max_time = seconds;
        self
    }

    /// Set the limit on iterations without improvement.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the initial temperature factor.
    pub fn with_init_temp_factor(mut self, factor: f64) -> Self {
        self.init_temp_factor = factor;
        self
    }

    /// Set the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Set the wheel memory length.
    pub fn with_wheel_memory_length(mut self, length: u32) -> Self {
        self.wheel_memory_length = length;
        self
    }

    /// Set the wheel decay parameter λ.
    pub fn with_wheel_decay(mut self, decay: f64) -> Self {
        self.wheel_decay = decay;
        self
    }

    /// Set the rank perturbation exponent ρ.
    pub fn with_random_noise(mut self, noise: f64) -> Self {
        self.random_noise = noise;
        self
    }

    /// Set the target infeasibility ratio.
    pub fn with_target_infeasibility(mut self, target: f64) -> Self {
        self.target_infeasibility = target;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the destroy operator list.
    pub fn with_destroy_operators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destroy_operators = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the repair operator list.
    pub fn with_repair_operators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repair_operators = names.into_iter().map(Into::into).collect();
        self
    }
}
