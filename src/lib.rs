//! # ALNS-VRPLDTT
//!
//! A Rust implementation of an Adaptive Large Neighborhood Search for the
//! load-dependent vehicle routing problem with time windows (VRPLDTT) and
//! its VRPTW special case.
//!
//! Travel time between two nodes depends on the vehicle's current cargo
//! through a precomputed time tensor. The search alternates destroy and
//! repair operators drawn from adaptive roulette wheels inside a
//! simulated-annealing acceptance loop, re-evaluating only the touched
//! route after each edit.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod history;
pub mod instance;
pub mod operators;
pub mod solution;
pub mod tensor;
pub mod utils;
pub mod wheel;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::history::SearchHistory;
use crate::instance::Instance;
use crate::operators::{DestroyOperator, OperatorContext, RepairOperator};
use crate::solution::{Penalties, Solution};
use crate::wheel::RouletteWheel;

/// The ALNS solver: owns the problem instance, the operator pools with
/// their roulette wheels, the search history, and the three solutions the
/// annealing loop works on.
pub struct Alns {
    pub instance: Instance,
    pub config: Config,
    /// Best feasible solution found so far, if any.
    pub best_solution: Option<Solution>,
    /// Iterations executed by the last `solve` call.
    pub iterations: u32,
    /// Wall-clock duration of the last `solve` call.
    pub solve_time: Duration,
    destroy_ops: Vec<DestroyOperator>,
    repair_ops: Vec<RepairOperator>,
    destroy_wheel: RouletteWheel,
    repair_wheel: RouletteWheel,
    history: SearchHistory,
    visited: HashMap<Vec<Vec<usize>>, u64>,
    penalties: Penalties,
    mean_removal: f64,
    inf_count: u32,
    rng: ChaCha8Rng,
    running: Solution,
    current: Solution,
}

impl Alns {
    /// Build a solver for the instance. Resolves the configured operator
    /// names and constructs the random initial solution; unknown operator
    /// names and an instance the padded fleet capacity cannot hold are
    /// fatal here.
    pub fn new(instance: Instance, config: Config) -> Result<Self, Error> {
        let mut destroy_names = config.destroy_operators.clone();
        if destroy_names.is_empty() {
            warn!("no destroy operator configured, falling back to random_destroy");
            destroy_names.push("random_destroy".to_string());
        }

        let mut repair_names = config.repair_operators.clone();
        if repair_names.is_empty() {
            warn!("no repair operator configured, falling back to basic_greedy");
            repair_names.push("basic_greedy".to_string());
        }

        let destroy_ops = destroy_names
            .iter()
            .map(|name| DestroyOperator::from_name(name, &instance))
            .collect::<Result<Vec<_>, _>>()?;
        let repair_ops = repair_names
            .iter()
            .map(|name| RepairOperator::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        let destroy_wheel =
            RouletteWheel::new(destroy_ops.len(), config.wheel_decay, config.wheel_min_weight);
        let repair_wheel =
            RouletteWheel::new(repair_ops.len(), config.wheel_decay, config.wheel_min_weight);

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let penalties = Penalties::default();

        let routes = initial_routes(&instance, &mut rng)?;
        let initial = Solution::new(&instance, routes, &penalties);

        let mean_removal = (instance.n_customers as f64).ln() / config.mean_removal_log.ln();
        let history = SearchHistory::new(instance.n_nodes);

        Ok(Alns {
            running: initial.clone(),
            current: initial,
            best_solution: None,
            iterations: 0,
            solve_time: Duration::ZERO,
            destroy_ops,
            repair_ops,
            destroy_wheel,
            repair_wheel,
            history,
            visited: HashMap::new(),
            penalties,
            mean_removal,
            inf_count: 0,
            rng,
            instance,
            config,
        })
    }

    /// Run the simulated-annealing main loop until the wall-clock budget is
    /// spent or too many iterations pass without a new best. Returns the
    /// best feasible solution found, if any.
    pub fn solve(&mut self) -> Option<&Solution> {
        let start = Instant::now();
        let mut temperature = self.config.init_temp_factor * self.running.solution_quality;
        let mut iteration: u32 = 0;
        let mut iterations_wi: u32 = 0;
        let mut inf_window: u32 = 0;
        let base_removal =
            (self.instance.n_customers as f64).ln() / self.config.mean_removal_log.ln();

        info!(
            quality = self.running.solution_quality,
            temperature, "search started"
        );

        while start.elapsed().as_secs_f64() < self.config.max_time
            && iterations_wi < self.config.max_iterations
        {
            let iteration_start = Instant::now();

            // 1) Select one operator per family on the current weights.
            let destroy_id = self.destroy_wheel.select(&mut self.rng);
            let repair_id = self.repair_wheel.select(&mut self.rng);

            // 2) Destroy and repair the running solution in place.
            let mut ctx = OperatorContext {
                instance: &self.instance,
                penalties: self.penalties,
                mean_removal: self.mean_removal,
                random_noise: self.config.random_noise,
                rng: &mut self.rng,
            };
            let removed =
                self.destroy_ops[destroy_id].apply(&mut ctx, &mut self.running, &self.history);
            self.repair_ops[repair_id].apply(&mut ctx, &mut self.running, removed);

            self.history.record(&self.running);

            // 3) Score the iteration and decide acceptance.
            let mut reward = 0.0;
            let seen = self.visited.contains_key(&self.running.routes);
            if !seen {
                reward += self.config.reward_unique;
            }

            let running_quality = self.running.solution_quality;
            let current_quality = self.current.solution_quality;

            if running_quality < current_quality {
                self.current = self.running.clone();
                reward += self.config.reward_accept_better;
            } else {
                let acceptance = (-(running_quality - current_quality) / temperature).exp();
                let diversity = self.running.diversity(&self.history.usage, iteration);
                reward += diversity * acceptance * self.config.reward_divers;
                reward += self.config.reward_penalty;

                if self.rng.gen::<f64>() < acceptance {
                    self.current = self.running.clone();
                }
            }

            let best_driving = self
                .best_solution
                .as_ref()
                .map_or(f64::MAX, |best| best.driving_time);

            if self.running.is_feasible && self.running.driving_time < best_driving {
                self.best_solution = Some(self.running.clone());
                debug!(
                    iteration,
                    driving_time = self.running.driving_time,
                    "new best solution"
                );
                reward += self.config.reward_best;
                iterations_wi = 0;

                if self.config.shakeup_log > 0.0 {
                    self.mean_removal = base_removal.ceil();
                }
            } else {
                iterations_wi += 1;

                // Stagnation inflates the removal count so later iterations
                // rip out progressively larger neighborhoods.
                if self.config.shakeup_log > 0.0 {
                    let inflation =
                        (iterations_wi as f64 + 1.0).ln() / self.config.shakeup_log.ln();
                    self.mean_removal = (inflation * base_removal).ceil();
                }
            }

            // 4) Remember the solution for uniqueness checks.
            if !seen {
                self.visited
                    .insert(self.running.routes.clone(), start.elapsed().as_millis() as u64);
            }

            // 5) Feed the infeasibility ratio back into the penalty weights.
            if !self.running.is_feasible {
                self.inf_count += 1;
            }
            if inf_window == 99 {
                self.update_penalty_weights();
                inf_window = 0;
            } else {
                inf_window += 1;
            }

            // 6) Credit both wheels with the time-normalized reward.
            let elapsed_ms = (iteration_start.elapsed().as_millis() as f64).max(1.0);
            self.destroy_wheel.update_score(reward / elapsed_ms);
            self.repair_wheel.update_score(reward / elapsed_ms);

            let destroy_period = self.destroy_ops.len() as u32 * self.config.wheel_memory_length;
            if iteration % destroy_period == 0 {
                self.destroy_wheel.update_weights();
            }
            let repair_period = self.repair_ops.len() as u32 * self.config.wheel_memory_length;
            if iteration % repair_period == 0 {
                self.repair_wheel.update_weights();
            }

            // 7) Cool down and restart from the incumbent.
            temperature *= self.config.cooling_rate;
            iteration += 1;

            self.running = self.current.clone();
        }

        self.iterations = iteration;
        self.solve_time = start.elapsed();

        match &self.best_solution {
            Some(best) => info!(
                iterations = iteration,
                driving_time = best.driving_time,
                "search finished"
            ),
            None => info!(iterations = iteration, "search finished without a feasible solution"),
        }

        self.best_solution.as_ref()
    }

    /// Steer the share of infeasible solutions toward the configured target
    /// by scaling both penalty weights, then re-price the incumbent and the
    /// running solution under the new weights.
    fn update_penalty_weights(&mut self) {
        let ratio = self.inf_count as f64 / 100.0;

        if ratio + 0.05 < self.config.target_infeasibility {
            self.penalties.capa_weight *= 0.85;
            self.penalties.frame_weight *= 0.85;
            debug!(
                capa_weight = self.penalties.capa_weight,
                frame_weight = self.penalties.frame_weight,
                "penalty weights relaxed"
            );
        } else if ratio - 0.05 > self.config.target_infeasibility {
            self.penalties.capa_weight *= 1.2;
            self.penalties.frame_weight *= 1.2;
            debug!(
                capa_weight = self.penalties.capa_weight,
                frame_weight = self.penalties.frame_weight,
                "penalty weights tightened"
            );
        }

        self.inf_count = 0;
        self.current.set_quality(&self.penalties);
        self.running.set_quality(&self.penalties);
    }
}

/// Random initial assignment: customers in random order are appended to the
/// first route, starting from a random index and wrapping around, whose
/// load stays strictly below the capacity padded by the overflow allowance.
fn initial_routes<R: Rng>(instance: &Instance, rng: &mut R) -> Result<Vec<Vec<usize>>, Error> {
    let max_capacity = instance.vehicle_capacity + instance.pseudo_capacity;
    let mut routes = vec![Vec::new(); instance.n_vehicles];
    let mut loads = vec![0.0; instance.n_vehicles];
    let mut pool: Vec<usize> = (0..instance.n_customers).collect();

    while !pool.is_empty() {
        let pick = rng.gen_range(0..pool.len());
        let customer = pool[pick];
        let start = rng.gen_range(0..instance.n_vehicles);

        let mut inserted = false;
        for offset in 0..instance.n_vehicles {
            let route_id = (start + offset) % instance.n_vehicles;
            if loads[route_id] + instance.demand[customer] < max_capacity {
                routes[route_id].push(customer);
                loads[route_id] += instance.demand[customer];
                inserted = true;
                break;
            }
        }

        if !inserted {
            return Err(Error::InsufficientFleetCapacity);
        }
        pool.remove(pick);
    }

    Ok(routes)
}
