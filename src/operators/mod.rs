//! Destroy and repair operator library.
//!
//! Operators share only their calling convention: a destroy operator mutates
//! the running solution and returns the removed customer ids, a repair
//! operator consumes such a list and must place every customer. Both
//! families are closed enums dispatched by value; the mutable state they
//! need travels in an [`OperatorContext`].

pub mod destroy;
pub mod hybrid;
pub mod insertion;
pub mod regret;
pub mod repair;
pub mod shaw;
pub mod worst;

use rand::Rng;

use crate::error::Error;
use crate::history::SearchHistory;
use crate::instance::Instance;
use crate::solution::{Penalties, Solution};
use crate::utils;

/// Shared search state handed to every operator invocation.
pub struct OperatorContext<'a, R: Rng> {
    pub instance: &'a Instance,
    pub penalties: Penalties,
    /// Expected number of customers a destroy operator removes. Inflated by
    /// the driver's shakeup when the search stagnates.
    pub mean_removal: f64,
    /// Rank perturbation exponent ρ.
    pub random_noise: f64,
    pub rng: &'a mut R,
}

/// Relatedness weights for the Shaw destroy family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShawWeights {
    pub distance: f64,
    pub window: f64,
    pub demand: f64,
    pub vehicle: f64,
}

/// A destroy operator: removes a set of customers from the running solution.
#[derive(Debug, Clone)]
pub enum DestroyOperator {
    Random,
    RandomRoute,
    BiggestDemand { demand_ranks: Vec<usize> },
    WorstTravelTime,
    WorstRemoval,
    NodePair,
    Shaw(ShawWeights),
}

impl DestroyOperator {
    /// Resolve a configured operator name. Unknown names are a fatal
    /// configuration error.
    pub fn from_name(name: &str, instance: &Instance) -> Result<Self, Error> {
        match name {
            "random_destroy" => Ok(DestroyOperator::Random),
            "route_destroy" => Ok(DestroyOperator::RandomRoute),
            "demand_destroy" => Ok(DestroyOperator::BiggestDemand {
                demand_ranks: utils::ranks(&instance.demand),
            }),
            "time_destroy" => Ok(DestroyOperator::WorstTravelTime),
            "worst_destroy" => Ok(DestroyOperator::WorstRemoval),
            "node_pair_destroy" => Ok(DestroyOperator::NodePair),
            "shaw_destroy" => Ok(DestroyOperator::Shaw(ShawWeights {
                distance: 9.0,
                window: 3.0,
                demand: 2.0,
                vehicle: 5.0,
            })),
            "distance_similarity" => Ok(DestroyOperator::Shaw(ShawWeights {
                distance: 1.0,
                window: 0.0,
                demand: 0.0,
                vehicle: 0.0,
            })),
            "window_similarity" => Ok(DestroyOperator::Shaw(ShawWeights {
                distance: 0.0,
                window: 1.0,
                demand: 0.0,
                vehicle: 0.0,
            })),
            "demand_similarity" => Ok(DestroyOperator::Shaw(ShawWeights {
                distance: 0.0,
                window: 0.0,
                demand: 1.0,
                vehicle: 0.0,
            })),
            _ => Err(Error::UnknownDestroyOperator(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DestroyOperator::Random => "random_destroy",
            DestroyOperator::RandomRoute => "route_destroy",
            DestroyOperator::BiggestDemand { .. } => "demand_destroy",
            DestroyOperator::WorstTravelTime => "time_destroy",
            DestroyOperator::WorstRemoval => "worst_destroy",
            DestroyOperator::NodePair => "node_pair_destroy",
            DestroyOperator::Shaw(_) => "shaw_destroy",
        }
    }

    /// Remove customers from the solution and return their ids.
    pub fn apply<R: Rng>(
        &self,
        ctx: &mut OperatorContext<R>,
        solution: &mut Solution,
        history: &SearchHistory,
    ) -> Vec<usize> {
        match self {
            DestroyOperator::Random => destroy::random_destroy(ctx, solution),
            DestroyOperator::RandomRoute => destroy::route_destroy(ctx, solution),
            DestroyOperator::BiggestDemand { demand_ranks } => {
                destroy::ranked_destroy(ctx, solution, demand_ranks)
            }
            DestroyOperator::WorstTravelTime => {
                let ranks = destroy::travel_time_ranks(ctx.instance, solution);
                destroy::ranked_destroy(ctx, solution, &ranks)
            }
            DestroyOperator::WorstRemoval => worst::worst_removal(ctx, solution),
            DestroyOperator::NodePair => {
                let ranks = destroy::node_pair_ranks(ctx.instance, solution, history);
                destroy::ranked_destroy(ctx, solution, &ranks)
            }
            DestroyOperator::Shaw(weights) => shaw::shaw_destroy(ctx, solution, weights),
        }
    }
}

/// A repair operator: reinserts every removed customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOperator {
    BasicGreedy,
    RandomGreedy,
    DeepGreedy,
    KRegret { k: usize },
    BetaHybrid { beta: usize },
}

impl RepairOperator {
    /// Resolve a configured operator name. Unknown names are a fatal
    /// configuration error.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "basic_greedy" => Ok(RepairOperator::BasicGreedy),
            "random_greedy" => Ok(RepairOperator::RandomGreedy),
            "deep_greedy" => Ok(RepairOperator::DeepGreedy),
            "2_regret" => Ok(RepairOperator::KRegret { k: 2 }),
            "3_regret" => Ok(RepairOperator::KRegret { k: 3 }),
            "5_regret" => Ok(RepairOperator::KRegret { k: 5 }),
            "beta_hybrid" => Ok(RepairOperator::BetaHybrid { beta: 3 }),
            _ => Err(Error::UnknownRepairOperator(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepairOperator::BasicGreedy => "basic_greedy",
            RepairOperator::RandomGreedy => "random_greedy",
            RepairOperator::DeepGreedy => "deep_greedy",
            RepairOperator::KRegret { k: 2 } => "2_regret",
            RepairOperator::KRegret { k: 3 } => "3_regret",
            RepairOperator::KRegret { .. } => "5_regret",
            RepairOperator::BetaHybrid { .. } => "beta_hybrid",
        }
    }

    /// Reinsert every customer of the removed list.
    pub fn apply<R: Rng>(
        &self,
        ctx: &mut OperatorContext<R>,
        solution: &mut Solution,
        removed: Vec<usize>,
    ) {
        match *self {
            RepairOperator::BasicGreedy => repair::basic_greedy(ctx, solution, removed),
            RepairOperator::RandomGreedy => repair::random_greedy(ctx, solution, removed),
            RepairOperator::DeepGreedy => repair::deep_greedy(ctx, solution, removed),
            RepairOperator::KRegret { k } => regret::k_regret(ctx, solution, removed, k),
            RepairOperator::BetaHybrid { beta } => hybrid::beta_hybrid(ctx, solution, removed, beta),
        }
    }
}
