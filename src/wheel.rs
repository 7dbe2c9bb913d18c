//! Adaptive roulette-wheel operator selection.

use rand::Rng;

/// Weighted-random selector with exponential-moving-average weight updates.
///
/// One wheel exists per operator family. Selection remembers the chosen
/// operator so the driver can credit the iteration's reward to it; every
/// memory period the accumulated scores are folded into the weights.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    weights: Vec<f64>,
    scores: Vec<f64>,
    uses: Vec<u32>,
    decay: f64,
    min_weight: f64,
    last_selected: usize,
}

impl RouletteWheel {
    pub fn new(n_operators: usize, decay: f64, min_weight: f64) -> Self {
        RouletteWheel {
            weights: vec![1.0 / n_operators as f64; n_operators],
            scores: vec![0.0; n_operators],
            uses: vec![0; n_operators],
            decay,
            min_weight,
            last_selected: 0,
        }
    }

    /// Draw one operator index proportionally to the current weights.
    pub fn select<R: Rng>(&mut self, rng: &mut R) -> usize {
        let total: f64 = self.weights.iter().sum();
        let threshold = rng.gen::<f64>() * total;

        let mut cumulative = 0.0;
        for (index, &weight) in self.weights.iter().enumerate() {
            cumulative += weight;
            if threshold <= cumulative {
                self.last_selected = index;
                return index;
            }
        }

        // Rounding can leave the threshold a hair above the final sum.
        self.last_selected = self.weights.len() - 1;
        self.last_selected
    }

    /// Credit the reward of the current iteration to the last selected
    /// operator.
    pub fn update_score(&mut self, reward: f64) {
        self.scores[self.last_selected] += reward;
        self.uses[self.last_selected] += 1;
    }

    /// Fold the accumulated scores into the weights and reset the memory.
    ///
    /// Operators unused during the period fall to the minimum weight, and no
    /// weight ever drops below it; momentarily underperforming operators
    /// stay selectable.
    pub fn update_weights(&mut self) {
        for index in 0..self.weights.len() {
            self.weights[index] = if self.uses[index] > 0 {
                let updated = self.decay * (self.scores[index] / self.uses[index] as f64)
                    + (1.0 - self.decay) * self.weights[index];
                updated.max(self.min_weight)
            } else {
                self.min_weight
            };

            self.scores[index] = 0.0;
            self.uses[index] = 0;
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn last_selected(&self) -> usize {
        self.last_selected
    }
}
