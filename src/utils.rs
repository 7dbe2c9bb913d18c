//! Ranking helpers shared by the destroy operators.

use std::cmp::Ordering;

/// Rank the values ascending, starting at 1. Equal values share a rank.
pub fn ranks(values: &[f64]) -> Vec<usize> {
    if values.is_empty() {
        return Vec::new();
    }

    let order = sorted_indices(values);

    let mut ranks = vec![0; values.len()];
    let mut rank = 1;
    ranks[order[0]] = rank;
    let mut prev = values[order[0]];

    for &idx in order.iter().skip(1) {
        if values[idx] != prev {
            rank += 1;
        }
        ranks[idx] = rank;
        prev = values[idx];
    }

    ranks
}

/// Indices of the values in ascending order (stable argsort).
pub fn sorted_indices(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    indices
}
