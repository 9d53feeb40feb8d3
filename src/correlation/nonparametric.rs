use crate::correlation::checked_pair;
use crate::correlation::parametric::pearson_f64;
use crate::error::{AnalysisError, Result};
use num_traits::Float;
use std::cmp::Ordering;

/// Spearman rank correlation of `x` and `y`: the Pearson coefficient of their average ranks.
pub fn spearman<T>(x: &[T], y: &[T]) -> Result<f64>
where
    T: Float,
{
    let (x, y) = checked_pair(x, y)?;

    let rx = average_ranks(&x);
    let ry = average_ranks(&y);

    pearson_f64(&rx, &ry).map_err(|_| {
        AnalysisError::degenerate("all values tied, rank correlation is undefined")
    })
}

/// Assign 1-based ranks, giving tied values the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();

    // Sort by value
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let val = order[i].1;
        let mut j = i + 1;

        // Find tied values
        while j < order.len() && order[j].1 == val {
            j += 1;
        }

        // Ranks i+1..=j averaged
        let rank = (i + j - 1) as f64 / 2.0 + 1.0;
        for &(orig_idx, _) in &order[i..j] {
            ranks[orig_idx] = rank;
        }

        i = j;
    }

    ranks
}
