//! SIMD-optimized kernels.
//!
//! These use the `wide` crate for portable SIMD operations, providing
//! a speedup for the rolling statistics over long price histories.

use wide::f64x4;

/// SIMD-optimized sum.
pub fn sum(data: &[f64]) -> f64 {
    let chunks = data.chunks_exact(4);
    let remainder = chunks.remainder();

    let mut acc = f64x4::splat(0.0);
    for chunk in chunks {
        acc = acc + f64x4::new([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    acc.reduce_add() + remainder.iter().sum::<f64>()
}

/// SIMD-optimized sum of squared deviations from `mean`.
pub fn sum_sq_dev(data: &[f64], mean: f64) -> f64 {
    let chunks = data.chunks_exact(4);
    let remainder = chunks.remainder();

    let mean_vec = f64x4::splat(mean);
    let mut acc = f64x4::splat(0.0);
    for chunk in chunks {
        let values = f64x4::new([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let diff = values - mean_vec;
        acc = acc + diff * diff;
    }

    // Handle remaining elements
    let tail: f64 = remainder.iter().map(|x| (x - mean) * (x - mean)).sum();
    acc.reduce_add() + tail
}

/// Rolling sample standard deviation (n - 1 denominator) over `period` values.
///
/// Returns one value per full window; empty when `period < 2` or the data is
/// shorter than `period`.
pub fn rolling_std(data: &[f64], period: usize) -> Vec<f64> {
    if data.len() < period || period < 2 {
        return vec![];
    }

    let period_f64 = period as f64;
    data.windows(period)
        .map(|window| {
            let mean = sum(window) / period_f64;
            (sum_sq_dev(window, mean) / (period_f64 - 1.0)).sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::statistics::Statistics;

    #[test]
    fn test_sum_matches_scalar() {
        let data: Vec<f64> = (0..103).map(|i| i as f64 * 0.5).collect();
        let expected: f64 = data.iter().sum();
        assert!((sum(&data) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sum_sq_dev_small_input() {
        // Fewer than one SIMD lane
        let data = [1.0, 2.0, 3.0];
        assert!((sum_sq_dev(&data, 2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_std_matches_statrs() {
        let data: Vec<f64> = (0..50)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let result = rolling_std(&data, 20);

        assert_eq!(result.len(), 31);
        for (i, value) in result.iter().enumerate() {
            let expected = data[i..i + 20].iter().std_dev();
            assert!((value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rolling_std_rejects_short_input() {
        assert!(rolling_std(&[1.0, 2.0], 3).is_empty());
        assert!(rolling_std(&[1.0, 2.0], 1).is_empty());
    }
}
