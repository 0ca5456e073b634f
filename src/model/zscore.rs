// Z-score math: per-column mean/stdev and standardization.

/// Mean and standard deviation for a single metric column across the
/// uploaded field of players.
#[derive(Debug, Clone, Copy)]
pub struct ColumnStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and sample standard deviation (N−1 denominator) for a slice
/// of values, ignoring NaN entries.
///
/// The uploaded field is treated as a sample of the player population, so
/// the sample convention applies; together with the NaN-skipping this
/// matches what pandas' `mean()`/`std()` produce for the same column. With
/// fewer than 2 defined values the standard deviation is itself undefined
/// and comes back as NaN.
pub fn compute_column_stats(values: &[f64]) -> ColumnStats {
    let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if defined.len() < 2 {
        return ColumnStats {
            mean: defined.first().copied().unwrap_or(f64::NAN),
            stdev: f64::NAN,
        };
    }
    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    ColumnStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Standardize one value against its column stats.
///
/// Returns NaN when the standard deviation is undefined or approximately
/// zero (constant column, or fewer than 2 defined rows), or when the value
/// itself is NaN. NaN is the crate's single undefined-value marker: it flows
/// into `Model Score` and sorts last, and is never silently replaced with a
/// finite number.
pub fn compute_zscore(value: f64, stats: &ColumnStats) -> f64 {
    if !stats.stdev.is_finite() || stats.stdev < STDEV_EPSILON {
        return f64::NAN;
    }
    (value - stats.mean) / stats.stdev
}

/// Standardize a whole column in one pass.
pub fn zscore_column(values: &[f64]) -> Vec<f64> {
    let stats = compute_column_stats(values);
    values.iter().map(|&v| compute_zscore(v, &stats)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn stats_use_sample_stdev() {
        // Values 2, 4, 6: mean 4, sample variance ((−2)²+0+2²)/2 = 4.
        let stats = compute_column_stats(&[2.0, 4.0, 6.0]);
        assert!((stats.mean - 4.0).abs() < TOL);
        assert!((stats.stdev - 2.0).abs() < TOL);
    }

    #[test]
    fn single_value_has_undefined_stdev() {
        let stats = compute_column_stats(&[5.0]);
        assert!((stats.mean - 5.0).abs() < TOL);
        assert!(stats.stdev.is_nan());
    }

    #[test]
    fn empty_column_is_fully_undefined() {
        let stats = compute_column_stats(&[]);
        assert!(stats.mean.is_nan());
        assert!(stats.stdev.is_nan());
    }

    #[test]
    fn zscored_column_has_mean_zero_stdev_one() {
        let values = [1.5, -0.3, 0.9, 2.2, -1.1];
        let z = zscore_column(&values);

        let check = compute_column_stats(&z);
        assert!(check.mean.abs() < TOL);
        assert!((check.stdev - 1.0).abs() < TOL);
    }

    #[test]
    fn constant_column_zscores_are_nan() {
        let z = zscore_column(&[0.7, 0.7, 0.7, 0.7]);
        assert!(z.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn two_row_column_is_defined() {
        let z = zscore_column(&[1.0, 3.0]);
        assert!(z[0].is_finite());
        assert!(z[1].is_finite());
        assert!((z[0] + z[1]).abs() < TOL);
    }

    #[test]
    fn single_row_column_zscores_are_nan() {
        let z = zscore_column(&[1.0]);
        assert!(z[0].is_nan());
    }

    #[test]
    fn nan_cells_are_skipped_for_stats_and_stay_nan() {
        let z = zscore_column(&[2.0, f64::NAN, 6.0]);
        // Stats come from the two defined values (mean 4, stdev 2√2);
        // only the undefined cell stays undefined.
        assert!(z[0].is_finite());
        assert!(z[1].is_nan());
        assert!(z[2].is_finite());
        assert!((z[0] + z[2]).abs() < TOL);
    }
}
