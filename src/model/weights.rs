// Weight normalization onto the probability simplex.

use super::ModelError;

/// Tolerance for sum-to-one checks on normalized weights.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Rescale a raw weight vector so its components sum to 1.0.
///
/// Raw weights are non-negative and individually bounded to [0.0, 1.0] by
/// the config layer; this function only guards the sum. A zero sum means
/// every weight is zero and no meaningful ranking exists, so the whole run
/// must halt — the caller gets `DegenerateWeights` and produces no scores,
/// no ranking, and no artifact.
///
/// Pure and deterministic: same input, same output, no side effects.
pub fn normalize(raw: &[f64]) -> Result<Vec<f64>, ModelError> {
    let sum: f64 = raw.iter().sum();
    if sum == 0.0 {
        return Err(ModelError::DegenerateWeights);
    }
    Ok(raw.iter().map(|w| w / sum).collect())
}
