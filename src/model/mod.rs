// Scoring pipeline: weight normalization, z-scores, weighted aggregation.

pub mod score;
pub mod weights;
pub mod zscore;

use crate::config::Metric;
use crate::table::Table;

pub use score::{MissingColumn, ScoreOutcome, MODEL_SCORE_COLUMN};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// All raw weights are zero, so normalization (and any ranking built on
    /// it) is mathematically undefined. The run halts with no partial
    /// output.
    #[error("all metric weights are zero; adjust at least one weight above 0")]
    DegenerateWeights,
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// Result of one full pipeline run over one dataset and one weight vector.
#[derive(Debug, Clone)]
pub struct ModelRun {
    /// Input columns + derived Z columns + `Model Score`, sorted descending
    /// by score.
    pub ranked: Table,
    /// The weights actually used, rescaled to sum to 1.0, in metric order.
    pub normalized_weights: Vec<f64>,
    /// One report per configured metric whose raw column was absent.
    pub missing: Vec<MissingColumn>,
}

/// Run the full pipeline: normalize the raw weights, then score and rank the
/// dataset.
///
/// Degenerate weights abort before any scoring work. Missing metric columns
/// do not: they are reported in `ModelRun::missing` and the score is built
/// from the metrics that are present. Each call computes everything fresh
/// from its inputs; nothing is cached between runs.
pub fn run(dataset: &Table, metrics: &[Metric], raw_weights: &[f64]) -> Result<ModelRun, ModelError> {
    let normalized = weights::normalize(raw_weights)?;
    let outcome = score::score(dataset, metrics, &normalized);
    Ok(ModelRun {
        ranked: outcome.ranked,
        normalized_weights: normalized,
        missing: outcome.missing,
    })
}
