// Scoring engine: derive Z columns, aggregate the weighted Model Score,
// and rank the table.

use std::cmp::Ordering;

use tracing::warn;

use super::zscore::zscore_column;
use crate::config::Metric;
use crate::table::Table;

/// Name of the derived ranking column.
pub const MODEL_SCORE_COLUMN: &str = "Model Score";

/// Derived z-score column name for a raw metric column.
pub fn z_column_name(raw_column: &str) -> String {
    format!("{raw_column} Z")
}

/// Report for one configured metric whose raw column is absent from the
/// dataset. These are collected per metric — every configured metric is
/// checked independently — and the run proceeds on the remaining metrics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column `{column}` for metric `{metric}` not found in dataset")]
pub struct MissingColumn {
    pub metric: String,
    pub column: String,
}

/// Output of one scoring run: the ranked table plus every missing-column
/// report. Detection lives here; displaying the reports is the adapter's
/// concern.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub ranked: Table,
    pub missing: Vec<MissingColumn>,
}

/// Score and rank the dataset.
///
/// For each configured metric (in config order) whose raw column is present,
/// a `<column> Z` column is derived over all rows; metrics whose column is
/// absent are reported and excluded — their weight share is dropped, not
/// redistributed among the survivors. `Model Score` is the weighted sum of
/// the present metrics' z-scores and is appended after all Z columns. Rows
/// are then stably sorted descending by score, with NaN scores after every
/// finite score (ties and NaN runs keep their input order).
///
/// `weights` must be the normalized weight vector, aligned with `metrics`.
/// The input table is not mutated; the ranked table is a new value.
pub fn score(dataset: &Table, metrics: &[Metric], weights: &[f64]) -> ScoreOutcome {
    debug_assert_eq!(metrics.len(), weights.len());

    let n_rows = dataset.n_rows();
    let mut output = dataset.clone();
    let mut missing = Vec::new();
    let mut scores = vec![0.0f64; n_rows];

    for (metric, &weight) in metrics.iter().zip(weights) {
        let Some(raw_values) = dataset.numeric_column(&metric.column) else {
            warn!(
                "metric `{}`: column `{}` not found in dataset; excluding it from the model",
                metric.label, metric.column
            );
            missing.push(MissingColumn {
                metric: metric.label.clone(),
                column: metric.column.clone(),
            });
            continue;
        };

        let z = zscore_column(&raw_values);
        for (total, &zv) in scores.iter_mut().zip(&z) {
            *total += zv * weight;
        }
        output.push_f64_column(&z_column_name(&metric.column), &z);
    }

    output.push_f64_column(MODEL_SCORE_COLUMN, &scores);

    let mut order: Vec<usize> = (0..n_rows).collect();
    order.sort_by(|&a, &b| descending_nan_last(scores[a], scores[b]));

    ScoreOutcome {
        ranked: output.permuted(&order),
        missing,
    }
}

/// Descending order with NaN after every finite value. Equal scores (and
/// NaN vs NaN) compare equal so the stable sort preserves input order.
fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
