// Configuration loading and parsing (model.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// model.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire model.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ModelFile {
    output: OutputSection,
    preview: PreviewSection,
    metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSection {
    ranked_csv: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PreviewSection {
    rows: usize,
}

/// One scored metric: a display label, the exact (case-sensitive) CSV column
/// holding its raw values, and its raw weight in [0.0, 1.0].
///
/// The scoring engine works off this list in order; adding a metric here adds
/// it to the model without touching the aggregation code.
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    pub label: String,
    pub column: String,
    pub weight: f64,
}

/// The public config assembled from the model.toml sections.
#[derive(Debug, Clone)]
pub struct Config {
    pub metrics: Vec<Metric>,
    pub preview_rows: usize,
    pub ranked_csv: String,
}

impl Config {
    /// Raw weights in metric order.
    pub fn raw_weights(&self) -> Vec<f64> {
        self.metrics.iter().map(|m| m.weight).collect()
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/model.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let model_path = base_dir.join("config").join("model.toml");
    let model_text = read_file(&model_path)?;
    let model_file: ModelFile =
        toml::from_str(&model_text).map_err(|e| ConfigError::ParseError {
            path: model_path.clone(),
            source: e,
        })?;

    let config = Config {
        metrics: model_file.metrics,
        preview_rows: model_file.preview.rows,
        ranked_csv: model_file.output.ranked_csv,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/model.toml` exists by copying it from `defaults/` when
/// missing. Returns the list of files that were copied. An existing
/// `config/model.toml` is never overwritten.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let source = defaults_dir.join("model.toml");
    let target = config_dir.join("model.toml");

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            copied.push(target);
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            // File already exists in config/, keep the user's edits
        }
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            });
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.metrics.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "metrics".into(),
            message: "at least one metric must be configured".into(),
        });
    }

    for (i, metric) in config.metrics.iter().enumerate() {
        if metric.label.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("metrics[{i}].label"),
                message: "must not be empty".into(),
            });
        }
        if metric.column.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("metrics[{i}].column"),
                message: "must not be empty".into(),
            });
        }
        if !(0.0..=1.0).contains(&metric.weight) || metric.weight.is_nan() {
            return Err(ConfigError::ValidationError {
                field: format!("metrics[{i}].weight"),
                message: format!(
                    "must be between 0.0 and 1.0 inclusive, got {}",
                    metric.weight
                ),
            });
        }
        // Duplicate labels or columns would make weight overrides and
        // derived-column names ambiguous.
        for earlier in &config.metrics[..i] {
            if earlier.label == metric.label {
                return Err(ConfigError::ValidationError {
                    field: format!("metrics[{i}].label"),
                    message: format!("duplicate metric label `{}`", metric.label),
                });
            }
            if earlier.column == metric.column {
                return Err(ConfigError::ValidationError {
                    field: format!("metrics[{i}].column"),
                    message: format!("duplicate metric column `{}`", metric.column),
                });
            }
        }
    }

    if config.preview_rows == 0 {
        return Err(ConfigError::ValidationError {
            field: "preview.rows".into(),
            message: "must be > 0".into(),
        });
    }

    if config.ranked_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "output.ranked_csv".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
