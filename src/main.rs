// Golf model entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the preview table)
// 2. Parse CLI arguments
// 3. Bootstrap + load config, apply --weight overrides
// 4. Load the player CSV
// 5. Run the pipeline (normalize weights -> z-scores -> rank)
// 6. Print the preview, surface warnings, write the ranked CSV artifact

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{error, info, warn};

use golf_model::config::{self, Config};
use golf_model::model;
use golf_model::report;
use golf_model::table::Table;

const USAGE: &str = "\
Usage: golfmodel <players.csv> [-o OUTPUT.csv] [--weight LABEL=VALUE ...]

  <players.csv>          player dataset with a `Player` column and one raw
                         column per configured metric
  -o, --output FILE      where to write the ranked CSV
                         (default: output.ranked_csv from config/model.toml)
  --weight LABEL=VALUE   override one metric's raw weight (0.0..=1.0);
                         repeatable, LABEL matches the config label";

struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    weight_overrides: Vec<(String, f64)>,
}

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse CLI arguments
    let args = parse_args(std::env::args().skip(1).collect())?;

    // 3. Load config and apply weight overrides
    let mut config = config::load_config().context("failed to load configuration")?;
    apply_weight_overrides(&mut config, &args.weight_overrides)?;
    info!(
        "Config loaded: {} metrics, raw weight sum {:.3}",
        config.metrics.len(),
        config.raw_weights().iter().sum::<f64>()
    );

    // 4. Load the player CSV
    let dataset = Table::from_csv_path(&args.input)
        .with_context(|| format!("failed to load dataset {}", args.input.display()))?;
    info!("Loaded {} players from {}", dataset.n_rows(), args.input.display());

    // 5. Run the pipeline
    let run = match model::run(&dataset, &config.metrics, &config.raw_weights()) {
        Ok(run) => run,
        Err(e @ model::ModelError::DegenerateWeights) => {
            // No meaningful ranking exists: no preview, no artifact.
            error!("{e}");
            return Err(anyhow::Error::new(e).context("no ranking produced"));
        }
    };
    for missing in &run.missing {
        warn!("{missing}");
        eprintln!("warning: {missing}");
    }

    // 6. Preview and artifact
    print!("{}", report::render_preview(&run.ranked, config.preview_rows));

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.ranked_csv));
    run.ranked
        .write_csv_path(&output)
        .with_context(|| format!("failed to write ranked CSV {}", output.display()))?;
    info!("Ranked CSV written to {}", output.display());
    eprintln!("Ranked CSV written to {}", output.display());

    Ok(())
}

fn parse_args(argv: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut input = None;
    let mut output = None;
    let mut weight_overrides = Vec::new();

    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            "-o" | "--output" => {
                let value = iter.next().context("missing value after --output")?;
                output = Some(PathBuf::from(value));
            }
            "--weight" => {
                let value = iter.next().context("missing LABEL=VALUE after --weight")?;
                weight_overrides.push(parse_weight_override(&value)?);
            }
            _ if arg.starts_with('-') => bail!("unknown option `{arg}`\n\n{USAGE}"),
            _ => {
                if input.is_some() {
                    bail!("unexpected extra argument `{arg}`\n\n{USAGE}");
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    let input = input.with_context(|| format!("missing input CSV\n\n{USAGE}"))?;
    Ok(CliArgs {
        input,
        output,
        weight_overrides,
    })
}

fn parse_weight_override(spec: &str) -> anyhow::Result<(String, f64)> {
    let (label, value) = spec
        .split_once('=')
        .with_context(|| format!("expected LABEL=VALUE, got `{spec}`"))?;
    let weight: f64 = value
        .parse()
        .with_context(|| format!("weight for `{label}` is not a number: `{value}`"))?;
    if !(0.0..=1.0).contains(&weight) || weight.is_nan() {
        bail!("weight for `{label}` must be between 0.0 and 1.0, got {value}");
    }
    Ok((label.to_string(), weight))
}

fn apply_weight_overrides(
    config: &mut Config,
    overrides: &[(String, f64)],
) -> anyhow::Result<()> {
    for (label, weight) in overrides {
        let Some(metric) = config.metrics.iter_mut().find(|m| &m.label == label) else {
            let known: Vec<&str> = config.metrics.iter().map(|m| m.label.as_str()).collect();
            bail!(
                "unknown metric `{label}` in --weight; configured metrics: {}",
                known.join(", ")
            );
        };
        metric.weight = *weight;
    }
    Ok(())
}

/// Initialize tracing to stderr, keeping stdout clean for the preview table.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("golf_model=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
