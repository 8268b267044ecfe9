//! Train a sentiment classifier on a TSV dataset, report held-out metrics,
//! then score one sample text.

use std::path::PathBuf;

use sentiment::config::{self, PipelineConfig};
use sentiment::logging::{self, LoggingOptions, Verbosity};
use sentiment::pipeline;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    dataset: Option<PathBuf>,
    no_header: bool,
    test_fraction: Option<f64>,
    seed: Option<u64>,
    text: Option<String>,
    model_out: Option<PathBuf>,
    verbosity: Verbosity,
}

impl CliOptions {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
        if self.no_header {
            config.dataset.has_header = false;
        }
        if let Some(fraction) = self.test_fraction {
            config.split.test_fraction = fraction;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(text) = &self.text {
            config.sample_text = text.clone();
        }
        if let Some(path) = &self.model_out {
            config.model_out = Some(path.clone());
        }
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let logging_options = LoggingOptions {
        verbosity: options.verbosity,
        ..LoggingOptions::default()
    };
    if let Err(err) = logging::init(&logging_options) {
        eprintln!("Logging disabled: {err}");
    }
    let mut config =
        config::load_or_default(options.config.as_deref()).map_err(|err| err.to_string())?;
    options.apply(&mut config);

    let report = pipeline::run(&config).map_err(|err| err.to_string())?;
    println!("{report}");
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--dataset" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--dataset requires a value".to_string())?;
                options.dataset = Some(PathBuf::from(value));
            }
            "--no-header" => options.no_header = true,
            "-q" | "--quiet" => options.verbosity = Verbosity::Quiet,
            "-v" | "--verbose" => options.verbosity = Verbosity::Verbose,
            "--test-fraction" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-fraction requires a value".to_string())?;
                options.test_fraction = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --test-fraction value: {value}"))?,
                );
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--text" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--text requires a value".to_string())?;
                options.text = Some(value.to_string());
            }
            "--model-out" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--model-out requires a value".to_string())?;
                options.model_out = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "sentiment",
        "",
        "Train an averaged perceptron on a labeled TSV file, print held-out",
        "accuracy, AUC and F1, then predict the sentiment of one text.",
        "",
        "Usage:",
        "  sentiment [--config <file>] [--dataset <file>] [--no-header]",
        "            [--test-fraction <f>] [--seed <n>] [--text <text>] [--model-out <file>]",
        "            [-q | --quiet] [-v | --verbose]",
        "",
        "Options:",
        "  --config <file>        TOML config (default: <config dir>/.sentiment/config.toml).",
        "  --dataset <file>       Labeled dataset (default: data/sentiment.tsv).",
        "  --no-header            Treat the first row as data.",
        "  --test-fraction <f>    Held-out share in (0, 1) (default: 0.2).",
        "  --seed <n>             Seed for the split and training (default: random, logged).",
        "  --text <text>          Text to score after evaluation (default: \"good movie\").",
        "  --model-out <file>     Write the trained model as JSON.",
        "  -q, --quiet            Log warnings only (RUST_LOG overrides).",
        "  -v, --verbose          Log training detail and top features.",
    ]
    .join("\n")
}
