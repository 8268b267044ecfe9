//! Score texts with a model exported by `sentiment --model-out`.

use std::path::PathBuf;

use sentiment::logging::{self, LoggingOptions, Verbosity};
use sentiment::pipeline::TrainedModel;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_path: PathBuf,
    texts: Vec<String>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let logging_options = LoggingOptions {
        file_prefix: "sentiment-predict",
        verbosity: Verbosity::Quiet,
        ..LoggingOptions::default()
    };
    if let Err(err) = logging::init(&logging_options) {
        eprintln!("Logging disabled: {err}");
    }
    let model = TrainedModel::load(&options.model_path).map_err(|err| err.to_string())?;
    let engine = model.prediction_engine();
    for (idx, text) in options.texts.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}", engine.predict_text(text));
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model_path: Option<PathBuf> = None;
    let mut texts = Vec::new();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model_path = Some(PathBuf::from(value));
            }
            unknown if unknown.starts_with("--") => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
            text => texts.push(text.to_string()),
        }
        idx += 1;
    }

    let model_path = model_path.ok_or_else(|| "--model is required".to_string())?;
    if texts.is_empty() {
        return Err(format!("At least one text is required\n\n{}", help_text()));
    }
    Ok(CliOptions { model_path, texts })
}

fn help_text() -> String {
    [
        "sentiment-predict",
        "",
        "Predict the sentiment of each text with a saved model.",
        "",
        "Usage:",
        "  sentiment-predict --model <file> <text>...",
    ]
    .join("\n")
}
