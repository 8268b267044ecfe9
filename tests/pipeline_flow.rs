mod support;

use std::path::PathBuf;

use sentiment::app_dirs::APP_DIR_NAME;
use sentiment::config::{self, PipelineConfig};
use sentiment::dataset::Record;
use sentiment::pipeline::{self, TrainedModel};
use sentiment::{ErrorKind, PipelineError};
use support::config_home::ConfigHome;
use support::tsv::{polar_rows, write_tsv};
use tempfile::tempdir;

fn config_for(path: PathBuf, seed: u64) -> PipelineConfig {
    let mut config = PipelineConfig {
        seed: Some(seed),
        ..PipelineConfig::default()
    };
    config.dataset.path = path;
    config
}

fn shipped_dataset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sentiment.tsv")
}

#[test]
fn ten_rows_split_into_eight_train_and_two_test() {
    let dir = tempdir().unwrap();
    let path = write_tsv(dir.path(), "ten.tsv", &polar_rows(10));
    let report = pipeline::run(&config_for(path, 3)).unwrap();

    assert_eq!(report.train_len, 8);
    assert_eq!(report.test_len, 2);
    assert_eq!(report.metrics.confusion_matrix.total(), 2);
    for value in [
        report.metrics.accuracy,
        report.metrics.auc,
        report.metrics.f1_score,
    ] {
        assert!((0.0..=1.0).contains(&value), "{value}");
    }
}

#[test]
fn good_movie_is_predicted_positive() {
    let report = pipeline::run(&config_for(shipped_dataset(), 42)).unwrap();
    assert_eq!(report.prediction.record.text(), "good movie");
    assert!(report.prediction.predicted_label, "{}", report.prediction);
    assert!(report.prediction.score > 0.0);
    assert!(report.prediction.probability > 0.5);
}

#[test]
fn same_seed_reproduces_split_model_and_metrics() {
    let first = pipeline::run(&config_for(shipped_dataset(), 1234)).unwrap();
    let second = pipeline::run(&config_for(shipped_dataset(), 1234)).unwrap();
    assert_eq!(first.seed, 1234);
    assert_eq!(first.model, second.model);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.prediction, second.prediction);
}

#[test]
fn report_prints_six_labelled_lines() {
    let dir = tempdir().unwrap();
    let path = write_tsv(dir.path(), "rows.tsv", &polar_rows(16));
    let report = pipeline::run(&config_for(path, 8)).unwrap();
    let rendered = report.to_string();
    let labels: Vec<&str> = rendered
        .lines()
        .map(|line| line.split(':').next().unwrap_or_default())
        .collect();
    assert_eq!(
        labels,
        [
            "Accuracy",
            "AUC",
            "F1 score",
            "Predicted sentiment",
            "Probability",
            "Score"
        ]
    );
    let sentiment = rendered.lines().nth(3).unwrap();
    assert!(
        sentiment == "Predicted sentiment: Positive"
            || sentiment == "Predicted sentiment: Negative"
    );
}

#[test]
fn exported_model_reloads_with_identical_predictions() {
    let dir = tempdir().unwrap();
    let path = write_tsv(dir.path(), "rows.tsv", &polar_rows(16));
    let model_path = dir.path().join("out").join("model.json");
    let mut config = config_for(path, 21);
    config.model_out = Some(model_path.clone());
    let report = pipeline::run(&config).unwrap();

    let loaded = TrainedModel::load(&model_path).unwrap();
    let record = Record::unlabeled("a lovely and good film");
    assert_eq!(
        loaded.prediction_engine().predict(&record),
        report.model.prediction_engine().predict(&record)
    );
}

#[test]
fn missing_dataset_is_file_not_found() {
    let dir = tempdir().unwrap();
    let err = pipeline::run(&config_for(dir.path().join("absent.tsv"), 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn malformed_rows_are_parse_errors_with_line_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.tsv");
    std::fs::write(
        &path,
        "SentimentText\tSentiment\ngood movie\t1\nbad movie\tmaybe\n",
    )
    .unwrap();
    let err = pipeline::run(&config_for(path, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains(":3:"), "{err}");
}

#[test]
fn out_of_range_fraction_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = write_tsv(dir.path(), "rows.tsv", &polar_rows(10));
    for fraction in [0.0, 1.0, 1.5] {
        let mut config = config_for(path.clone(), 1);
        config.split.test_fraction = fraction;
        let err = pipeline::run(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{err}");
    }
}

#[test]
fn single_record_cannot_be_split() {
    let dir = tempdir().unwrap();
    let path = write_tsv(dir.path(), "one.tsv", &[("good movie", true)]);
    let err = pipeline::run(&config_for(path, 1)).unwrap_err();
    assert!(matches!(err, PipelineError::Split(_)), "{err}");
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn app_dir_config_drives_the_run() {
    let data = tempdir().unwrap();
    let dataset = write_tsv(data.path(), "rows.tsv", &polar_rows(12));
    let home = ConfigHome::new();

    assert_eq!(config::config_path().unwrap(), home.config_file());
    home.write_config(&format!(
        "seed = 77\nsample_text = \"dreadful film\"\n[dataset]\npath = {:?}\n[split]\ntest_fraction = 0.25\n",
        dataset.display().to_string()
    ));

    let config = config::load_or_default(None).unwrap();
    let report = pipeline::run(&config).unwrap();
    assert_eq!(report.seed, 77);
    assert_eq!(report.test_len, 3);
    assert_eq!(report.train_len, 9);
    assert_eq!(report.prediction.record.text(), "dreadful film");
}

#[test]
fn missing_app_config_falls_back_to_defaults_without_creating_dirs() {
    let home = ConfigHome::new();
    let config = config::load_or_default(None).unwrap();
    assert_eq!(config, PipelineConfig::default());
    assert!(!home.path().join(APP_DIR_NAME).exists());
}
