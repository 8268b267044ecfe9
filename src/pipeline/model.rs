use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::PredictionEngine;
use crate::ml::SparseVector;
use crate::ml::calibration::PlattCalibrator;
use crate::ml::perceptron::PerceptronModel;
use crate::text::TextFeaturizer;

/// Version written into exported model files.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ModelIoError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write model {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid model json {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid model {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Fitted featurizer, averaged perceptron and probability calibrator.
///
/// Read-only after training; scoring never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub format_version: u32,
    featurizer: TextFeaturizer,
    classifier: PerceptronModel,
    calibrator: PlattCalibrator,
}

impl TrainedModel {
    pub fn new(
        featurizer: TextFeaturizer,
        classifier: PerceptronModel,
        calibrator: PlattCalibrator,
    ) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            featurizer,
            classifier,
            calibrator,
        }
    }

    pub fn featurizer(&self) -> &TextFeaturizer {
        &self.featurizer
    }

    pub fn classifier(&self) -> &PerceptronModel {
        &self.classifier
    }

    pub fn calibrator(&self) -> &PlattCalibrator {
        &self.calibrator
    }

    /// Feature vector for `text`, using the vocabulary fitted at training time.
    pub fn featurize(&self, text: &str) -> SparseVector {
        self.featurizer.transform(text)
    }

    pub fn prediction_engine(&self) -> PredictionEngine<'_> {
        PredictionEngine::new(self)
    }

    /// The `count` features with the largest absolute weights, strongest first.
    pub fn top_features(&self, count: usize) -> Vec<(String, f32)> {
        let mut ranked: Vec<(usize, f32)> = self
            .classifier
            .weights
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, weight)| *weight != 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(count)
            .filter_map(|(idx, weight)| self.featurizer.feature_name(idx).map(|name| (name, weight)))
            .collect()
    }

    /// Check version and internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(format!(
                "Unsupported format_version {} (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            ));
        }
        if self.classifier.dim() != self.featurizer.dim() {
            return Err(format!(
                "classifier dimension {} does not match featurizer dimension {}",
                self.classifier.dim(),
                self.featurizer.dim()
            ));
        }
        self.classifier.validate()?;
        if !self.calibrator.slope.is_finite() || !self.calibrator.offset.is_finite() {
            return Err("calibrator parameters are not finite".to_string());
        }
        Ok(())
    }

    /// Write the model as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ModelIoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ModelIoError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| ModelIoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, bytes).map_err(|source| ModelIoError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved model to {}", path.display());
        Ok(())
    }

    /// Read and validate a model written by [`TrainedModel::save`].
    pub fn load(path: &Path) -> Result<Self, ModelIoError> {
        let bytes = std::fs::read(path).map_err(|source| ModelIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelIoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate().map_err(|reason| ModelIoError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::ml::perceptron::PerceptronOptions;
    use crate::pipeline::TrainingPipeline;
    use crate::text::FeaturizerOptions;
    use tempfile::tempdir;

    fn trained() -> TrainedModel {
        let records: Vec<Record> = [
            ("good fun", true),
            ("good times", true),
            ("bad luck", false),
            ("bad day", false),
        ]
        .into_iter()
        .map(|(text, label)| Record::labeled(text, label))
        .collect();
        TrainingPipeline::new(FeaturizerOptions::default(), PerceptronOptions::default(), 3)
            .fit(&records)
            .unwrap()
    }

    #[test]
    fn save_then_load_predicts_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let model = trained();
        model.save(&path).unwrap();

        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded, model);
        let text = Record::unlabeled("good day");
        assert_eq!(
            loaded.prediction_engine().predict(&text),
            model.prediction_engine().predict(&text)
        );
    }

    #[test]
    fn load_rejects_mismatched_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut model = trained();
        model.classifier.weights.push(0.0);
        std::fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();

        let err = TrainedModel::load(&path).unwrap_err();
        assert!(matches!(err, ModelIoError::Invalid { .. }), "{err}");
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            TrainedModel::load(&missing),
            Err(ModelIoError::Read { .. })
        ));
        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{not json").unwrap();
        assert!(matches!(
            TrainedModel::load(&garbage),
            Err(ModelIoError::Json { .. })
        ));
    }

    #[test]
    fn top_features_are_named_and_bounded() {
        let model = trained();
        let top: Vec<String> = model.top_features(2).into_iter().map(|(name, _)| name).collect();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|name| name.starts_with("w:") || name.starts_with("c:")));
        assert!(model.top_features(usize::MAX).len() <= model.featurizer().dim());
    }
}
