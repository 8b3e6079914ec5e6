use serde::{Deserialize, Serialize};

use super::domain::{EncodedFeatureVector, PredictionLabel};
use crate::artifacts::{ArtifactError, TrainedArtifacts};
use crate::training::{RandomForestClassifier, StandardScaler};

/// Anything that turns a scaled feature row into per-class probabilities.
pub trait ProbabilisticClassifier: Send + Sync {
    fn n_features(&self) -> usize;
    fn n_classes(&self) -> usize;
    fn predict_proba(&self, features: &[f64]) -> Vec<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: PredictionLabel,
    /// Probability of the legit class.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("expected {expected} features, received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("classifier reports {0} class(es); a binary model is required")]
    NotBinary(usize),
}

/// Scaler and classifier applied in sequence. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Predictor<C> {
    scaler: StandardScaler,
    classifier: C,
}

impl Predictor<RandomForestClassifier> {
    pub fn from_artifacts(artifacts: &TrainedArtifacts) -> Result<Self, ArtifactError> {
        Self::new(artifacts.scaler.clone(), artifacts.classifier.clone())
    }
}

impl<C: ProbabilisticClassifier> Predictor<C> {
    pub fn new(scaler: StandardScaler, classifier: C) -> Result<Self, ArtifactError> {
        if scaler.n_features() != classifier.n_features() {
            return Err(ArtifactError::Incompatible {
                scaler: scaler.n_features(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self { scaler, classifier })
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn predict(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let row = features.as_slice();
        let expected = self.scaler.n_features();
        if row.len() != expected {
            return Err(PredictionError::DimensionMismatch {
                expected,
                actual: row.len(),
            });
        }

        let classes = self.classifier.n_classes();
        if classes != 2 {
            return Err(PredictionError::NotBinary(classes));
        }

        let scaled = self.scaler.transform_row(row);
        let proba = self.classifier.predict_proba(&scaled);
        let legit = proba
            .get(PredictionLabel::LEGIT_CLASS)
            .copied()
            .unwrap_or_default();
        let fraudulent = proba.first().copied().unwrap_or_default();

        // Ties go to the lower class code, matching the forest's argmax.
        let label = if legit > fraudulent {
            PredictionLabel::Legit
        } else {
            PredictionLabel::Fraudulent
        };

        Ok(PredictionResult {
            label,
            probability: legit.clamp(0.0, 1.0),
        })
    }
}
