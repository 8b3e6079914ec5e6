use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{
    ApplicantRecord, Categorical, Dependents, Education, Gender, InvalidInput, PropertyArea,
    YesNo,
};
use super::encoding::{EncodingError, FeatureEncoder};
use super::predictor::{PredictionError, Predictor, ProbabilisticClassifier};
use super::report::ScreeningReport;
use super::risk::{RiskExplainer, RiskExplanation, RiskThresholds};
use crate::artifacts::{ArtifactError, TrainedArtifacts};
use crate::training::{CategoryEncoders, RandomForestClassifier};

/// Service composing the feature encoder, predictor, and risk explainer.
pub struct ScreeningService<C> {
    encoder: FeatureEncoder,
    predictor: Predictor<C>,
    explainer: RiskExplainer,
}

impl ScreeningService<RandomForestClassifier> {
    /// Build from a loaded bundle, preferring the fitted encoders when present.
    pub fn from_artifacts(
        artifacts: &TrainedArtifacts,
        thresholds: RiskThresholds,
    ) -> Result<Self, ScreeningError> {
        let encoder = select_encoder(artifacts.encoders.as_ref())?;
        let predictor = Predictor::from_artifacts(artifacts)?;
        Ok(Self::new(encoder, predictor, RiskExplainer::new(thresholds)))
    }
}

impl<C: ProbabilisticClassifier> ScreeningService<C> {
    pub fn new(encoder: FeatureEncoder, predictor: Predictor<C>, explainer: RiskExplainer) -> Self {
        Self {
            encoder,
            predictor,
            explainer,
        }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Encode, predict, and explain one applicant.
    pub fn screen(&self, record: &ApplicantRecord) -> Result<ScreeningReport, ScreeningError> {
        record.validate()?;

        let features = self.encoder.encode(record);
        let prediction = self.predictor.predict(&features)?;
        let explanation = self.explainer.explain(record);

        debug!(
            label = ?prediction.label,
            probability = prediction.probability,
            advisories = explanation.factors.len(),
            "applicant screened"
        );

        Ok(ScreeningReport::new(record, prediction, explanation))
    }

    /// Risk advisories only; the classifier is not consulted.
    pub fn explain(&self, record: &ApplicantRecord) -> Result<RiskExplanation, ScreeningError> {
        record.validate()?;
        Ok(self.explainer.explain(record))
    }
}

/// Use fitted codes when available and log every slot where they contradict the fixed table.
pub fn select_encoder(
    encoders: Option<&CategoryEncoders>,
) -> Result<FeatureEncoder, EncodingError> {
    let Some(encoders) = encoders else {
        return Ok(FeatureEncoder::fixed());
    };

    let fitted = FeatureEncoder::from_fitted(encoders)?;
    for divergence in FeatureEncoder::fixed().divergences(&fitted) {
        warn!(
            column = divergence.column,
            value = divergence.value,
            fixed = divergence.fixed,
            fitted = divergence.fitted,
            "fixed encoding table disagrees with training encoder; using the training code"
        );
    }
    Ok(fitted)
}

/// Allowed values for each selector on the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOptions {
    pub gender: Vec<&'static str>,
    pub married: Vec<&'static str>,
    pub dependents: Vec<&'static str>,
    pub education: Vec<&'static str>,
    pub self_employed: Vec<&'static str>,
    pub credit_history: Vec<u8>,
    pub property_area: Vec<&'static str>,
}

impl FormOptions {
    pub fn standard() -> Self {
        fn labels<T: Categorical>() -> Vec<&'static str> {
            T::VARIANTS.iter().map(|variant| variant.label()).collect()
        }

        Self {
            gender: labels::<Gender>(),
            married: labels::<YesNo>(),
            dependents: labels::<Dependents>(),
            education: labels::<Education>(),
            self_employed: labels::<YesNo>(),
            credit_history: vec![1, 0],
            property_area: labels::<PropertyArea>(),
        }
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
