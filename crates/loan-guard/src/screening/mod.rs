//! Inference side: applicant encoding, classifier prediction, and rule-based advisories.

pub mod domain;
pub mod encoding;
pub mod predictor;
pub mod report;
pub mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRecord, Categorical, Dependents, EncodedFeatureVector, Education, Gender,
    InvalidInput, PredictionLabel, PropertyArea, UnknownCategory, YesNo, FEATURE_COLUMNS,
    FEATURE_COUNT,
};
pub use encoding::{EncodingDivergence, EncodingError, FeatureEncoder};
pub use predictor::{PredictionError, PredictionResult, Predictor, ProbabilisticClassifier};
pub use report::{format_currency, InputSummary, ProbabilityBand, ScreeningReport};
pub use risk::{RiskExplainer, RiskExplanation, RiskFactor, RiskThresholds};
pub use router::screening_router;
pub use service::{select_encoder, FormOptions, ScreeningError, ScreeningService};
