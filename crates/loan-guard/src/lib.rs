//! Loan application screening.
//!
//! - [`training`] fits the label encoders, feature scaler, and random forest from a loan CSV.
//! - [`artifacts`] persists and reloads the fitted bundle.
//! - [`screening`] encodes an applicant, runs the classifier, and attaches rule-based advisories.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
pub mod training;

pub use artifacts::{ArtifactError, ArtifactPaths, TrainedArtifacts};
pub use error::AppError;
pub use screening::{
    ApplicantRecord, EncodedFeatureVector, FeatureEncoder, PredictionLabel, PredictionResult,
    Predictor, RiskExplainer, RiskExplanation, ScreeningReport, ScreeningService,
};
pub use training::{
    TrainingError, TrainingOptions, TrainingOutcome, TrainingPipeline, TrainingSummary,
};
