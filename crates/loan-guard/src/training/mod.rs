//! Offline fitting of the encoders, scaler, and forest from a loan CSV.

pub mod dataset;
pub mod forest;
pub mod label_encoder;
pub mod scaler;

pub use dataset::{read_dataset, DatasetError, LoanDataset, LoanRow};
pub use forest::{ForestError, ForestOptions, RandomForestClassifier};
pub use label_encoder::{CategoryEncoders, LabelEncoder, UnseenLabel};
pub use scaler::StandardScaler;

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifacts::TrainedArtifacts;
use crate::screening::domain::columns;

/// Forest hyperparameters used by the training command.
pub type TrainingOptions = ForestOptions;

/// Columns label-encoded before fitting, target included.
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    columns::GENDER,
    columns::MARRIED,
    columns::EDUCATION,
    columns::SELF_EMPLOYED,
    columns::PROPERTY_AREA,
    columns::LOAN_STATUS,
    columns::DEPENDENTS,
];

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("failed to read loan dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("loan dataset has no complete rows after dropping missing values")]
    EmptyDataset,
    #[error("Loan_Status needs at least two classes, found only {classes:?}")]
    SingleClass { classes: Vec<String> },
    #[error("could not encode column {column}: {source}")]
    Encoding {
        column: &'static str,
        #[source]
        source: UnseenLabel,
    },
    #[error(transparent)]
    Forest(#[from] ForestError),
}

/// Bookkeeping reported after a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub rows_used: usize,
    pub class_counts: BTreeMap<String, usize>,
    /// Accuracy on the rows the forest was fitted on.
    pub training_accuracy: f64,
    pub n_trees: usize,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: TrainedArtifacts,
    pub summary: TrainingSummary,
}

pub struct TrainingPipeline {
    options: TrainingOptions,
}

impl TrainingPipeline {
    pub fn new(options: TrainingOptions) -> Self {
        Self { options }
    }

    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> Result<TrainingOutcome, TrainingError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| TrainingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(dataset = %path.display(), "training loan classifier");
        self.run(file)
    }

    pub fn run<R: Read>(&self, reader: R) -> Result<TrainingOutcome, TrainingError> {
        let dataset = read_dataset(reader)?;
        info!(
            rows_read = dataset.rows_read,
            rows_dropped = dataset.rows_dropped(),
            "loan dataset loaded"
        );
        if dataset.rows.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let mut encoders = CategoryEncoders::default();
        let mut codes: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for column in CATEGORICAL_COLUMNS {
            let values = dataset.column(column).unwrap_or_default();
            let encoder = LabelEncoder::fit(values.iter().copied());
            let encoded = encoder
                .transform(values.iter().copied())
                .map_err(|source| TrainingError::Encoding { column, source })?;
            codes.insert(column, encoded);
            encoders.insert(column, encoder);
        }

        let status_classes: Vec<String> = encoders
            .get(columns::LOAN_STATUS)
            .map(|encoder| encoder.classes().to_vec())
            .unwrap_or_default();
        if status_classes.len() < 2 {
            return Err(TrainingError::SingleClass {
                classes: status_classes,
            });
        }

        let features = feature_matrix(&dataset, &codes);
        let targets = codes.remove(columns::LOAN_STATUS).unwrap_or_default();

        let scaler = StandardScaler::fit(&features);
        let scaled = scaler.transform(&features);
        let classifier = RandomForestClassifier::fit(&scaled, &targets, self.options)?;

        let correct = scaled
            .iter()
            .zip(&targets)
            .filter(|(row, target)| classifier.predict(row) == **target)
            .count();
        let training_accuracy = correct as f64 / targets.len() as f64;

        let mut class_counts = BTreeMap::new();
        for target in &targets {
            let class = status_classes[*target].clone();
            *class_counts.entry(class).or_insert(0) += 1;
        }

        let summary = TrainingSummary {
            rows_read: dataset.rows_read,
            rows_dropped: dataset.rows_dropped(),
            rows_used: dataset.rows.len(),
            class_counts,
            training_accuracy,
            n_trees: self.options.n_trees,
            seed: self.options.seed,
            trained_at: Utc::now(),
        };
        info!(
            rows_used = summary.rows_used,
            training_accuracy = summary.training_accuracy,
            trees = summary.n_trees,
            "loan classifier trained"
        );

        Ok(TrainingOutcome {
            artifacts: TrainedArtifacts {
                classifier,
                scaler,
                encoders: Some(encoders),
            },
            summary,
        })
    }
}

/// Assemble rows in `FEATURE_COLUMNS` order from label codes and the numeric fields.
fn feature_matrix(
    dataset: &LoanDataset,
    codes: &HashMap<&'static str, Vec<usize>>,
) -> Vec<Vec<f64>> {
    let code = |column: &str, index: usize| {
        codes
            .get(column)
            .and_then(|values| values.get(index))
            .map(|value| *value as f64)
            .unwrap_or_default()
    };

    dataset
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            vec![
                code(columns::GENDER, index),
                code(columns::MARRIED, index),
                code(columns::DEPENDENTS, index),
                code(columns::EDUCATION, index),
                code(columns::SELF_EMPLOYED, index),
                row.applicant_income,
                row.coapplicant_income,
                row.loan_amount,
                row.loan_amount_term,
                row.credit_history,
                code(columns::PROPERTY_AREA, index),
            ]
        })
        .collect()
}
