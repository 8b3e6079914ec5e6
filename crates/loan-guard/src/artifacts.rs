//! JSON persistence for the fitted classifier, scaler, and label encoders.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::screening::ProbabilisticClassifier;
use crate::training::{CategoryEncoders, RandomForestClassifier, StandardScaler};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "encoders.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            encoders: dir.join(ENCODERS_FILE),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found at {}", .path.display())]
    Missing { path: PathBuf },
    #[error("failed to access artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {} is not valid: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scaler expects {scaler} features but classifier expects {classifier}")]
    Incompatible { scaler: usize, classifier: usize },
}

/// Fitted bundle shared read-only by every screening request.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    pub classifier: RandomForestClassifier,
    pub scaler: StandardScaler,
    /// Absent for bundles written without encoders; inference then uses the fixed table.
    pub encoders: Option<CategoryEncoders>,
}

impl TrainedArtifacts {
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        write_json(&paths.model, &self.classifier)?;
        write_json(&paths.scaler, &self.scaler)?;
        if let Some(encoders) = &self.encoders {
            write_json(&paths.encoders, encoders)?;
        }
        info!(model = %paths.model.display(), scaler = %paths.scaler.display(), "artifacts saved");
        Ok(())
    }

    /// Model and scaler are required; encoders are optional.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let classifier: RandomForestClassifier = read_json(&paths.model)?;
        let scaler: StandardScaler = read_json(&paths.scaler)?;

        if scaler.n_features() != classifier.n_features() {
            return Err(ArtifactError::Incompatible {
                scaler: scaler.n_features(),
                classifier: classifier.n_features(),
            });
        }

        let encoders = match read_json::<CategoryEncoders>(&paths.encoders) {
            Ok(encoders) => Some(encoders),
            Err(ArtifactError::Missing { path }) => {
                warn!(
                    path = %path.display(),
                    "label encoders not found; using fixed encoding table"
                );
                None
            }
            Err(other) => return Err(other),
        };

        info!(
            model = %paths.model.display(),
            trees = classifier.trees().len(),
            "artifacts loaded"
        );
        Ok(Self {
            classifier,
            scaler,
            encoders,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let io_error = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer(&mut writer, value).map_err(|source| ArtifactError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Format {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{ForestOptions, LabelEncoder};

    fn artifacts() -> TrainedArtifacts {
        let features = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![2.0, 1.0],
            vec![3.0, 0.0],
        ];
        let targets = vec![0, 0, 1, 1];
        let scaler = StandardScaler::fit(&features);
        let classifier = RandomForestClassifier::fit(
            &scaler.transform(&features),
            &targets,
            ForestOptions {
                n_trees: 3,
                ..ForestOptions::default()
            },
        )
        .expect("fit");
        let mut encoders = CategoryEncoders::default();
        encoders.insert("Loan_Status", LabelEncoder::fit(["Y", "N"]));
        TrainedArtifacts {
            classifier,
            scaler,
            encoders: Some(encoders),
        }
    }

    #[test]
    fn save_then_load_restores_the_bundle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ArtifactPaths::in_dir(dir.path().join("nested"));
        let original = artifacts();

        original.save(&paths).expect("save");
        let loaded = TrainedArtifacts::load(&paths).expect("load");

        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_encoders_fall_back_to_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ArtifactPaths::in_dir(dir.path());
        let mut bundle = artifacts();
        bundle.encoders = None;

        bundle.save(&paths).expect("save");
        assert!(!paths.encoders.exists());
        let loaded = TrainedArtifacts::load(&paths).expect("load");
        assert!(loaded.encoders.is_none());
    }

    #[test]
    fn missing_model_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ArtifactPaths::in_dir(dir.path());
        let error = TrainedArtifacts::load(&paths).expect_err("nothing saved");
        match error {
            ArtifactError::Missing { path } => assert_eq!(path, paths.model),
            other => panic!("expected missing artifact, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_scaler_is_a_format_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ArtifactPaths::in_dir(dir.path());
        artifacts().save(&paths).expect("save");
        std::fs::write(&paths.scaler, b"{not json").expect("overwrite");

        let error = TrainedArtifacts::load(&paths).expect_err("corrupt scaler");
        assert!(matches!(error, ArtifactError::Format { .. }));
    }
}
