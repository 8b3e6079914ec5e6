use axum::response::Response;
use serde_json::Value;

use crate::screening::domain::{
    columns, ApplicantRecord, Categorical, Dependents, Education, Gender, PropertyArea, YesNo,
    FEATURE_COUNT,
};
use crate::screening::{
    FeatureEncoder, Predictor, ProbabilisticClassifier, RiskExplainer, RiskThresholds,
    ScreeningService,
};
use crate::training::{CategoryEncoders, LabelEncoder, StandardScaler};

/// Classifier that answers every row with the same legit probability.
#[derive(Debug, Clone)]
pub(super) struct FixedClassifier {
    pub(super) legit: f64,
    pub(super) features: usize,
    pub(super) classes: usize,
}

impl FixedClassifier {
    pub(super) fn legit(probability: f64) -> Self {
        Self {
            legit: probability,
            features: FEATURE_COUNT,
            classes: 2,
        }
    }
}

impl ProbabilisticClassifier for FixedClassifier {
    fn n_features(&self) -> usize {
        self.features
    }

    fn n_classes(&self) -> usize {
        self.classes
    }

    fn predict_proba(&self, _features: &[f64]) -> Vec<f64> {
        vec![1.0 - self.legit, self.legit]
    }
}

pub(super) fn healthy_record() -> ApplicantRecord {
    ApplicantRecord {
        gender: Gender::Male,
        married: YesNo::Yes,
        dependents: Dependents::Zero,
        education: Education::Graduate,
        self_employed: YesNo::No,
        applicant_income: 50.0,
        coapplicant_income: 20.0,
        loan_amount: 100.0,
        loan_term_months: 360.0,
        credit_history: 1,
        property_area: PropertyArea::Urban,
    }
}

pub(super) fn identity_scaler() -> StandardScaler {
    StandardScaler::fit(&[vec![0.0; FEATURE_COUNT]])
}

pub(super) fn build_service_with(classifier: FixedClassifier) -> ScreeningService<FixedClassifier> {
    let predictor = Predictor::new(identity_scaler(), classifier).expect("dimensions agree");
    ScreeningService::new(
        FeatureEncoder::fixed(),
        predictor,
        RiskExplainer::new(RiskThresholds::default()),
    )
}

pub(super) fn build_service(legit: f64) -> ScreeningService<FixedClassifier> {
    build_service_with(FixedClassifier::legit(legit))
}

fn labels<T: Categorical>() -> Vec<&'static str> {
    T::VARIANTS.iter().map(|variant| variant.label()).collect()
}

/// Encoders fitted the way the training pipeline fits them, over every known label.
pub(super) fn fitted_encoders() -> CategoryEncoders {
    let mut encoders = CategoryEncoders::default();
    encoders.insert(columns::GENDER, LabelEncoder::fit(labels::<Gender>()));
    encoders.insert(columns::MARRIED, LabelEncoder::fit(labels::<YesNo>()));
    encoders.insert(columns::DEPENDENTS, LabelEncoder::fit(labels::<Dependents>()));
    encoders.insert(columns::EDUCATION, LabelEncoder::fit(labels::<Education>()));
    encoders.insert(columns::SELF_EMPLOYED, LabelEncoder::fit(labels::<YesNo>()));
    encoders.insert(
        columns::PROPERTY_AREA,
        LabelEncoder::fit(labels::<PropertyArea>()),
    );
    encoders
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
