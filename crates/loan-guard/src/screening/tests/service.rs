use super::common::*;
use crate::artifacts::ArtifactError;
use crate::screening::domain::{Education, InvalidInput, PredictionLabel};
use crate::screening::report::{ProbabilityBand, SUGGESTED_IMPROVEMENTS};
use crate::screening::{FormOptions, PredictionError, Predictor, RiskFactor, ScreeningError};

#[test]
fn screen_reports_legit_applicant() {
    let service = build_service(0.85);

    let report = service.screen(&healthy_record()).expect("screening succeeds");

    assert_eq!(report.prediction.label, PredictionLabel::Legit);
    assert_eq!(report.prediction.probability, 0.85);
    assert_eq!(report.probability_percent, 85.0);
    assert_eq!(report.band, ProbabilityBand::LowRisk);
    assert!((report.delta_from_reference - 15.0).abs() < 1e-9);
    assert!(report.verdict.starts_with("Approved"));
    assert!(report.suggestions.is_empty());
    assert!(report.explanation.is_healthy());
}

#[test]
fn screen_attaches_suggestions_when_flagged() {
    let service = build_service(0.3);
    let mut record = healthy_record();
    record.credit_history = 0;

    let report = service.screen(&record).expect("screening succeeds");

    assert_eq!(report.prediction.label, PredictionLabel::Fraudulent);
    assert_eq!(report.band, ProbabilityBand::HighRisk);
    assert_eq!(report.suggestions.len(), SUGGESTED_IMPROVEMENTS.len());
    assert!(report.explanation.contains(RiskFactor::BadCreditHistory));
    assert_eq!(report.inputs.credit_history, "Bad");
}

#[test]
fn even_split_is_not_legit() {
    let report = build_service(0.5)
        .screen(&healthy_record())
        .expect("screening succeeds");

    assert_eq!(report.prediction.label, PredictionLabel::Fraudulent);
    assert_eq!(report.probability_percent, 50.0);
    assert_eq!(report.band, ProbabilityBand::Moderate);
}

#[test]
fn screen_is_deterministic() {
    let service = build_service(0.64);
    let record = healthy_record();

    let first = service.screen(&record).expect("first run");
    let second = service.screen(&record).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn report_echoes_inputs_in_currency_units() {
    let mut record = healthy_record();
    record.education = Education::NotGraduate;

    let report = build_service(0.9).screen(&record).expect("screening succeeds");

    assert_eq!(report.inputs.applicant_income, 50_000.0);
    assert_eq!(report.inputs.coapplicant_income, 20_000.0);
    assert_eq!(report.inputs.loan_amount, 100_000.0);
    assert_eq!(report.inputs.education, "Not Graduate");
    assert!(report
        .inputs
        .lines()
        .contains(&("Loan Amount", "₹100,000".to_string())));
}

#[test]
fn screen_rejects_invalid_amounts() {
    let mut record = healthy_record();
    record.loan_amount = -5.0;

    match build_service(0.9).screen(&record) {
        Err(ScreeningError::InvalidInput(InvalidInput::NegativeAmount { field, .. })) => {
            assert_eq!(field, "loan_amount");
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn screen_propagates_non_binary_classifier() {
    let service = build_service_with(FixedClassifier {
        legit: 0.7,
        features: crate::screening::FEATURE_COUNT,
        classes: 3,
    });

    match service.screen(&healthy_record()) {
        Err(ScreeningError::Prediction(PredictionError::NotBinary(3))) => {}
        other => panic!("expected non-binary error, got {other:?}"),
    }
}

#[test]
fn explain_skips_the_classifier() {
    let service = build_service_with(FixedClassifier {
        legit: 0.7,
        features: crate::screening::FEATURE_COUNT,
        classes: 3,
    });
    let mut record = healthy_record();
    record.applicant_income = 10.0;

    let explanation = service.explain(&record).expect("explanation succeeds");
    assert_eq!(explanation.factors, vec![RiskFactor::LowApplicantIncome]);
}

#[test]
fn predictor_rejects_mismatched_scaler() {
    let classifier = FixedClassifier {
        legit: 0.5,
        features: 5,
        classes: 2,
    };

    match Predictor::new(identity_scaler(), classifier) {
        Err(ArtifactError::Incompatible { scaler, classifier }) => {
            assert_eq!((scaler, classifier), (11, 5));
        }
        Err(other) => panic!("expected incompatible artifacts, got {other:?}"),
        Ok(_) => panic!("expected incompatible artifacts"),
    }
}

#[test]
fn form_options_list_dataset_spellings() {
    let options = FormOptions::standard();

    assert_eq!(options.gender, vec!["Male", "Female"]);
    assert_eq!(options.dependents, vec!["0", "1", "2", "3+"]);
    assert_eq!(options.education, vec!["Graduate", "Not Graduate"]);
    assert_eq!(options.credit_history, vec![1, 0]);
    assert_eq!(options.property_area, vec!["Urban", "Semiurban", "Rural"]);
}
