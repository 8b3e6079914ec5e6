use super::common::*;
use crate::screening::domain::{Dependents, YesNo};
use crate::screening::risk::HEALTHY_MESSAGE;
use crate::screening::{RiskExplainer, RiskFactor, RiskThresholds};

fn explainer() -> RiskExplainer {
    RiskExplainer::new(RiskThresholds::default())
}

#[test]
fn healthy_applicant_gets_single_reassurance() {
    let explanation = explainer().explain(&healthy_record());

    assert!(explanation.is_healthy());
    assert_eq!(explanation.messages, vec![HEALTHY_MESSAGE.to_string()]);
}

#[test]
fn low_income_is_flagged() {
    let mut record = healthy_record();
    record.applicant_income = 10.0;

    let explanation = explainer().explain(&record);
    assert_eq!(explanation.factors, vec![RiskFactor::LowApplicantIncome]);
    assert_eq!(
        explanation.messages,
        vec!["Low applicant income may impact repayment.".to_string()]
    );
}

#[test]
fn high_loan_amount_is_flagged() {
    let mut record = healthy_record();
    record.loan_amount = 200.0;

    let explanation = explainer().explain(&record);
    assert_eq!(explanation.factors, vec![RiskFactor::HighLoanAmount]);
}

#[test]
fn bad_credit_history_is_flagged() {
    let mut record = healthy_record();
    record.credit_history = 0;

    let explanation = explainer().explain(&record);
    assert!(explanation.contains(RiskFactor::BadCreditHistory));
    assert_eq!(
        explanation.messages[0],
        "Bad credit history is a major red flag."
    );
}

#[test]
fn short_term_and_many_dependents_are_flagged() {
    let mut record = healthy_record();
    record.loan_term_months = 36.0;
    record.dependents = Dependents::ThreeOrMore;

    let explanation = explainer().explain(&record);
    assert_eq!(
        explanation.factors,
        vec![RiskFactor::ShortLoanTerm, RiskFactor::ManyDependents]
    );
}

#[test]
fn two_dependents_stay_within_limit() {
    let mut record = healthy_record();
    record.dependents = Dependents::Two;

    assert!(explainer().explain(&record).is_healthy());
}

#[test]
fn self_employed_exposure_requires_all_three_conditions() {
    let mut record = healthy_record();
    record.self_employed = YesNo::Yes;
    record.applicant_income = 35.0;
    record.loan_amount = 120.0;

    let explanation = explainer().explain(&record);
    assert_eq!(
        explanation.factors,
        vec![RiskFactor::SelfEmployedHighExposure]
    );

    record.self_employed = YesNo::No;
    assert!(explainer().explain(&record).is_healthy());
}

#[test]
fn thresholds_are_strict() {
    let mut record = healthy_record();
    record.applicant_income = 30.0;
    record.loan_amount = 150.0;
    record.loan_term_months = 60.0;

    assert!(explainer().explain(&record).is_healthy());
}

#[test]
fn advisories_follow_rule_order() {
    let mut record = healthy_record();
    record.credit_history = 0;
    record.applicant_income = 10.0;
    record.loan_amount = 200.0;
    record.self_employed = YesNo::Yes;

    let explanation = explainer().explain(&record);
    assert_eq!(
        explanation.factors,
        vec![
            RiskFactor::BadCreditHistory,
            RiskFactor::LowApplicantIncome,
            RiskFactor::HighLoanAmount,
            RiskFactor::SelfEmployedHighExposure,
        ]
    );
    assert_eq!(explanation.messages.len(), 4);
}

#[test]
fn custom_thresholds_change_cutoffs() {
    let explainer = RiskExplainer::new(RiskThresholds {
        low_income: 60_000.0,
        ..RiskThresholds::default()
    });

    assert_eq!(
        explainer.explain(&healthy_record()).factors,
        vec![RiskFactor::LowApplicantIncome]
    );
}
