//! Threshold rules over the raw applicant inputs.
//!
//! These advisories are a separate heuristic layer. They do not read the classifier and do
//! not describe why it produced a given probability.

use serde::{Deserialize, Serialize};

use super::domain::ApplicantRecord;

/// Form amounts are entered in thousands.
pub const CURRENCY_UNIT: f64 = 1000.0;

pub const HEALTHY_MESSAGE: &str = "All key indicators look healthy. Low fraud risk.";

/// Cut-offs in absolute currency units (after the ×1000 conversion) and months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low_income: f64,
    pub high_loan_amount: f64,
    pub short_term_months: f64,
    pub self_employed_income: f64,
    pub self_employed_loan_amount: f64,
    pub max_dependents: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_income: 30_000.0,
            high_loan_amount: 150_000.0,
            short_term_months: 60.0,
            self_employed_income: 40_000.0,
            self_employed_loan_amount: 100_000.0,
            max_dependents: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    BadCreditHistory,
    LowApplicantIncome,
    HighLoanAmount,
    ShortLoanTerm,
    SelfEmployedHighExposure,
    ManyDependents,
}

impl RiskFactor {
    pub fn message(self) -> &'static str {
        match self {
            RiskFactor::BadCreditHistory => "Bad credit history is a major red flag.",
            RiskFactor::LowApplicantIncome => "Low applicant income may impact repayment.",
            RiskFactor::HighLoanAmount => "High loan amount requested increases financial risk.",
            RiskFactor::ShortLoanTerm => "Short loan term could indicate repayment pressure.",
            RiskFactor::SelfEmployedHighExposure => {
                "Self-employed with low income and large loan: high-risk profile."
            }
            RiskFactor::ManyDependents => "Many dependents may increase financial strain.",
        }
    }
}

/// Advisories in evaluation order, or the single healthy message when nothing fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub factors: Vec<RiskFactor>,
    pub messages: Vec<String>,
}

impl RiskExplanation {
    fn from_factors(factors: Vec<RiskFactor>) -> Self {
        let messages = if factors.is_empty() {
            vec![HEALTHY_MESSAGE.to_string()]
        } else {
            factors
                .iter()
                .map(|factor| factor.message().to_string())
                .collect()
        };
        Self { factors, messages }
    }

    pub fn is_healthy(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn contains(&self, factor: RiskFactor) -> bool {
        self.factors.contains(&factor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskExplainer {
    thresholds: RiskThresholds,
}

impl RiskExplainer {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn explain(&self, record: &ApplicantRecord) -> RiskExplanation {
        let limits = &self.thresholds;
        let income = record.applicant_income * CURRENCY_UNIT;
        let loan_amount = record.loan_amount * CURRENCY_UNIT;

        let rules = [
            (RiskFactor::BadCreditHistory, record.credit_history == 0),
            (RiskFactor::LowApplicantIncome, income < limits.low_income),
            (
                RiskFactor::HighLoanAmount,
                loan_amount > limits.high_loan_amount,
            ),
            (
                RiskFactor::ShortLoanTerm,
                record.loan_term_months < limits.short_term_months,
            ),
            (
                RiskFactor::SelfEmployedHighExposure,
                record.self_employed.is_yes()
                    && income < limits.self_employed_income
                    && loan_amount > limits.self_employed_loan_amount,
            ),
            (
                RiskFactor::ManyDependents,
                record.dependents.count() > limits.max_dependents,
            ),
        ];

        let factors = rules
            .into_iter()
            .filter_map(|(factor, fired)| fired.then_some(factor))
            .collect();
        RiskExplanation::from_factors(factors)
    }
}
