use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, Categorical, PredictionLabel};
use super::predictor::PredictionResult;
use super::risk::{RiskExplanation, CURRENCY_UNIT};

/// Reference line of the approval gauge, in percent.
pub const REFERENCE_PERCENT: f64 = 70.0;

pub const SUGGESTED_IMPROVEMENTS: [&str; 6] = [
    "Maintain a good credit score",
    "Reduce the requested loan amount",
    "Add a co-applicant or guarantor",
    "Choose a longer repayment term to lower EMIs",
    "Increase or document steady income (especially if self-employed)",
    "Pay off previous dues and avoid defaults",
];

/// Gauge zone for the legit probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    HighRisk,
    Moderate,
    LowRisk,
}

impl ProbabilityBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 50.0 {
            ProbabilityBand::HighRisk
        } else if percent < 80.0 {
            ProbabilityBand::Moderate
        } else {
            ProbabilityBand::LowRisk
        }
    }
}

/// Echo of the submitted inputs with labels restored and amounts in currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub gender: String,
    pub married: String,
    pub education: String,
    pub dependents: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: f64,
    pub credit_history: String,
    pub property_area: String,
}

impl InputSummary {
    pub fn from_record(record: &ApplicantRecord) -> Self {
        Self {
            gender: record.gender.label().to_string(),
            married: record.married.label().to_string(),
            education: record.education.label().to_string(),
            dependents: record.dependents.label().to_string(),
            self_employed: record.self_employed.label().to_string(),
            applicant_income: record.applicant_income * CURRENCY_UNIT,
            coapplicant_income: record.coapplicant_income * CURRENCY_UNIT,
            loan_amount: record.loan_amount * CURRENCY_UNIT,
            loan_term_months: record.loan_term_months,
            credit_history: if record.has_good_credit() { "Good" } else { "Bad" }.to_string(),
            property_area: record.property_area.label().to_string(),
        }
    }

    /// `(label, value)` pairs for text rendering.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Gender", self.gender.clone()),
            ("Married", self.married.clone()),
            ("Education", self.education.clone()),
            ("Dependents", self.dependents.clone()),
            ("Self Employed", self.self_employed.clone()),
            ("Applicant Income", format_currency(self.applicant_income)),
            ("Co-applicant Income", format_currency(self.coapplicant_income)),
            ("Loan Amount", format_currency(self.loan_amount)),
            ("Loan Term", format!("{} months", self.loan_term_months)),
            ("Credit History", self.credit_history.clone()),
            ("Property Area", self.property_area.clone()),
        ]
    }
}

/// Everything the intake surface shows after one encode, predict, and explain cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub prediction: PredictionResult,
    pub probability_percent: f64,
    pub delta_from_reference: f64,
    pub band: ProbabilityBand,
    pub verdict: String,
    pub inputs: InputSummary,
    pub explanation: RiskExplanation,
    /// Only populated for fraudulent predictions.
    pub suggestions: Vec<String>,
}

impl ScreeningReport {
    pub fn new(
        record: &ApplicantRecord,
        prediction: PredictionResult,
        explanation: RiskExplanation,
    ) -> Self {
        let probability_percent = (prediction.probability * 100.0 * 100.0).round() / 100.0;
        let verdict = match prediction.label {
            PredictionLabel::Legit => {
                "Approved: the loan is predicted to be legit based on current financials."
            }
            PredictionLabel::Fraudulent => {
                "Fraudulent/Risky: the loan application is flagged as high risk."
            }
        }
        .to_string();
        let suggestions = match prediction.label {
            PredictionLabel::Legit => Vec::new(),
            PredictionLabel::Fraudulent => SUGGESTED_IMPROVEMENTS
                .iter()
                .map(|suggestion| suggestion.to_string())
                .collect(),
        };

        Self {
            prediction,
            probability_percent,
            delta_from_reference: probability_percent - REFERENCE_PERCENT,
            band: ProbabilityBand::from_percent(probability_percent),
            verdict,
            inputs: InputSummary::from_record(record),
            explanation,
            suggestions,
        }
    }
}

/// Whole-unit amount with thousands separators, e.g. `₹1,250,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.4), "₹999");
        assert_eq!(format_currency(50_000.0), "₹50,000");
        assert_eq!(format_currency(1_250_000.0), "₹1,250,000");
    }

    #[test]
    fn bands_follow_gauge_steps() {
        assert_eq!(ProbabilityBand::from_percent(12.0), ProbabilityBand::HighRisk);
        assert_eq!(ProbabilityBand::from_percent(50.0), ProbabilityBand::Moderate);
        assert_eq!(ProbabilityBand::from_percent(79.99), ProbabilityBand::Moderate);
        assert_eq!(ProbabilityBand::from_percent(80.0), ProbabilityBand::LowRisk);
    }
}
