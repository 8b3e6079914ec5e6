use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dataset column names, shared by the training reader and the encoders.
pub mod columns {
    pub const LOAN_ID: &str = "Loan_ID";
    pub const GENDER: &str = "Gender";
    pub const MARRIED: &str = "Married";
    pub const DEPENDENTS: &str = "Dependents";
    pub const EDUCATION: &str = "Education";
    pub const SELF_EMPLOYED: &str = "Self_Employed";
    pub const APPLICANT_INCOME: &str = "ApplicantIncome";
    pub const COAPPLICANT_INCOME: &str = "CoapplicantIncome";
    pub const LOAN_AMOUNT: &str = "LoanAmount";
    pub const LOAN_AMOUNT_TERM: &str = "Loan_Amount_Term";
    pub const CREDIT_HISTORY: &str = "Credit_History";
    pub const PROPERTY_AREA: &str = "Property_Area";
    pub const LOAN_STATUS: &str = "Loan_Status";
}

pub const FEATURE_COUNT: usize = 11;

/// Feature order expected by the scaler and the classifier.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    columns::GENDER,
    columns::MARRIED,
    columns::DEPENDENTS,
    columns::EDUCATION,
    columns::SELF_EMPLOYED,
    columns::APPLICANT_INCOME,
    columns::COAPPLICANT_INCOME,
    columns::LOAN_AMOUNT,
    columns::LOAN_AMOUNT_TERM,
    columns::CREDIT_HISTORY,
    columns::PROPERTY_AREA,
];

/// Closed set of string values a categorical field can take, spelled as in the dataset.
pub trait Categorical: Copy + Sized + 'static {
    const VARIANTS: &'static [Self];

    fn label(self) -> &'static str;

    fn ordinal(self) -> usize {
        Self::VARIANTS
            .iter()
            .position(|variant| variant.label() == self.label())
            .unwrap_or_default()
    }

    fn parse_label(raw: &str) -> Result<Self, UnknownCategory> {
        let trimmed = raw.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory {
                value: trimmed.to_string(),
                expected: Self::VARIANTS.iter().map(|variant| variant.label()).collect(),
            })
    }
}

/// Raised when free text does not name any variant of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of {}", .expected.join(", "))]
pub struct UnknownCategory {
    pub value: String,
    pub expected: Vec<&'static str>,
}

macro_rules! categorical {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl Categorical for $name {
            const VARIANTS: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::parse_label(raw)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

categorical!(Gender { Male => "Male", Female => "Female" });

/// Answer to the married and self-employed questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

categorical!(YesNo { Yes => "Yes", No => "No" });

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependents {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3+")]
    ThreeOrMore,
}

categorical!(Dependents { Zero => "0", One => "1", Two => "2", ThreeOrMore => "3+" });

impl Dependents {
    /// Household count with "3+" collapsed to three.
    pub fn count(self) -> u8 {
        match self {
            Dependents::Zero => 0,
            Dependents::One => 1,
            Dependents::Two => 2,
            Dependents::ThreeOrMore => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate")]
    NotGraduate,
}

categorical!(Education { Graduate => "Graduate", NotGraduate => "Not Graduate" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyArea {
    Urban,
    Semiurban,
    Rural,
}

categorical!(PropertyArea { Urban => "Urban", Semiurban => "Semiurban", Rural => "Rural" });

/// One loan applicant as collected by the intake form.
///
/// Income and loan figures are expressed in thousands of currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub gender: Gender,
    pub married: YesNo,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: YesNo,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: f64,
    pub credit_history: u8,
    pub property_area: PropertyArea,
}

impl ApplicantRecord {
    /// Reject values the intake form used to rule out.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let amounts = [
            ("applicant_income", self.applicant_income),
            ("coapplicant_income", self.coapplicant_income),
            ("loan_amount", self.loan_amount),
            ("loan_term_months", self.loan_term_months),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidInput::NegativeAmount { field, value });
            }
        }

        if self.credit_history > 1 {
            return Err(InvalidInput::CreditHistory(self.credit_history));
        }

        Ok(())
    }

    pub fn has_good_credit(&self) -> bool {
        self.credit_history == 1
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field} must be a non-negative number (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("credit_history must be 0 or 1 (got {0})")]
    CreditHistory(u8),
}

/// Numeric model input in [`FEATURE_COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector(pub [f64; FEATURE_COUNT]);

impl EncodedFeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|index| self.0[index])
    }
}

/// Binary outcome of the classifier. Class code 1 (`Loan_Status = Y`) is legit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionLabel {
    Legit,
    Fraudulent,
}

impl PredictionLabel {
    pub const LEGIT_CLASS: usize = 1;

    pub fn from_class(code: usize) -> Self {
        if code == Self::LEGIT_CLASS {
            PredictionLabel::Legit
        } else {
            PredictionLabel::Fraudulent
        }
    }

    pub fn class_code(self) -> usize {
        match self {
            PredictionLabel::Legit => 1,
            PredictionLabel::Fraudulent => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PredictionLabel::Legit => "Legit",
            PredictionLabel::Fraudulent => "Fraudulent",
        }
    }
}
