use std::marker::PhantomData;

use serde::Serialize;

use super::domain::{
    columns, ApplicantRecord, Categorical, Dependents, EncodedFeatureVector, Education, Gender,
    PropertyArea, YesNo,
};
use crate::training::CategoryEncoders;

/// Integer code for every variant of one categorical field.
#[derive(Debug, Clone, PartialEq)]
struct CodeTable<T> {
    codes: Vec<f64>,
    _field: PhantomData<T>,
}

impl<T: Categorical> CodeTable<T> {
    fn from_fn(code: impl Fn(T) -> u8) -> Self {
        Self {
            codes: T::VARIANTS
                .iter()
                .map(|variant| f64::from(code(*variant)))
                .collect(),
            _field: PhantomData,
        }
    }

    fn from_fitted(
        column: &'static str,
        encoders: &CategoryEncoders,
    ) -> Result<Self, EncodingError> {
        let encoder = encoders
            .get(column)
            .ok_or(EncodingError::MissingEncoder { column })?;
        let codes = T::VARIANTS
            .iter()
            .map(|variant| {
                encoder
                    .code_of(variant.label())
                    .map(|code| code as f64)
                    .ok_or_else(|| EncodingError::UnseenCategory {
                        column,
                        value: variant.label(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            codes,
            _field: PhantomData,
        })
    }

    fn code(&self, value: T) -> f64 {
        self.codes[value.ordinal()]
    }

    fn divergences(&self, other: &Self, column: &'static str, out: &mut Vec<EncodingDivergence>) {
        for variant in T::VARIANTS {
            let (left, right) = (self.code(*variant), other.code(*variant));
            if left != right {
                out.push(EncodingDivergence {
                    column,
                    value: variant.label(),
                    fixed: left,
                    fitted: right,
                });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("no fitted encoder for column {column}")]
    MissingEncoder { column: &'static str },
    #[error("{column} value '{value}' was never seen during training")]
    UnseenCategory {
        column: &'static str,
        value: &'static str,
    },
}

/// A slot where the fixed table and the fitted encoders assign different codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingDivergence {
    pub column: &'static str,
    pub value: &'static str,
    pub fixed: f64,
    pub fitted: f64,
}

/// Maps an [`ApplicantRecord`] onto the 11 model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    gender: CodeTable<Gender>,
    married: CodeTable<YesNo>,
    dependents: CodeTable<Dependents>,
    education: CodeTable<Education>,
    self_employed: CodeTable<YesNo>,
    property_area: CodeTable<PropertyArea>,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::fixed()
    }
}

impl FeatureEncoder {
    /// The hand-maintained lookup table the intake form was built against.
    pub fn fixed() -> Self {
        let yes_no = |value: YesNo| u8::from(value.is_yes());
        Self {
            gender: CodeTable::from_fn(|gender| u8::from(gender == Gender::Male)),
            married: CodeTable::from_fn(yes_no),
            dependents: CodeTable::from_fn(Dependents::count),
            education: CodeTable::from_fn(|education| u8::from(education == Education::Graduate)),
            self_employed: CodeTable::from_fn(yes_no),
            property_area: CodeTable::from_fn(|area| match area {
                PropertyArea::Urban => 2,
                PropertyArea::Semiurban => 1,
                PropertyArea::Rural => 0,
            }),
        }
    }

    /// Codes taken from the label encoders fitted at training time.
    pub fn from_fitted(encoders: &CategoryEncoders) -> Result<Self, EncodingError> {
        Ok(Self {
            gender: CodeTable::from_fitted(columns::GENDER, encoders)?,
            married: CodeTable::from_fitted(columns::MARRIED, encoders)?,
            dependents: CodeTable::from_fitted(columns::DEPENDENTS, encoders)?,
            education: CodeTable::from_fitted(columns::EDUCATION, encoders)?,
            self_employed: CodeTable::from_fitted(columns::SELF_EMPLOYED, encoders)?,
            property_area: CodeTable::from_fitted(columns::PROPERTY_AREA, encoders)?,
        })
    }

    /// Slots where `self` (read as the fixed table) and `fitted` disagree.
    pub fn divergences(&self, fitted: &FeatureEncoder) -> Vec<EncodingDivergence> {
        let mut out = Vec::new();
        self.gender.divergences(&fitted.gender, columns::GENDER, &mut out);
        self.married.divergences(&fitted.married, columns::MARRIED, &mut out);
        self.dependents.divergences(&fitted.dependents, columns::DEPENDENTS, &mut out);
        self.education.divergences(&fitted.education, columns::EDUCATION, &mut out);
        self.self_employed.divergences(&fitted.self_employed, columns::SELF_EMPLOYED, &mut out);
        self.property_area.divergences(&fitted.property_area, columns::PROPERTY_AREA, &mut out);
        out
    }

    pub fn encode(&self, record: &ApplicantRecord) -> EncodedFeatureVector {
        EncodedFeatureVector([
            self.gender.code(record.gender),
            self.married.code(record.married),
            self.dependents.code(record.dependents),
            self.education.code(record.education),
            self.self_employed.code(record.self_employed),
            record.applicant_income,
            record.coapplicant_income,
            record.loan_amount,
            record.loan_term_months,
            f64::from(record.credit_history),
            self.property_area.code(record.property_area),
        ])
    }
}
