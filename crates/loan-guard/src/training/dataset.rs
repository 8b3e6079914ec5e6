use std::io::Read;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::screening::domain::columns;

/// Header names the loan CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    columns::LOAN_ID,
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
    columns::LOAN_STATUS,
];

/// A row with every field present. The identifier column is not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRow {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_amount_term: f64,
    pub credit_history: f64,
    pub property_area: String,
    pub loan_status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanDataset {
    pub rows: Vec<LoanRow>,
    pub rows_read: usize,
}

impl LoanDataset {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows.len()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let pick: fn(&LoanRow) -> &str = match name {
            columns::GENDER => |row| row.gender.as_str(),
            columns::MARRIED => |row| row.married.as_str(),
            columns::DEPENDENTS => |row| row.dependents.as_str(),
            columns::EDUCATION => |row| row.education.as_str(),
            columns::SELF_EMPLOYED => |row| row.self_employed.as_str(),
            columns::PROPERTY_AREA => |row| row.property_area.as_str(),
            columns::LOAN_STATUS => |row| row.loan_status.as_str(),
            _ => return None,
        };
        Some(self.rows.iter().map(pick).collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid loan CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("loan CSV is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
}

/// Read the loan CSV, dropping every row with an empty or NA-marked cell.
pub fn read_dataset<R: Read>(reader: R) -> Result<LoanDataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::Schema { missing });
    }

    let mut rows = Vec::new();
    let mut rows_read = 0;
    for record in csv_reader.deserialize::<RawLoanRow>() {
        let raw = record?;
        rows_read += 1;
        if let Some(row) = raw.complete() {
            rows.push(row);
        }
    }

    Ok(LoanDataset { rows, rows_read })
}

#[derive(Debug, Deserialize)]
struct RawLoanRow {
    #[serde(rename = "Gender", default, deserialize_with = "text_or_missing")]
    gender: Option<String>,
    #[serde(rename = "Married", default, deserialize_with = "text_or_missing")]
    married: Option<String>,
    #[serde(rename = "Dependents", default, deserialize_with = "text_or_missing")]
    dependents: Option<String>,
    #[serde(rename = "Education", default, deserialize_with = "text_or_missing")]
    education: Option<String>,
    #[serde(
        rename = "Self_Employed",
        default,
        deserialize_with = "text_or_missing"
    )]
    self_employed: Option<String>,
    #[serde(rename = "ApplicantIncome", default, deserialize_with = "number_or_missing")]
    applicant_income: Option<f64>,
    #[serde(rename = "CoapplicantIncome", default, deserialize_with = "number_or_missing")]
    coapplicant_income: Option<f64>,
    #[serde(rename = "LoanAmount", default, deserialize_with = "number_or_missing")]
    loan_amount: Option<f64>,
    #[serde(rename = "Loan_Amount_Term", default, deserialize_with = "number_or_missing")]
    loan_amount_term: Option<f64>,
    #[serde(rename = "Credit_History", default, deserialize_with = "number_or_missing")]
    credit_history: Option<f64>,
    #[serde(
        rename = "Property_Area",
        default,
        deserialize_with = "text_or_missing"
    )]
    property_area: Option<String>,
    #[serde(
        rename = "Loan_Status",
        default,
        deserialize_with = "text_or_missing"
    )]
    loan_status: Option<String>,
}

impl RawLoanRow {
    fn complete(self) -> Option<LoanRow> {
        Some(LoanRow {
            gender: self.gender?,
            married: self.married?,
            dependents: self.dependents?,
            education: self.education?,
            self_employed: self.self_employed?,
            applicant_income: self.applicant_income?,
            coapplicant_income: self.coapplicant_income?,
            loan_amount: self.loan_amount?,
            loan_amount_term: self.loan_amount_term?,
            credit_history: self.credit_history?,
            property_area: self.property_area?,
            loan_status: self.loan_status?,
        })
    }
}

/// Cell spellings that pandas reads as NA, compared case-insensitively.
const MISSING_MARKERS: [&str; 17] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| marker.eq_ignore_ascii_case(cell))
}

fn text_or_missing<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !is_missing(value)))
}

fn number_or_missing<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = text_or_missing(deserializer)? else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| D::Error::custom(format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(D::Error::custom(format!("'{raw}' is not a finite number")));
    }
    Ok(Some(value))
}
