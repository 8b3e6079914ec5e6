use clap::Args;
use loan_guard::screening::{
    ApplicantRecord, Dependents, Education, Gender, PropertyArea, YesNo,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Applicant fields as command-line flags. Amounts are in thousands.
#[derive(Args, Debug, Clone)]
pub(crate) struct RecordArgs {
    #[arg(long, default_value = "Male")]
    pub(crate) gender: Gender,
    #[arg(long, default_value = "Yes")]
    pub(crate) married: YesNo,
    /// One of 0, 1, 2, 3+
    #[arg(long, default_value = "0")]
    pub(crate) dependents: Dependents,
    #[arg(long, default_value = "Graduate")]
    pub(crate) education: Education,
    #[arg(long, default_value = "No")]
    pub(crate) self_employed: YesNo,
    /// Applicant income in thousands
    #[arg(long)]
    pub(crate) applicant_income: f64,
    /// Co-applicant income in thousands
    #[arg(long, default_value_t = 0.0)]
    pub(crate) coapplicant_income: f64,
    /// Requested loan amount in thousands
    #[arg(long)]
    pub(crate) loan_amount: f64,
    #[arg(long, default_value_t = 360.0)]
    pub(crate) loan_term_months: f64,
    /// 1 for a clean repayment record, 0 otherwise
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub(crate) credit_history: u8,
    #[arg(long, default_value = "Urban")]
    pub(crate) property_area: PropertyArea,
}

impl RecordArgs {
    pub(crate) fn into_record(self) -> ApplicantRecord {
        ApplicantRecord {
            gender: self.gender,
            married: self.married,
            dependents: self.dependents,
            education: self.education,
            self_employed: self.self_employed,
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_term_months: self.loan_term_months,
            credit_history: self.credit_history,
            property_area: self.property_area,
        }
    }
}
