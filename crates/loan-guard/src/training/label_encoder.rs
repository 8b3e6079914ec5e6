use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Maps the distinct strings of one column to `0..n` in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn code_of(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    pub fn class_of(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn transform<'a, I>(&self, values: I) -> Result<Vec<usize>, UnseenLabel>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .map(|value| {
                self.code_of(value).ok_or_else(|| UnseenLabel {
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("label '{value}' was not seen when the encoder was fitted")]
pub struct UnseenLabel {
    pub value: String,
}

/// Fitted encoders keyed by dataset column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoders {
    columns: BTreeMap<String, LabelEncoder>,
}

impl CategoryEncoders {
    pub fn insert(&mut self, column: &str, encoder: LabelEncoder) {
        self.columns.insert(column.to_string(), encoder);
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sorted_label_order() {
        let encoder = LabelEncoder::fit(["Urban", "Rural", "Semiurban", "Urban", "Rural"]);
        assert_eq!(encoder.classes(), ["Rural", "Semiurban", "Urban"]);
        assert_eq!(encoder.code_of("Rural"), Some(0));
        assert_eq!(encoder.code_of("Urban"), Some(2));
        assert_eq!(encoder.class_of(1), Some("Semiurban"));
    }

    #[test]
    fn education_sorts_graduate_first() {
        let encoder = LabelEncoder::fit(["Not Graduate", "Graduate"]);
        assert_eq!(encoder.code_of("Graduate"), Some(0));
        assert_eq!(encoder.code_of("Not Graduate"), Some(1));
    }

    #[test]
    fn transform_reports_unseen_labels() {
        let encoder = LabelEncoder::fit(["0", "1", "2", "3+"]);
        assert_eq!(encoder.transform(["3+", "0"]), Ok(vec![3, 0]));

        let error = encoder.transform(["4"]).expect_err("unseen label");
        assert_eq!(error.value, "4");
    }
}
