use serde::{Deserialize, Serialize};

/// Per-column standardization with population statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit on row-major data. Columns with zero variance keep a scale of 1.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(Vec::len).unwrap_or_default();
        if rows.is_empty() {
            return Self {
                means: Vec::new(),
                scales: Vec::new(),
            };
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; n_features];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut variances = vec![0.0; n_features];
        for row in rows {
            for ((variance, mean), value) in variances.iter_mut().zip(&means).zip(row) {
                let delta = value - mean;
                *variance += delta * delta;
            }
        }

        let scales = variances
            .into_iter()
            .map(|variance| {
                let std = (variance / n).sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Self { means, scales }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Caller guarantees `row.len() == self.n_features()`.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }
}
