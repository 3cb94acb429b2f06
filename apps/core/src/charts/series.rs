use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Metric;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("series `{series}` has {actual} samples but there are {expected} labels")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Labelled series embedded in a page, or produced by the demo generator.
///
/// Every present series has exactly one sample per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_scores: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose_levels: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_gain: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetal_heart_rate: Option<Vec<f64>>,
}

impl DashboardData {
    pub fn series(&self, metric: Metric) -> Option<&[f64]> {
        let series = match metric {
            Metric::RiskScore => &self.risk_scores,
            Metric::BloodPressure => &self.blood_pressure,
            Metric::Glucose => &self.glucose_levels,
            Metric::WeightGain => &self.weight_gain,
            Metric::FetalHeartRate => &self.fetal_heart_rate,
        };
        series.as_deref()
    }

    pub fn set_series(&mut self, metric: Metric, values: Vec<f64>) {
        let slot = match metric {
            Metric::RiskScore => &mut self.risk_scores,
            Metric::BloodPressure => &mut self.blood_pressure,
            Metric::Glucose => &mut self.glucose_levels,
            Metric::WeightGain => &mut self.weight_gain,
            Metric::FetalHeartRate => &mut self.fetal_heart_rate,
        };
        *slot = Some(values);
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let expected = self.labels.len();
        for metric in Metric::ALL {
            if let Some(values) = self.series(metric) {
                if values.len() != expected {
                    return Err(DataError::LengthMismatch {
                        series: metric.key(),
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Bar input built from one named metric; `None` if the page omitted it.
    pub fn bar_series(&self, metric: Metric) -> Option<BarSeries> {
        self.series(metric).map(|values| BarSeries {
            labels: self.labels.clone(),
            values: values.to_vec(),
        })
    }
}

/// Input of a bar chart: labels and the values drawn against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarSeries {
    pub fn validate(&self) -> Result<(), DataError> {
        if self.values.len() == self.labels.len() {
            Ok(())
        } else {
            Err(DataError::LengthMismatch {
                series: "values",
                expected: self.labels.len(),
                actual: self.values.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_embedded_contract() {
        let data: DashboardData = serde_json::from_str(
            r#"{"labels":["Week 4","Week 8"],"riskScores":[20,31],"glucoseLevels":[90,101]}"#,
        )
        .unwrap();

        assert_eq!(data.series(Metric::RiskScore).unwrap(), [20.0, 31.0]);
        assert_eq!(data.series(Metric::Glucose).unwrap(), [90.0, 101.0]);
        assert!(data.blood_pressure.is_none());
        assert_eq!(data.validate(), Ok(()));
    }

    #[test]
    fn rejects_ragged_series() {
        let data = DashboardData {
            labels: vec!["Week 4".into(), "Week 8".into()],
            blood_pressure: Some(vec![120.0]),
            ..DashboardData::default()
        };

        assert_eq!(
            data.validate(),
            Err(DataError::LengthMismatch {
                series: "bloodPressure",
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn bar_series_follows_the_named_metric() {
        let mut data = DashboardData {
            labels: vec!["a".into(), "b".into(), "c".into()],
            ..DashboardData::default()
        };
        data.set_series(Metric::FetalHeartRate, vec![1.0, 2.0, 3.0]);
        data.set_series(Metric::RiskScore, vec![9.0, 9.0, 9.0]);

        let bars = data.bar_series(Metric::FetalHeartRate).unwrap();
        assert_eq!(bars.values, vec![1.0, 2.0, 3.0]);
        assert!(data.bar_series(Metric::WeightGain).is_none());
    }
}
