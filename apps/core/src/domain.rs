use serde::{Deserialize, Serialize};

/// Visual weight of a notification banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    /// Bootstrap contextual alert class; errors use the `danger` style.
    pub const fn alert_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
            Self::Info => "alert-info",
            Self::Warning => "alert-warning",
        }
    }

    /// Accepts both the severity names and the Bootstrap spelling `danger`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "success" => Some(Self::Success),
            "error" | "danger" => Some(Self::Error),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Lenient form for page scripts: unknown names become `Info`.
    pub fn parse_or_info(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            log::warn!("unknown severity `{value}`, using info");
            Self::Info
        })
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Info => "Info",
            Self::Warning => "Warning",
        }
    }
}

/// Bounds of a demo random walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub start: f64,
    pub min: f64,
    pub max: f64,
    pub volatility: f64,
}

/// Metrics tracked on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    RiskScore,
    BloodPressure,
    Glucose,
    WeightGain,
    FetalHeartRate,
}

impl Metric {
    pub const ALL: [Self; 5] = [
        Self::RiskScore,
        Self::BloodPressure,
        Self::Glucose,
        Self::WeightGain,
        Self::FetalHeartRate,
    ];

    pub const fn params(self) -> WalkParams {
        let (start, min, max, volatility) = match self {
            Self::RiskScore => (25.0, 10.0, 40.0, 8.0),
            Self::BloodPressure => (125.0, 110.0, 140.0, 5.0),
            Self::Glucose => (95.0, 70.0, 120.0, 10.0),
            Self::WeightGain => (2.0, 0.0, 5.0, 1.0),
            Self::FetalHeartRate => (140.0, 120.0, 160.0, 5.0),
        };
        WalkParams {
            start,
            min,
            max,
            volatility,
        }
    }

    /// Field name in the page-embedded data object
    pub const fn key(self) -> &'static str {
        match self {
            Self::RiskScore => "riskScores",
            Self::BloodPressure => "bloodPressure",
            Self::Glucose => "glucoseLevels",
            Self::WeightGain => "weightGain",
            Self::FetalHeartRate => "fetalHeartRate",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RiskScore => "Risk Score",
            Self::BloodPressure => "Blood Pressure (Systolic)",
            Self::Glucose => "Glucose (mg/dL)",
            Self::WeightGain => "Weight Gain (kg)",
            Self::FetalHeartRate => "Fetal Heart Rate (bpm)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_is_an_alias_for_error() {
        assert_eq!(Severity::parse("danger"), Some(Severity::Error));
        assert_eq!(Severity::parse(" Error "), Some(Severity::Error));
        assert_eq!(Severity::Error.alert_class(), "alert-danger");
        assert_eq!(Severity::parse("primary"), None);
    }

    #[test]
    fn unknown_severity_falls_back_to_info() {
        assert_eq!(Severity::parse_or_info("primary"), Severity::Info);
        assert_eq!(Severity::parse_or_info(""), Severity::Info);
        assert_eq!(Severity::parse_or_info("danger"), Severity::Error);
        assert_eq!(Severity::parse_or_info("warning"), Severity::Warning);
    }

    #[test]
    fn walk_bounds_contain_their_start() {
        for metric in Metric::ALL {
            let params = metric.params();
            assert!(params.min <= params.start && params.start <= params.max, "{metric:?}");
        }
    }
}
