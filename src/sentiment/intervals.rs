//! Time range labels and their sampling intervals

use super::types::IntervalSpec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Day1
    }
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hour1 => "1h",
            TimeRange::Hour6 => "6h",
            TimeRange::Day1 => "1d",
            TimeRange::Week1 => "1w",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(TimeRange::Hour1),
            "6h" => Some(TimeRange::Hour6),
            "1d" => Some(TimeRange::Day1),
            "1w" => Some(TimeRange::Week1),
            _ => None,
        }
    }

    /// Resolve any label; unknown labels fall back to `1d`
    pub fn resolve(label: &str) -> Self {
        Self::from_str(label.trim()).unwrap_or_default()
    }

    pub fn interval(&self) -> IntervalSpec {
        match self {
            TimeRange::Hour1 => IntervalSpec { sample_count: 60, spacing_secs: 60 },
            TimeRange::Hour6 => IntervalSpec { sample_count: 72, spacing_secs: 5 * 60 },
            TimeRange::Day1 => IntervalSpec { sample_count: 24, spacing_secs: 60 * 60 },
            TimeRange::Week1 => IntervalSpec { sample_count: 168, spacing_secs: 60 * 60 },
        }
    }

    pub fn all() -> [TimeRange; 4] {
        [
            TimeRange::Hour1,
            TimeRange::Hour6,
            TimeRange::Day1,
            TimeRange::Week1,
        ]
    }
}
