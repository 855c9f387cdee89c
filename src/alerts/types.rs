//! Alert entity and request shapes

use crate::sentiment::SentimentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which sentiment value an alert watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Positive,
    Negative,
    Overall,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Positive => "positive",
            AlertType::Negative => "negative",
            AlertType::Overall => "overall",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(AlertType::Positive),
            "negative" => Some(AlertType::Negative),
            "overall" => Some(AlertType::Overall),
            _ => None,
        }
    }

    /// Read the watched value from a record
    pub fn value_of(&self, record: &SentimentRecord) -> f64 {
        match self {
            AlertType::Positive => record.positive,
            AlertType::Negative => record.negative,
            AlertType::Overall => record.overall,
        }
    }
}

/// Comparison direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "above" => Some(AlertCondition::Above),
            "below" => Some(AlertCondition::Below),
            _ => None,
        }
    }
}

/// Persisted alert (row of the `alerts` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub coin_id: String,
    pub coin_name: String,
    pub alert_type: AlertType,
    pub condition: AlertCondition,
    pub threshold: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/alerts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAlert {
    pub coin_id: String,
    pub coin_name: String,
    pub alert_type: AlertType,
    pub condition: AlertCondition,
    pub threshold: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Body of `PUT /api/alerts/{id}`; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertUpdate {
    pub coin_id: Option<String>,
    pub coin_name: Option<String>,
    pub alert_type: Option<AlertType>,
    pub condition: Option<AlertCondition>,
    pub threshold: Option<f64>,
    pub enabled: Option<bool>,
}

impl AlertUpdate {
    pub fn apply(self, alert: &mut Alert) {
        if let Some(coin_id) = self.coin_id {
            alert.coin_id = coin_id;
        }
        if let Some(coin_name) = self.coin_name {
            alert.coin_name = coin_name;
        }
        if let Some(alert_type) = self.alert_type {
            alert.alert_type = alert_type;
        }
        if let Some(condition) = self.condition {
            alert.condition = condition;
        }
        if let Some(threshold) = self.threshold {
            alert.threshold = threshold;
        }
        if let Some(enabled) = self.enabled {
            alert.enabled = enabled;
        }
    }
}

/// Check request bodies before they reach the store
pub fn validate_threshold(threshold: f64) -> Result<(), String> {
    if threshold.is_finite() {
        Ok(())
    } else {
        Err("threshold must be a finite number".to_string())
    }
}
