//! Threshold crossing checks for alerts
//!
//! An alert fires only when its watched value crosses the threshold between
//! two consecutive samples, not while it merely stays beyond it. A fired
//! alert is muted for `cooldown` so repeated checks do not spam the caller.

use super::types::{Alert, AlertCondition};
use crate::sentiment::SentimentRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_COOLDOWN_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    pub alert: Alert,
    pub previous_value: f64,
    pub current_value: f64,
    pub triggered_at: DateTime<Utc>,
    pub message: String,
}

pub fn threshold_crossed(previous: f64, current: f64, threshold: f64, condition: AlertCondition) -> bool {
    match condition {
        AlertCondition::Above => previous <= threshold && current > threshold,
        AlertCondition::Below => previous >= threshold && current < threshold,
    }
}

fn describe(alert: &Alert, current_value: f64) -> String {
    let unit = match alert.alert_type {
        super::types::AlertType::Overall => "",
        _ => "%",
    };
    format!(
        "{} {} sentiment is now {}{} ({} {}{})",
        alert.coin_name,
        alert.alert_type.as_str(),
        current_value,
        unit,
        alert.condition.as_str(),
        alert.threshold,
        unit
    )
}

/// Remembers when each alert last fired
#[derive(Debug, Clone)]
pub struct AlertCooldown {
    window: Duration,
    last_fired: HashMap<String, DateTime<Utc>>,
}

impl Default for AlertCooldown {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_COOLDOWN_SECS))
    }
}

impl AlertCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    /// Key changes when threshold or condition is edited, re-arming the alert
    fn key(alert: &Alert) -> String {
        format!("{}-{}-{}", alert.id, alert.threshold, alert.condition.as_str())
    }

    fn is_muted(&self, alert: &Alert, now: DateTime<Utc>) -> bool {
        self.last_fired
            .get(&Self::key(alert))
            .is_some_and(|fired| now - *fired < self.window)
    }

    fn record(&mut self, alert: &Alert, now: DateTime<Utc>) {
        self.last_fired.insert(Self::key(alert), now);
    }

    /// Drop entries whose cooldown has elapsed
    fn prune(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.last_fired.retain(|_, fired| now - *fired < window);
    }

    /// Check enabled alerts against the latest two samples
    pub fn evaluate(
        &mut self,
        alerts: &[Alert],
        previous: &SentimentRecord,
        current: &SentimentRecord,
        now: DateTime<Utc>,
    ) -> Vec<TriggeredAlert> {
        self.prune(now);

        let mut triggered = Vec::new();
        for alert in alerts.iter().filter(|a| a.enabled) {
            let previous_value = alert.alert_type.value_of(previous);
            let current_value = alert.alert_type.value_of(current);

            if !threshold_crossed(previous_value, current_value, alert.threshold, alert.condition) {
                continue;
            }
            if self.is_muted(alert, now) {
                log::debug!("Alert {} crossed but is cooling down", alert.id);
                continue;
            }

            self.record(alert, now);
            log::info!("🔔 Alert {} triggered: {}", alert.id, describe(alert, current_value));
            triggered.push(TriggeredAlert {
                alert: alert.clone(),
                previous_value,
                current_value,
                triggered_at: now,
                message: describe(alert, current_value),
            });
        }

        triggered
    }
}
