//! # Sentiment Alerts
//!
//! User-defined thresholds on positive / negative / overall sentiment.
//!
//! ## Module Organization
//!
//! - `types` - `Alert` entity plus create/update request bodies
//! - `store` - `AlertRepository` trait and SQLite implementation
//! - `evaluation` - threshold crossing and cooldown
//!
//! ## Schema Reference
//!
//! - `alerts` → `Alert` (see `sql/01_alerts.sql`)

pub mod types;
pub mod store;
pub mod evaluation;

pub use types::{Alert, AlertCondition, AlertType, AlertUpdate, NewAlert};
pub use store::{AlertRepository, AlertStoreError, SqliteAlertRepository};
pub use evaluation::{threshold_crossed, AlertCooldown, TriggeredAlert};
