//! The shared state document.
//!
//! [`AppState`] is persisted as one JSON document with the keys `scores`,
//! `currentPin`, `adminPassHash`, `notifications`, `changeHistory` and
//! `pinThreshold`. Every write sends the complete document.
//!
//! Stores hand back a [`StateDocument`], where every field is optional;
//! [`AppState::from_document`] fills the gaps with the documented defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::history::ChangeHistory;

/// SHA-256 of "123".
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
pub const DEFAULT_PIN: &str = "1234";
pub const DEFAULT_THRESHOLD: u32 = 10;
/// Number of recipient slots in the admin panel.
pub const NOTIFICATION_SLOTS: usize = 5;
pub const DEFAULT_COUNTERS: [&str; 2] = ["Lila", "Maryn"];

/// One SMS recipient slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub phone: String,
    /// Carrier name from the gateway directory, or a custom domain.
    #[serde(default)]
    pub carrier: String,
}

impl NotificationConfig {
    pub fn new(phone: impl Into<String>, carrier: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            carrier: carrier.into(),
        }
    }

    /// Both phone and carrier are set.
    pub fn is_complete(&self) -> bool {
        !self.phone.is_empty() && !self.carrier.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_empty() && self.carrier.is_empty()
    }
}

/// Five empty recipient slots.
pub fn empty_slots() -> Vec<NotificationConfig> {
    vec![NotificationConfig::default(); NOTIFICATION_SLOTS]
}

/// Full application state, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub scores: BTreeMap<String, i64>,
    pub current_pin: String,
    pub admin_pass_hash: String,
    pub notifications: Vec<NotificationConfig>,
    pub change_history: ChangeHistory,
    pub pin_threshold: u32,
}

/// A state document as read from a store. Absent fields mean "use default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    #[serde(default)]
    pub scores: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub current_pin: Option<String>,
    #[serde(default)]
    pub admin_pass_hash: Option<String>,
    #[serde(default)]
    pub notifications: Option<Vec<NotificationConfig>>,
    #[serde(default)]
    pub change_history: Option<ChangeHistory>,
    #[serde(default)]
    pub pin_threshold: Option<i64>,
}

impl AppState {
    /// Hardcoded defaults for the given counters.
    pub fn defaults<I, S>(counters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = counters.into_iter().map(Into::into).collect();
        Self {
            scores: names.iter().map(|c| (c.clone(), 0)).collect(),
            current_pin: DEFAULT_PIN.to_string(),
            admin_pass_hash: DEFAULT_ADMIN_PASSWORD_HASH.to_string(),
            notifications: empty_slots(),
            change_history: ChangeHistory::for_counters(names),
            pin_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Build a complete state from a possibly partial document.
    pub fn from_document<I, S>(doc: StateDocument, counters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = counters.into_iter().map(Into::into).collect();

        let mut scores = doc.scores.unwrap_or_default();
        let mut change_history = doc.change_history.unwrap_or_default();
        for name in &names {
            scores.entry(name.clone()).or_insert(0);
            change_history.ensure_counter(name);
        }

        let mut notifications = doc.notifications.unwrap_or_default();
        notifications.resize(NOTIFICATION_SLOTS, NotificationConfig::default());

        Self {
            scores,
            current_pin: doc
                .current_pin
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PIN.to_string()),
            admin_pass_hash: doc
                .admin_pass_hash
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD_HASH.to_string()),
            notifications,
            change_history,
            pin_threshold: doc
                .pin_threshold
                .filter(|t| *t >= 1)
                .and_then(|t| u32::try_from(t).ok())
                .unwrap_or(DEFAULT_THRESHOLD),
        }
    }

    pub fn score(&self, counter: &str) -> Option<i64> {
        self.scores.get(counter).copied()
    }

    /// Case-insensitive lookup of a counter name.
    pub fn resolve_counter(&self, name: &str) -> Option<&str> {
        self.scores
            .keys()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Recipients with both phone and carrier set.
    pub fn recipients(&self) -> Vec<NotificationConfig> {
        self.notifications
            .iter()
            .filter(|n| n.is_complete())
            .cloned()
            .collect()
    }
}

impl From<AppState> for StateDocument {
    fn from(state: AppState) -> Self {
        Self {
            scores: Some(state.scores),
            current_pin: Some(state.current_pin),
            admin_pass_hash: Some(state.admin_pass_hash),
            notifications: Some(state.notifications),
            change_history: Some(state.change_history),
            pin_threshold: Some(i64::from(state.pin_threshold)),
        }
    }
}
