use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::NotificationStatus;

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A change was committed, directly or after PIN approval.
    PointsApplied {
        counter: String,
        amount: i64,
        score: i64,
        approved_with_pin: bool,
        notification: NotificationStatus,
        at: DateTime<Utc>,
    },
    /// The change would push the window over the threshold.
    ChallengeRaised {
        counter: String,
        amount: i64,
        cumulative: u64,
        threshold: u32,
        at: DateTime<Utc>,
    },
    /// Wrong PIN; the pending change is kept.
    PinRejected {
        counter: String,
        amount: i64,
        message: String,
    },
    ChallengeCancelled {
        counter: String,
        amount: i64,
    },
    /// Carries the current PIN to prefill the PIN editor.
    AdminLoggedIn {
        current_pin: String,
    },
    AdminLoggedOut,
    SettingsUpdated {
        setting: Setting,
        message: String,
    },
}

/// Which admin setting changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    Pin,
    AdminPassword,
    Threshold,
    Notifications,
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
