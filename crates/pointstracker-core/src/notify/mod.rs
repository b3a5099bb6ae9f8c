//! Email-to-SMS notifications for large point changes.
//!
//! The dispatcher only decides *whether* to notify and builds the payload;
//! turning `phone + carrier` into a text message is the delivery service's job.

pub mod log;
pub mod rest;

pub use log::LogNotifier;
pub use rest::RestNotifier;

use serde::{Deserialize, Serialize};

use crate::carriers;
use crate::error::NotifyError;
use crate::state::NotificationConfig;

/// Changes of at least this magnitude notify recipients.
pub const NOTIFY_MIN_AMOUNT: u64 = 10;

/// Body sent to the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "notificationTriggerTimestamp")]
    pub dispatch_timestamp: i64,
    #[serde(rename = "notificationMessage")]
    pub message: String,
    #[serde(rename = "notifications")]
    pub recipients: Vec<NotificationConfig>,
}

impl NotificationPayload {
    /// Gateway email addresses, for logging.
    pub fn gateway_addresses(&self) -> Vec<String> {
        self.recipients
            .iter()
            .map(|r| carriers::gateway_address(&r.phone, &r.carrier))
            .collect()
    }
}

/// What happened to the notification for an applied change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Change was below the notification amount.
    NotRequired,
    /// No recipient has both phone and carrier; nothing was sent.
    NoRecipients,
    Sent { recipients: usize },
    /// The channel only logged the alert; no message left this machine.
    Logged { recipients: usize },
    /// Delivery failed; the score change stands.
    Failed { reason: String },
}

/// A delivery collaborator.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// False for channels that only record the alert locally.
    fn delivers(&self) -> bool {
        true
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), NotifyError>;
}

pub fn should_notify(amount: i64) -> bool {
    amount.unsigned_abs() >= NOTIFY_MIN_AMOUNT
}

/// "The Lila counter was increased by 15 points."
pub fn format_message(counter: &str, amount: i64) -> String {
    let direction = if amount > 0 { "increased" } else { "decreased" };
    format!(
        "The {counter} counter was {direction} by {} points.",
        amount.unsigned_abs()
    )
}

/// Payload for a change, or `None` when no notification should go out.
pub fn build_payload(
    counter: &str,
    amount: i64,
    slots: &[NotificationConfig],
    now_ms: i64,
) -> Option<NotificationPayload> {
    if !should_notify(amount) {
        return None;
    }
    let recipients: Vec<NotificationConfig> =
        slots.iter().filter(|n| n.is_complete()).cloned().collect();
    if recipients.is_empty() {
        return None;
    }
    Some(NotificationPayload {
        dispatch_timestamp: now_ms,
        message: format_message(counter, amount),
        recipients,
    })
}

/// Notify for an applied change. Never fails; failures are reported in the status.
pub async fn dispatch_change<N: Notifier>(
    notifier: &N,
    counter: &str,
    amount: i64,
    slots: &[NotificationConfig],
    now_ms: i64,
) -> NotificationStatus {
    if !should_notify(amount) {
        return NotificationStatus::NotRequired;
    }
    let Some(payload) = build_payload(counter, amount, slots, now_ms) else {
        tracing::warn!("No valid recipients configured. Skipping notification call.");
        return NotificationStatus::NoRecipients;
    };

    match notifier.dispatch(&payload).await {
        Ok(()) => {
            let recipients = payload.recipients.len();
            if !notifier.delivers() {
                return NotificationStatus::Logged { recipients };
            }
            tracing::info!(
                notifier = notifier.name(),
                recipients = %payload.gateway_addresses().join(", "),
                "notification sent"
            );
            NotificationStatus::Sent { recipients }
        }
        Err(e) => {
            tracing::warn!(notifier = notifier.name(), error = %e, "notification failed");
            NotificationStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}
