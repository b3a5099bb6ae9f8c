//! Notifier for the local backend: nothing is delivered, the alert is logged.

use super::{NotificationPayload, Notifier};
use crate::error::NotifyError;

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn delivers(&self) -> bool {
        false
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        tracing::info!(
            message = %payload.message,
            to = %payload.gateway_addresses().join(", "),
            "email-to-text alert (local backend, not delivered)"
        );
        Ok(())
    }
}
