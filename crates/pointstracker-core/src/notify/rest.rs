//! REST alert endpoint: the server turns the payload into gateway emails.

use reqwest::Client;
use url::Url;

use super::{NotificationPayload, Notifier};
use crate::error::{NotifyError, StoreError};
use crate::storage::RestConfig;
use crate::store::rest::endpoint;

#[derive(Debug, Clone)]
pub struct RestNotifier {
    notify_url: Url,
    http_client: Client,
}

impl RestNotifier {
    pub fn new(config: &RestConfig) -> Result<Self, StoreError> {
        Ok(Self {
            notify_url: endpoint(&config.base_url, &config.notify_path)?,
            http_client: Client::new(),
        })
    }
}

impl Notifier for RestNotifier {
    fn name(&self) -> &str {
        "rest"
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let resp = self
            .http_client
            .post(self.notify_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
