//! REST state API: the whole document behind one URL.
//!
//! `GET {base_url}{state_path}` returns the document, `POST` replaces it.

use reqwest::{Client, StatusCode};
use url::Url;

use super::StateRepository;
use crate::error::StoreError;
use crate::state::{AppState, StateDocument};
use crate::storage::RestConfig;

const BACKEND: &str = "rest";

/// Join a base URL and an absolute path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, StoreError> {
    Url::parse(base_url)
        .and_then(|base| base.join(path))
        .map_err(|e| StoreError::NotConfigured {
            backend: BACKEND,
            message: format!("invalid URL '{base_url}{path}': {e}"),
        })
}

#[derive(Debug, Clone)]
pub struct RestStore {
    state_url: Url,
    http_client: Client,
}

impl RestStore {
    pub fn new(config: &RestConfig) -> Result<Self, StoreError> {
        Ok(Self {
            state_url: endpoint(&config.base_url, &config.state_path)?,
            http_client: Client::new(),
        })
    }
}

fn request_failed(source: reqwest::Error) -> StoreError {
    StoreError::Request {
        backend: BACKEND,
        source,
    }
}

impl StateRepository for RestStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        tracing::debug!(url = %self.state_url, "fetching state");
        let resp = self
            .http_client
            .get(self.state_url.clone())
            .send()
            .await
            .map_err(request_failed)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = resp.text().await.map_err(request_failed)?;
        if !status.is_success() {
            return Err(StoreError::Status {
                backend: BACKEND,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<Option<StateDocument>>(&body)
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        tracing::debug!(url = %self.state_url, "saving state");
        let resp = self
            .http_client
            .post(self.state_url.clone())
            .json(state)
            .send()
            .await
            .map_err(request_failed)?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(StoreError::Status {
                backend: BACKEND,
                status: status.as_u16(),
                body,
            })
        }
    }
}
