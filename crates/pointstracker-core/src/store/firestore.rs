//! Firestore backend over the REST API.
//!
//! The state lives in the document
//! `artifacts/{app_id}/public/data/point-state/shared`. A save replaces the
//! whole document; a notification merges its payload fields into the same
//! document, where a cloud function picks it up.
//!
//! Firestore wraps every value in a typed envelope (`stringValue`,
//! `integerValue`, `mapValue`, ...). [`encode_value`] and [`decode_value`]
//! convert between that and plain JSON.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Map, Value};
use url::Url;

use super::StateRepository;
use crate::error::{NotifyError, StoreError};
use crate::notify::{NotificationPayload, Notifier};
use crate::state::{AppState, StateDocument};
use crate::storage::FirestoreConfig;

const BACKEND: &str = "firestore";

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    document_url: Url,
    api_key: String,
    id_token: String,
    http_client: Client,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let not_configured = |message: String| StoreError::NotConfigured {
            backend: BACKEND,
            message,
        };
        if config.project_id.trim().is_empty() {
            return Err(not_configured("firestore.project_id is empty".into()));
        }
        let raw = format!(
            "{}/v1/projects/{}/databases/(default)/documents/artifacts/{}/public/data/point-state/shared",
            config.endpoint.trim_end_matches('/'),
            config.project_id,
            config.app_id,
        );
        let document_url =
            Url::parse(&raw).map_err(|e| not_configured(format!("invalid URL '{raw}': {e}")))?;

        Ok(Self {
            document_url,
            api_key: config.api_key.clone(),
            id_token: config.id_token.clone(),
            http_client: Client::new(),
        })
    }

    pub fn document_url(&self) -> &Url {
        &self.document_url
    }

    fn authorize(&self, mut req: RequestBuilder) -> RequestBuilder {
        if !self.api_key.is_empty() {
            req = req.query(&[("key", self.api_key.as_str())]);
        }
        if !self.id_token.is_empty() {
            req = req.bearer_auth(&self.id_token);
        }
        req
    }

    /// PATCH the document. With a field mask only those fields are merged;
    /// without one the document is replaced.
    async fn patch(&self, fields: Value, mask: Option<&[&str]>) -> Result<(), StoreError> {
        let mut req = self.http_client.patch(self.document_url.clone());
        if let Some(mask) = mask {
            let pairs: Vec<(&str, &str)> =
                mask.iter().map(|f| ("updateMask.fieldPaths", *f)).collect();
            req = req.query(&pairs);
        }
        let resp = self
            .authorize(req)
            .json(&json!({ "fields": fields }))
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

fn request_failed(source: reqwest::Error) -> StoreError {
    StoreError::Request {
        backend: BACKEND,
        source,
    }
}

/// Plain JSON -> Firestore value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode the top-level fields of a document.
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Firestore value -> plain JSON.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let malformed = || StoreError::Malformed(format!("unsupported Firestore value: {value}"));
    let obj = value.as_object().ok_or_else(malformed)?;
    let (kind, inner) = obj.iter().next().ok_or_else(malformed)?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" => Ok(inner.clone()),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| StoreError::Malformed(format!("bad integerValue '{s}'"))),
            Value::Number(_) => Ok(inner.clone()),
            _ => Err(malformed()),
        },
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => decode_fields(fields),
            None => Ok(Value::Object(Map::new())),
        },
        _ => Err(malformed()),
    }
}

/// Decode a `fields` object into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Result<Value, StoreError> {
    let map = fields
        .as_object()
        .ok_or_else(|| StoreError::Malformed("Firestore fields is not an object".into()))?;
    map.iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect::<Result<Map<String, Value>, StoreError>>()
        .map(Value::Object)
}

fn encode_object<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(encode_fields(&map)),
        Ok(other) => Err(StoreError::Malformed(format!("expected an object, got {other}"))),
        Err(e) => Err(StoreError::Malformed(e.to_string())),
    }
}

impl StateRepository for FirestoreStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        tracing::debug!(url = %self.document_url, "fetching Firestore document");
        let resp = self
            .authorize(self.http_client.get(self.document_url.clone()))
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

        let doc: Value =
            serde_json::from_str(&body).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let plain = match doc.get("fields") {
            Some(fields) => decode_fields(fields)?,
            None => Value::Object(Map::new()),
        };
        serde_json::from_value(plain)
            .map(Some)
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        tracing::debug!(url = %self.document_url, "replacing Firestore document");
        self.patch(encode_object(state)?, None).await
    }
}

impl Notifier for FirestoreStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let mask = [
            "notificationTriggerTimestamp",
            "notificationMessage",
            "notifications",
        ];
        self.patch(encode_object(payload)?, Some(&mask[..])).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FirestoreConfig {
        FirestoreConfig {
            project_id: "family-points".into(),
            ..Default::default()
        }
    }

    #[test]
    fn document_url_points_at_shared_state() {
        let store = FirestoreStore::new(&config()).unwrap();
        assert_eq!(
            store.document_url().as_str(),
            "https://firestore.googleapis.com/v1/projects/family-points/databases/(default)/documents/artifacts/default-app-id/public/data/point-state/shared"
        );
    }

    #[test]
    fn missing_project_is_not_configured() {
        let err = FirestoreStore::new(&FirestoreConfig::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured { backend: "firestore", .. }));
    }

    #[test]
    fn encode_wraps_typed_values() {
        let encoded = encode_value(&json!({"n": 42, "s": "x", "list": [true, null]}));
        assert_eq!(
            encoded,
            json!({"mapValue": {"fields": {
                "n": {"integerValue": "42"},
                "s": {"stringValue": "x"},
                "list": {"arrayValue": {"values": [{"booleanValue": true}, {"nullValue": null}]}}
            }}})
        );
    }

    #[test]
    fn decode_reverses_encode_for_state() {
        let state = AppState::defaults(["Lila", "Maryn"]);
        let plain = serde_json::to_value(&state).unwrap();
        let encoded = encode_object(&state).unwrap();
        assert_eq!(decode_fields(&encoded).unwrap(), plain);
    }

    #[test]
    fn decode_handles_empty_array_and_map() {
        assert_eq!(decode_value(&json!({"arrayValue": {}})).unwrap(), json!([]));
        assert_eq!(decode_value(&json!({"mapValue": {}})).unwrap(), json!({}));
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        assert!(decode_value(&json!({"geoPointValue": {}})).is_err());
        assert!(decode_value(&json!({"integerValue": "x"})).is_err());
    }
}
