//! HTTP client shared by every store.
//!
//! Wraps a [`Transport`] with the concerns common to all calls: bearer-token
//! injection from the persisted session, JSON encoding and decoding, error
//! body parsing, and 401 detection. A 401 on a call that carried a token is
//! reported on the [`AuthSignal`] channel; reacting to it (logout, redirect)
//! is the [`SessionObserver`](crate::observer::SessionObserver)'s job.

use std::sync::Arc;

use http::{Method, StatusCode};
use notes_core::{ApiErrorBody, ValidationError};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::SharedStorage;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Session-level events raised by the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// The server answered 401 to an authenticated request.
    Unauthorized,
}

/// Receiving end of the [`AuthSignal`] channel.
pub type AuthSignals = mpsc::UnboundedReceiver<AuthSignal>;

/// JSON API client over a [`Transport`].
pub struct ApiClient<T> {
    transport: Arc<T>,
    storage: SharedStorage,
    signals: mpsc::UnboundedSender<AuthSignal>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            storage: Arc::clone(&self.storage),
            signals: self.signals.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl ApiClient<HttpTransport> {
    /// Build a client for the configured API URL.
    pub fn from_config(
        config: &ClientConfig,
        storage: SharedStorage,
    ) -> ClientResult<(Self, AuthSignals)> {
        let transport = HttpTransport::new(&config.api_url)?;
        Ok(Self::new(Arc::new(transport), storage))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client and the receiver for its auth signals.
    pub fn new(transport: Arc<T>, storage: SharedStorage) -> (Self, AuthSignals) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            transport,
            storage,
            signals: tx,
        };
        (client, rx)
    }

    /// The persisted session slot the client reads tokens from.
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// GET `path` and decode the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        let response = self.execute(Method::GET, path, None).await?;
        decode(&response)
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        decode(&response)
    }

    /// POST without a body and decode the JSON response.
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        let response = self.execute(Method::POST, path, None).await?;
        decode(&response)
    }

    /// POST a JSON body to `path`, ignoring any response body.
    pub async fn post_void<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// PATCH a JSON body to `path` and decode the JSON response.
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PATCH, path, Some(body)).await?;
        decode(&response)
    }

    /// DELETE `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<ApiResponse> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: self.storage.token(),
            body,
        };
        let authenticated = request.is_authenticated();

        tracing::debug!(method = %request.method, path = %request.path, authenticated, "Sending request");

        let response = self.transport.send(request).await?;
        let status = response.status;

        if status.is_success() {
            return Ok(response);
        }

        let body = parse_error_body(&response.body);

        if status == StatusCode::UNAUTHORIZED && authenticated {
            tracing::warn!(path = %path, "Session rejected by server");
            // The observer may already be gone (e.g. at shutdown).
            let _ = self.signals.send(AuthSignal::Unauthorized);
            return Err(ClientError::Unauthenticated { body });
        }

        tracing::debug!(path = %path, status = %status, "Request failed");
        Err(ClientError::Api { status, body })
    }
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> ClientResult<R> {
    Ok(serde_json::from_slice(&response.body)?)
}

/// Read an error body field by field, so one off-shape field does not hide
/// the others. Validation entries that don't parse are skipped.
fn parse_error_body(bytes: &[u8]) -> Option<ApiErrorBody> {
    if bytes.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_slice(bytes).ok()?;
    let fields = value.as_object()?;

    let status = fields.get("status").and_then(|status| match status {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    let errors = fields
        .get("errors")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| ValidationError::deserialize(entry).ok())
                .collect()
        })
        .unwrap_or_default();

    Some(ApiErrorBody {
        status,
        message,
        errors,
    })
}
