//! Test support: a scripted transport and sample documents.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use http::StatusCode;
use notes_core::{Note, User};

use crate::client::{ApiClient, AuthSignals};
use crate::error::{ClientError, ClientResult};
use crate::storage::{MemoryStorage, PersistedSession, SharedStorage};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Transport that replays queued responses and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ClientResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, status: u16, body: Vec<u8>) {
        let status = StatusCode::from_u16(status).unwrap();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, serde_json::to_vec(&body).unwrap());
    }

    pub fn push_status(&self, status: u16) {
        self.push_raw(status, Vec::new());
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Transport(message.to_string())));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".to_string())))
    }
}

/// A client over a fresh scripted transport, with `token` pre-persisted.
pub fn scripted_client(
    token: Option<&str>,
) -> (Arc<ScriptedTransport>, ApiClient<ScriptedTransport>, AuthSignals) {
    let storage: SharedStorage = match token {
        Some(token) => Arc::new(MemoryStorage::with_session(PersistedSession::for_user(
            sample_user("u-1", "ada"),
            token.to_string(),
        ))),
        None => Arc::new(MemoryStorage::new()),
    };
    let transport = Arc::new(ScriptedTransport::new());
    let (client, signals) = ApiClient::new(Arc::clone(&transport), storage);
    (transport, client, signals)
}

pub fn user_json(id: &str, username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": "user",
        "avatar": null,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn sample_user(id: &str, username: &str) -> User {
    serde_json::from_value(user_json(id, username)).unwrap()
}

pub fn note_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "title": title,
        "content": format!("content of {title}"),
        "owner": "u-1",
        "isPublic": false,
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z"
    })
}

pub fn sample_note(id: &str, title: &str) -> Note {
    serde_json::from_value(note_json(id, title)).unwrap()
}
