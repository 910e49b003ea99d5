//! notes-client: session and data stores for the notes service
//!
//! This crate provides:
//! - A JSON HTTP client with bearer-token injection and 401 detection
//! - Session management (login, signup, logout, profile) with a persisted slot
//! - A store for the user's own notes, with local-collection bookkeeping
//! - Read-only stores for public notes and the admin user list
//! - Error normalization into one display string per failure
//! - A route guard and a session observer reacting to rejected tokens
//!
//! # Architecture
//!
//! Every store is an explicitly constructed value holding its own state and a
//! clone of one [`ApiClient`]. The client is generic over a [`Transport`], so
//! tests swap the network for a scripted one.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notes_client::{ApiClient, ClientConfig, FileStorage, NotesStore, SessionManager};
//!
//! let config = ClientConfig::from_env()?;
//! let storage = Arc::new(FileStorage::new(&config.session_file));
//! let (api, signals) = ApiClient::from_config(&config, storage)?;
//!
//! let mut session = SessionManager::restore(api.clone());
//! session.login("ada@example.com", "secret").await?;
//!
//! let mut notes = NotesStore::new(api);
//! notes.create("Groceries", "milk, eggs").await?;
//! ```

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod notes;
pub mod observer;
pub mod public_notes;
pub mod routes;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::AdminStore;
pub use client::{ApiClient, AuthSignal, AuthSignals};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult, StoreError, StoreResult, extract_error_message};
pub use notes::NotesStore;
pub use observer::{Navigator, SessionObserver};
pub use public_notes::PublicNotesStore;
pub use routes::{Navigation, Route, RouteGuard};
pub use session::{SessionHandle, SessionManager, SessionState};
pub use storage::{FileStorage, MemoryStorage, PersistedSession, SessionStorage, SharedStorage};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, encode_segment};

// Re-export the shared types for downstream crates
pub use notes_core;
