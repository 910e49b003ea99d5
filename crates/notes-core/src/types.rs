//! Core data types for the notes client.
//!
//! These mirror the JSON documents exchanged with the notes API:
//!
//! - [`User`]: an account as returned by `/auth/me`, login and registration
//! - [`Note`]: a private note owned by the authenticated user
//! - [`PublicNote`]: a published note as seen by any visitor
//! - [`NoteUpdate`]: a partial note used for edits
//!
//! Field names follow the server's camelCase convention. Timestamps are
//! parsed into [`chrono::DateTime<Utc>`] on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Server-assigned identifier of a note (the `_id` field on the wire).
///
/// The value is opaque to the client; it is only ever compared and echoed back
/// in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    /// Creates a NoteId from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Server-assigned identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Account role.
///
/// Roles the client does not know about deserialize to [`Role::Unknown`] so a
/// server-side addition never breaks login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Avatar reference (URL or server-side key); `null` when unset.
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ============================================================================
// Notes
// ============================================================================

/// A note owned by the authenticated user.
///
/// `slug` is assigned by the server the first time the note is published and
/// is kept when the note is unpublished again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub owner: UserId,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A published note as served to any visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicNote {
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub owner: UserId,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A partial note used to edit an existing note.
///
/// Carries every [`Note`] field as optional so a caller can pass back a note
/// it already holds. Only the mutable fields (`title`, `content`, `is_public`)
/// ever reach the server; see [`NoteUpdate::to_patch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub id: Option<NoteId>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub owner: Option<UserId>,
    pub is_public: Option<bool>,
    pub slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoteUpdate {
    /// Creates an update targeting the note with the given id.
    #[must_use]
    pub fn for_note(id: impl Into<NoteId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the new title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the new content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the publish flag.
    #[must_use]
    pub fn is_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    /// Builds the outgoing PATCH body, dropping id, owner, slug and timestamps.
    #[must_use]
    pub fn to_patch(&self) -> NotePatch {
        NotePatch {
            title: self.title.clone(),
            content: self.content.clone(),
            is_public: self.is_public,
        }
    }
}

impl From<NoteId> for NoteUpdate {
    fn from(id: NoteId) -> Self {
        Self::for_note(id)
    }
}

impl From<&Note> for NoteUpdate {
    fn from(note: &Note) -> Self {
        Self {
            id: Some(note.id.clone()),
            title: Some(note.title.clone()),
            content: Some(note.content.clone()),
            owner: Some(note.owner.clone()),
            is_public: Some(note.is_public),
            slug: note.slug.clone(),
            created_at: Some(note.created_at),
            updated_at: Some(note.updated_at),
        }
    }
}

/// Body of `PATCH /notes/{id}`: only the fields a client may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

// ============================================================================
// Tests
// ============================================================================
