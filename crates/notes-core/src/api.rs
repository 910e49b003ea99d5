//! Request and response bodies of the notes REST API.

use serde::{Deserialize, Serialize};

use crate::types::User;

// ============================================================================
// Authentication
// ============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response of login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /auth/reset-password/{token}`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Body of `POST /auth/update-profile`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub avatar: Option<String>,
}

/// Response of `GET /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

// ============================================================================
// Notes
// ============================================================================

/// Body of `POST /notes`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// Response of `GET /notes/{id}/link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    #[serde(alias = "url", alias = "shareLink")]
    pub link: String,
}

// ============================================================================
// Errors
// ============================================================================

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field, possibly prefixed with its request location
    /// (`body.`, `query.` or `params.`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Field name without the request-location prefix.
    #[must_use]
    pub fn field_name(&self) -> &str {
        ["body.", "query.", "params."]
            .iter()
            .find_map(|prefix| self.field.strip_prefix(prefix))
            .unwrap_or(&self.field)
    }
}

/// Error body returned by the server on non-2xx responses.
///
/// Every field is optional: the server sends either a validation list, a
/// single message, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_prefix_is_stripped() {
        let cases = [
            ("body.email", "email"),
            ("query.page", "page"),
            ("params.id", "id"),
            ("title", "title"),
            ("headers.x", "headers.x"),
        ];
        for (field, expected) in cases {
            let err = ValidationError {
                field: field.to_string(),
                message: "bad".to_string(),
            };
            assert_eq!(err.field_name(), expected);
        }
    }

    #[test]
    fn only_leading_prefix_is_stripped() {
        let err = ValidationError {
            field: "body.body.title".to_string(),
            message: "bad".to_string(),
        };
        assert_eq!(err.field_name(), "body.title");
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body, ApiErrorBody::default());

        let body: ApiErrorBody =
            serde_json::from_str(r#"{"status":"fail","message":"Note not found"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Note not found"));
        assert!(body.errors.is_empty());
    }

    #[test]
    fn share_link_accepts_aliases() {
        let link: ShareLink = serde_json::from_str(r#"{"url":"https://n.example/ada/notes/x"}"#).unwrap();
        assert_eq!(link.link, "https://n.example/ada/notes/x");
    }
}
