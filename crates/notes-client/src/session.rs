//! Session manager: who is logged in, with which token.
//!
//! The in-memory session lives behind a [`SessionHandle`] so that the
//! [`SessionObserver`](crate::observer::SessionObserver) can tear it down when
//! the server rejects the token. Authentication is a presence check on the
//! token; validity is only learned from the next authenticated call.

use std::sync::{Arc, PoisonError, RwLock};

use notes_core::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, User,
};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult, StoreError, StoreResult};
use crate::storage::{PersistedSession, SharedStorage};
use crate::transport::{Transport, encode_segment};

/// The in-memory session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared, cloneable handle on the in-memory session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<RwLock<SessionState>>);

impl SessionHandle {
    pub fn new(state: SessionState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    pub(crate) fn replace(&self, state: SessionState) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.0.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Drop the in-memory session and everything persisted about it.
    pub(crate) fn tear_down(&self, storage: &SharedStorage) {
        self.replace(SessionState::default());
        if let Err(e) = storage.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }
}

/// Owns the current user and bearer token.
#[derive(Debug)]
pub struct SessionManager<T> {
    api: ApiClient<T>,
    state: SessionHandle,
    error: Option<String>,
}

impl<T: Transport> SessionManager<T> {
    /// Restore the session persisted in the client's storage, if any.
    pub fn restore(api: ApiClient<T>) -> Self {
        let persisted = api.storage().load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable persisted session");
            PersistedSession::default()
        });

        let state = SessionState {
            user: persisted.user,
            token: persisted.token,
        };
        if state.is_authenticated() {
            tracing::debug!("Restored persisted session");
        }

        Self {
            api,
            state: SessionHandle::new(state),
            error: None,
        }
    }

    /// Handle for observers and route guards.
    pub fn handle(&self) -> SessionHandle {
        self.state.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.snapshot().user
    }

    pub fn token(&self) -> Option<String> {
        self.state.snapshot().token
    }

    /// Message of the last failed operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> StoreResult<User> {
        self.error = None;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let result = self.api.post::<_, AuthResponse>("/auth/login", &request).await;
        match result.and_then(|response| self.establish(response)) {
            Ok(user) => Ok(user),
            Err(e) => Err(self.fail(e, "Login failed")),
        }
    }

    /// Register a new account and log in as it.
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> StoreResult<User> {
        self.error = None;
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let result = self
            .api
            .post::<_, AuthResponse>("/auth/register", &request)
            .await;
        match result.and_then(|response| self.establish(response)) {
            Ok(user) => Ok(user),
            Err(e) => Err(self.fail(e, "Registration failed")),
        }
    }

    /// Forget the session, in memory and on disk.
    pub fn logout(&mut self) {
        self.state.tear_down(self.api.storage());
        tracing::info!("Logged out");
    }

    /// Refresh the current user from the server.
    ///
    /// Does nothing without a token. Any failure logs the session out, so a
    /// rejected token never leaves the session looking authenticated.
    pub async fn fetch_current_profile(&mut self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }

        match self.api.get::<User>("/auth/me").await {
            Ok(user) => {
                self.state.update(|s| s.user = Some(user.clone()));
                self.merge_persisted(|p| {
                    p.username = Some(user.username.clone());
                    p.user = Some(user.clone());
                });
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load current user, logging out");
                self.logout();
                None
            }
        }
    }

    /// Change username and avatar.
    ///
    /// Only those two fields are patched into the held user; everything else
    /// stays as last received from the server.
    pub async fn update_profile(&mut self, username: &str, avatar: Option<&str>) -> StoreResult<()> {
        self.error = None;
        let request = UpdateProfileRequest {
            username: username.to_string(),
            avatar: avatar.map(str::to_string),
        };

        if let Err(e) = self.api.post_void("/auth/update-profile", &request).await {
            return Err(self.fail(e, "Failed to update profile"));
        }

        let patch = |user: &mut User| {
            user.username = request.username.clone();
            user.avatar = request.avatar.clone();
        };
        self.state.update(|s| {
            if let Some(user) = s.user.as_mut() {
                patch(user);
            }
        });
        self.merge_persisted(|p| {
            if let Some(user) = p.user.as_mut() {
                patch(user);
            }
            p.username = Some(request.username.clone());
        });
        Ok(())
    }

    /// Delete the account on the server.
    ///
    /// The local session is left as is; callers log out afterwards.
    pub async fn delete_account(&mut self) -> StoreResult<()> {
        self.error = None;
        match self.api.delete("/auth/delete").await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e, "Failed to delete account")),
        }
    }

    /// Ask the server to email a password-reset link.
    pub async fn forgot_password(&mut self, email: &str) -> StoreResult<()> {
        self.error = None;
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        match self.api.post_void("/auth/forgot-password", &request).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e, "Failed to send reset email")),
        }
    }

    /// Set a new password using the token from a reset email.
    pub async fn reset_password(&mut self, reset_token: &str, password: &str) -> StoreResult<()> {
        self.error = None;
        let request = ResetPasswordRequest {
            password: password.to_string(),
        };
        let path = format!("/auth/reset-password/{}", encode_segment(reset_token));
        match self.api.post_void(&path, &request).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e, "Failed to reset password")),
        }
    }

    /// Persist a fresh login, replacing whatever was stored before.
    fn establish(&self, response: AuthResponse) -> ClientResult<User> {
        let AuthResponse { user, token } = response;
        let storage = self.api.storage();

        storage.clear()?;
        storage.save(&PersistedSession::for_user(user.clone(), token.clone()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "Logged in");
        self.state.replace(SessionState {
            user: Some(user.clone()),
            token: Some(token),
        });
        Ok(user)
    }

    fn merge_persisted(&self, f: impl FnOnce(&mut PersistedSession)) {
        let storage = self.api.storage();
        let result = storage.load().and_then(|mut persisted| {
            f(&mut persisted);
            storage.save(&persisted)
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to update persisted session");
        }
    }

    fn fail(&mut self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::new(source, fallback);
        self.error = Some(err.message.clone());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scripted_client, user_json};
    use http::Method;

    fn auth_json(id: &str, username: &str, token: &str) -> serde_json::Value {
        serde_json::json!({ "user": user_json(id, username), "token": token })
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_json(200, auth_json("u-7", "grace", "tok-7"));
        let mut session = SessionManager::restore(api.clone());
        assert!(!session.is_authenticated());

        let user = session.login("grace@example.com", "hunter2").await.unwrap();

        assert_eq!(user.username, "grace");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-7"));

        let persisted = api.storage().load().unwrap();
        assert_eq!(persisted.token.as_deref(), Some("tok-7"));
        assert_eq!(persisted.username.as_deref(), Some("grace"));
        assert_eq!(persisted.user.unwrap().id.as_str(), "u-7");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/auth/login");
        assert_eq!(
            request.body.unwrap(),
            serde_json::json!({ "email": "grace@example.com", "password": "hunter2" })
        );
    }

    #[tokio::test]
    async fn login_replaces_previous_account() {
        let (transport, api, _signals) = scripted_client(Some("old-token"));
        transport.push_json(200, auth_json("u-9", "linus", "new-token"));
        let mut session = SessionManager::restore(api.clone());
        assert_eq!(session.user().unwrap().username, "ada");

        session.login("linus@example.com", "pw").await.unwrap();

        let persisted = api.storage().load().unwrap();
        assert_eq!(persisted.token.as_deref(), Some("new-token"));
        assert_eq!(persisted.username.as_deref(), Some("linus"));
        assert_eq!(session.user().unwrap().username, "linus");
    }

    #[tokio::test]
    async fn failed_login_reports_server_message() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_json(401, serde_json::json!({ "message": "Invalid email or password" }));
        let mut session = SessionManager::restore(api);

        let err = session.login("a@b.c", "wrong").await.unwrap_err();

        assert_eq!(err.message, "Invalid email or password");
        assert_eq!(session.error(), Some("Invalid email or password"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn signup_validation_errors_are_normalized() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_json(
            400,
            serde_json::json!({
                "status": "fail",
                "errors": [
                    { "field": "body.username", "message": "already taken" },
                    { "field": "body.password", "message": "too short" }
                ]
            }),
        );
        let mut session = SessionManager::restore(api);

        let err = session.signup("ada", "ada@example.com", "x").await.unwrap_err();

        assert_eq!(err.message, "username: already taken, password: too short");
        assert_eq!(transport.last_request().unwrap().path, "/auth/register");
    }

    #[tokio::test]
    async fn signup_without_body_uses_fallback() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_status(500);
        let mut session = SessionManager::restore(api);

        let err = session.signup("ada", "ada@example.com", "pw").await.unwrap_err();
        assert_eq!(err.message, "Registration failed");
    }

    #[tokio::test]
    async fn logout_always_clears() {
        let (_transport, api, _signals) = scripted_client(Some("tok"));
        let mut session = SessionManager::restore(api.clone());
        assert!(session.is_authenticated());

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert!(api.storage().load().unwrap().is_empty());

        // Logging out twice is harmless.
        session.logout();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn fetch_profile_without_token_makes_no_call() {
        let (transport, api, _signals) = scripted_client(None);
        let mut session = SessionManager::restore(api);

        assert_eq!(session.fetch_current_profile().await, None);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn fetch_profile_refreshes_user() {
        let (transport, api, _signals) = scripted_client(Some("tok"));
        let mut fresh = user_json("u-1", "ada_l");
        fresh["role"] = serde_json::json!("admin");
        transport.push_json(200, fresh);
        let mut session = SessionManager::restore(api.clone());

        let user = session.fetch_current_profile().await.unwrap();

        assert!(user.is_admin());
        assert_eq!(session.user().unwrap().username, "ada_l");
        let persisted = api.storage().load().unwrap();
        assert_eq!(persisted.username.as_deref(), Some("ada_l"));
        assert_eq!(persisted.token.as_deref(), Some("tok"));
        assert_eq!(transport.last_request().unwrap().path, "/auth/me");
    }

    #[tokio::test]
    async fn fetch_profile_failure_logs_out() {
        let (transport, api, _signals) = scripted_client(Some("tok"));
        transport.push_failure("connection reset");
        let mut session = SessionManager::restore(api.clone());

        assert_eq!(session.fetch_current_profile().await, None);
        assert!(!session.is_authenticated());
        assert!(api.storage().load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_profile_patches_only_changed_fields() {
        let (transport, api, _signals) = scripted_client(Some("tok"));
        transport.push_status(200);
        let mut session = SessionManager::restore(api.clone());
        let before = session.user().unwrap();

        session
            .update_profile("ada2", Some("avatars/ada.png"))
            .await
            .unwrap();

        let after = session.user().unwrap();
        assert_eq!(after.username, "ada2");
        assert_eq!(after.avatar.as_deref(), Some("avatars/ada.png"));
        assert_eq!(after.email, before.email);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(session.token().as_deref(), Some("tok"));

        let persisted = api.storage().load().unwrap();
        assert_eq!(persisted.username.as_deref(), Some("ada2"));
        assert_eq!(persisted.user.unwrap().avatar.as_deref(), Some("avatars/ada.png"));

        assert_eq!(
            transport.last_request().unwrap().body.unwrap(),
            serde_json::json!({ "username": "ada2", "avatar": "avatars/ada.png" })
        );
    }

    #[tokio::test]
    async fn update_profile_failure_leaves_user() {
        let (transport, api, _signals) = scripted_client(Some("tok"));
        transport.push_json(409, serde_json::json!({ "message": "Username taken" }));
        let mut session = SessionManager::restore(api);

        let err = session.update_profile("bob", None).await.unwrap_err();
        assert_eq!(err.message, "Username taken");
        assert_eq!(session.user().unwrap().username, "ada");
    }

    #[tokio::test]
    async fn delete_account_keeps_session() {
        let (transport, api, _signals) = scripted_client(Some("tok"));
        transport.push_status(204);
        let mut session = SessionManager::restore(api);

        session.delete_account().await.unwrap();

        assert!(session.is_authenticated());
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/auth/delete");
    }

    #[tokio::test]
    async fn password_reset_flow_paths() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_status(200);
        transport.push_status(200);
        let mut session = SessionManager::restore(api);

        session.forgot_password("ada@example.com").await.unwrap();
        session.reset_password("r3set", "new-pass").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/auth/forgot-password");
        assert_eq!(requests[1].path, "/auth/reset-password/r3set");
        assert_eq!(
            requests[1].body.clone().unwrap(),
            serde_json::json!({ "password": "new-pass" })
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn reset_token_cannot_leave_its_segment() {
        let (transport, api, _signals) = scripted_client(None);
        transport.push_status(200);
        let mut session = SessionManager::restore(api);

        session.reset_password("abc/def?x=1", "pw").await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().path,
            "/auth/reset-password/abc%2Fdef%3Fx%3D1"
        );
    }
}
