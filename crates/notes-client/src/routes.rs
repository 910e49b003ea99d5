//! Navigation targets and the guard that gates them on the session.

use std::fmt;

use notes_core::NoteId;

use crate::session::SessionHandle;

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Notes,
    Note(NoteId),
    Login,
    Signup,
    ForgotPassword,
    ResetPassword(String),
    PublicNotes { username: String },
    PublicNote { username: String, slug: String },
    Admin,
}

impl Route {
    /// Route only reachable with a session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Notes | Self::Note(_) | Self::Admin)
    }

    /// Route only reachable without a session.
    pub fn requires_guest(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Signup | Self::ForgotPassword | Self::ResetPassword(_)
        )
    }

    /// Stable route name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Notes => "notes",
            Self::Note(_) => "note",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::ForgotPassword => "forgot-password",
            Self::ResetPassword(_) => "reset-password",
            Self::PublicNotes { .. } => "public-notes",
            Self::PublicNote { .. } => "public-note",
            Self::Admin => "admin",
        }
    }

    /// URL path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Notes => "/notes".to_string(),
            Self::Note(id) => format!("/notes/{id}"),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword(token) => format!("/reset-password/{token}"),
            Self::PublicNotes { username } => format!("/{username}/notes"),
            Self::PublicNote { username, slug } => format!("/{username}/notes/{slug}"),
            Self::Admin => "/admin".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

/// Allows or redirects navigation based on the session's authenticated flag.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionHandle,
}

impl RouteGuard {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn check(&self, to: &Route) -> Navigation {
        let authenticated = self.session.is_authenticated();

        if to.requires_auth() && !authenticated {
            tracing::debug!(route = to.name(), "Guest redirected to login");
            Navigation::Redirect(Route::Login)
        } else if to.requires_guest() && authenticated {
            tracing::debug!(route = to.name(), "Signed-in user redirected to notes");
            Navigation::Redirect(Route::Notes)
        } else {
            Navigation::Allow
        }
    }
}
