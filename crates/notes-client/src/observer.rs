//! Reacts to the HTTP client's auth signals.
//!
//! The client only reports that the server rejected the token. The observer
//! turns each report into a session teardown and a redirect to the login
//! route, keeping the transport ignorant of sessions and navigation.

use std::sync::Arc;

use crate::client::{AuthSignal, AuthSignals};
use crate::routes::Route;
use crate::session::SessionHandle;
use crate::storage::SharedStorage;

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Route);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate(&self, to: Route) {
        (**self).navigate(to)
    }
}

/// Tears the session down whenever the server rejects the token.
pub struct SessionObserver<N> {
    signals: AuthSignals,
    session: SessionHandle,
    storage: SharedStorage,
    navigator: N,
}

impl<N: Navigator> SessionObserver<N> {
    pub fn new(
        signals: AuthSignals,
        session: SessionHandle,
        storage: SharedStorage,
        navigator: N,
    ) -> Self {
        Self {
            signals,
            session,
            storage,
            navigator,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Apply one signal.
    pub fn handle(&self, signal: AuthSignal) {
        match signal {
            AuthSignal::Unauthorized => {
                tracing::warn!("Session rejected, logging out");
                self.session.tear_down(&self.storage);
                self.navigator.navigate(Route::Login);
            }
        }
    }

    /// Apply every signal already queued; returns how many there were.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.signals.try_recv() {
            self.handle(signal);
            handled += 1;
        }
        handled
    }

    /// Apply signals as they arrive until every client is dropped.
    pub async fn run(mut self) {
        while let Some(signal) = self.signals.recv().await {
            self.handle(signal);
        }
        tracing::debug!("Auth signal channel closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use crate::testing::scripted_client;
    use notes_core::Note;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, to: Route) {
            self.visits.lock().unwrap().push(to);
        }
    }

    impl RecordingNavigator {
        fn visits(&self) -> Vec<Route> {
            self.visits.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn unauthorized_response_logs_out_and_redirects_once() {
        let (transport, api, signals) = scripted_client(Some("stale"));
        transport.push_json(401, serde_json::json!({ "message": "jwt expired" }));
        let session = SessionManager::restore(api.clone());
        let mut observer = SessionObserver::new(
            signals,
            session.handle(),
            api.storage().clone(),
            RecordingNavigator::default(),
        );

        let err = api.get::<Vec<Note>>("/notes").await.unwrap_err();
        assert!(err.is_unauthenticated());

        assert_eq!(observer.drain(), 1);
        assert_eq!(api.storage().token(), None);
        assert!(!session.is_authenticated());
        assert_eq!(observer.navigator().visits(), vec![Route::Login]);

        assert_eq!(observer.drain(), 0);
        assert_eq!(observer.navigator().visits().len(), 1);
    }

    #[tokio::test]
    async fn each_rejected_response_redirects() {
        let (transport, api, signals) = scripted_client(Some("stale"));
        transport.push_status(401);
        transport.push_status(401);
        let session = SessionManager::restore(api.clone());
        let mut observer = SessionObserver::new(
            signals,
            session.handle(),
            api.storage().clone(),
            RecordingNavigator::default(),
        );

        // Both calls leave before the observer runs, so both carry the token.
        api.get::<Vec<Note>>("/notes").await.unwrap_err();
        api.get::<Vec<Note>>("/notes/n-1").await.unwrap_err();

        assert_eq!(observer.drain(), 2);
        assert_eq!(observer.navigator().visits(), vec![Route::Login, Route::Login]);
    }

    #[tokio::test]
    async fn rejection_after_teardown_does_not_redirect() {
        let (transport, api, signals) = scripted_client(Some("stale"));
        transport.push_status(401);
        let session = SessionManager::restore(api.clone());
        let mut observer = SessionObserver::new(
            signals,
            session.handle(),
            api.storage().clone(),
            RecordingNavigator::default(),
        );

        api.get::<Vec<Note>>("/notes").await.unwrap_err();
        assert_eq!(observer.drain(), 1);

        // The next call goes out without a token; a 401 now is a plain failure.
        transport.push_status(401);
        let err = api.get::<Vec<Note>>("/notes").await.unwrap_err();
        assert!(!err.is_unauthenticated());
        assert_eq!(observer.drain(), 0);
        assert_eq!(transport.last_request().unwrap().bearer, None);
        assert_eq!(observer.navigator().visits(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn run_stops_when_clients_are_gone() {
        let (transport, api, signals) = scripted_client(Some("stale"));
        transport.push_status(401);
        let session = SessionManager::restore(api.clone());
        let handle = session.handle();
        let observer = SessionObserver::new(
            signals,
            handle.clone(),
            api.storage().clone(),
            RecordingNavigator::default(),
        );

        api.get::<Vec<Note>>("/notes").await.unwrap_err();
        drop(session);
        drop(api);

        observer.run().await;
        assert!(!handle.is_authenticated());
    }
}
