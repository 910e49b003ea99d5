//! Read-only access to other users' published notes.

use notes_core::PublicNote;

use crate::client::ApiClient;
use crate::error::{ClientError, StoreError, StoreResult};
use crate::transport::{Transport, encode_segment};

#[derive(Debug)]
pub struct PublicNotesStore<T> {
    api: ApiClient<T>,
    notes: Vec<PublicNote>,
    current: Option<PublicNote>,
    loading: bool,
    error: Option<String>,
}

impl<T: Transport> PublicNotesStore<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            notes: Vec::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    pub fn notes(&self) -> &[PublicNote] {
        &self.notes
    }

    pub fn current(&self) -> Option<&PublicNote> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local list with `username`'s published notes.
    pub async fn fetch_user_notes(&mut self, username: &str) -> StoreResult<&[PublicNote]> {
        self.error = None;
        self.loading = true;
        let result = self
            .api
            .get::<Vec<PublicNote>>(&format!("/{}/notes", encode_segment(username)))
            .await;
        self.loading = false;

        match result {
            Ok(notes) => {
                self.notes = notes;
                Ok(&self.notes)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch public notes")),
        }
    }

    /// Fetch one published note; slugs are unique per user, not globally.
    pub async fn fetch_by_slug(&mut self, username: &str, slug: &str) -> StoreResult<PublicNote> {
        self.error = None;
        self.loading = true;
        let result = self
            .api
            .get::<PublicNote>(&format!(
                "/{}/notes/{}",
                encode_segment(username),
                encode_segment(slug)
            ))
            .await;
        self.loading = false;

        match result {
            Ok(note) => {
                self.current = Some(note.clone());
                Ok(note)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch note")),
        }
    }

    fn fail(&mut self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::new(source, fallback);
        self.error = Some(err.message.clone());
        err
    }
}
