//! Notes store: the authenticated user's own notes.
//!
//! Every operation makes exactly one request. On success the local
//! collection is patched to match the server's answer; on failure nothing but
//! the `error` field changes and the failure is returned to the caller.
//!
//! Local patch rules:
//! - `fetch_all` replaces the collection in server order
//! - `create` prepends the new note
//! - `update` and `toggle_publish` replace the matching entry in place, and
//!   leave the collection alone when the note is not held locally
//! - `delete` removes the entry
//!
//! The current selection is independent of the collection: no operation
//! except `fetch_one` and the selection helpers touches it.

use notes_core::{CreateNoteRequest, Note, NoteId, NoteUpdate, ShareLink};

use crate::client::ApiClient;
use crate::error::{ClientError, StoreError, StoreResult};
use crate::transport::{Transport, encode_segment};

#[derive(Debug)]
pub struct NotesStore<T> {
    api: ApiClient<T>,
    notes: Vec<Note>,
    current: Option<Note>,
    loading: bool,
    error: Option<String>,
}

impl<T: Transport> NotesStore<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            notes: Vec::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    /// Local collection, in display order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current(&self) -> Option<&Note> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, note: Note) {
        self.current = Some(note);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Replace the collection with the server's list.
    pub async fn fetch_all(&mut self) -> StoreResult<&[Note]> {
        self.error = None;
        self.loading = true;
        let result = self.api.get::<Vec<Note>>("/notes").await;
        self.loading = false;

        match result {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "Fetched notes");
                self.notes = notes;
                Ok(&self.notes)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch notes")),
        }
    }

    /// Fetch one note and make it the current selection.
    pub async fn fetch_one(&mut self, id: &NoteId) -> StoreResult<Note> {
        self.error = None;
        match self.api.get::<Note>(&note_path(id)).await {
            Ok(note) => {
                self.current = Some(note.clone());
                Ok(note)
            }
            Err(e) => Err(self.fail(e, "Failed to fetch note")),
        }
    }

    /// Create a note and put it at the front of the collection.
    pub async fn create(&mut self, title: &str, content: &str) -> StoreResult<Note> {
        self.error = None;
        let request = CreateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
        };

        match self.api.post::<_, Note>("/notes", &request).await {
            Ok(note) => {
                self.notes.insert(0, note.clone());
                Ok(note)
            }
            Err(e) => Err(self.fail(e, "Failed to create note")),
        }
    }

    /// Send the mutable fields of `update` and apply the server's answer.
    ///
    /// Fails without a request when `update` carries no id.
    pub async fn update(&mut self, update: NoteUpdate) -> StoreResult<Note> {
        self.error = None;
        let Some(id) = update.id.as_ref() else {
            return Err(self.fail(ClientError::MissingNoteId, "Failed to update note"));
        };

        let path = note_path(id);
        match self.api.patch::<_, Note>(&path, &update.to_patch()).await {
            Ok(note) => {
                self.replace_in_place(&note);
                Ok(note)
            }
            Err(e) => Err(self.fail(e, "Failed to update note")),
        }
    }

    /// Flip the publish flag; the server assigns a slug on first publish.
    pub async fn toggle_publish(&mut self, id: &NoteId) -> StoreResult<Note> {
        self.error = None;
        let path = format!("{}/toggle-publish", note_path(id));
        match self.api.post_empty::<Note>(&path).await {
            Ok(note) => {
                self.replace_in_place(&note);
                Ok(note)
            }
            Err(e) => Err(self.fail(e, "Failed to toggle publish status")),
        }
    }

    /// Delete a note; the local entry goes only once the server agrees.
    pub async fn delete(&mut self, id: &NoteId) -> StoreResult<()> {
        self.error = None;
        match self.api.delete(&note_path(id)).await {
            Ok(()) => {
                self.notes.retain(|note| &note.id != id);
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to delete note")),
        }
    }

    /// Fetch the shareable link the server computes for a note.
    pub async fn share_link(&mut self, id: &NoteId) -> StoreResult<ShareLink> {
        self.error = None;
        match self.api.get::<ShareLink>(&format!("{}/link", note_path(id))).await {
            Ok(link) => Ok(link),
            Err(e) => Err(self.fail(e, "Failed to get share link")),
        }
    }

    fn replace_in_place(&mut self, note: &Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => *slot = note.clone(),
            None => tracing::debug!(note_id = %note.id, "Updated note not in local collection"),
        }
    }

    fn fail(&mut self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::new(source, fallback);
        self.error = Some(err.message.clone());
        err
    }
}

fn note_path(id: &NoteId) -> String {
    format!("/notes/{}", encode_segment(id.as_str()))
}
