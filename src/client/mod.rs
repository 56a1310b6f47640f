//! Editor client: the notes API as seen from a user's editing session.
//!
//! [`EditorSession`] holds the local mirror of the collection and the note
//! being edited, and turns user gestures into calls on a [`NotesApi`].

mod http;
mod session;
pub mod terminal;

use async_trait::async_trait;
use thiserror::Error;

use crate::state::note::Note;

pub use http::HttpNotesApi;
pub use session::{EditorSession, Notifier, EMPTY_EDITOR_HTML};

#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally, no request was sent.
    #[error("note content must not be empty")]
    EmptyNote,

    #[error("note {0} is not in the local list")]
    UnknownNote(i64),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
}

/// The five operations of the notes service.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, ClientError>;
    async fn create(&self, content: &str) -> Result<Note, ClientError>;
    async fn update(&self, id: i64, content: &str) -> Result<Note, ClientError>;
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
    async fn delete_all(&self) -> Result<(), ClientError>;
}
