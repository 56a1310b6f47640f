use super::{ClientError, NotesApi};
use crate::state::note::Note;

/// What the rich-text editor holds when the user has typed nothing.
pub const EMPTY_EDITOR_HTML: &str = "<p><br></p>";

/// Where user-visible notices go.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// One user's editing session.
///
/// `notes` mirrors the last list fetched from the server and is only
/// patched after the server confirmed a change. `editing_id` names the
/// note whose content sits in the editor for an in-place update.
pub struct EditorSession<A, N> {
    api: A,
    notifier: N,
    notes: Vec<Note>,
    editing_id: Option<i64>,
    editor: String,
}

impl<A: NotesApi, N: Notifier> EditorSession<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            notes: Vec::new(),
            editing_id: None,
            editor: String::new(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    pub fn editor_content(&self) -> &str {
        &self.editor
    }

    pub fn set_editor_content(&mut self, html: impl Into<String>) {
        self.editor = html.into();
    }

    pub fn append_editor_content(&mut self, html: &str) {
        self.editor.push_str(html);
    }

    /// Initial fetch of the collection.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(notes) => {
                self.notes = notes;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load notes: {e}");
                self.notifier
                    .error("Failed to load notes. Please try again.");
                Err(e)
            }
        }
    }

    /// Replace the local list with the server's and drop the edit target.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.load().await?;
        self.editing_id = None;
        self.notifier.info("All notes loaded.");
        Ok(())
    }

    /// Store the editor content: update the note being edited, or create
    /// a new one. The editor is cleared on success.
    pub async fn save(&mut self) -> Result<Note, ClientError> {
        let content = self.editor.trim().to_string();
        if content.is_empty() || content == EMPTY_EDITOR_HTML {
            self.notifier.error("Note content must not be empty!");
            return Err(ClientError::EmptyNote);
        }

        let result = match self.editing_id {
            Some(id) => self.api.update(id, &content).await.map(|saved| {
                if let Some(local) = self.notes.iter_mut().find(|n| n.id == id) {
                    local.content = saved.content.clone();
                }
                self.editing_id = None;
                self.notifier.info("Note updated.");
                saved
            }),
            None => self.api.create(&content).await.map(|saved| {
                self.notes.push(saved.clone());
                self.notifier.info("Note saved.");
                saved
            }),
        };

        match result {
            Ok(saved) => {
                self.editor.clear();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!("Failed to save note: {e}");
                self.notifier
                    .error("Failed to save the note. Please try again.");
                Err(e)
            }
        }
    }

    /// Put a listed note into the editor for an in-place update.
    /// Local only, nothing is sent.
    pub fn edit(&mut self, id: i64) -> Result<(), ClientError> {
        let Some(note) = self.notes.iter().find(|n| n.id == id) else {
            self.notifier.error("That note is not in the list.");
            return Err(ClientError::UnknownNote(id));
        };

        self.editor = note.content.clone();
        self.editing_id = Some(id);
        self.notifier.info("You are now editing this note.");
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        match self.api.delete(id).await {
            Ok(()) => {
                self.notes.retain(|n| n.id != id);
                self.notifier.info("Note deleted.");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to delete note {id}: {e}");
                self.notifier
                    .error("Failed to delete the note. Please try again.");
                Err(e)
            }
        }
    }

    pub async fn delete_all(&mut self) -> Result<(), ClientError> {
        match self.api.delete_all().await {
            Ok(()) => {
                self.notes.clear();
                self.notifier.info("All notes deleted.");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to delete all notes: {e}");
                self.notifier
                    .error("Failed to delete all notes. Please try again.");
                Err(e)
            }
        }
    }
}
