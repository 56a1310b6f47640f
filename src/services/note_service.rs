use crate::errors::{NoteError, NoteResult};
use crate::state::note::{next_id, Note, NoteStore};

/// Content must be present and non-empty. Anything else is rejected
/// before the file is touched.
fn require_content(content: Option<String>) -> NoteResult<String> {
    match content {
        Some(c) if !c.is_empty() => Ok(c),
        _ => Err(NoteError::Validation),
    }
}

/// Return every note in stored order.
pub async fn list(store: &NoteStore) -> NoteResult<Vec<Note>> {
    store.read().await
}

/// Append a new note and return it.
pub async fn create(store: &NoteStore, content: Option<String>) -> NoteResult<Note> {
    let content = require_content(content)?;

    let note = store
        .modify(move |notes| {
            let note = Note {
                id: next_id(notes)?,
                content,
            };
            notes.push(note.clone());
            Ok(note)
        })
        .await?;

    tracing::info!("Created note {}", note.id);
    Ok(note)
}

/// Replace the content of the first note with this id.
///
/// `id` is `None` when the path segment held no integer; such a request
/// can never match a note.
pub async fn update(store: &NoteStore, id: Option<i64>, content: Option<String>) -> NoteResult<Note> {
    let content = require_content(content)?;
    let id = id.ok_or(NoteError::NotFound)?;

    let note = store
        .modify(move |notes| {
            let note = notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(NoteError::NotFound)?;
            note.content = content;
            Ok(note.clone())
        })
        .await?;

    tracing::info!("Updated note {}", note.id);
    Ok(note)
}

/// Remove every note with this id. Fails if none was removed.
pub async fn delete_by_id(store: &NoteStore, id: Option<i64>) -> NoteResult<()> {
    let id = id.ok_or(NoteError::NotFound)?;

    let removed = store
        .modify(move |notes| {
            let before = notes.len();
            notes.retain(|n| n.id != id);
            match before - notes.len() {
                0 => Err(NoteError::NotFound),
                removed => Ok(removed),
            }
        })
        .await?;

    tracing::info!("Deleted note {} ({} entries removed)", id, removed);
    Ok(())
}

/// Replace the collection with an empty one.
pub async fn delete_all(store: &NoteStore) -> NoteResult<()> {
    store.replace(Vec::new()).await?;
    tracing::info!("Deleted all notes");
    Ok(())
}
