use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::CorruptFilePolicy;
use crate::errors::{NoteError, NoteResult};
use crate::persistence::NoteFile;

/// A single note: an id plus the HTML produced by the editor.
///
/// `content` is opaque to the service, stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub content: String,
}

/// Shared, file-backed notes collection.
///
/// The file is the only copy of the data. Every access goes through one
/// mutex so load-mutate-persist cycles never interleave.
#[derive(Clone)]
pub struct NoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    file: NoteFile,
    lock: Mutex<()>,
}

/// Create a store over the notes file at `path`.
pub fn new_store(path: impl Into<std::path::PathBuf>, policy: CorruptFilePolicy) -> NoteStore {
    NoteStore {
        inner: Arc::new(Inner {
            file: NoteFile::new(path, policy),
            lock: Mutex::new(()),
        }),
    }
}

impl NoteStore {
    pub fn file(&self) -> &NoteFile {
        &self.inner.file
    }

    /// Current collection in stored order.
    pub async fn read(&self) -> NoteResult<Vec<Note>> {
        let _guard = self.inner.lock.lock().await;
        self.inner.file.load().await
    }

    /// Load the collection, apply `f` and persist the result.
    ///
    /// Nothing is written when `f` fails.
    pub async fn modify<T, F>(&self, f: F) -> NoteResult<T>
    where
        F: FnOnce(&mut Vec<Note>) -> NoteResult<T>,
    {
        let _guard = self.inner.lock.lock().await;
        let mut notes = self.inner.file.load().await?;
        let out = f(&mut notes)?;
        self.inner.file.persist(&notes).await?;
        Ok(out)
    }

    /// Overwrite the collection without reading the current file.
    pub async fn replace(&self, notes: Vec<Note>) -> NoteResult<()> {
        let _guard = self.inner.lock.lock().await;
        self.inner.file.persist(&notes).await
    }
}

/// Id for a note created now.
///
/// Millisecond timestamp, bumped past the largest id in the collection so
/// two creates in the same millisecond still get distinct ids. Fails if
/// the collection already holds `i64::MAX`.
pub fn next_id(notes: &[Note]) -> NoteResult<i64> {
    next_id_at(notes, Utc::now().timestamp_millis())
}

fn next_id_at(notes: &[Note], now_millis: i64) -> NoteResult<i64> {
    let Some(last) = notes.iter().map(|n| n.id).max() else {
        return Ok(now_millis);
    };

    let after_last = last
        .checked_add(1)
        .ok_or_else(|| NoteError::Storage(format!("no note id left after {last}")))?;
    Ok(now_millis.max(after_last))
}
