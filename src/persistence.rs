use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::CorruptFilePolicy;
use crate::errors::{NoteError, NoteResult};
use crate::state::note::Note;

/// The JSON file holding the whole notes collection.
///
/// The top-level value is always an array. It is read in full and
/// rewritten in full; there is no incremental update.
#[derive(Debug, Clone)]
pub struct NoteFile {
    path: PathBuf,
    policy: CorruptFilePolicy,
}

impl NoteFile {
    pub fn new(path: impl Into<PathBuf>, policy: CorruptFilePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection from disk.
    ///
    /// - Missing file: created with `[]`, empty collection returned.
    /// - Whitespace-only file: empty collection.
    /// - Unreadable or unparseable file: depends on the policy. `Reset`
    ///   logs and returns an empty collection, `Fail` returns the error.
    pub async fn load(&self) -> NoteResult<Vec<Note>> {
        match self.read_collection().await {
            Ok(notes) => Ok(notes),
            Err(e) => match self.policy {
                CorruptFilePolicy::Reset => {
                    tracing::warn!(
                        "Could not load notes from {}, continuing with an empty collection: {e}",
                        self.path.display()
                    );
                    Ok(Vec::new())
                }
                CorruptFilePolicy::Fail => {
                    tracing::error!("Could not load notes from {}: {e}", self.path.display());
                    Err(e)
                }
            },
        }
    }

    async fn read_collection(&self) -> NoteResult<Vec<Note>> {
        if !fs::try_exists(&self.path).await? {
            tracing::info!(
                "No notes file at {}, creating an empty one",
                self.path.display()
            );
            self.persist(&[]).await?;
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path).await?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let notes: Vec<Note> = serde_json::from_str(&data)?;
        tracing::debug!("Loaded {} notes from {}", notes.len(), self.path.display());
        Ok(notes)
    }

    /// Write the full collection, pretty-printed.
    ///
    /// The JSON goes to a sibling temp file first and is renamed over the
    /// target, so readers see either the old or the new collection.
    pub async fn persist(&self, notes: &[Note]) -> NoteResult<()> {
        let json = serde_json::to_string_pretty(notes)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, json.as_bytes()).await {
            tracing::warn!("Failed to write notes file {}: {e}", tmp.display());
            return Err(NoteError::from(e));
        }

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            tracing::warn!(
                "Failed to move {} into place at {}: {e}",
                tmp.display(),
                self.path.display()
            );
            let _ = fs::remove_file(&tmp).await;
            return Err(NoteError::from(e));
        }

        tracing::debug!("Saved {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Note> {
        vec![
            Note {
                id: 1,
                content: "<p>A</p>".into(),
            },
            Note {
                id: 2,
                content: "<p>B</p>".into(),
            },
        ]
    }

    #[tokio::test]
    async fn missing_file_is_created_as_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("notes.json");
        let file = NoteFile::new(&path, CorruptFilePolicy::Fail);

        assert!(file.load().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn whitespace_file_is_an_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "  \n\t ").unwrap();

        let file = NoteFile::new(&path, CorruptFilePolicy::Fail);
        assert!(file.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persisted_collection_is_pretty_and_reloads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let file = NoteFile::new(&path, CorruptFilePolicy::Reset);

        file.persist(&sample()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": 1,"));
        assert_eq!(file.load().await.unwrap(), sample());
        assert!(!file.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_resets_to_empty_under_reset_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let file = NoteFile::new(&path, CorruptFilePolicy::Reset);
        assert!(file.load().await.unwrap().is_empty());
        // loading alone never rewrites a corrupt file
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error_under_fail_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, r#"{"id": 1, "content": "single object"}"#).unwrap();

        let file = NoteFile::new(&path, CorruptFilePolicy::Fail);
        let err = file.load().await.unwrap_err();
        assert!(matches!(err, NoteError::Storage(_)));
    }

    #[tokio::test]
    async fn persist_into_a_directory_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        std::fs::create_dir(&target).unwrap();

        let file = NoteFile::new(&target, CorruptFilePolicy::Reset);
        let err = file.persist(&sample()).await.unwrap_err();
        assert!(matches!(err, NoteError::Storage(_)));
    }
}
