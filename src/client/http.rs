use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};

use super::{ClientError, NotesApi};
use crate::state::note::Note;

/// [`NotesApi`] over HTTP against a running notes server.
#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    client: Client,
    base_url: String,
}

impl HttpNotesApi {
    /// `base_url` is the server root, e.g. `http://localhost:4000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/api/notes", self.base_url)
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/api/notes/{}", self.base_url, id)
    }
}

/// Turn a non-2xx answer into [`ClientError::Status`], keeping the
/// server's `error` message when it sent one.
async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn list(&self) -> Result<Vec<Note>, ClientError> {
        let resp = self.client.get(self.notes_url()).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn create(&self, content: &str) -> Result<Note, ClientError> {
        let resp = self
            .client
            .post(self.notes_url())
            .json(&json!({ "content": content }))
            .send()
            .await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn update(&self, id: i64, content: &str) -> Result<Note, ClientError> {
        let resp = self
            .client
            .put(self.note_url(id))
            .json(&json!({ "content": content }))
            .send()
            .await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self.client.delete(self.note_url(id)).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ClientError> {
        let resp = self.client.delete(self.notes_url()).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }
}
