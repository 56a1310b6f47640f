use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::errors::NoteResult;
use crate::services::note_service;
use crate::state::note::NoteStore;

#[derive(Clone)]
struct SystemState {
    version: String,
    store: NoteStore,
}

/// Liveness and build info under /system
pub fn routes(version: String, store: NoteStore) -> Router {
    Router::new()
        .route("/alive", get(|| async { "OK" }))
        .route("/version", get(version_info))
        .route("/status", get(status))
        .with_state(SystemState { version, store })
}

/// GET /system/version
async fn version_info(State(state): State<SystemState>) -> Json<Value> {
    Json(json!({ "version": state.version }))
}

/// GET /system/status
///
/// Reads the notes file, so a broken file under the `fail` policy shows
/// up here as a 500.
async fn status(State(state): State<SystemState>) -> NoteResult<Json<Value>> {
    let notes = note_service::list(&state.store).await?;
    Ok(Json(json!({
        "version": state.version,
        "notes": notes.len(),
        "storage": state.store.file().path().display().to_string(),
    })))
}
