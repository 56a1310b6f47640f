use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::NoteResult;
use crate::services::note_service;
use crate::state::note::{Note, NoteStore};

/// Request body of POST and PUT.
///
/// A body that is missing, not JSON, or carries a non-string `content`
/// is treated the same as an absent `content`.
#[derive(Debug, Deserialize)]
pub struct NoteBody {
    pub content: Option<String>,
}

/// Build all note routes under /api/notes
pub fn routes(store: NoteStore) -> Router {
    Router::new()
        .route(
            "/api/notes",
            get(list_notes)
                .post(create_note)
                .delete(delete_all_notes),
        )
        .route("/api/notes/:id", put(update_note).delete(delete_note))
        .with_state(store)
}

/// Integer prefix of a path segment: optional leading whitespace and
/// sign, then decimal digits. `"12abc"` is 12, `"abc"` is nothing.
pub fn parse_note_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    format!("{sign}{}", &rest[..digits_end]).parse().ok()
}

fn content_of(body: Option<Json<NoteBody>>) -> Option<String> {
    body.and_then(|Json(b)| b.content)
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/notes
// Full collection in stored order
// ─────────────────────────────────────────────────────────────
//
async fn list_notes(State(store): State<NoteStore>) -> NoteResult<Json<Vec<Note>>> {
    Ok(Json(note_service::list(&store).await?))
}

//
// ─────────────────────────────────────────────────────────────
// POST /api/notes
// Create a note, 201 with the stored note
// ─────────────────────────────────────────────────────────────
//
async fn create_note(
    State(store): State<NoteStore>,
    body: Option<Json<NoteBody>>,
) -> NoteResult<(StatusCode, Json<Note>)> {
    let note = note_service::create(&store, content_of(body)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

//
// ─────────────────────────────────────────────────────────────
// PUT /api/notes/{id}
// Replace a note's content
// ─────────────────────────────────────────────────────────────
//
async fn update_note(
    Path(id): Path<String>,
    State(store): State<NoteStore>,
    body: Option<Json<NoteBody>>,
) -> NoteResult<Json<Note>> {
    let note = note_service::update(&store, parse_note_id(&id), content_of(body)).await?;
    Ok(Json(note))
}

//
// ─────────────────────────────────────────────────────────────
// DELETE /api/notes/{id}
// ─────────────────────────────────────────────────────────────
//
async fn delete_note(
    Path(id): Path<String>,
    State(store): State<NoteStore>,
) -> NoteResult<Json<Value>> {
    note_service::delete_by_id(&store, parse_note_id(&id)).await?;
    Ok(Json(json!({ "message": "Note successfully deleted" })))
}

//
// ─────────────────────────────────────────────────────────────
// DELETE /api/notes
// Destructive: empties the collection
// ─────────────────────────────────────────────────────────────
//
async fn delete_all_notes(State(store): State<NoteStore>) -> NoteResult<Json<Value>> {
    note_service::delete_all(&store).await?;
    Ok(Json(json!({ "message": "All notes successfully deleted" })))
}
