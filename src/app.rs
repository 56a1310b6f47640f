use std::path::Path;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::AppConfig;
use crate::routes::{note_routes, system_routes};
use crate::state::note::NoteStore;

/// Build the complete Axum application:
/// - /api/notes   (note CRUD)
/// - /system      (alive, version, status)
/// - anything else: the static site from `cfg.static_dir`, falling back
///   to its `index.html` so client-side routes resolve
pub fn build_app(store: NoteStore, cfg: &AppConfig) -> Router {
    let mut app = Router::new()
        .merge(note_routes::routes(store.clone()))
        .nest(
            "/system",
            system_routes::routes(cfg.server_version.clone(), store),
        );

    if let Some(dir) = &cfg.static_dir {
        let index = Path::new(dir).join("index.html");
        tracing::info!("Serving static site from {}", dir);
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    if cfg.cors {
        app = app.layer(CorsLayer::permissive());
    }

    // Logging middleware
    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
