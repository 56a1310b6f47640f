use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;

use notizbuch::app::build_app;
use notizbuch::client::{ClientError, EditorSession, HttpNotesApi, NotesApi, Notifier};
use notizbuch::config::AppConfig;
use notizbuch::state::note::new_store;

#[derive(Default, Clone)]
struct Notices {
    errors: Arc<Mutex<Vec<String>>>,
}

impl Notifier for Notices {
    fn info(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Serve a fresh store on an ephemeral port and return its base URL.
async fn spawn_server(dir: &tempfile::TempDir) -> String {
    let cfg = AppConfig::default();
    let store = new_store(dir.path().join("notes.json"), cfg.corrupt_file_policy);
    let app = build_app(store, &cfg);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn editor_session_drives_the_real_server() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_server(&dir).await;
    let notices = Notices::default();
    let mut session = EditorSession::new(HttpNotesApi::new(&url), notices.clone());

    session.load().await.unwrap();
    assert!(session.notes().is_empty());

    session.set_editor_content("<p>A</p>");
    let a = session.save().await.unwrap();
    session.set_editor_content("<p>B</p>");
    let b = session.save().await.unwrap();
    assert_ne!(a.id, b.id);

    session.edit(a.id).unwrap();
    session.set_editor_content("<p>A2</p>");
    session.save().await.unwrap();

    session.delete(b.id).await.unwrap();

    // a second session sees exactly what the first one stored
    let mut other = EditorSession::new(HttpNotesApi::new(&url), Notices::default());
    other.load().await.unwrap();
    assert_eq!(other.notes(), session.notes());
    assert_eq!(other.notes().len(), 1);
    assert_eq!(other.notes()[0].content, "<p>A2</p>");

    session.delete_all().await.unwrap();
    other.reload().await.unwrap();
    assert!(other.notes().is_empty());
    assert!(notices.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_carry_status_and_message() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_server(&dir).await;
    let api = HttpNotesApi::new(&url);

    match api.delete(9_999_999).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Note not found");
        }
        other => panic!("expected a 404, got {other:?}"),
    }

    match api.create("").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Content is required");
        }
        other => panic!("expected a 400, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_reported_to_the_user() {
    // bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notices = Notices::default();
    let mut session = EditorSession::new(HttpNotesApi::new(format!("http://{addr}")), notices.clone());

    assert!(matches!(session.load().await, Err(ClientError::Transport(_))));
    assert_eq!(notices.errors.lock().unwrap().len(), 1);
}
