//! Checks what the relay writes to the log: one `audit` event with the caller
//! and their notes on success, and nothing about the notes when auth fails.

mod common;

use common::{app_with, issue_token, json_post, notes_body, Reply, StubGenerator};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    Layer,
};

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Records every event emitted while it is the active subscriber.
#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: recorder.0,
        });
    }
}

impl CaptureLayer {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

const NOTES: &str = "Mitochondria are the powerhouse of the cell.";

#[tokio::test]
async fn successful_request_writes_audit_line_with_email_and_notes() {
    let capture = CaptureLayer::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let app = app_with(Some(StubGenerator::new(Reply::Raw(r#"{"pairs":[]}"#))));
    let token = issue_token(&app, "ada@example.com").await;

    let response = app
        .oneshot(json_post("/api/questions", notes_body(NOTES), Some(token.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let audit: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.target == "audit")
        .collect();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].fields.get("email").map(String::as_str), Some("ada@example.com"));
    assert_eq!(audit[0].fields.get("notes").map(String::as_str), Some(NOTES));
}

#[tokio::test]
async fn unauthenticated_request_logs_nothing_about_the_notes() {
    let capture = CaptureLayer::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let generator = StubGenerator::new(Reply::Raw(r#"{"pairs":[]}"#));
    let app = app_with(Some(generator.clone()));

    for token in [None, Some("abc.def.ghi")] {
        let response = app
            .clone()
            .oneshot(json_post("/api/questions", notes_body(NOTES), token))
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    let events = capture.events();
    assert!(events.iter().all(|e| e.target != "audit"));
    assert!(events
        .iter()
        .all(|e| e.fields.values().all(|v| !v.contains(NOTES))));
    // Nothing at all from the relay itself on the rejected path.
    assert!(events.iter().all(|e| !e.target.starts_with("api_lib::web::rest")));
    assert_eq!(generator.calls(), 0);
}
