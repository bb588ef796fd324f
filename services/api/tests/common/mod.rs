//! Shared helpers for the router-level tests: configuration, a counting
//! question-generator double, and request builders.

#![allow(dead_code)]

use api_lib::{
    config::Config,
    web::{build_router, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use study_notes_core::{
    domain::QuestionsResponse,
    ports::{PortError, PortResult, QuestionGenerationService},
};
use tower::ServiceExt;

pub const SECRET: &str = "workshop-password";
pub const ORIGIN: &str = "https://notes.example.com";

pub enum Reply {
    Raw(&'static str),
    Refuse(&'static str),
    Fail,
}

pub struct StubGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionGenerationService for StubGenerator {
    async fn generate_questions(&self, _notes: &str) -> PortResult<QuestionsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Raw(raw) => QuestionsResponse::from_model_output(raw),
            Reply::Refuse(reason) => Err(PortError::Refused(reason.to_string())),
            Reply::Fail => Err(PortError::Unexpected("connection refused".to_string())),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "WORKSHOP_PASSWORD" => Some(SECRET.to_string()),
        "JWT_SECRET" => Some("integration-signing-key".to_string()),
        "MAX_NOTES_LENGTH" => Some("2500".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn app_with(generator: Option<Arc<StubGenerator>>) -> Router {
    let generator = generator.map(|g| g as Arc<dyn QuestionGenerationService>);
    build_router(Arc::new(AppState::new(Arc::new(test_config()), generator)))
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn json_post(uri: &str, body: String, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, ORIGIN);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn issue_token(app: &Router, email: &str) -> String {
    let body = serde_json::json!({ "secret": SECRET, "email": email }).to_string();
    let response = app
        .clone()
        .oneshot(json_post("/api/token", body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await
}

pub fn notes_body(notes: &str) -> String {
    serde_json::json!({ "notes": notes }).to_string()
}
