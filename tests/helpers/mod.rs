#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use flashdeck::api::{self, AppState};
use flashdeck::cards::{CardDraft, CardStore, ReviewPolicy};
use flashdeck::generation::CardGenerator;
use flashdeck::Error;
use serde_json::Value;
use tower::ServiceExt;

/// Fresh in-memory store with the schema applied.
pub fn test_store() -> CardStore {
    CardStore::open_in_memory().unwrap()
}

/// Generator that replays a canned response and counts calls.
pub struct FakeGenerator {
    response: Result<Vec<Value>, String>,
    calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn returning(entries: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(entries),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardGenerator for FakeGenerator {
    async fn generate(&self, _notes: &str) -> flashdeck::Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(Error::Upstream)
    }
}

/// Router over an in-memory store. The state is returned so tests can look
/// inside the store after a request.
pub fn test_app(generator: Arc<dyn CardGenerator>) -> (Router, AppState) {
    let state = AppState::new(test_store(), generator, ReviewPolicy::default());
    (api::router(state.clone()), state)
}

/// Insert cards straight into the app's store.
pub fn seed(state: &AppState, drafts: &[CardDraft]) -> Vec<i64> {
    let mut store = state.store.lock().unwrap();
    drafts
        .iter()
        .map(|d| store.create(d).unwrap().id)
        .collect()
}

pub fn card_count(state: &AppState) -> u64 {
    state.store.lock().unwrap().count().unwrap()
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
