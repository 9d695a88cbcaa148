//! JSON HTTP API.
//!
//! [`router`] wires the handlers in [`handlers`] to their routes over a shared
//! [`AppState`].

pub mod error;
pub mod handlers;

use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;

use crate::cards::{CardStore, ReviewPolicy};
use crate::generation::CardGenerator;

pub use error::{ApiError, ErrorResponse};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<CardStore>>,
    pub generator: Arc<dyn CardGenerator>,
    pub policy: Arc<ReviewPolicy>,
}

impl AppState {
    pub fn new(store: CardStore, generator: Arc<dyn CardGenerator>, policy: ReviewPolicy) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            generator,
            policy: Arc::new(policy),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/cards", get(handlers::list_cards))
        .route("/cards/due", get(handlers::due_cards))
        .route("/cards/{id}", get(handlers::get_card))
        .route("/cards/{id}/review", post(handlers::review_card))
        .route("/stats", get(handlers::stats))
        .with_state(state)
}
