//! HTTP handlers for generation, listing, and grading.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::ApiError;
use super::AppState;
use crate::cards::stats::{review_stats, ReviewStats};
use crate::cards::types::{Card, ReviewOutcome};
use crate::cards::validate::validate_batch;
use crate::cards::CardStore;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub outcome: String,
}

#[derive(Debug, Deserialize)]
pub struct DueQuery {
    pub as_of: Option<DateTime<Utc>>,
}

/// Run a store operation on the blocking pool.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut CardStore) -> crate::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || {
        let mut store = store
            .lock()
            .map_err(|e| ApiError::Internal(format!("card store lock poisoned: {e}")))?;
        op(&mut store).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
}

/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let notes = request.notes.unwrap_or_default();
    if notes.trim().is_empty() {
        return Err(Error::EmptyNotes.into());
    }

    tracing::info!(notes_len = notes.len(), "generate called");

    let entries = state.generator.generate(&notes).await?;
    let drafts = validate_batch(&entries)?;

    let cards = with_store(&state, move |store| store.create_batch(&drafts)).await?;
    tracing::info!(count = cards.len(), "flashcards generated");
    Ok(Json(cards))
}

/// GET /cards
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = with_store(&state, |store| store.get_all()).await?;
    Ok(Json(cards))
}

/// GET /cards/due
pub async fn due_cards(
    State(state): State<AppState>,
    query: Result<Query<DueQuery>, QueryRejection>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let cards = with_store(&state, move |store| store.get_due(as_of)).await?;
    Ok(Json(cards))
}

/// GET /cards/{id}
pub async fn get_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Card>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let card = with_store(&state, move |store| store.get(id)).await?;
    Ok(Json(card))
}

/// POST /cards/{id}/review
pub async fn review_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<Card>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let outcome: ReviewOutcome = request.outcome.parse()?;

    let policy = Arc::clone(&state.policy);
    let card = with_store(&state, move |store| {
        store.review(id, outcome, &policy, Utc::now())
    })
    .await?;
    Ok(Json(card))
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<ReviewStats>, ApiError> {
    let stats = with_store(&state, |store| review_stats(store.connection(), Utc::now())).await?;
    Ok(Json(stats))
}
