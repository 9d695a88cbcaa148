//! Study flashcards from your own notes.
//!
//! flashdeck takes pasted study notes, asks an LLM to turn them into
//! question/answer cards, stores the cards in SQLite, and schedules reviews
//! with a fixed-interval rule:
//!
//! | Outcome | Next review | Ease factor |
//! |---------|-------------|-------------|
//! | **correct** | in 3 days | +0.1, capped at 3.0 |
//! | **incorrect** | in 1 day | -0.2, floored at 1.3 |
//!
//! The ease factor is recorded on every card but does not change the
//! interval.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, and health checks
//! - [`cards`]: Card types, review policy, store, validation, and statistics
//! - [`generation`]: Notes-to-cards generation via an OpenAI-compatible API
//! - [`api`]: JSON HTTP endpoints

pub mod api;
pub mod cards;
pub mod config;
pub mod db;
pub mod error;
pub mod generation;
pub mod server;

pub use error::{Error, Result};
