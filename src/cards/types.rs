//! Core card type definitions.
//!
//! Defines [`Card`] (a stored flashcard with its review state), [`CardDraft`]
//! (validated input for creating one), [`ReviewOutcome`] (the grading signal),
//! and [`ReviewUpdate`] (the review fields the policy produces).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A flashcard record, matching the `cards` table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Autoincrement primary key; ascending id is creation order.
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub hint: Option<String>,
    /// Display order matters; duplicates are allowed.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// The card may be shown for review once this moment has passed.
    pub due_at: DateTime<Utc>,
    /// Tracked across gradings. The interval rule does not consult it.
    pub ease_factor: f64,
    /// `None` until the first grading.
    pub last_reviewed: Option<DateTime<Utc>>,
    pub review_count: u32,
}

impl Card {
    /// Whether the card is eligible for review at `as_of` (inclusive).
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.due_at <= as_of
    }
}

/// A validated, not-yet-persisted card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            hint: None,
            tags: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// How the user did when reviewing a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Knew the answer.
    Correct,
    /// Did not know the answer.
    Incorrect,
}

impl ReviewOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Self::Correct),
            "incorrect" => Ok(Self::Incorrect),
            other => Err(Error::InvalidOutcome(other.to_string())),
        }
    }
}

/// The review-state fields written back to a card after grading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewUpdate {
    pub due_at: DateTime<Utc>,
    pub ease_factor: f64,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: u32,
}
