//! Fixed-interval review rule.
//!
//! A wrong answer brings the card back after [`ReviewPolicy::incorrect_interval`]
//! (one day by default), a right answer after [`ReviewPolicy::correct_interval`]
//! (three days). The ease factor moves by a bounded step on every grading but
//! does not feed into the interval.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::cards::types::{Card, ReviewOutcome, ReviewUpdate};
use crate::config::ReviewConfig;
use crate::error::{Error, Result};

/// Stored timestamps are four-digit-year RFC 3339 text.
const LAST_STORABLE_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPolicy {
    pub correct_interval: Duration,
    pub incorrect_interval: Duration,
    pub default_ease_factor: f64,
    pub ease_step_up: f64,
    pub ease_step_down: f64,
    pub ease_floor: f64,
    pub ease_ceiling: f64,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::from_config(&ReviewConfig::default())
    }
}

impl ReviewPolicy {
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self {
            correct_interval: interval_days(config.correct_interval_days),
            incorrect_interval: interval_days(config.incorrect_interval_days),
            default_ease_factor: config.default_ease_factor,
            ease_step_up: config.ease_step_up,
            ease_step_down: config.ease_step_down,
            ease_floor: config.ease_floor,
            ease_ceiling: config.ease_ceiling,
        }
    }

    /// Compute the card's new review state after grading it at `now`.
    ///
    /// Pure: the card itself is left untouched; apply the result with
    /// [`CardStore::update_review_state`](crate::cards::store::CardStore::update_review_state).
    /// Fails with [`Error::Schedule`] when the next due date cannot be stored.
    pub fn grade(
        &self,
        card: &Card,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<ReviewUpdate> {
        let (interval, ease_factor) = match outcome {
            ReviewOutcome::Correct => (
                self.correct_interval,
                (card.ease_factor + self.ease_step_up).min(self.ease_ceiling),
            ),
            ReviewOutcome::Incorrect => (
                self.incorrect_interval,
                (card.ease_factor - self.ease_step_down).max(self.ease_floor),
            ),
        };

        let due_at = now
            .checked_add_signed(interval)
            .filter(|due| due.year() <= LAST_STORABLE_YEAR)
            .ok_or_else(|| {
                Error::Schedule(format!(
                    "{} interval of {} days from {now} is out of range",
                    outcome,
                    interval.num_days()
                ))
            })?;

        Ok(ReviewUpdate {
            due_at,
            ease_factor,
            last_reviewed: now,
            review_count: card.review_count.saturating_add(1),
        })
    }
}

fn interval_days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(Duration::MAX)
}
