use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::cards::store::format_timestamp;
use crate::error::Result;

/// Average ease reported before anything has been reviewed.
const DEFAULT_AVERAGE_EASE: f64 = 2.5;

/// Response from [`review_stats`].
#[derive(Debug, Serialize, PartialEq)]
pub struct ReviewStats {
    pub total_cards: u64,
    pub reviewed_cards: u64,
    pub cards_due_for_review: u64,
    pub cards_not_due: u64,
    pub average_ease_factor: f64,
    /// Percentage of cards reviewed at least once.
    pub review_completion_rate: f64,
}

/// Progress numbers over the whole store, as of `as_of`.
pub fn review_stats(conn: &Connection, as_of: DateTime<Utc>) -> Result<ReviewStats> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    let reviewed: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards WHERE last_reviewed IS NOT NULL",
        [],
        |row| row.get(0),
    )?;
    let due: i64 = conn.query_row(
        "SELECT COUNT(*) FROM cards WHERE due_at <= ?1",
        params![format_timestamp(as_of)],
        |row| row.get(0),
    )?;
    let avg_ease: Option<f64> = conn.query_row(
        "SELECT AVG(ease_factor) FROM cards WHERE review_count > 0",
        [],
        |row| row.get(0),
    )?;

    let completion = if total > 0 {
        round_to(reviewed as f64 / total as f64 * 100.0, 1)
    } else {
        0.0
    };

    Ok(ReviewStats {
        total_cards: total as u64,
        reviewed_cards: reviewed as u64,
        cards_due_for_review: due as u64,
        cards_not_due: (total - due) as u64,
        average_ease_factor: avg_ease.map_or(DEFAULT_AVERAGE_EASE, |e| round_to(e, 2)),
        review_completion_rate: completion,
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
