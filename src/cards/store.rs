//! Card persistence on top of SQLite.
//!
//! [`CardStore`] owns the connection. Writes that touch more than one row
//! (batch creation, grading plus its audit entry) run inside a transaction.
//! Timestamps are stored as fixed-width RFC 3339 UTC text with microsecond
//! precision, so `ORDER BY due_at` on the text column is chronological.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::cards::review::ReviewPolicy;
use crate::cards::types::{Card, CardDraft, ReviewOutcome, ReviewUpdate};
use crate::error::{Error, Result};

const CARD_COLUMNS: &str = "id, question, answer, hint, tags, created_at, due_at, \
                            ease_factor, last_reviewed, review_count";

/// Durable home of every card.
pub struct CardStore {
    conn: Connection,
    default_ease_factor: f64,
}

impl CardStore {
    /// Wrap a connection whose schema is already initialized.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            default_ease_factor: ReviewPolicy::default().default_ease_factor,
        }
    }

    /// Open (or create) the database file and wrap it.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_database(path)?))
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_memory_database()?))
    }

    /// Ease factor given to newly created cards.
    pub fn with_default_ease_factor(mut self, ease_factor: f64) -> Self {
        self.default_ease_factor = ease_factor;
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Persist a new card, due immediately.
    pub fn create(&mut self, draft: &CardDraft) -> Result<Card> {
        self.create_at(draft, Utc::now())
    }

    /// Like [`create`](Self::create) with an explicit creation time.
    pub fn create_at(&mut self, draft: &CardDraft, now: DateTime<Utc>) -> Result<Card> {
        let ease_factor = self.default_ease_factor;
        let tx = self.conn.transaction()?;
        let card = insert_card(&tx, draft, now, ease_factor)?;
        tx.commit()?;

        tracing::debug!(id = card.id, "card created");
        Ok(card)
    }

    /// Persist every draft or none of them.
    pub fn create_batch(&mut self, drafts: &[CardDraft]) -> Result<Vec<Card>> {
        let now = Utc::now();
        let ease_factor = self.default_ease_factor;
        let tx = self.conn.transaction()?;
        let cards = drafts
            .iter()
            .map(|draft| insert_card(&tx, draft, now, ease_factor))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;

        tracing::info!(count = cards.len(), "cards created");
        Ok(cards)
    }

    pub fn get(&self, id: i64) -> Result<Card> {
        fetch_card(&self.conn, id)?.ok_or(Error::NotFound(id))
    }

    /// Every stored card in creation (id) order.
    pub fn get_all(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY id ASC"))?;
        let cards = stmt
            .query_map([], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// Cards with `due_at <= as_of`, most overdue first.
    pub fn get_due(&self, as_of: DateTime<Utc>) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE due_at <= ?1 ORDER BY due_at ASC, id ASC"
        ))?;
        let cards = stmt
            .query_map(params![format_timestamp(as_of)], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// The card that has been waiting longest, if any is due.
    pub fn next_due(&self, as_of: DateTime<Utc>) -> Result<Option<Card>> {
        let card = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CARD_COLUMNS} FROM cards WHERE due_at <= ?1 \
                     ORDER BY due_at ASC, id ASC LIMIT 1"
                ),
                params![format_timestamp(as_of)],
                card_from_row,
            )
            .optional()?;
        Ok(card)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Write review-policy output back to the card. Timestamps are stored
    /// at microsecond precision.
    pub fn update_review_state(&mut self, id: i64, update: &ReviewUpdate) -> Result<()> {
        apply_update(&self.conn, id, update)
    }

    /// Grade a card and persist the result in one transaction.
    pub fn review(
        &mut self,
        id: i64,
        outcome: ReviewOutcome,
        policy: &ReviewPolicy,
        now: DateTime<Utc>,
    ) -> Result<Card> {
        let now = now.trunc_subsecs(6);
        let tx = self.conn.transaction()?;

        let mut card = fetch_card(&tx, id)?.ok_or(Error::NotFound(id))?;
        let update = policy.grade(&card, outcome, now)?;
        apply_update(&tx, id, &update)?;
        write_audit_log(
            &tx,
            "review",
            id,
            Some(&serde_json::json!({
                "outcome": outcome.as_str(),
                "due_at": format_timestamp(update.due_at),
                "ease_factor": update.ease_factor,
            })),
        )?;
        tx.commit()?;

        card.due_at = update.due_at;
        card.ease_factor = update.ease_factor;
        card.last_reviewed = Some(update.last_reviewed);
        card.review_count = update.review_count;

        tracing::info!(
            id,
            outcome = %outcome,
            due_at = %card.due_at,
            ease_factor = card.ease_factor,
            "card reviewed"
        );
        Ok(card)
    }
}

fn insert_card(
    conn: &Connection,
    draft: &CardDraft,
    now: DateTime<Utc>,
    ease_factor: f64,
) -> Result<Card> {
    let created_at = now.trunc_subsecs(6);
    let stamp = format_timestamp(created_at);

    conn.execute(
        "INSERT INTO cards (question, answer, hint, tags, created_at, due_at, ease_factor, review_count) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6, 0)",
        params![
            draft.question,
            draft.answer,
            draft.hint,
            encode_tags(&draft.tags),
            stamp,
            ease_factor,
        ],
    )?;
    let id = conn.last_insert_rowid();
    write_audit_log(conn, "create", id, None)?;

    Ok(Card {
        id,
        question: draft.question.clone(),
        answer: draft.answer.clone(),
        hint: draft.hint.clone(),
        tags: draft.tags.clone(),
        created_at,
        due_at: created_at,
        ease_factor,
        last_reviewed: None,
        review_count: 0,
    })
}

fn fetch_card(conn: &Connection, id: i64) -> Result<Option<Card>> {
    let card = conn
        .query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
            params![id],
            card_from_row,
        )
        .optional()?;
    Ok(card)
}

fn apply_update(conn: &Connection, id: i64, update: &ReviewUpdate) -> Result<()> {
    let update = ReviewUpdate {
        due_at: update.due_at.trunc_subsecs(6),
        last_reviewed: update.last_reviewed.trunc_subsecs(6),
        ..*update
    };
    let rows = conn.execute(
        "UPDATE cards SET due_at = ?1, ease_factor = ?2, last_reviewed = ?3, review_count = ?4 \
         WHERE id = ?5",
        params![
            format_timestamp(update.due_at),
            update.ease_factor,
            format_timestamp(update.last_reviewed),
            update.review_count,
            id,
        ],
    )?;
    if rows == 0 {
        return Err(Error::NotFound(id));
    }
    Ok(())
}

/// Write an entry to the card_log audit table.
pub(crate) fn write_audit_log(
    conn: &Connection,
    operation: &str,
    card_id: i64,
    details: Option<&serde_json::Value>,
) -> Result<()> {
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO card_log (operation, card_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, card_id, details_json, format_timestamp(Utc::now())],
    )?;
    Ok(())
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    let last_reviewed: Option<String> = row.get(8)?;
    Ok(Card {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        hint: row.get(3)?,
        tags: decode_tags(row.get::<_, Option<String>>(4)?.as_deref()),
        created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
        due_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
        ease_factor: row.get(7)?,
        last_reviewed: last_reviewed
            .map(|s| parse_timestamp(8, &s))
            .transpose()?,
        review_count: row.get(9)?,
    })
}

/// Fixed-width UTC form, e.g. `2026-01-10T08:00:00.000000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn encode_tags(tags: &[String]) -> String {
    serde_json::json!(tags).to_string()
}

/// Read a tags column leniently: a JSON array is decoded, any other
/// non-empty text becomes a single tag.
pub(crate) fn decode_tags(raw: Option<&str>) -> Vec<String> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Ok(serde_json::Value::String(s)) => vec![s],
        _ => vec![raw.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn store() -> CardStore {
        CardStore::open_in_memory().unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn create_sets_defaults() {
        let mut store = store();
        let draft = CardDraft::new("Capital of Italy?", "Rome")
            .with_hint("Colosseum")
            .with_tags(["geography", "europe", "geography"]);

        let card = store.create(&draft).unwrap();

        assert!(card.id > 0);
        assert_eq!(card.due_at, card.created_at);
        assert_eq!(card.ease_factor, 2.5);
        assert!(card.last_reviewed.is_none());
        assert_eq!(card.review_count, 0);
        assert_eq!(card.tags, vec!["geography", "europe", "geography"]);

        // what comes back from disk matches what create returned
        assert_eq!(store.get(card.id).unwrap(), card);
    }

    #[test]
    fn create_writes_audit_log() {
        let mut store = store();
        let card = store.create(&CardDraft::new("Q", "A")).unwrap();

        let op: String = store
            .connection()
            .query_row(
                "SELECT operation FROM card_log WHERE card_id = ?1",
                params![card.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(op, "create");
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = store();
        assert!(matches!(store.get(42), Err(Error::NotFound(42))));
    }

    #[test]
    fn get_all_on_empty_store_is_empty() {
        assert!(store().get_all().unwrap().is_empty());
    }

    #[test]
    fn get_all_is_id_ordered() {
        let mut store = store();
        // created_at deliberately out of order
        store.create_at(&CardDraft::new("one", "1"), at(5, 0)).unwrap();
        store.create_at(&CardDraft::new("two", "2"), at(1, 0)).unwrap();
        store.create_at(&CardDraft::new("three", "3"), at(3, 0)).unwrap();

        let ids: Vec<i64> = store.get_all().unwrap().iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn get_due_filters_and_orders() {
        let mut store = store();
        let late = store.create_at(&CardDraft::new("late", "x"), at(4, 0)).unwrap();
        let early = store.create_at(&CardDraft::new("early", "x"), at(2, 0)).unwrap();
        let future = store.create_at(&CardDraft::new("future", "x"), at(9, 0)).unwrap();

        let due = store.get_due(at(4, 0)).unwrap();
        let ids: Vec<i64> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![early.id, late.id], "boundary card included, future excluded");
        assert!(!ids.contains(&future.id));

        assert_eq!(store.next_due(at(4, 0)).unwrap().map(|c| c.id), Some(early.id));
        assert!(store.next_due(at(1, 0)).unwrap().is_none());
    }

    #[test]
    fn update_review_state_missing_card() {
        let mut store = store();
        let update = ReviewUpdate {
            due_at: at(2, 0),
            ease_factor: 2.0,
            last_reviewed: at(1, 0),
            review_count: 1,
        };
        assert!(matches!(
            store.update_review_state(99, &update),
            Err(Error::NotFound(99))
        ));
    }

    #[test]
    fn review_persists_policy_output() {
        let mut store = store();
        let card = store.create_at(&CardDraft::new("Q", "A"), at(1, 0)).unwrap();
        let policy = ReviewPolicy::default();

        let reviewed = store
            .review(card.id, ReviewOutcome::Incorrect, &policy, at(2, 10))
            .unwrap();

        assert_eq!(reviewed.last_reviewed, Some(at(2, 10)));
        assert_eq!(reviewed.due_at, at(2, 10) + Duration::days(1));
        assert!(reviewed.ease_factor < 2.5 && reviewed.ease_factor >= policy.ease_floor);
        assert_eq!(reviewed.review_count, 1);
        assert_eq!(store.get(card.id).unwrap(), reviewed);

        let reviews: i64 = store
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM card_log WHERE card_id = ?1 AND operation = 'review'",
                params![card.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(reviews, 1);
    }

    #[test]
    fn update_review_state_truncates_to_micros() {
        let mut store = store();
        let card = store.create_at(&CardDraft::new("Q", "A"), at(1, 0)).unwrap();
        let reviewed_at = at(1, 12) + Duration::nanoseconds(123_456_789);
        let update = ReviewUpdate {
            due_at: reviewed_at + Duration::days(1),
            ease_factor: 2.3,
            last_reviewed: reviewed_at,
            review_count: 1,
        };

        store.update_review_state(card.id, &update).unwrap();

        let stored = store.get(card.id).unwrap();
        assert_eq!(stored.last_reviewed, Some(reviewed_at.trunc_subsecs(6)));
        assert_eq!(stored.due_at, update.due_at.trunc_subsecs(6));
        assert_eq!(
            stored.last_reviewed.unwrap() - at(1, 12),
            Duration::microseconds(123_456)
        );
    }

    #[test]
    fn review_out_of_range_interval_leaves_card_readable() {
        let mut store = store();
        let card = store.create_at(&CardDraft::new("Q", "A"), at(1, 0)).unwrap();
        let policy = ReviewPolicy {
            correct_interval: Duration::days(3_000_000),
            ..ReviewPolicy::default()
        };

        let result = store.review(card.id, ReviewOutcome::Correct, &policy, at(1, 0));
        assert!(matches!(result, Err(Error::Schedule(_))));

        assert_eq!(store.get(card.id).unwrap(), card);
        assert_eq!(store.get_due(at(1, 0)).unwrap().len(), 1);
    }

    #[test]
    fn malformed_timestamp_row_is_corrupt() {
        let store = store();
        store
            .connection()
            .execute(
                "INSERT INTO cards (question, answer, tags, created_at, due_at, ease_factor) \
                 VALUES ('Q', 'A', '[]', '2026-02-01T00:00:00.000000Z', 'not-a-date', 2.5)",
                [],
            )
            .unwrap();
        let id = store.connection().last_insert_rowid();

        assert!(matches!(store.get(id), Err(Error::Corrupt(ref msg)) if msg.contains("column 6")));
        assert!(matches!(store.get_all(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn review_missing_card_changes_nothing() {
        let mut store = store();
        let result = store.review(5, ReviewOutcome::Correct, &ReviewPolicy::default(), at(1, 0));
        assert!(matches!(result, Err(Error::NotFound(5))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn create_batch_is_all_or_nothing() {
        let mut store = store();
        let drafts = vec![
            CardDraft::new("good", "yes"),
            // blank question trips the table CHECK constraint
            CardDraft::new("  ", "no"),
        ];
        assert!(store.create_batch(&drafts).is_err());
        assert_eq!(store.count().unwrap(), 0);

        let cards = store
            .create_batch(&[CardDraft::new("a", "1"), CardDraft::new("b", "2")])
            .unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards[0].id < cards[1].id);
    }

    #[test]
    fn timestamps_sort_lexically() {
        let a = format_timestamp(at(1, 9));
        let b = format_timestamp(at(1, 10));
        assert!(a < b);
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn decode_tags_is_lenient() {
        assert_eq!(decode_tags(Some(r#"["tag1", "tag2", "tag3"]"#)), vec!["tag1", "tag2", "tag3"]);
        assert_eq!(decode_tags(Some("single_tag")), vec!["single_tag"]);
        assert_eq!(decode_tags(Some("invalid json {")), vec!["invalid json {"]);
        assert!(decode_tags(Some("")).is_empty());
        assert!(decode_tags(None).is_empty());
    }
}
