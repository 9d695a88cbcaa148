use anyhow::Result;
use chrono::Utc;
use flashdeck::cards::{ReviewOutcome, ReviewPolicy};
use flashdeck::config::FlashdeckConfig;

/// Grade one card from the command line.
pub fn review(config: &FlashdeckConfig, id: i64, outcome: &str) -> Result<()> {
    // Parse before opening anything so a typo never touches the database.
    let outcome: ReviewOutcome = outcome.parse()?;
    let policy = ReviewPolicy::from_config(&config.review);

    let mut store = super::open_store(config)?;
    let card = store.review(id, outcome, &policy, Utc::now())?;

    println!(
        "Card #{} marked {}; next review {} (ease {:.2})",
        card.id,
        outcome,
        card.due_at.format("%Y-%m-%d %H:%M UTC"),
        card.ease_factor
    );
    Ok(())
}
