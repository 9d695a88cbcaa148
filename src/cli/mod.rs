pub mod doctor;
pub mod due;
pub mod export;
pub mod inspect;
pub mod review;
pub mod stats;

use anyhow::Result;
use flashdeck::cards::{Card, CardStore};
use flashdeck::config::FlashdeckConfig;

/// Open the configured store with the configured default ease factor.
fn open_store(config: &FlashdeckConfig) -> Result<CardStore> {
    let store = CardStore::open(config.resolved_db_path())?
        .with_default_ease_factor(config.review.default_ease_factor);
    Ok(store)
}

/// Cut long text down to `max` characters for one-line listings.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn print_card_line(card: &Card) {
    println!(
        "  #{:<5} due {}  ease {:.2}  {}",
        card.id,
        card.due_at.format("%Y-%m-%d %H:%M"),
        card.ease_factor,
        preview(&card.question, 60)
    );
}
