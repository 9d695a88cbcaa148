//! CLI `due` command: list cards ready for review.

use anyhow::Result;
use chrono::Utc;
use flashdeck::config::FlashdeckConfig;

pub fn due(config: &FlashdeckConfig, limit: Option<usize>) -> Result<()> {
    let store = super::open_store(config)?;
    let cards = store.get_due(Utc::now())?;

    if cards.is_empty() {
        println!("Nothing due. Come back later.");
        return Ok(());
    }

    println!("{} card(s) due:", cards.len());
    for card in cards.iter().take(limit.unwrap_or(usize::MAX)) {
        super::print_card_line(card);
    }

    Ok(())
}
