//! CLI `inspect` command: display full details for a single card.

use anyhow::Result;
use flashdeck::config::FlashdeckConfig;

/// Inspect a single card by ID and display full details.
pub fn inspect(config: &FlashdeckConfig, id: i64) -> Result<()> {
    let store = super::open_store(config)?;
    let card = store.get(id)?;

    println!("Card #{}", card.id);
    println!("{}", "=".repeat(50));
    println!("  Created:        {}", card.created_at.to_rfc3339());
    println!("  Due:            {}", card.due_at.to_rfc3339());
    println!("  Ease factor:    {:.2}", card.ease_factor);
    println!("  Reviews:        {}", card.review_count);
    if let Some(last) = card.last_reviewed {
        println!("  Last reviewed:  {}", last.to_rfc3339());
    }
    if !card.tags.is_empty() {
        println!("  Tags:           {}", card.tags.join(", "));
    }
    println!();
    println!("Question:");
    println!("  {}", card.question);
    println!();
    println!("Answer:");
    println!("  {}", card.answer);
    if let Some(ref hint) = card.hint {
        println!();
        println!("Hint:");
        println!("  {hint}");
    }

    Ok(())
}
