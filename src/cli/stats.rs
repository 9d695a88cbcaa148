use anyhow::Result;
use chrono::Utc;
use flashdeck::cards::stats::review_stats;
use flashdeck::config::FlashdeckConfig;

/// Display review statistics in the terminal.
pub fn stats(config: &FlashdeckConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let stats = review_stats(store.connection(), Utc::now())?;

    println!("Review Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total cards:         {}", stats.total_cards);
    println!("  Reviewed:            {}", stats.reviewed_cards);
    println!("  Due now:             {}", stats.cards_due_for_review);
    println!("  Not due:             {}", stats.cards_not_due);
    println!("  Average ease:        {:.2}", stats.average_ease_factor);
    println!("  Completion:          {:.1}%", stats.review_completion_rate);

    Ok(())
}
