use anyhow::Result;
use flashdeck::config::FlashdeckConfig;

/// Export all cards as JSON to stdout.
pub fn export(config: &FlashdeckConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let cards = store.get_all()?;

    let json = serde_json::to_string_pretty(&cards)?;
    println!("{json}");

    eprintln!("Exported {} cards.", cards.len());
    Ok(())
}
