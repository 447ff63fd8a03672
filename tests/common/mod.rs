//! Shared helpers for integration tests.

#![allow(dead_code)]

use initiative_deck::{CharacterId, CharacterMeta, Deck, DeckConfig, ItemRecord, PlayerId, Traits};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test-writer subscriber once. `TEST_LOG`, then `RUST_LOG`,
/// then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Character metadata with no traits.
pub fn character(id: &str) -> CharacterMeta {
    CharacterMeta::new(CharacterId::new(id), PlayerId::new("gm"), id.to_uppercase())
}

/// Item feed entries carrying metadata for each id.
pub fn items(ids: &[&str]) -> Vec<ItemRecord> {
    ids.iter()
        .map(|id| ItemRecord::with_meta(format!("token-{id}"), character(id)))
        .collect()
}

/// A deck with one player per entry, registered in order as "p0", "p1", ...
pub fn deck_with(config: DeckConfig, seed: u64, traits: &[Traits]) -> Deck {
    let mut deck = Deck::new(config, seed);
    for (i, t) in traits.iter().enumerate() {
        let id = format!("p{i}");
        let player = deck
            .players_mut()
            .add_player(id.clone(), CharacterId::new(id), PlayerId::new("gm"))
            .expect("fresh character");
        player.traits = *t;
    }
    deck
}
