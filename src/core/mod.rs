//! Core types: identities, players, RNG, configuration and deck state.
//!
//! Everything here is independent of the shared store; the `sync` module
//! layers persistence on top.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{ClientRole, DeckConfig, SyncConfig, BACK_STYLE_COUNT, DEFAULT_META_KEY};
pub use player::{CharacterId, Player, PlayerId, Traits};
pub use rng::DeckRng;
pub use state::Deck;
