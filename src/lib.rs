//! # initiative-deck
//!
//! A card-based initiative deck for tabletop sessions, shared between
//! several clients through an external key-value store.
//!
//! ## Design Principles
//!
//! 1. **Cards Are Conserved**: Every card lives in exactly one pool (draw,
//!    discard, special or a hand). Operations move cards, never copy or drop
//!    them.
//!
//! 2. **Nothing Local Fails**: Pool and rule operations clamp their
//!    arguments instead of rejecting them. Only encoding, decoding and store
//!    calls return errors.
//!
//! 3. **Explicit Context**: The `SyncController` owns the `Deck`; everything
//!    else takes it by reference.
//!
//! ## Modules
//!
//! - `core`: Identifiers, players and traits, RNG, configuration, deck state
//! - `cards`: Card identity, ranks, suits and facing
//! - `zones`: Pools and card transfers between them
//! - `rules`: Initiative dealing rules
//! - `registry`: Players keyed by external character identity
//! - `codec`: Compressed snapshot encoding
//! - `sync`: Shared-store boundary and synchronization controller
//! - `error`: Error types

pub mod cards;
pub mod codec;
pub mod core;
pub mod error;
pub mod registry;
pub mod rules;
pub mod sync;
pub mod zones;

pub use crate::core::{
    CharacterId, ClientRole, Deck, DeckConfig, DeckRng, Player, PlayerId, SyncConfig, Traits,
};

pub use crate::cards::{Card, Color, Facing, Rank, SequenceId, Suit};

pub use crate::zones::{Pool, PoolId};

pub use crate::rules::{
    choose_card, deal_interlude, deal_round, initiative_order, joker_drawn, set_four_jokers,
    RoundOutcome, RoundReport,
};

pub use crate::registry::{CharacterMeta, PlayerRegistry, ReconcileOutcome};

pub use crate::codec::{decode, decode_or_default, encode, DeckMeta};

pub use crate::sync::{
    ItemRecord, MemoryStore, RenderReason, RenderSink, SessionStore, StoreEvent, SyncController,
    SyncState,
};

pub use crate::error::{DecodeError, EncodeError, PublishError, StoreError};
