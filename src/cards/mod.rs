//! Card model: identity, rank, suit, color, facing and back style.
//!
//! ## Key Types
//!
//! - `SequenceId`: Card identity (`1..=N`, N = 54 or 56)
//! - `Card`: Identity plus derived rank/suit/color and mutable facing/back
//! - `Facing`: Up, down, or unset

pub mod card;

pub use card::{
    deck_size, full_set, Card, Color, Facing, Rank, SequenceId, Suit, FOUR_JOKER_DECK,
    STANDARD_CARDS, TWO_JOKER_DECK,
};
