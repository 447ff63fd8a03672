//! Pool engine: ordered card pools and the transfers between them.
//!
//! ## Key Types
//!
//! - `Pool`: Ordered cards, top first
//! - `PoolId`: Address of a pool inside a `Deck` (draw, discard, special, hand)
//!
//! Transfer operations (`move_cards`, `deal`, `discard_hand`,
//! `reclaim_discard`, `to_special`, `reshuffle`, `shuffle`, `cut`) are
//! methods on `Deck`, defined in `transfer`.

pub mod pool;
mod transfer;

pub use pool::{Pool, PoolId};
