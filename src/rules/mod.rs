//! Initiative rule engine.
//!
//! Consumes per-player trait flags and the pool engine to decide who gets
//! which cards each round. None of these operations can fail: a depleted
//! draw pile simply stops the dealing.

pub mod initiative;

pub use initiative::{
    choose_card, deal_interlude, deal_round, initiative_order, joker_drawn, set_four_jokers,
    RoundOutcome, RoundReport,
};
