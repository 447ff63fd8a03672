//! Player identification and per-player initiative state.
//!
//! ## Identities
//!
//! - `CharacterId`: external identity of a character token; the key used to
//!   reconcile local players against the host's item feed
//! - `PlayerId`: the human controlling the character, assigned by the host
//!
//! ## Traits
//!
//! Boolean flags that alter how many cards a player receives each round.
//! They persist across rounds until toggled (or cleared by `hesitant`).

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::zones::Pool;

/// External identity of a character token.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Create a new character ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the human controller, assigned by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-player trait flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Traits {
    /// Keeps the current card and is skipped by the round deal.
    pub on_hold: bool,
    /// Hand is discarded each round but nothing new is dealt.
    pub out_of_combat: bool,
    /// One extra card per round.
    pub level_headed: bool,
    /// Two extra cards per round.
    pub imp_level_headed: bool,
    /// Keeps drawing while every card in hand is five or lower.
    pub quick: bool,
    /// One extra card, and suppresses quick and both level-headed flags.
    pub hesitant: bool,
    /// The player picks which card in hand counts.
    pub choose_card: bool,
}

/// A participant in initiative.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Human controller.
    pub player_id: PlayerId,

    /// External character identity (reconciliation key).
    pub character_id: CharacterId,

    /// Display name.
    pub name: String,

    /// Cards currently held.
    pub hand: Pool,

    /// Trait flags.
    pub traits: Traits,
}

impl Player {
    /// Create a player with an empty hand and no traits.
    #[must_use]
    pub fn new(name: impl Into<String>, character_id: CharacterId, player_id: PlayerId) -> Self {
        Self {
            player_id,
            character_id,
            name: name.into(),
            hand: Pool::new(),
            traits: Traits::default(),
        }
    }

    /// Highest card in hand by rank, ties broken by suit.
    #[must_use]
    pub fn best_card(&self) -> Option<&Card> {
        self.hand.iter().max_by_key(|card| card.initiative_key())
    }

    /// Check if every card in hand is five or lower.
    ///
    /// True for an empty hand.
    #[must_use]
    pub fn hand_all_low(&self) -> bool {
        self.hand.iter().all(|card| card.rank.value() <= 5)
    }
}
