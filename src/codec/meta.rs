//! Wire form of the deck: `DeckMeta`.
//!
//! A flattened, serde-friendly snapshot with enough information to rebuild
//! the deck and registry on another client: configuration, every pool as a
//! list of `(id, facing, back)` entries, and each player's traits and hand.
//!
//! ## Reconstruction
//!
//! `into_layout` validates before anything is touched:
//! - an id outside `1..=N` or seen twice is `DecodeError::Inconsistent`
//! - ids missing from every pool are appended to the draw pile face down
//! - a character listed twice keeps its first entry; later hands are discarded

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cards::{deck_size, Card, Facing, SequenceId};
use crate::core::config::DeckConfig;
use crate::core::rng::DeckRng;
use crate::core::state::Deck;
use crate::error::DecodeError;
use crate::registry::{CharacterMeta, PlayerRegistry};
use crate::zones::Pool;

/// One card's position entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    /// Card identity.
    pub id: SequenceId,

    /// Facing when captured.
    #[serde(default)]
    pub facing: Facing,

    /// Back style when captured.
    #[serde(default)]
    pub back: u8,
}

impl From<&Card> for CardMeta {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            facing: card.facing,
            back: card.back_style,
        }
    }
}

impl CardMeta {
    fn to_card(self) -> Card {
        let mut card = Card::new(self.id);
        card.facing = self.facing;
        card.back_style = self.back;
        card
    }
}

/// One player's entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMeta {
    /// Identity, name and traits.
    #[serde(flatten)]
    pub character: CharacterMeta,

    /// Hand, top first.
    #[serde(default)]
    pub hand: Vec<CardMeta>,
}

/// Complete serializable deck snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMeta {
    /// Publish counter of the originating client.
    #[serde(default)]
    pub revision: u64,

    /// Client that published this snapshot.
    #[serde(default)]
    pub origin: String,

    /// Configuration surface.
    #[serde(default)]
    pub config: DeckConfig,

    /// Draw pile, top first.
    #[serde(default)]
    pub draw_pile: Vec<CardMeta>,

    /// Discard pile, top first.
    #[serde(default)]
    pub discard_pile: Vec<CardMeta>,

    /// Special pool, top first.
    #[serde(default)]
    pub special_pool: Vec<CardMeta>,

    /// Players in registration order.
    #[serde(default)]
    pub players: Vec<PlayerMeta>,
}

/// Validated pools ready to be installed into a deck.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    pub config: DeckConfig,
    pub draw: Pool,
    pub discard: Pool,
    pub special: Pool,
    pub players: Vec<(CharacterMeta, Pool)>,
}

fn pool_meta(pool: &Pool) -> Vec<CardMeta> {
    pool.iter().map(CardMeta::from).collect()
}

impl DeckMeta {
    /// Capture the full state of a deck.
    #[must_use]
    pub fn capture(deck: &Deck, revision: u64, origin: impl Into<String>) -> Self {
        Self {
            revision,
            origin: origin.into(),
            config: *deck.config(),
            draw_pile: pool_meta(deck.draw_pile()),
            discard_pile: pool_meta(deck.discard_pile()),
            special_pool: pool_meta(deck.special_pool()),
            players: deck
                .players()
                .iter()
                .map(|player| PlayerMeta {
                    character: CharacterMeta::from_player(player),
                    hand: pool_meta(&player.hand),
                })
                .collect(),
        }
    }

    /// Number of card entries across every pool.
    #[must_use]
    pub fn card_entries(&self) -> usize {
        self.draw_pile.len()
            + self.discard_pile.len()
            + self.special_pool.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// Validate and build the pools.
    pub(crate) fn into_layout(self) -> Result<Layout, DecodeError> {
        let size = deck_size(self.config.use_four_jokers);
        let mut seen: FxHashSet<SequenceId> = FxHashSet::default();

        let mut build = |entries: Vec<CardMeta>| -> Result<Pool, DecodeError> {
            let mut pool = Pool::new();
            for entry in entries {
                if !(1..=size).contains(&entry.id.raw()) {
                    return Err(DecodeError::Inconsistent(format!(
                        "card {} outside 1..={size}",
                        entry.id
                    )));
                }
                if !seen.insert(entry.id) {
                    return Err(DecodeError::Inconsistent(format!(
                        "card {} appears twice",
                        entry.id
                    )));
                }
                pool.push(entry.to_card(), Facing::Unset);
            }
            Ok(pool)
        };

        let mut draw = build(self.draw_pile)?;
        let mut discard = build(self.discard_pile)?;
        let special = build(self.special_pool)?;

        let mut players: Vec<(CharacterMeta, Pool)> = Vec::with_capacity(self.players.len());
        for entry in self.players {
            let mut hand = build(entry.hand)?;
            if players
                .iter()
                .any(|(character, _)| character.character_id == entry.character.character_id)
            {
                warn!(character = %entry.character.character_id, "duplicate player in snapshot");
                hand.move_to(&mut discard, 0, true, Facing::Up);
                continue;
            }
            players.push((entry.character, hand));
        }

        let missing: Vec<SequenceId> = (1..=size)
            .map(SequenceId::new)
            .filter(|id| !seen.contains(id))
            .collect();
        if !missing.is_empty() {
            warn!(count = missing.len(), "snapshot missing cards, returning them to the draw pile");
            for id in missing {
                let mut card = Card::new(id);
                card.back_style = self.config.back_style_index;
                draw.push(card, Facing::Down);
            }
        }

        Ok(Layout {
            config: self.config,
            draw,
            discard,
            special,
            players,
        })
    }

    /// Rebuild a complete deck, players included.
    pub fn into_deck(self, rng: DeckRng) -> Result<Deck, DecodeError> {
        let layout = self.into_layout()?;
        let mut registry = PlayerRegistry::new();
        for (character, hand) in layout.players {
            registry.upsert(&character).hand = hand;
        }
        Ok(Deck::from_parts(
            layout.config,
            layout.draw,
            layout.discard,
            layout.special,
            registry,
            rng,
        ))
    }
}
