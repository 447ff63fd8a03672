//! Deck state: every pool, the player registry, configuration and RNG.
//!
//! ## Conservation
//!
//! The draw pile, discard pile, special pool and all hands together hold
//! exactly the full card set for the current joker setting, each card once.
//! Pool operations only move cards, so this holds after every call;
//! `Deck::is_conserved` checks it.

use rustc_hash::FxHashSet;

use super::config::{clamp_back_style, DeckConfig};
use super::player::Player;
use super::rng::DeckRng;
use crate::cards::{deck_size, full_set, Card, Facing, SequenceId};
use crate::registry::PlayerRegistry;
use crate::zones::{Pool, PoolId};

/// The shared initiative deck.
#[derive(Clone, Debug)]
pub struct Deck {
    pub(crate) config: DeckConfig,
    pub(crate) draw: Pool,
    pub(crate) discard: Pool,
    pub(crate) special: Pool,
    pub(crate) players: PlayerRegistry,
    pub(crate) rng: DeckRng,
}

impl Deck {
    /// Create a deck with every card shuffled into the draw pile, face down.
    #[must_use]
    pub fn new(config: DeckConfig, seed: u64) -> Self {
        Self::with_rng(config, DeckRng::new(seed))
    }

    /// Create a deck using an existing RNG.
    #[must_use]
    pub fn with_rng(config: DeckConfig, rng: DeckRng) -> Self {
        let mut deck = Self {
            config,
            draw: Pool::new(),
            discard: Pool::new(),
            special: Pool::new(),
            players: PlayerRegistry::new(),
            rng,
        };
        deck.rebuild_draw_pile();
        deck
    }

    /// Assemble a deck from already-validated parts.
    pub(crate) fn from_parts(
        config: DeckConfig,
        draw: Pool,
        discard: Pool,
        special: Pool,
        players: PlayerRegistry,
        rng: DeckRng,
    ) -> Self {
        Self {
            config,
            draw,
            discard,
            special,
            players,
            rng,
        }
    }

    /// Replace every card with a fresh full set in the draw pile, then shuffle.
    ///
    /// Hands, the discard pile and the special pool end up empty.
    pub(crate) fn rebuild_draw_pile(&mut self) {
        for player in self.players.iter_mut() {
            player.hand = Pool::new();
        }
        self.discard = Pool::new();
        self.special = Pool::new();

        let mut draw = Pool::from_cards(full_set(self.config.use_four_jokers));
        draw.set_back_style(self.config.back_style_index);
        draw.shuffle(&mut self.rng);
        self.draw = draw;
    }

    /// Return to the default configuration with a fresh shuffled card set.
    ///
    /// Players stay registered with empty hands.
    pub fn reset(&mut self) {
        self.config = DeckConfig::default();
        self.rebuild_draw_pile();
    }

    // === Accessors ===

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Draw pile, top first.
    #[must_use]
    pub fn draw_pile(&self) -> &Pool {
        &self.draw
    }

    /// Discard pile, top first.
    #[must_use]
    pub fn discard_pile(&self) -> &Pool {
        &self.discard
    }

    /// Special pool, top first.
    #[must_use]
    pub fn special_pool(&self) -> &Pool {
        &self.special
    }

    /// Registered players.
    #[must_use]
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// Registered players, mutably.
    pub fn players_mut(&mut self) -> &mut PlayerRegistry {
        &mut self.players
    }

    /// Look up a pool by address.
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        match id {
            PoolId::Draw => Some(&self.draw),
            PoolId::Discard => Some(&self.discard),
            PoolId::Special => Some(&self.special),
            PoolId::Hand(index) => self.players.at(index).map(|player| &player.hand),
        }
    }

    /// Look up a pool by address, mutably.
    pub fn pool_mut(&mut self, id: PoolId) -> Option<&mut Pool> {
        match id {
            PoolId::Draw => Some(&mut self.draw),
            PoolId::Discard => Some(&mut self.discard),
            PoolId::Special => Some(&mut self.special),
            PoolId::Hand(index) => self.players.at_mut(index).map(|player| &mut player.hand),
        }
    }

    /// Size of the full card set for the current joker setting.
    #[must_use]
    pub fn card_count(&self) -> usize {
        usize::from(deck_size(self.config.use_four_jokers))
    }

    /// Every card in every pool: draw, discard, special, then hands.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.draw
            .iter()
            .chain(self.discard.iter())
            .chain(self.special.iter())
            .chain(self.players.iter().flat_map(|player: &Player| player.hand.iter()))
    }

    /// Check the conservation invariant.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let expected = self.card_count();
        let mut seen = FxHashSet::default();
        let mut total = 0usize;
        for card in self.all_cards() {
            total += 1;
            let in_range = (1..=expected).contains(&usize::from(card.id.raw()));
            if !in_range || !seen.insert(card.id) {
                return false;
            }
        }
        total == expected
    }

    /// Find which pool holds a card.
    #[must_use]
    pub fn locate(&self, id: SequenceId) -> Option<PoolId> {
        if self.draw.contains(id) {
            return Some(PoolId::Draw);
        }
        if self.discard.contains(id) {
            return Some(PoolId::Discard);
        }
        if self.special.contains(id) {
            return Some(PoolId::Special);
        }
        self.players
            .iter()
            .position(|player| player.hand.contains(id))
            .map(PoolId::Hand)
    }

    // === Configuration ===

    /// Set the back style (clamped) and apply it to every card.
    pub fn set_back_style(&mut self, index: usize) {
        let style = clamp_back_style(index);
        self.config.back_style_index = style;
        self.draw.set_back_style(style);
        self.discard.set_back_style(style);
        self.special.set_back_style(style);
        for player in self.players.iter_mut() {
            player.hand.set_back_style(style);
        }
    }

    /// Set the display scale. Returns false, leaving the scale alone, for
    /// NaN or infinite values.
    pub fn set_scale(&mut self, scale: f32) -> bool {
        if !scale.is_finite() {
            return false;
        }
        self.config.scale = scale;
        true
    }

    /// Set discard pile visibility.
    pub fn set_show_discard(&mut self, show: bool) {
        self.config.show_discard = show;
    }

    /// Set special pool visibility.
    pub fn set_show_pool(&mut self, show: bool) {
        self.config.show_pool = show;
    }

    /// Count face-up cards across all pools.
    #[must_use]
    pub fn face_up_count(&self) -> usize {
        self.all_cards()
            .filter(|card| card.facing == Facing::Up)
            .count()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::with_rng(DeckConfig::default(), DeckRng::from_entropy())
    }
}
