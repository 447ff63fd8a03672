//! Ordered card pools and the single transfer primitive between them.
//!
//! Every pool (draw pile, discard pile, special pool, each hand) is an
//! ordered sequence with a top (front, index 0) and a bottom (back).
//! Cards only ever move; they are never created or destroyed here.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Facing, SequenceId};
use crate::core::rng::DeckRng;

/// Address of a pool inside a `Deck`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolId {
    /// Draw pile.
    Draw,
    /// Discard pile.
    Discard,
    /// Special pool (cards set aside by the GM).
    Special,
    /// Hand of the player at this registry index.
    Hand(usize),
}

/// An ordered collection of cards.
///
/// Index 0 is the top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pool {
    cards: Vec<Card>,
}

impl Pool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool holding `cards`, top first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Number of cards in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in order, top first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate over cards, top first.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Top card, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Check if a card is in the pool.
    #[must_use]
    pub fn contains(&self, id: SequenceId) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    /// Append a card at the bottom, applying `facing` unless it is `Unset`.
    pub fn push(&mut self, mut card: Card, facing: Facing) {
        if facing != Facing::Unset {
            card.facing = facing;
        }
        self.cards.push(card);
    }

    /// Append cards at the bottom in the given order.
    pub fn put(&mut self, cards: impl IntoIterator<Item = Card>, facing: Facing) {
        for card in cards {
            self.push(card, facing);
        }
    }

    /// Remove up to `count` cards (all when `count == 0`).
    ///
    /// Cards come off the top when `from_top`, otherwise off the bottom,
    /// and are returned in the order they were removed.
    pub fn take(&mut self, count: usize, from_top: bool) -> Vec<Card> {
        let n = if count == 0 {
            self.cards.len()
        } else {
            count.min(self.cards.len())
        };

        if from_top {
            self.cards.drain(..n).collect()
        } else {
            let mut taken = self.cards.split_off(self.cards.len() - n);
            taken.reverse();
            taken
        }
    }

    /// Remove a specific card.
    pub fn remove(&mut self, id: SequenceId) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Move up to `count` cards from this pool to the bottom of `to`.
    ///
    /// Returns the number of cards moved.
    pub fn move_to(&mut self, to: &mut Pool, count: usize, from_top: bool, facing: Facing) -> usize {
        let moved = self.take(count, from_top);
        let n = moved.len();
        to.put(moved, facing);
        n
    }

    /// Shuffle the pool in place.
    pub fn shuffle(&mut self, rng: &mut DeckRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Rotate so that `[index, end)` precedes `[0, index)`.
    ///
    /// `index` is clamped to the pool length.
    pub fn cut(&mut self, index: usize) {
        let index = index.min(self.cards.len());
        self.cards.rotate_left(index);
    }

    /// Set the back style of every card.
    pub fn set_back_style(&mut self, style: u8) {
        for card in &mut self.cards {
            card.back_style = style;
        }
    }
}

impl<'a> IntoIterator for &'a Pool {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
