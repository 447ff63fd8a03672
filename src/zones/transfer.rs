//! Card movement between the pools of a `Deck`.
//!
//! Everything routes through `Deck::move_cards`: dealing, discarding,
//! reclaiming and special-pool placement differ only in source,
//! destination and facing. Counts are capped, never rejected.

use tracing::debug;

use crate::cards::Facing;
use crate::core::state::Deck;

use super::pool::PoolId;

impl Deck {
    /// Move up to `count` cards (all when `count == 0`) from `from` to the
    /// bottom of `to`.
    ///
    /// Cards come off the top of `from` when `from_top`, otherwise off the
    /// bottom, and keep their removal order. A facing other than `Unset` is
    /// applied to every moved card. Addressing a missing hand moves nothing.
    ///
    /// Returns the number of cards moved.
    pub fn move_cards(
        &mut self,
        to: PoolId,
        from: PoolId,
        count: usize,
        from_top: bool,
        facing: Facing,
    ) -> usize {
        if self.pool(to).is_none() {
            return 0;
        }
        let moved = match self.pool_mut(from) {
            Some(pool) => pool.take(count, from_top),
            None => return 0,
        };
        let n = moved.len();
        if let Some(pool) = self.pool_mut(to) {
            pool.put(moved, facing);
        }
        if n > 0 {
            debug!(?from, ?to, cards = n, ?facing, "cards moved");
        }
        debug_assert!(self.is_conserved());
        n
    }

    /// Shuffle the draw pile.
    pub fn shuffle(&mut self) {
        let Self { draw, rng, .. } = self;
        draw.shuffle(rng);
        debug!(cards = self.draw.len(), "draw pile shuffled");
    }

    /// Cut the draw pile at `index` (clamped).
    pub fn cut(&mut self, index: usize) {
        self.draw.cut(index);
    }

    /// Deal up to `count` cards from the top of the draw pile to a hand.
    pub fn deal(&mut self, hand: usize, count: usize, facing: Facing) -> usize {
        if count == 0 {
            return 0;
        }
        self.move_cards(PoolId::Hand(hand), PoolId::Draw, count, true, facing)
    }

    /// Discard a player's whole hand face up.
    pub fn discard_hand(&mut self, hand: usize) -> usize {
        self.move_cards(PoolId::Discard, PoolId::Hand(hand), 0, true, Facing::Up)
    }

    /// Return the discard pile to the bottom of the draw pile, face down.
    pub fn reclaim_discard(&mut self) -> usize {
        self.move_cards(PoolId::Draw, PoolId::Discard, 0, true, Facing::Down)
    }

    /// Place up to `count` cards from the top of `from` in the special pool,
    /// face up.
    pub fn to_special(&mut self, from: PoolId, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.move_cards(PoolId::Special, from, count, true, Facing::Up)
    }

    /// Gather every card back into the draw pile face down and shuffle.
    pub fn reshuffle(&mut self) {
        let draw = self.draw.take(0, true);
        self.draw.put(draw, Facing::Down);
        for index in 0..self.players.len() {
            self.move_cards(PoolId::Draw, PoolId::Hand(index), 0, true, Facing::Down);
        }
        self.move_cards(PoolId::Draw, PoolId::Discard, 0, true, Facing::Down);
        self.move_cards(PoolId::Draw, PoolId::Special, 0, true, Facing::Down);
        self.shuffle();
    }
}
