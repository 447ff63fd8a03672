//! Initiative dealing rules.
//!
//! A round visits players in registration order. For each player:
//!
//! 1. `hesitant` clears `quick`, `level_headed` and `imp_level_headed`
//! 2. `on_hold` skips the player (hand kept, nothing dealt)
//! 3. The hand is discarded face up
//! 4. `out_of_combat` stops here
//! 5. One card is dealt face up
//! 6. `imp_level_headed` deals one more
//! 7. `level_headed`, `imp_level_headed` or `hesitant` deals one more
//! 8. `quick` keeps dealing while every card in hand is five or lower
//!
//! Running out of cards at any step just stops dealing.

use tracing::{debug, info};

use crate::cards::{Facing, SequenceId};
use crate::core::player::{CharacterId, Player};
use crate::core::state::Deck;

/// What happened to one player during a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// On hold: skipped entirely.
    Held,
    /// Out of combat: hand discarded, nothing dealt.
    OutOfCombat,
    /// Hand replaced by this many new cards.
    Dealt(usize),
}

/// Per-player outcomes of a round, in dealing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// `(character, outcome)` pairs in registration order.
    pub entries: Vec<(CharacterId, RoundOutcome)>,
}

impl RoundReport {
    /// Outcome for a character, if it took part.
    #[must_use]
    pub fn outcome(&self, character_id: &CharacterId) -> Option<RoundOutcome> {
        self.entries
            .iter()
            .find(|(id, _)| id == character_id)
            .map(|(_, outcome)| *outcome)
    }

    /// Total cards dealt this round.
    #[must_use]
    pub fn cards_dealt(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, outcome)| match outcome {
                RoundOutcome::Dealt(n) => *n,
                _ => 0,
            })
            .sum()
    }
}

/// Deal one initiative round to every player.
pub fn deal_round(deck: &mut Deck) -> RoundReport {
    let mut report = RoundReport::default();

    for index in 0..deck.players.len() {
        let Some(player) = deck.players.at_mut(index) else {
            break;
        };
        let character_id = player.character_id.clone();

        if player.traits.hesitant {
            player.traits.quick = false;
            player.traits.level_headed = false;
            player.traits.imp_level_headed = false;
        }
        let traits = player.traits;

        if traits.on_hold {
            report.entries.push((character_id, RoundOutcome::Held));
            continue;
        }

        deck.discard_hand(index);

        if traits.out_of_combat {
            report.entries.push((character_id, RoundOutcome::OutOfCombat));
            continue;
        }

        let mut dealt = deck.deal(index, 1, Facing::Up);
        if traits.imp_level_headed {
            dealt += deck.deal(index, 1, Facing::Up);
        }
        if traits.level_headed || traits.imp_level_headed || traits.hesitant {
            dealt += deck.deal(index, 1, Facing::Up);
        }
        if traits.quick {
            while deck.players.at(index).is_some_and(Player::hand_all_low) {
                let n = deck.deal(index, 1, Facing::Up);
                if n == 0 {
                    break;
                }
                dealt += n;
            }
        }

        debug!(character = %character_id, cards = dealt, "initiative dealt");
        report.entries.push((character_id, RoundOutcome::Dealt(dealt)));
    }

    info!(
        players = report.entries.len(),
        cards = report.cards_dealt(),
        draw_pile = deck.draw.len(),
        "initiative round dealt"
    );
    report
}

/// Discard every hand and deal each player exactly one face-up card,
/// ignoring all trait flags.
pub fn deal_interlude(deck: &mut Deck) -> usize {
    let mut dealt = 0;
    for index in 0..deck.players.len() {
        deck.discard_hand(index);
        dealt += deck.deal(index, 1, Facing::Up);
    }
    info!(cards = dealt, "interlude dealt");
    dealt
}

/// Check whether a joker is showing in any hand, the discard pile or the
/// special pool. Advisory only: the caller decides whether to reshuffle.
#[must_use]
pub fn joker_drawn(deck: &Deck) -> bool {
    deck.players
        .iter()
        .flat_map(|player| player.hand.iter())
        .chain(deck.discard.iter())
        .chain(deck.special.iter())
        .any(|card| card.is_joker())
}

/// Switch between the 54 and 56 card decks.
///
/// Every pool is emptied and the draw pile is rebuilt with the new card set
/// and shuffled. Returns false when the setting was already `enabled`.
pub fn set_four_jokers(deck: &mut Deck, enabled: bool) -> bool {
    if deck.config.use_four_jokers == enabled {
        return false;
    }
    deck.config.use_four_jokers = enabled;
    deck.rebuild_draw_pile();
    info!(cards = deck.draw.len(), four_jokers = enabled, "deck rebuilt");
    true
}

/// Characters in acting order.
///
/// Players are ranked by their best card (rank, then suit); players with
/// empty hands follow in registration order.
#[must_use]
pub fn initiative_order(deck: &Deck) -> Vec<CharacterId> {
    let mut holding: Vec<(usize, (u8, u8), &CharacterId)> = Vec::new();
    let mut empty: Vec<&CharacterId> = Vec::new();

    for (index, player) in deck.players.iter().enumerate() {
        match player.best_card() {
            Some(card) => holding.push((index, card.initiative_key(), &player.character_id)),
            None => empty.push(&player.character_id),
        }
    }

    holding.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    holding
        .into_iter()
        .map(|(_, _, id)| id)
        .chain(empty)
        .cloned()
        .collect()
}

/// Keep one card from a player's hand and discard the rest face up.
///
/// Returns false if the character has no player or the card is not in
/// their hand.
pub fn choose_card(deck: &mut Deck, character_id: &CharacterId, card: SequenceId) -> bool {
    let Some(player) = deck.players.get_mut(character_id) else {
        return false;
    };
    let Some(chosen) = player.hand.remove(card) else {
        return false;
    };
    let rest = player.hand.take(0, true);
    player.hand.push(chosen, Facing::Unset);
    deck.discard.put(rest, Facing::Up);
    debug_assert!(deck.is_conserved());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank};
    use crate::core::config::DeckConfig;
    use crate::core::player::{PlayerId, Traits};
    use crate::zones::Pool;

    fn deck_with(traits: &[Traits]) -> Deck {
        let mut deck = Deck::new(DeckConfig::default(), 42);
        for (i, t) in traits.iter().enumerate() {
            let player = deck
                .players_mut()
                .add_player(format!("P{i}"), CharacterId::new(format!("c{i}")), PlayerId::new("gm"))
                .unwrap();
            player.traits = *t;
        }
        deck
    }

    /// Put specific cards on top of the draw pile, in order.
    fn stack_draw_pile(deck: &mut Deck, ids: &[u8]) {
        let mut top = Vec::new();
        for &id in ids {
            let card = deck.draw.remove(SequenceId::new(id)).unwrap();
            top.push(card);
        }
        let rest = deck.draw.take(0, true);
        deck.draw = Pool::from_cards(top);
        deck.draw.put(rest, Facing::Unset);
    }

    fn hand(deck: &Deck, index: usize) -> &Pool {
        &deck.players().at(index).unwrap().hand
    }

    #[test]
    fn test_plain_round() {
        let mut deck = deck_with(&[Traits::default(); 4]);

        let report = deal_round(&mut deck);

        assert_eq!(deck.draw_pile().len(), 52);
        assert!(deck.discard_pile().is_empty());
        for index in 0..4 {
            assert_eq!(hand(&deck, index).len(), 1);
            assert_eq!(hand(&deck, index).cards()[0].facing, Facing::Up);
        }
        assert_eq!(report.cards_dealt(), 4);
        assert!(deck.is_conserved());
    }

    #[test]
    fn test_second_round_discards_previous_hand() {
        let mut deck = deck_with(&[Traits::default(); 2]);
        deal_round(&mut deck);
        deal_round(&mut deck);

        assert_eq!(deck.discard_pile().len(), 2);
        assert_eq!(hand(&deck, 0).len(), 1);
        assert!(deck.is_conserved());
    }

    #[test]
    fn test_on_hold_skipped() {
        let mut deck = deck_with(&[Traits::default(); 2]);
        deal_round(&mut deck);
        let kept = hand(&deck, 1).cards()[0].id;
        deck.players_mut().at_mut(1).unwrap().traits.on_hold = true;

        let report = deal_round(&mut deck);

        assert_eq!(report.outcome(&CharacterId::new("c1")), Some(RoundOutcome::Held));
        assert_eq!(hand(&deck, 1).cards()[0].id, kept);
        assert_eq!(hand(&deck, 1).len(), 1);
        // Only the other player's card was discarded
        assert_eq!(deck.discard_pile().len(), 1);
    }

    #[test]
    fn test_out_of_combat_discards_only() {
        let mut deck = deck_with(&[Traits::default()]);
        deal_round(&mut deck);
        deck.players_mut().at_mut(0).unwrap().traits.out_of_combat = true;

        let report = deal_round(&mut deck);

        assert_eq!(report.outcome(&CharacterId::new("c0")), Some(RoundOutcome::OutOfCombat));
        assert!(hand(&deck, 0).is_empty());
        assert_eq!(deck.discard_pile().len(), 1);
    }

    #[test]
    fn test_level_headed_gets_two() {
        let mut deck = deck_with(&[Traits {
            level_headed: true,
            ..Traits::default()
        }]);
        deal_round(&mut deck);
        assert_eq!(hand(&deck, 0).len(), 2);
    }

    #[test]
    fn test_imp_level_headed_gets_three() {
        let mut deck = deck_with(&[Traits {
            imp_level_headed: true,
            ..Traits::default()
        }]);
        deal_round(&mut deck);
        assert_eq!(hand(&deck, 0).len(), 3);
        assert!(hand(&deck, 0).iter().all(|c| c.facing == Facing::Up));
    }

    #[test]
    fn test_hesitant_suppresses_other_traits() {
        let mut deck = deck_with(&[Traits {
            hesitant: true,
            level_headed: true,
            quick: true,
            ..Traits::default()
        }]);
        // Low cards on top would keep a quick player drawing.
        stack_draw_pile(&mut deck, &[1, 2, 3, 4]);

        deal_round(&mut deck);

        let traits = deck.players().at(0).unwrap().traits;
        assert!(!traits.level_headed);
        assert!(!traits.quick);
        assert!(traits.hesitant);
        assert_eq!(hand(&deck, 0).len(), 2);
    }

    #[test]
    fn test_quick_draws_past_low_cards() {
        let mut deck = deck_with(&[Traits {
            quick: true,
            ..Traits::default()
        }]);
        // 2, 3 of hearts then a king of hearts
        stack_draw_pile(&mut deck, &[1, 2, 12]);

        deal_round(&mut deck);

        let ranks: Vec<_> = hand(&deck, 0).iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![Rank::Two, Rank::Three, Rank::King]);
    }

    #[test]
    fn test_quick_stops_on_high_card() {
        let mut deck = deck_with(&[Traits {
            quick: true,
            ..Traits::default()
        }]);
        stack_draw_pile(&mut deck, &[9]);

        deal_round(&mut deck);

        assert_eq!(hand(&deck, 0).len(), 1);
    }

    #[test]
    fn test_quick_with_empty_draw_pile_terminates() {
        let mut deck = deck_with(&[Traits {
            quick: true,
            ..Traits::default()
        }]);
        deck.move_cards(crate::zones::PoolId::Special, crate::zones::PoolId::Draw, 0, true, Facing::Up);

        let report = deal_round(&mut deck);

        assert_eq!(report.outcome(&CharacterId::new("c0")), Some(RoundOutcome::Dealt(0)));
        assert!(hand(&deck, 0).is_empty());
        assert!(deck.is_conserved());
    }

    #[test]
    fn test_quick_exhausts_draw_pile_without_error() {
        let mut deck = deck_with(&[Traits {
            quick: true,
            ..Traits::default()
        }]);
        // Leave only low cards in the draw pile.
        let low: Vec<u8> = vec![1, 2, 3, 4];
        stack_draw_pile(&mut deck, &low);
        let rest = deck.draw.len() - low.len();
        deck.move_cards(crate::zones::PoolId::Special, crate::zones::PoolId::Draw, rest, false, Facing::Up);

        deal_round(&mut deck);

        assert_eq!(hand(&deck, 0).len(), 4);
        assert!(deck.draw_pile().is_empty());
        assert!(deck.is_conserved());
    }

    #[test]
    fn test_interlude_ignores_traits() {
        let traits = Traits {
            on_hold: true,
            imp_level_headed: true,
            ..Traits::default()
        };
        let mut deck = deck_with(&[traits, traits]);

        assert_eq!(deal_interlude(&mut deck), 2);
        assert_eq!(hand(&deck, 0).len(), 1);
        assert_eq!(hand(&deck, 1).len(), 1);

        deal_interlude(&mut deck);
        assert_eq!(deck.discard_pile().len(), 2);
    }

    #[test]
    fn test_joker_drawn() {
        let mut deck = deck_with(&[Traits::default()]);
        assert!(!joker_drawn(&deck));

        stack_draw_pile(&mut deck, &[53]);
        deal_round(&mut deck);
        assert!(joker_drawn(&deck));

        // Still detected after being discarded
        deck.discard_hand(0);
        assert!(joker_drawn(&deck));

        deck.reclaim_discard();
        assert!(!joker_drawn(&deck));
    }

    #[test]
    fn test_set_four_jokers() {
        let mut deck = deck_with(&[Traits::default()]);
        deal_round(&mut deck);

        assert!(!set_four_jokers(&mut deck, true));
        assert!(set_four_jokers(&mut deck, false));

        assert_eq!(deck.draw_pile().len(), 54);
        assert!(hand(&deck, 0).is_empty());
        assert!(deck.is_conserved());

        assert!(set_four_jokers(&mut deck, true));
        assert_eq!(deck.draw_pile().len(), 56);
        assert!(deck.is_conserved());
    }

    #[test]
    fn test_initiative_order() {
        let mut deck = deck_with(&[Traits::default(); 4]);
        // c0: 5 of hearts, c1: king of spades, c2: king of hearts, c3: out of combat
        stack_draw_pile(&mut deck, &[4, 51, 12]);
        deck.players_mut().at_mut(3).unwrap().traits.out_of_combat = true;

        deal_round(&mut deck);

        let order: Vec<_> = initiative_order(&deck)
            .into_iter()
            .map(|id| id.0)
            .collect();
        assert_eq!(order, vec!["c1", "c2", "c0", "c3"]);
    }

    #[test]
    fn test_choose_card() {
        let mut deck = deck_with(&[Traits {
            imp_level_headed: true,
            choose_card: true,
            ..Traits::default()
        }]);
        stack_draw_pile(&mut deck, &[1, 2, 3]);
        deal_round(&mut deck);

        let character = CharacterId::new("c0");
        assert!(!choose_card(&mut deck, &character, SequenceId::new(40)));
        assert!(choose_card(&mut deck, &character, SequenceId::new(2)));

        let held: Vec<Card> = hand(&deck, 0).cards().to_vec();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, SequenceId::new(2));
        assert_eq!(deck.discard_pile().len(), 2);
        assert!(deck.is_conserved());
    }
}
