//! Playing cards for the initiative deck.
//!
//! A `Card` is identified by its `SequenceId`. Rank, suit and color are
//! derived once from that id at construction and never change; only the
//! facing and the back style move over a card's lifetime.
//!
//! ## Sequence Layout
//!
//! - `1..=52`: standard cards, thirteen per suit in the order
//!   Hearts, Diamonds, Clubs, Spades, ranks 2 through Ace
//! - `53`, `55`: red jokers
//! - `54`, `56`: black jokers
//!
//! ```
//! use initiative_deck::cards::{Card, Rank, SequenceId, Suit};
//!
//! let card = Card::new(SequenceId::new(13));
//! assert_eq!(card.rank, Rank::Ace);
//! assert_eq!(card.suit, Suit::Hearts);
//! ```

use serde::{Deserialize, Serialize};

/// Number of non-joker cards.
pub const STANDARD_CARDS: u8 = 52;

/// Deck size with the two standard jokers.
pub const TWO_JOKER_DECK: u8 = 54;

/// Deck size with four jokers.
pub const FOUR_JOKER_DECK: u8 = 56;

/// Card identity within a deck (`1..=56`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(pub u8);

impl SequenceId {
    /// Create a new sequence ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Card rank. Declaration order is value order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Joker,
}

impl Rank {
    const STANDARD: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value: pips for 2..10, then Jack 11 up to Joker 15.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8 + 2
    }
}

/// Card suit. Jokers carry their own pseudo-suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
    RedJoker,
    BlackJoker,
}

impl Suit {
    const STANDARD: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Color derived from the suit.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds | Suit::RedJoker => Color::Red,
            Suit::Clubs | Suit::Spades | Suit::BlackJoker => Color::Black,
        }
    }

    /// Tie-break order when two cards share a rank.
    ///
    /// Spades > Hearts > Diamonds > Clubs; black joker > red joker.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
            Suit::RedJoker => 4,
            Suit::BlackJoker => 5,
        }
    }
}

/// Card color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Which side of the card is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    /// No facing requested. Moves carrying `Unset` leave facing untouched.
    Unset,
}

/// A card in the initiative deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    /// Identity of the card.
    pub id: SequenceId,

    /// Rank derived from the identity.
    pub rank: Rank,

    /// Suit derived from the identity.
    pub suit: Suit,

    /// Color derived from the suit.
    pub color: Color,

    /// Current facing.
    pub facing: Facing,

    /// Index of the card back artwork.
    pub back_style: u8,
}

impl Card {
    /// Build the card for a sequence id, face down with back style 0.
    ///
    /// Ids past 52 are jokers, alternating red and black.
    #[must_use]
    pub fn new(id: SequenceId) -> Self {
        let (rank, suit) = match id.0 {
            n @ 1..=STANDARD_CARDS => {
                let index = usize::from(n - 1);
                (Rank::STANDARD[index % 13], Suit::STANDARD[index / 13])
            }
            n if n % 2 == 1 => (Rank::Joker, Suit::RedJoker),
            _ => (Rank::Joker, Suit::BlackJoker),
        };

        Self {
            id,
            rank,
            suit,
            color: suit.color(),
            facing: Facing::Down,
            back_style: 0,
        }
    }

    /// Check if this card is a joker.
    #[must_use]
    pub fn is_joker(&self) -> bool {
        self.rank == Rank::Joker
    }

    /// Ordering key for initiative: rank value first, then suit precedence.
    #[must_use]
    pub fn initiative_key(&self) -> (u8, u8) {
        (self.rank.value(), self.suit.precedence())
    }
}

/// Number of cards in a deck for the given joker setting.
#[must_use]
pub const fn deck_size(four_jokers: bool) -> u8 {
    if four_jokers {
        FOUR_JOKER_DECK
    } else {
        TWO_JOKER_DECK
    }
}

/// Build the full card set in sequence order.
#[must_use]
pub fn full_set(four_jokers: bool) -> Vec<Card> {
    (1..=deck_size(four_jokers))
        .map(|n| Card::new(SequenceId(n)))
        .collect()
}
