use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Hard and soft totals of a set of cards.
///
/// `soft` counts one ace as eleven, and only when that does not bust; if no
/// such ace exists `soft == hard` and `is_soft` is false.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandValue {
    pub hard: u8,
    pub soft: u8,
    pub is_soft: bool,
}

impl HandValue {
    /// The total used for every comparison.
    pub fn best(&self) -> u8 {
        if self.is_soft {
            self.soft
        } else {
            self.hard
        }
    }
}

pub fn evaluate(cards: &[Card]) -> HandValue {
    let hard = cards
        .iter()
        .fold(0u8, |acc, c| acc.saturating_add(c.rank.hard_value()));
    let has_ace = cards.iter().any(|c| c.rank == Rank::Ace);
    if has_ace && hard + 10 <= 21 {
        HandValue {
            hard,
            soft: hard + 10,
            is_soft: true,
        }
    } else {
        HandValue {
            hard,
            soft: hard,
            is_soft: false,
        }
    }
}

/// Where a hand is in its life. Everything except `Active` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandStatus {
    Active,
    Stood,
    Busted,
    Doubled,
    Surrendered,
    SplitAceCapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    status: HandStatus,
    from_split: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(4),
            status: HandStatus::Active,
            from_split: false,
        }
    }

    pub(crate) fn split_child(first: Card) -> Self {
        Self {
            cards: vec![first],
            status: HandStatus::Active,
            from_split: true,
        }
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
            ..Self::new()
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> HandValue {
        evaluate(&self.cards)
    }

    pub fn total(&self) -> u8 {
        self.value().best()
    }

    pub fn is_soft(&self) -> bool {
        self.value().is_soft
    }

    pub fn is_bust(&self) -> bool {
        self.total() > 21
    }

    /// A natural: two cards totalling 21 on a hand that did not come from a split.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == 21 && !self.from_split
    }

    /// Two cards of equal blackjack value; 10, J, Q and K all pair with each other.
    pub fn can_split(&self) -> bool {
        self.cards.len() == 2
            && self.cards[0].rank.blackjack_value() == self.cards[1].rank.blackjack_value()
    }

    pub fn can_double(&self) -> bool {
        self.cards.len() == 2 && self.status == HandStatus::Active
    }

    pub fn can_surrender(&self) -> bool {
        self.cards.len() == 2 && !self.from_split && self.status == HandStatus::Active
    }

    pub fn from_split(&self) -> bool {
        self.from_split
    }

    pub fn is_split_ace(&self) -> bool {
        self.from_split && self.cards.first().is_some_and(|c| c.rank == Rank::Ace)
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: HandStatus) {
        self.status = status;
    }

    pub fn is_active(&self) -> bool {
        self.status == HandStatus::Active
    }

    pub fn bet_multiplier(&self) -> u8 {
        if self.status == HandStatus::Doubled {
            2
        } else {
            1
        }
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}
