use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{Card, Rank};
use crate::errors::EngineError;
use crate::hand::{Hand, HandStatus, HandValue};
use crate::player::Action;
use crate::rules::{LegalActions, HOUSE_RULES};
use crate::shoe::Shoe;
use crate::strategy::optimal_action;

/// Identifies a player hand within a round. Before a split the only hand is
/// index 0; a split replaces it with indices 0 and 1, both `from_split`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandPath {
    pub index: usize,
    pub from_split: bool,
}

impl std::fmt::Display for HandPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from_split {
            write!(f, "split-{}", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Round lifecycle.
///
/// `Dealt`, `Peeked` and `DealerActing` are passed through inside a single call;
/// callers only ever observe `PlayerActing` or `Settled`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dealt,
    Peeked,
    PlayerActing { hand: usize },
    DealerActing,
    Settled,
}

/// Everything an agent may see at a decision point. The dealer's hole card is
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub hand: HandPath,
    pub player_cards: Vec<Card>,
    pub value: HandValue,
    pub dealer_upcard: Card,
    pub legal: LegalActions,
    pub is_split_ace_hand: bool,
}

impl Observation {
    pub fn total(&self) -> u8 {
        self.value.best()
    }

    pub fn optimal_action(&self) -> Action {
        optimal_action(
            &self.player_cards,
            self.dealer_upcard,
            self.legal.can_double,
            self.legal.can_split,
            self.legal.can_surrender,
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandOutcome {
    Win,
    Lose,
    Push,
    Blackjack,
    Surrender,
}

impl HandOutcome {
    /// Units won or lost; win and lose scale with the bet multiplier.
    pub fn delta(self, bet_multiplier: u8) -> f64 {
        let m = f64::from(bet_multiplier);
        match self {
            HandOutcome::Win => m,
            HandOutcome::Lose => -m,
            HandOutcome::Push => 0.0,
            HandOutcome::Blackjack => HOUSE_RULES.blackjack_payout,
            HandOutcome::Surrender => -HOUSE_RULES.surrender_loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub hand: HandPath,
    pub cards: Vec<Card>,
    pub total: u8,
    pub outcome: HandOutcome,
    pub delta: f64,
}

/// Whether a dealer holding `hand` must draw. Under S17 every 17 stands.
pub fn dealer_should_hit(hand: &Hand) -> bool {
    let value = hand.value();
    if value.best() < 17 {
        return true;
    }
    !HOUSE_RULES.dealer_stands_soft_17 && value.is_soft && value.best() == 17
}

/// One deal for one agent: the dealer hand, the player's hands and the shoe
/// they are drawn from.
///
/// # Examples
///
/// ```
/// use bjbench_engine::player::Action;
/// use bjbench_engine::round::{Phase, Round};
///
/// let mut round = Round::deal(7).expect("deal");
/// while round.observation().is_some() {
///     round.act(Action::Stand).expect("stand is always legal");
/// }
/// assert_eq!(round.phase(), Phase::Settled);
/// ```
#[derive(Debug, Clone)]
pub struct Round {
    seed: u64,
    shoe: Shoe,
    dealer: Hand,
    hands: Vec<Hand>,
    phase: Phase,
    splits: usize,
    dealer_blackjack: bool,
    settlements: Vec<Settlement>,
}

impl Round {
    /// Deals a round from a fresh shoe shuffled by `seed`.
    pub fn deal(seed: u64) -> Result<Self, EngineError> {
        Self::with_shoe(seed, Shoe::new(seed, HOUSE_RULES.num_decks))
    }

    pub fn with_shoe(seed: u64, shoe: Shoe) -> Result<Self, EngineError> {
        let mut round = Self {
            seed,
            shoe,
            dealer: Hand::new(),
            hands: vec![Hand::new()],
            phase: Phase::Dealt,
            splits: 0,
            dealer_blackjack: false,
            settlements: Vec::new(),
        };
        round.deal_initial()?;
        round.peek()?;
        Ok(round)
    }

    fn deal_initial(&mut self) -> Result<(), EngineError> {
        for _ in 0..2 {
            let c = self.shoe.draw()?;
            self.hands[0].push(c);
            let c = self.shoe.draw()?;
            self.dealer.push(c);
        }
        self.phase = Phase::Dealt;
        debug!(
            seed = self.seed,
            player = ?self.hands[0].cards(),
            upcard = %self.dealer.cards()[0],
            "round dealt"
        );
        Ok(())
    }

    fn peek(&mut self) -> Result<(), EngineError> {
        self.phase = Phase::Peeked;
        let up = self.dealer_upcard().rank;
        if HOUSE_RULES.dealer_peeks && (up == Rank::Ace || up.is_ten_value()) {
            self.dealer_blackjack = self.dealer.is_blackjack();
        }
        if self.dealer_blackjack {
            debug!(seed = self.seed, "dealer blackjack on peek");
            self.settle();
            return Ok(());
        }
        if self.hands[0].is_blackjack() {
            debug!(seed = self.seed, "player natural");
            self.settle();
            return Ok(());
        }
        self.phase = Phase::PlayerActing { hand: 0 };
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn dealer_upcard(&self) -> Card {
        self.dealer.cards()[0]
    }

    /// The full dealer hand, available only once the round is settled.
    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.is_settled().then_some(&self.dealer)
    }

    pub fn dealer_blackjack(&self) -> bool {
        self.dealer_blackjack
    }

    pub fn current_hand(&self) -> Option<usize> {
        match self.phase {
            Phase::PlayerActing { hand } => Some(hand),
            _ => None,
        }
    }

    pub fn path(&self, index: usize) -> HandPath {
        HandPath {
            index,
            from_split: self.hands[index].from_split(),
        }
    }

    pub fn legal_actions(&self, index: usize) -> LegalActions {
        let hand = &self.hands[index];
        if !hand.is_active() {
            return LegalActions {
                can_double: false,
                can_split: false,
                can_surrender: false,
            };
        }
        LegalActions {
            can_double: hand.can_double()
                && !hand.is_split_ace()
                && (!hand.from_split() || HOUSE_RULES.double_after_split),
            can_split: hand.can_split()
                && !hand.from_split()
                && self.splits < HOUSE_RULES.max_splits,
            can_surrender: hand.can_surrender() && self.splits == 0,
        }
    }

    /// The pending decision, if any.
    pub fn observation(&self) -> Option<Observation> {
        let index = self.current_hand()?;
        let hand = &self.hands[index];
        Some(Observation {
            hand: self.path(index),
            player_cards: hand.cards().to_vec(),
            value: hand.value(),
            dealer_upcard: self.dealer_upcard(),
            legal: self.legal_actions(index),
            is_split_ace_hand: hand.is_split_ace(),
        })
    }

    /// Applies a legal action to the current hand.
    ///
    /// # Errors
    ///
    /// Anything other than a legal action on the current hand is an engine
    /// defect: callers validate agent input before reaching this point.
    pub fn act(&mut self, action: Action) -> Result<(), EngineError> {
        let index = match self.phase {
            Phase::PlayerActing { hand } => hand,
            Phase::Settled => return Err(EngineError::RoundSettled),
            _ => return Err(EngineError::NoPendingDecision),
        };
        if !self.hands[index].is_active() {
            return Err(EngineError::HandNotActive { index });
        }
        if action == Action::Split && self.splits >= HOUSE_RULES.max_splits {
            return Err(EngineError::SplitDepthExceeded);
        }
        if !self.legal_actions(index).allows(action) {
            return Err(EngineError::IllegalTransition {
                action,
                hand: index,
            });
        }

        match action {
            Action::Hit => {
                let c = self.shoe.draw()?;
                let hand = &mut self.hands[index];
                hand.push(c);
                if hand.is_bust() {
                    hand.set_status(HandStatus::Busted);
                }
            }
            Action::Stand => self.hands[index].set_status(HandStatus::Stood),
            Action::Double => {
                let c = self.shoe.draw()?;
                let hand = &mut self.hands[index];
                hand.push(c);
                hand.set_status(HandStatus::Doubled);
            }
            Action::Split => self.split(index)?,
            Action::Surrender => self.hands[index].set_status(HandStatus::Surrendered),
        }
        debug!(
            seed = self.seed,
            hand = index,
            action = %action,
            cards = ?self.hands[index].cards(),
            status = ?self.hands[index].status(),
            "action applied"
        );

        self.advance(index)
    }

    fn split(&mut self, index: usize) -> Result<(), EngineError> {
        let [first, second] = match self.hands[index].cards() {
            [a, b] => [*a, *b],
            _ => {
                return Err(EngineError::IllegalTransition {
                    action: Action::Split,
                    hand: index,
                })
            }
        };
        let aces = first.rank == Rank::Ace;
        let mut left = Hand::split_child(first);
        let mut right = Hand::split_child(second);
        left.push(self.shoe.draw()?);
        right.push(self.shoe.draw()?);
        if aces && HOUSE_RULES.split_aces_one_card {
            left.set_status(HandStatus::SplitAceCapped);
            right.set_status(HandStatus::SplitAceCapped);
        }
        self.hands.splice(index..=index, [left, right]);
        self.splits += 1;
        Ok(())
    }

    fn advance(&mut self, from: usize) -> Result<(), EngineError> {
        match (from..self.hands.len()).find(|&i| self.hands[i].is_active()) {
            Some(next) => self.phase = Phase::PlayerActing { hand: next },
            None => {
                self.play_dealer()?;
                self.settle();
            }
        }
        Ok(())
    }

    fn play_dealer(&mut self) -> Result<(), EngineError> {
        self.phase = Phase::DealerActing;
        let live = self
            .hands
            .iter()
            .any(|h| h.status() != HandStatus::Surrendered && !h.is_bust());
        if !live {
            return Ok(());
        }
        while dealer_should_hit(&self.dealer) {
            let c = self.shoe.draw()?;
            self.dealer.push(c);
        }
        debug!(
            seed = self.seed,
            dealer = ?self.dealer.cards(),
            total = self.dealer.total(),
            "dealer finished"
        );
        Ok(())
    }

    fn settle(&mut self) {
        let dealer_total = self.dealer.total();
        let dealer_bust = self.dealer.is_bust();
        self.settlements = self
            .hands
            .iter()
            .enumerate()
            .map(|(index, hand)| {
                let outcome = if hand.status() == HandStatus::Surrendered {
                    HandOutcome::Surrender
                } else if hand.is_bust() {
                    HandOutcome::Lose
                } else if self.dealer_blackjack {
                    if hand.is_blackjack() {
                        HandOutcome::Push
                    } else {
                        HandOutcome::Lose
                    }
                } else if hand.is_blackjack() {
                    HandOutcome::Blackjack
                } else if dealer_bust || hand.total() > dealer_total {
                    HandOutcome::Win
                } else if hand.total() < dealer_total {
                    HandOutcome::Lose
                } else {
                    HandOutcome::Push
                };
                Settlement {
                    hand: HandPath {
                        index,
                        from_split: hand.from_split(),
                    },
                    cards: hand.cards().to_vec(),
                    total: hand.total(),
                    outcome,
                    delta: outcome.delta(hand.bet_multiplier()),
                }
            })
            .collect();
        self.phase = Phase::Settled;
        debug!(
            seed = self.seed,
            balance = self.balance(),
            outcomes = ?self.settlements.iter().map(|s| s.outcome).collect::<Vec<_>>(),
            "round settled"
        );
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Sum of every hand's delta. Zero until the round settles.
    pub fn balance(&self) -> f64 {
        self.settlements.iter().map(|s| s.delta).sum()
    }
}
