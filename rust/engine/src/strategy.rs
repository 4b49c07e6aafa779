//! Basic-strategy oracle for six decks, dealer stands on soft 17, double after
//! split, late surrender.
//!
//! Every cell is static data indexed by player total (or pair value) and the
//! dealer upcard; column 0 is a 2 and column 9 is an ace. Nothing here holds
//! state, so the tables are shared freely between concurrent rounds.

use crate::cards::Card;
use crate::hand::evaluate;
use crate::player::Action;

/// A hard or soft table cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Play {
    Hit,
    Stand,
    /// Double when allowed, otherwise hit.
    DoubleOrHit,
    /// Double when allowed, otherwise stand.
    DoubleOrStand,
}

/// A pair table cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PairPlay {
    Split,
    /// Play the two cards as an ordinary total.
    NoSplit,
    /// Split, unless surrender is on offer; then the surrender table decides.
    SplitUnlessSurrender,
}

use self::PairPlay::{NoSplit as N, Split as P, SplitUnlessSurrender as Pr};
use self::Play::{DoubleOrHit as Dh, DoubleOrStand as Ds, Hit as H, Stand as S};

pub const HARD_MIN: u8 = 4;
pub const SOFT_MIN: u8 = 12;

/// Hard totals 4 through 21.
pub static HARD_TABLE: [[Play; 10]; 18] = [
    [H, H, H, H, H, H, H, H, H, H],           // 4
    [H, H, H, H, H, H, H, H, H, H],           // 5
    [H, H, H, H, H, H, H, H, H, H],           // 6
    [H, H, H, H, H, H, H, H, H, H],           // 7
    [H, H, H, H, H, H, H, H, H, H],           // 8
    [H, Dh, Dh, Dh, Dh, H, H, H, H, H],       // 9
    [Dh, Dh, Dh, Dh, Dh, Dh, Dh, Dh, H, H],   // 10
    [Dh, Dh, Dh, Dh, Dh, Dh, Dh, Dh, Dh, H],  // 11
    [H, H, S, S, S, H, H, H, H, H],           // 12
    [S, S, S, S, S, H, H, H, H, H],           // 13
    [S, S, S, S, S, H, H, H, H, H],           // 14
    [S, S, S, S, S, H, H, H, H, H],           // 15
    [S, S, S, S, S, H, H, H, H, H],           // 16
    [S, S, S, S, S, S, S, S, S, S],           // 17
    [S, S, S, S, S, S, S, S, S, S],           // 18
    [S, S, S, S, S, S, S, S, S, S],           // 19
    [S, S, S, S, S, S, S, S, S, S],           // 20
    [S, S, S, S, S, S, S, S, S, S],           // 21
];

/// Soft totals 12 (A,A that cannot split) through 21.
pub static SOFT_TABLE: [[Play; 10]; 10] = [
    [H, H, H, H, H, H, H, H, H, H],           // 12
    [H, H, H, Dh, Dh, H, H, H, H, H],         // 13
    [H, H, H, Dh, Dh, H, H, H, H, H],         // 14
    [H, H, Dh, Dh, Dh, H, H, H, H, H],        // 15
    [H, H, Dh, Dh, Dh, H, H, H, H, H],        // 16
    [H, Dh, Dh, Dh, Dh, H, H, H, H, H],       // 17
    [S, Ds, Ds, Ds, Ds, S, S, H, H, H],       // 18
    [S, S, S, S, S, S, S, S, S, S],           // 19
    [S, S, S, S, S, S, S, S, S, S],           // 20
    [S, S, S, S, S, S, S, S, S, S],           // 21
];

/// Pairs by card value, 2 through 11 (aces). Ten-value cards share a row.
pub static PAIR_TABLE: [[PairPlay; 10]; 10] = [
    [P, P, P, P, P, P, N, N, N, N],           // 2,2
    [P, P, P, P, P, P, N, N, N, N],           // 3,3
    [N, N, N, P, P, N, N, N, N, N],           // 4,4
    [N, N, N, N, N, N, N, N, N, N],           // 5,5
    [P, P, P, P, P, N, N, N, N, N],           // 6,6
    [P, P, P, P, P, P, N, N, N, N],           // 7,7
    [P, P, P, P, P, P, P, P, Pr, P],          // 8,8
    [P, P, P, P, P, N, P, P, N, N],           // 9,9
    [N, N, N, N, N, N, N, N, N, N],           // 10,10
    [P, P, P, P, P, P, P, P, P, P],           // A,A
];

/// Hard totals that surrender, by dealer upcard.
pub static SURRENDER_TABLE: [(u8, [bool; 10]); 2] = [
    (15, [false, false, false, false, false, false, false, false, true, false]),
    (16, [false, false, false, false, false, false, false, true, true, true]),
];

fn upcard_index(upcard: Card) -> usize {
    (upcard.rank.blackjack_value() - 2) as usize
}

pub fn hard_play(total: u8, upcard: Card) -> Play {
    let row = total.clamp(HARD_MIN, 21) - HARD_MIN;
    HARD_TABLE[row as usize][upcard_index(upcard)]
}

pub fn soft_play(total: u8, upcard: Card) -> Play {
    let row = total.clamp(SOFT_MIN, 21) - SOFT_MIN;
    SOFT_TABLE[row as usize][upcard_index(upcard)]
}

/// `pair_value` is the blackjack value of one card of the pair, 2 through 11.
pub fn pair_play(pair_value: u8, upcard: Card) -> PairPlay {
    let row = pair_value.clamp(2, 11) - 2;
    PAIR_TABLE[row as usize][upcard_index(upcard)]
}

pub fn surrenders(hard_total: u8, upcard: Card) -> bool {
    SURRENDER_TABLE
        .iter()
        .find(|(total, _)| *total == hard_total)
        .is_some_and(|(_, row)| row[upcard_index(upcard)])
}

/// The optimal action for a hand against a dealer upcard.
///
/// Precedence: a tabulated split, then a tabulated surrender, then the soft or
/// hard table with its fallback applied when doubling is not allowed. The
/// `can_*` flags describe what is legal right now; the result is always legal.
///
/// # Examples
///
/// ```
/// use bjbench_engine::cards::{Card, Rank, Suit};
/// use bjbench_engine::player::Action;
/// use bjbench_engine::strategy::optimal_action;
///
/// let hand = [Card::new(Rank::Ten, Suit::Spades), Card::new(Rank::Seven, Suit::Diamonds)];
/// let up = Card::new(Rank::Six, Suit::Hearts);
/// assert_eq!(optimal_action(&hand, up, true, false, true), Action::Stand);
/// ```
pub fn optimal_action(
    cards: &[Card],
    upcard: Card,
    can_double: bool,
    can_split: bool,
    can_surrender: bool,
) -> Action {
    let value = evaluate(cards);
    if value.best() > 21 {
        return Action::Stand;
    }

    if can_split && cards.len() == 2 {
        match pair_play(cards[0].rank.blackjack_value(), upcard) {
            PairPlay::Split => return Action::Split,
            PairPlay::SplitUnlessSurrender if !can_surrender => return Action::Split,
            _ => {}
        }
    }

    if can_surrender && !value.is_soft && surrenders(value.hard, upcard) {
        return Action::Surrender;
    }

    let play = if value.is_soft {
        soft_play(value.soft, upcard)
    } else {
        hard_play(value.hard, upcard)
    };

    match play {
        Play::Hit => Action::Hit,
        Play::Stand => Action::Stand,
        Play::DoubleOrHit if can_double => Action::Double,
        Play::DoubleOrHit => Action::Hit,
        Play::DoubleOrStand if can_double => Action::Double,
        Play::DoubleOrStand => Action::Stand,
    }
}
