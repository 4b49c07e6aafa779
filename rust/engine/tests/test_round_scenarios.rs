use bjbench_engine::cards::{Card, Rank, Suit};
use bjbench_engine::engine::{play_round_with_shoe, Evaluation};
use bjbench_engine::errors::{AgentError, EngineError};
use bjbench_engine::hand::HandStatus;
use bjbench_engine::player::Action;
use bjbench_engine::round::{HandOutcome, Phase, Round};
use bjbench_engine::shoe::Shoe;

const SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// Deal order is player, dealer upcard, player, dealer hole, then hits.
fn stacked(ranks: &[Rank]) -> Shoe {
    let cards = ranks
        .iter()
        .enumerate()
        .map(|(i, &r)| Card::new(r, SUITS[i % 4]))
        .collect();
    Shoe::stacked(cards)
}

fn round(ranks: &[Rank]) -> Round {
    Round::with_shoe(0, stacked(ranks)).expect("deal")
}

#[test]
fn hard_seventeen_against_six_stands() {
    use Rank::*;
    let mut eval = Evaluation::with_shoe(0, stacked(&[Ten, Six, Seven, Nine, King]), "t").unwrap();
    let obs = eval.pending().expect("decision pending");
    assert_eq!(obs.total(), 17);
    assert_eq!(obs.dealer_upcard.rank, Six);
    assert_eq!(obs.optimal_action(), Action::Stand);

    eval.submit(Ok(Action::Stand)).unwrap();
    let report = eval.finish().unwrap();
    // dealer 15 draws a king and busts
    assert_eq!(report.summary.dealer_total, 25);
    assert_eq!(report.summary.outcomes, vec![HandOutcome::Win]);
    assert_eq!(report.summary.balance, 1.0);
    assert_eq!(report.summary.correct, 1);
}

#[test]
fn split_aces_get_one_card_each_and_pay_even_money() {
    use Rank::*;
    let mut r = round(&[Ace, Five, Ace, Ten, Nine, King, Seven]);
    let obs = r.observation().unwrap();
    assert!(obs.legal.can_split);
    assert_eq!(obs.optimal_action(), Action::Split);

    r.act(Action::Split).unwrap();
    assert_eq!(r.phase(), Phase::Settled, "split aces take no further decisions");
    assert_eq!(r.act(Action::Hit), Err(EngineError::RoundSettled));

    let hands = r.hands();
    assert_eq!(hands.len(), 2);
    for h in hands {
        assert_eq!(h.len(), 2);
        assert_eq!(h.status(), HandStatus::SplitAceCapped);
        assert!(!h.is_blackjack());
    }
    assert_eq!(hands[1].total(), 21);
    let outcomes: Vec<_> = r.settlements().iter().map(|s| s.outcome).collect();
    assert_eq!(outcomes, vec![HandOutcome::Win, HandOutcome::Win]);
    assert_eq!(r.balance(), 2.0);
}

#[test]
fn eights_against_ten_surrender_when_allowed() {
    use Rank::*;
    let report = play_round_with_shoe(0, stacked(&[Eight, Ten, Eight, Seven]), "optimal", |obs| {
        Ok(obs.optimal_action())
    })
    .unwrap();
    assert_eq!(report.records[0].optimal_action, Some(Action::Surrender));
    assert_eq!(report.summary.outcomes, vec![HandOutcome::Surrender]);
    assert_eq!(report.summary.balance, -0.5);
    assert_eq!(report.summary.dealer_cards.len(), 2, "no live hand, dealer does not draw");
}

#[test]
fn dealer_blackjack_settles_at_peek() {
    use Rank::*;
    let r = round(&[Nine, Ace, Seven, King]);
    assert!(r.dealer_blackjack());
    assert_eq!(r.phase(), Phase::Settled);
    assert!(r.observation().is_none());
    assert_eq!(r.settlements()[0].outcome, HandOutcome::Lose);
    assert_eq!(r.balance(), -1.0);
}

#[test]
fn player_blackjack_pushes_dealer_blackjack() {
    use Rank::*;
    let report = play_round_with_shoe(0, stacked(&[Ace, Ace, King, Queen]), "t", |_| {
        panic!("no decision expected")
    })
    .unwrap();
    assert_eq!(report.summary.outcomes, vec![HandOutcome::Push]);
    assert_eq!(report.summary.balance, 0.0);
    assert_eq!(report.summary.decisions, 0);
    assert_eq!(report.records.len(), 1, "settlement-only row");
    assert!(!report.records[0].is_decision());
}

#[test]
fn player_natural_pays_three_to_two() {
    use Rank::*;
    let r = round(&[Ace, Nine, King, Eight]);
    assert_eq!(r.phase(), Phase::Settled);
    assert_eq!(r.settlements()[0].outcome, HandOutcome::Blackjack);
    assert_eq!(r.balance(), 1.5);
    assert_eq!(r.dealer_hand().unwrap().len(), 2);
}

#[test]
fn ten_upcard_without_blackjack_continues() {
    use Rank::*;
    let r = round(&[Ten, King, Seven, Five]);
    assert!(!r.dealer_blackjack());
    assert_eq!(r.phase(), Phase::PlayerActing { hand: 0 });
    assert!(r.dealer_hand().is_none(), "hole card stays hidden during play");
}

#[test]
fn surrender_after_hit_is_illegal() {
    use Rank::*;
    let mut eval = Evaluation::with_shoe(0, stacked(&[Five, Ten, Six, Seven, Two]), "t").unwrap();
    eval.submit(Ok(Action::Hit)).unwrap();
    let obs = eval.pending().unwrap();
    assert_eq!(obs.total(), 13);
    assert!(!obs.legal.can_surrender);
    assert!(!obs.legal.can_double);

    let applied = eval.submit(Ok(Action::Surrender)).unwrap();
    assert_eq!(applied, Action::Stand);
    let report = eval.finish().unwrap();
    let rec = &report.records[1];
    assert_eq!(rec.requested, Some(Action::Surrender));
    assert_eq!(
        rec.agent_error,
        Some(AgentError::IllegalAction {
            action: Action::Surrender
        })
    );
    assert_eq!(rec.correct, Some(false));
    assert_eq!(report.summary.balance, -1.0);
}

#[test]
fn split_hands_double_but_never_surrender() {
    use Rank::*;
    // player 8,8 vs 6; dealer hole 10; left draws 3, right draws 2, double draws 9, dealer draws 10
    let mut eval = Evaluation::with_shoe(
        0,
        stacked(&[Eight, Six, Eight, Ten, Three, Two, Nine, Ten]),
        "t",
    )
    .unwrap();
    eval.submit(Ok(Action::Split)).unwrap();

    let left = eval.pending().unwrap();
    assert!(left.hand.from_split);
    assert_eq!(left.hand.index, 0);
    assert!(left.legal.can_double);
    assert!(!left.legal.can_split);
    assert!(!left.legal.can_surrender);
    assert_eq!(eval.submit(Ok(Action::Surrender)).unwrap(), Action::Stand);

    let right = eval.pending().unwrap();
    assert_eq!(right.hand.index, 1);
    assert_eq!(right.total(), 10);
    assert_eq!(eval.submit(Ok(Action::Double)).unwrap(), Action::Double);

    let report = eval.finish().unwrap();
    assert_eq!(
        report.summary.outcomes,
        vec![HandOutcome::Win, HandOutcome::Win]
    );
    assert_eq!(report.summary.balance, 3.0);
    let deltas: Vec<f64> = report.records.iter().map(|r| r.delta).collect();
    assert_eq!(deltas, vec![0.0, 1.0, 2.0]);
}

#[test]
fn no_resplit_after_split() {
    use Rank::*;
    let mut r = round(&[Eight, Six, Eight, Ten, Eight, Two]);
    r.act(Action::Split).unwrap();
    let obs = r.observation().unwrap();
    assert_eq!(obs.player_cards.len(), 2);
    assert!(!obs.legal.can_split, "8,8 after a split cannot split again");
    assert_eq!(r.act(Action::Split), Err(EngineError::SplitDepthExceeded));
}

#[test]
fn doubled_bust_loses_two_units() {
    use Rank::*;
    let mut r = round(&[Ten, Nine, Six, Eight, King]);
    r.act(Action::Double).unwrap();
    assert_eq!(r.phase(), Phase::Settled);
    assert_eq!(r.hands()[0].status(), HandStatus::Doubled);
    assert_eq!(r.balance(), -2.0);
    assert_eq!(r.dealer_hand().unwrap().len(), 2);
}

#[test]
fn timeouts_and_protocol_errors_stand() {
    use Rank::*;
    let mut eval = Evaluation::with_shoe(0, stacked(&[Ten, Seven, Two, Ten]), "t").unwrap();
    let applied = eval
        .submit(Err(AgentError::Timeout { millis: 5 }))
        .unwrap();
    assert_eq!(applied, Action::Stand);
    let report = eval.finish().unwrap();
    assert_eq!(report.records[0].requested, None);
    assert_eq!(report.records[0].correct, Some(false));
    // 12 vs 17
    assert_eq!(report.summary.balance, -1.0);
}

#[test]
fn short_shoe_is_fatal() {
    use Rank::*;
    let err = Round::with_shoe(0, stacked(&[Two, Three, Four])).unwrap_err();
    assert_eq!(err, EngineError::ShoeExhausted { dealt: 3 });

    let mut r = round(&[Two, Three, Four, Five]);
    assert_eq!(r.act(Action::Hit), Err(EngineError::ShoeExhausted { dealt: 4 }));
}

#[test]
fn submit_after_settlement_is_engine_error() {
    use Rank::*;
    let mut eval = Evaluation::with_shoe(0, stacked(&[Nine, Ace, Seven, King]), "t").unwrap();
    assert_eq!(
        eval.submit(Ok(Action::Stand)),
        Err(EngineError::RoundSettled)
    );
}
