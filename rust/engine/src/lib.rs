//! # bjbench-engine: Blackjack Engine and Strategy Oracle
//!
//! A deterministic blackjack engine for measuring decision-making agents.
//! Deals reproducible rounds from a seeded six-deck shoe, enforces action
//! legality (including one level of splitting), plays the dealer, settles
//! payouts and scores each agent decision against basic strategy.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and shoe composition
//! - [`shoe`] - Deterministic multi-deck shoe with ChaCha20 RNG
//! - [`hand`] - Hand totals, soft/hard values and hand status
//! - [`player`] - Player actions and parsing of agent responses
//! - [`rules`] - Fixed house rules and action validation
//! - [`strategy`] - Basic-strategy tables and the optimal-action oracle
//! - [`round`] - Round state machine: deal, peek, player actions, dealer, settlement
//! - [`engine`] - Round driver that consults the agent and the oracle
//! - [`scorer`] - Decision records, round summaries and aggregation
//! - [`errors`] - Engine and agent error types
//!
//! ## Quick Start
//!
//! ```rust
//! use bjbench_engine::engine::play_round;
//! use bjbench_engine::player::Action;
//!
//! // An agent that always stands
//! let report = play_round(1234, "always_stand", |_obs| Ok(Action::Stand)).expect("round");
//! let sum: f64 = report.records.iter().map(|r| r.delta).sum();
//! assert_eq!(sum, report.summary.balance);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Every round is reproducible from its seed:
//!
//! ```rust
//! use bjbench_engine::shoe::Shoe;
//!
//! let mut a = Shoe::new(42, 6);
//! let mut b = Shoe::new(42, 6);
//! assert_eq!(a.draw().unwrap(), b.draw().unwrap());
//! ```

pub mod cards;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod player;
pub mod round;
pub mod rules;
pub mod scorer;
pub mod shoe;
pub mod strategy;
