//! Lineup ordering for winner-stays team matches
//!
//! Core decision engine for a five-a-side (quintet) elimination match.
//! Given both rosters and a win/draw/lose model of each pairing, it
//! computes expected net wins for fixed lineups and searches every
//! ordering of our roster for the best one.
//! This crate is compiled to:
//! - Native (for analysis tools)
//! - WASM (for the lineup planner frontend)

mod error;
mod competitor;
mod params;
mod outcome;
mod evaluator;
mod permutation;
mod search;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{OrderError, Side};
pub use competitor::{
    check_roster_size, describe_order, roster_at, roster_from_json, Competitor,
    DEFAULT_RATING, MAX_ROSTER_SIZE,
};
pub use params::{FactorWeight, ModelParameters, MAX_DRAW_BASE, MIN_DRAW};
pub use outcome::{advantage_score, evaluate_outcome, fatigue, outcome_matrix, Outcome, MIN_FATIGUE};
pub use evaluator::{expected_net_wins, MatchEvaluator, MatchState};
pub use permutation::{factorial, Permutations};
pub use search::{
    best_opponent_response, rank_our_orders, search_our_order, search_our_order_with_first,
    ScoredOrder, SearchMode, SearchResult, TOP_ORDERS,
};
