//! Exhaustive lineup search
//!
//! Every ordering of our roster is scored with the match evaluator, either
//! against one known opponent lineup or against the opponent's best reply.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::competitor::{check_roster_size, roster_at, Competitor};
use crate::error::{OrderError, Side};
use crate::evaluator::expected_net_wins;
use crate::params::ModelParameters;
use crate::permutation::Permutations;

/// Number of orderings reported alongside the best one.
pub const TOP_ORDERS: usize = 5;

/// How the opponent lineup is treated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Opponent order is known and fixed.
    Exploit,
    /// Opponent answers each of our orders with its worst case for us.
    Robust,
}

impl SearchMode {
    pub fn describe(&self) -> &'static str {
        match self {
            SearchMode::Exploit => "Best order against the given opponent order.",
            SearchMode::Robust => "Best order assuming the opponent picks its best counter-order.",
        }
    }
}

/// An ordering (roster indices in mat order) and its expected net wins
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredOrder {
    pub order: Vec<usize>,
    pub ev: f64,
}

/// Result of a full search. `best` is `None` only for an empty roster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best: Option<ScoredOrder>,
    pub top: Vec<ScoredOrder>,
}

/// Score every ordering of `ours`, best first.
///
/// In `Exploit` mode `opponent` is their lineup in mat order; in `Robust`
/// mode it is their roster in any order. Equal scores keep enumeration
/// order.
pub fn rank_our_orders(
    mode: SearchMode,
    ours: &[Competitor],
    opponent: &[Competitor],
    params: &ModelParameters,
) -> Result<Vec<ScoredOrder>, OrderError> {
    check_inputs(mode, ours, opponent)?;
    Ok(score_orders(Permutations::new(ours.len()), mode, ours, opponent, params))
}

/// Best ordering of `ours` plus the top `TOP_ORDERS`.
pub fn search_our_order(
    mode: SearchMode,
    ours: &[Competitor],
    opponent: &[Competitor],
    params: &ModelParameters,
) -> Result<SearchResult, OrderError> {
    let mut ranked = rank_our_orders(mode, ours, opponent, params)?;
    ranked.truncate(TOP_ORDERS);
    let best = ranked.first().cloned();

    if let Some(best) = &best {
        debug!(?mode, order = ?best.order, ev = best.ev, "lineup search done");
    }
    Ok(SearchResult { best, top: ranked })
}

/// Best ordering of `ours` that sends `first` out first.
pub fn search_our_order_with_first(
    mode: SearchMode,
    ours: &[Competitor],
    opponent: &[Competitor],
    params: &ModelParameters,
    first: usize,
) -> Result<Option<ScoredOrder>, OrderError> {
    if ours.is_empty() {
        return Ok(None);
    }
    if first >= ours.len() {
        return Err(OrderError::PinnedIndexOutOfRange { index: first, len: ours.len() });
    }
    check_inputs(mode, ours, opponent)?;

    let ranked = score_orders(Permutations::with_first(ours.len(), first), mode, ours, opponent, params);
    let best = ranked.into_iter().next();
    if let Some(best) = &best {
        debug!(?mode, first, order = ?best.order, ev = best.ev, "pinned lineup search done");
    }
    Ok(best)
}

/// Opponent ordering that minimizes our expected net wins.
///
/// `our_lineup` is already in mat order. The returned order indexes
/// `opponent`; its `ev` is still from our side. `None` for an empty
/// opponent roster.
pub fn best_opponent_response(
    our_lineup: &[Competitor],
    opponent: &[Competitor],
    params: &ModelParameters,
) -> Result<Option<ScoredOrder>, OrderError> {
    check_roster_size(Side::Opponent, opponent)?;
    let params = params.sanitized();

    let candidates: Vec<Vec<usize>> = Permutations::new(opponent.len()).collect();
    debug!(responses = candidates.len(), "searching opponent best response");

    let scored: Vec<ScoredOrder> = candidates
        .into_par_iter()
        .map(|order| {
            let ev = expected_net_wins(our_lineup, &roster_at(opponent, &order), &params);
            ScoredOrder { order, ev }
        })
        .collect();

    // First minimum in enumeration order
    Ok(scored.into_iter().reduce(|best, next| if next.ev < best.ev { next } else { best }))
}

fn check_inputs(mode: SearchMode, ours: &[Competitor], opponent: &[Competitor]) -> Result<(), OrderError> {
    check_roster_size(Side::Ours, ours)?;
    if mode == SearchMode::Robust {
        check_roster_size(Side::Opponent, opponent)?;
    }
    Ok(())
}

fn score_orders(
    candidates: Permutations,
    mode: SearchMode,
    ours: &[Competitor],
    opponent: &[Competitor],
    params: &ModelParameters,
) -> Vec<ScoredOrder> {
    let params = params.sanitized();
    let candidates: Vec<Vec<usize>> = candidates.collect();

    // Robust mode replays every opponent lineup against every candidate
    let responses: Vec<Vec<Competitor>> = match mode {
        SearchMode::Exploit => Vec::new(),
        SearchMode::Robust => Permutations::new(opponent.len())
            .map(|order| roster_at(opponent, &order))
            .collect(),
    };
    debug!(
        ?mode,
        candidates = candidates.len(),
        responses = responses.len(),
        "scoring lineups"
    );

    let mut scored: Vec<ScoredOrder> = candidates
        .into_par_iter()
        .map(|order| {
            let lineup = roster_at(ours, &order);
            let ev = match mode {
                SearchMode::Exploit => expected_net_wins(&lineup, opponent, &params),
                SearchMode::Robust => worst_case(&lineup, &responses, &params),
            };
            ScoredOrder { order, ev }
        })
        .collect();

    // Stable: ties stay in enumeration order
    scored.sort_by(|a, b| b.ev.total_cmp(&a.ev));
    scored
}

fn worst_case(lineup: &[Competitor], responses: &[Vec<Competitor>], params: &ModelParameters) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    responses
        .iter()
        .map(|theirs| expected_net_wins(lineup, theirs, params))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitor::MAX_ROSTER_SIZE;
    use crate::permutation::factorial;

    const EPS: f64 = 1e-9;

    fn team(prefix: &str, stats: &[(f64, f64, f64)]) -> Vec<Competitor> {
        stats
            .iter()
            .enumerate()
            .map(|(i, &(w, c, t))| Competitor::new(format!("{}{}", prefix, i), w, c, t))
            .collect()
    }

    fn identical_team(prefix: &str) -> Vec<Competitor> {
        team(prefix, &[(90.0, 8.0, 7.0); 5])
    }

    fn mixed_ours() -> Vec<Competitor> {
        team("o", &[
            (66.0, 9.0, 8.0),
            (81.0, 6.0, 7.0),
            (100.0, 7.0, 4.0),
            (73.0, 5.0, 9.0),
            (90.0, 8.0, 6.0),
        ])
    }

    fn mixed_theirs() -> Vec<Competitor> {
        team("t", &[
            (95.0, 7.0, 6.0),
            (70.0, 8.0, 8.0),
            (84.0, 6.0, 7.0),
            (78.0, 9.0, 5.0),
            (88.0, 5.0, 8.0),
        ])
    }

    #[test]
    fn test_identical_rosters_are_even() {
        let params = ModelParameters::default();
        let ours = identical_team("o");
        let theirs = identical_team("t");

        let ranked = rank_our_orders(SearchMode::Exploit, &ours, &theirs, &params).unwrap();
        assert_eq!(ranked.len(), 120);
        for scored in &ranked {
            assert!(scored.ev.abs() < 1e-6, "order {:?} has ev {}", scored.order, scored.ev);
        }

        let result = search_our_order(SearchMode::Exploit, &ours, &theirs, &params).unwrap();
        assert_eq!(result.top.len(), TOP_ORDERS);
        assert!(result.best.unwrap().ev.abs() < 1e-6);
    }

    #[test]
    fn test_identical_rosters_tie_break_by_enumeration() {
        let params = ModelParameters::default();
        let result = search_our_order(SearchMode::Exploit, &identical_team("o"), &identical_team("t"), &params).unwrap();
        // Every lineup is the same sequence of numbers, so all scores tie exactly
        assert_eq!(result.top[0].order, vec![0, 1, 2, 3, 4]);
        assert_eq!(result.top[1].order, vec![0, 1, 2, 4, 3]);
        assert!(result.top.iter().all(|s| s.ev == result.top[0].ev));
    }

    #[test]
    fn test_stronger_roster_positive() {
        let params = ModelParameters::default();
        let ours = team("o", &[(95.0, 9.0, 7.0), (92.0, 9.0, 7.0), (88.0, 8.5, 7.0), (85.0, 8.0, 7.0), (82.0, 8.0, 7.0)]);
        let theirs = team("t", &[(85.0, 7.0, 7.0), (82.0, 7.0, 7.0), (78.0, 6.5, 7.0), (75.0, 6.0, 7.0), (72.0, 6.0, 7.0)]);

        let result = search_our_order(SearchMode::Exploit, &ours, &theirs, &params).unwrap();
        assert!(result.best.unwrap().ev > 0.0);

        let robust = search_our_order(SearchMode::Robust, &ours, &theirs, &params).unwrap();
        assert!(robust.best.unwrap().ev > 0.0);
    }

    #[test]
    fn test_top_sorted_and_best_first() {
        let params = ModelParameters::default();
        let result = search_our_order(SearchMode::Exploit, &mixed_ours(), &mixed_theirs(), &params).unwrap();
        let best = result.best.clone().unwrap();
        assert_eq!(result.top[0], best);
        for pair in result.top.windows(2) {
            assert!(pair[0].ev >= pair[1].ev);
        }

        // Best really is the maximum over all orderings
        for order in Permutations::new(5) {
            let ev = expected_net_wins(&roster_at(&mixed_ours(), &order), &mixed_theirs(), &params);
            assert!(ev <= best.ev + EPS);
        }
    }

    #[test]
    fn test_pinned_matches_unconstrained_best() {
        let params = ModelParameters::default();
        let ours = mixed_ours();
        let theirs = mixed_theirs();
        for mode in [SearchMode::Exploit, SearchMode::Robust] {
            let best = search_our_order(mode, &ours, &theirs, &params).unwrap().best.unwrap();
            let leader = best.order[0];
            let pinned = search_our_order_with_first(mode, &ours, &theirs, &params, leader)
                .unwrap()
                .unwrap();
            assert_eq!(pinned.order, best.order, "mode {:?}", mode);
            assert!((pinned.ev - best.ev).abs() < EPS);
        }
    }

    #[test]
    fn test_pinned_never_beats_unconstrained() {
        let params = ModelParameters::default();
        let ours = mixed_ours();
        let theirs = mixed_theirs();
        let best = search_our_order(SearchMode::Exploit, &ours, &theirs, &params).unwrap().best.unwrap();
        for first in 0..ours.len() {
            let pinned = search_our_order_with_first(SearchMode::Exploit, &ours, &theirs, &params, first)
                .unwrap()
                .unwrap();
            assert_eq!(pinned.order[0], first);
            assert!(pinned.ev <= best.ev + EPS);
        }
    }

    #[test]
    fn test_pinned_index_out_of_range() {
        let params = ModelParameters::default();
        let err = search_our_order_with_first(SearchMode::Exploit, &mixed_ours(), &mixed_theirs(), &params, 5)
            .unwrap_err();
        assert!(matches!(err, OrderError::PinnedIndexOutOfRange { index: 5, len: 5 }));
    }

    #[test]
    fn test_robust_never_exceeds_exploit() {
        let params = ModelParameters::default();
        let ours = mixed_ours();
        let theirs = mixed_theirs();

        let robust = search_our_order(SearchMode::Robust, &ours, &theirs, &params).unwrap().best.unwrap();
        let lineup = roster_at(&ours, &robust.order);
        for opp_order in Permutations::new(theirs.len()) {
            let ev = expected_net_wins(&lineup, &roster_at(&theirs, &opp_order), &params);
            assert!(robust.ev <= ev + EPS);
        }

        let exploit = search_our_order(SearchMode::Exploit, &ours, &theirs, &params).unwrap().best.unwrap();
        assert!(robust.ev <= exploit.ev + EPS);
    }

    #[test]
    fn test_robust_score_is_best_response_value() {
        let params = ModelParameters::default();
        let ours = mixed_ours();
        let theirs = mixed_theirs();
        let robust = search_our_order(SearchMode::Robust, &ours, &theirs, &params).unwrap();
        for scored in &robust.top {
            let reply = best_opponent_response(&roster_at(&ours, &scored.order), &theirs, &params)
                .unwrap()
                .unwrap();
            assert!((reply.ev - scored.ev).abs() < EPS);
        }
    }

    #[test]
    fn test_best_response_minimizes() {
        let params = ModelParameters::default();
        let lineup = mixed_ours();
        let theirs = mixed_theirs();
        let reply = best_opponent_response(&lineup, &theirs, &params).unwrap().unwrap();

        let mut sorted = reply.order.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);

        let mut count = 0;
        for order in Permutations::new(theirs.len()) {
            let ev = expected_net_wins(&lineup, &roster_at(&theirs, &order), &params);
            assert!(reply.ev <= ev + EPS);
            count += 1;
        }
        assert_eq!(count, factorial(5));
    }

    #[test]
    fn test_empty_rosters_give_no_result() {
        let params = ModelParameters::default();
        let theirs = mixed_theirs();

        let result = search_our_order(SearchMode::Exploit, &[], &theirs, &params).unwrap();
        assert_eq!(result, SearchResult::default());

        let result = search_our_order(SearchMode::Robust, &[], &theirs, &params).unwrap();
        assert!(result.best.is_none());

        assert!(search_our_order_with_first(SearchMode::Exploit, &[], &theirs, &params, 0)
            .unwrap()
            .is_none());
        assert!(best_opponent_response(&mixed_ours(), &[], &params).unwrap().is_none());
    }

    #[test]
    fn test_empty_opponent_scores_zero() {
        let params = ModelParameters::default();
        let result = search_our_order(SearchMode::Robust, &mixed_ours(), &[], &params).unwrap();
        assert_eq!(result.best.unwrap().ev, 0.0);
    }

    #[test]
    fn test_oversized_roster_rejected() {
        let params = ModelParameters::default();
        let big = team("b", &[(80.0, 5.0, 5.0); MAX_ROSTER_SIZE + 1]);
        let small = mixed_theirs();

        let err = search_our_order(SearchMode::Exploit, &big, &small, &params).unwrap_err();
        assert!(matches!(err, OrderError::RosterTooLarge { side: Side::Ours, .. }));

        let err = search_our_order(SearchMode::Robust, &small, &big, &params).unwrap_err();
        assert!(matches!(err, OrderError::RosterTooLarge { side: Side::Opponent, .. }));

        let err = best_opponent_response(&small, &big, &params).unwrap_err();
        assert!(matches!(err, OrderError::RosterTooLarge { side: Side::Opponent, .. }));

        // A long fixed opponent lineup is fine when nothing enumerates it
        assert!(search_our_order(SearchMode::Exploit, &small, &big, &params).is_ok());
    }

    #[test]
    fn test_uneven_roster_sizes() {
        let params = ModelParameters::default();
        let ours = team("o", &[(90.0, 8.0, 7.0), (80.0, 7.0, 7.0), (70.0, 9.0, 8.0)]);
        let theirs = mixed_theirs();
        let result = search_our_order(SearchMode::Robust, &ours, &theirs, &params).unwrap();
        assert_eq!(result.top.len(), TOP_ORDERS);
        let ranked = rank_our_orders(SearchMode::Exploit, &ours, &theirs, &params).unwrap();
        assert_eq!(ranked.len(), 6);
    }

    #[test]
    fn test_mode_descriptions() {
        assert!(SearchMode::Exploit.describe().contains("given opponent order"));
        assert!(SearchMode::Robust.describe().contains("counter-order"));
    }
}
