//! Expected-value evaluation of a winner-stays team match
//!
//! Both lineups are fixed. The winner of each bout stays on the mat (its
//! streak grows), the loser is replaced by the next teammate, and a draw
//! replaces both. The match ends as soon as either lineup is exhausted.

use crate::competitor::Competitor;
use crate::outcome::outcome_with;
use crate::params::ModelParameters;

/// Progress of a match: who is on the mat and for how long
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchState {
    /// Cursor into our lineup
    pub ours: usize,
    /// Cursor into the opponent lineup
    pub theirs: usize,
    /// Consecutive bouts of our current competitor (>= 1)
    pub our_streak: u32,
    /// Consecutive bouts of their current competitor (>= 1)
    pub their_streak: u32,
}

impl MatchState {
    pub const START: Self = Self { ours: 0, theirs: 0, our_streak: 1, their_streak: 1 };

    fn after_win(self) -> Self {
        Self { theirs: self.theirs + 1, our_streak: self.our_streak + 1, their_streak: 1, ..self }
    }

    fn after_loss(self) -> Self {
        Self { ours: self.ours + 1, our_streak: 1, their_streak: self.their_streak + 1, ..self }
    }

    fn after_draw(self) -> Self {
        Self { ours: self.ours + 1, theirs: self.theirs + 1, our_streak: 1, their_streak: 1 }
    }
}

/// Memoized evaluator for one pair of lineups.
///
/// The memo is a flat table over every reachable non-terminal state. At most
/// one side is ever past its first bout: a win brings in a fresh opponent, a
/// loss a fresh teammate, a draw both. Our streak is at most `m`, theirs at
/// most `n`, so each cursor pair needs `m + n` streak slots.
pub struct MatchEvaluator<'a> {
    ours: &'a [Competitor],
    theirs: &'a [Competitor],
    params: ModelParameters,
    memo: Vec<Option<f64>>,
}

impl<'a> MatchEvaluator<'a> {
    pub fn new(ours: &'a [Competitor], theirs: &'a [Competitor], params: &ModelParameters) -> Self {
        let (n, m) = (ours.len(), theirs.len());
        Self {
            ours,
            theirs,
            params: params.sanitized(),
            memo: vec![None; n * m * (m + n)],
        }
    }

    /// Expected net wins from the opening bout.
    pub fn evaluate(&mut self) -> f64 {
        self.value(MatchState::START)
    }

    /// Expected net wins still to come from `state`.
    pub fn value(&mut self, state: MatchState) -> f64 {
        if self.is_terminal(state) {
            return 0.0;
        }
        let slot = self.slot(state);
        if let Some(cached) = slot.and_then(|s| self.memo[s]) {
            return cached;
        }

        let outcome = outcome_with(
            &self.ours[state.ours],
            &self.theirs[state.theirs],
            &self.params,
            state.our_streak,
            state.their_streak,
        );
        let value = outcome.win * (1.0 + self.value(state.after_win()))
            + outcome.lose * (-1.0 + self.value(state.after_loss()))
            + outcome.draw * self.value(state.after_draw());

        if let Some(s) = slot {
            self.memo[s] = Some(value);
        }
        value
    }

    fn is_terminal(&self, state: MatchState) -> bool {
        state.ours >= self.ours.len() || state.theirs >= self.theirs.len()
    }

    fn slot(&self, state: MatchState) -> Option<usize> {
        let (n, m) = (self.ours.len(), self.theirs.len());
        let streak = match (state.our_streak, state.their_streak) {
            (ours, 1) if ours >= 1 && (ours as usize) <= m => ours as usize - 1,
            (1, theirs) if theirs >= 2 && (theirs as usize) <= n => m + theirs as usize - 2,
            _ => return None,
        };
        Some((state.ours * m + state.theirs) * (m + n) + streak)
    }

    #[cfg(test)]
    fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

/// Expected (wins - losses) for `ours` against `theirs`, both in mat order.
///
/// Neither lineup length is checked here. Time and memo size grow as
/// `n·m·(n + m)`, so very long lineups cost accordingly.
pub fn expected_net_wins(ours: &[Competitor], theirs: &[Competitor], params: &ModelParameters) -> f64 {
    MatchEvaluator::new(ours, theirs, params).evaluate()
}
