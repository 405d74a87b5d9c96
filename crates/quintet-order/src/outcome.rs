//! Three-outcome bout model
//!
//! A bout between two competitors ends in a win, draw or loss. The model
//! folds weight, condition and technique deltas into one signed advantage
//! score, derives the draw probability from its magnitude and splits the
//! remaining mass toward the stronger side.

use serde::{Deserialize, Serialize};
use crate::competitor::Competitor;
use crate::params::ModelParameters;

/// Fatigue factor never drops below this share of condition.
pub const MIN_FATIGUE: f64 = 0.7;

/// Probabilities of one bout, from the first competitor's point of view
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub win: f64,
    pub draw: f64,
    pub lose: f64,
}

impl Outcome {
    /// Same bout seen from the other side.
    pub fn mirrored(&self) -> Self {
        Self { win: self.lose, draw: self.draw, lose: self.win }
    }

    /// Share of decisive bouts won.
    pub fn decisive_win_share(&self) -> f64 {
        let decisive = self.win + self.lose;
        if decisive == 0.0 { 0.5 } else { self.win / decisive }
    }

    /// Clamp into [0, 1] and rescale to sum to 1.
    fn normalized(self) -> Self {
        let win = self.win.clamp(0.0, 1.0);
        let draw = self.draw.clamp(0.0, 1.0);
        let lose = self.lose.clamp(0.0, 1.0);
        let total = win + draw + lose;
        if total.is_nan() || total <= 0.0 {
            return Self { win: 0.0, draw: 1.0, lose: 0.0 };
        }
        Self { win: win / total, draw: draw / total, lose: lose / total }
    }
}

/// Condition multiplier after `streak` consecutive bouts.
///
/// A fresh competitor (streak 1) keeps full condition; every extra bout
/// costs `penalty`, down to `MIN_FATIGUE`.
pub fn fatigue(streak: u32, penalty: f64) -> f64 {
    let extra = streak.saturating_sub(1) as f64;
    (1.0 - penalty * extra).clamp(MIN_FATIGUE, 1.0)
}

/// Signed advantage of `a` over `b`; positive favors `a`.
pub fn advantage_score(
    a: &Competitor,
    b: &Competitor,
    params: &ModelParameters,
    streak_a: u32,
    streak_b: u32,
) -> f64 {
    advantage_with(a, b, &params.sanitized(), streak_a, streak_b)
}

/// Outcome probabilities of `a` against `b`.
pub fn evaluate_outcome(
    a: &Competitor,
    b: &Competitor,
    params: &ModelParameters,
    streak_a: u32,
    streak_b: u32,
) -> Outcome {
    outcome_with(a, b, &params.sanitized(), streak_a, streak_b)
}

/// Fresh pairwise outcomes, `ours[i]` against `theirs[j]` at `[i][j]`.
pub fn outcome_matrix(
    ours: &[Competitor],
    theirs: &[Competitor],
    params: &ModelParameters,
) -> Vec<Vec<Outcome>> {
    let params = params.sanitized();
    ours.iter()
        .map(|a| theirs.iter().map(|b| outcome_with(a, b, &params, 1, 1)).collect())
        .collect()
}

/// `params` must already be sanitized.
fn advantage_with(
    a: &Competitor,
    b: &Competitor,
    params: &ModelParameters,
    streak_a: u32,
    streak_b: u32,
) -> f64 {
    let condition_a = a.condition * fatigue(streak_a, params.streak_penalty);
    let condition_b = b.condition * fatigue(streak_b, params.streak_penalty);

    params.weight.contribution(a.weight - b.weight)
        + params.condition.contribution(condition_a - condition_b)
        + params.technique.contribution(a.technique - b.technique)
}

/// `params` must already be sanitized.
pub(crate) fn outcome_with(
    a: &Competitor,
    b: &Competitor,
    params: &ModelParameters,
    streak_a: u32,
    streak_b: u32,
) -> Outcome {
    let score = advantage_with(a, b, params, streak_a, streak_b);
    let magnitude = score.abs();

    let draw = (params.draw_base - 0.5 * magnitude.tanh()).max(params.draw_floor);
    let decisive = 1.0 - draw;

    let denom = magnitude + params.softness;
    let tilt = if denom > 0.0 { 0.5 * magnitude / denom } else { 0.0 };
    let (win, lose) = if score >= 0.0 {
        (decisive * (0.5 + tilt), decisive * (0.5 - tilt))
    } else {
        (decisive * (0.5 - tilt), decisive * (0.5 + tilt))
    };

    Outcome { win, draw, lose }.normalized()
}
