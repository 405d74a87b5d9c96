//! Model parameters for the outcome model

use serde::{Deserialize, Serialize};
use crate::error::OrderError;

/// Lowest draw probability the model will ever produce.
pub const MIN_DRAW: f64 = 0.2;

/// Highest allowed draw baseline.
pub const MAX_DRAW_BASE: f64 = 0.95;

/// Nonlinearity and importance of one factor
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorWeight {
    /// Exponent applied to |delta|
    pub gamma: f64,
    /// Multiplier; 0 switches the factor off entirely
    pub alpha: f64,
}

impl FactorWeight {
    pub const fn new(gamma: f64, alpha: f64) -> Self {
        Self { gamma, alpha }
    }

    /// Signed power-law contribution of one delta.
    pub fn contribution(&self, delta: f64) -> f64 {
        if self.alpha == 0.0 || delta == 0.0 {
            return 0.0;
        }
        delta.signum() * delta.abs().powf(self.gamma) * self.alpha
    }
}

/// Deserialized through `ParametersInput`, so any subset of fields, down to
/// a single factor field, overlays the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParametersInput")]
pub struct ModelParameters {
    pub weight: FactorWeight,
    pub condition: FactorWeight,
    pub technique: FactorWeight,
    /// Draw probability at zero advantage
    pub draw_base: f64,
    /// Floor the draw probability decays toward
    pub draw_floor: f64,
    /// How slowly non-draw mass tilts toward the stronger side
    pub softness: f64,
    /// Condition lost per extra consecutive bout
    pub streak_penalty: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            weight: FactorWeight::new(1.0, 0.05),
            condition: FactorWeight::new(1.0, 0.3),
            technique: FactorWeight::new(1.0, 0.3),
            draw_base: 0.35,
            draw_floor: MIN_DRAW,
            softness: 1.0,
            streak_penalty: 0.1,
        }
    }
}

impl ModelParameters {
    /// Parse parameters from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, OrderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy with every field forced into its valid range.
    pub fn sanitized(&self) -> Self {
        let factor = |f: FactorWeight| FactorWeight {
            gamma: non_negative(f.gamma),
            alpha: non_negative(f.alpha),
        };
        let draw_base = finite_or(self.draw_base, MIN_DRAW).clamp(MIN_DRAW, MAX_DRAW_BASE);
        Self {
            weight: factor(self.weight),
            condition: factor(self.condition),
            technique: factor(self.technique),
            draw_base,
            draw_floor: finite_or(self.draw_floor, MIN_DRAW).clamp(MIN_DRAW, draw_base),
            softness: non_negative(self.softness),
            streak_penalty: non_negative(self.streak_penalty),
        }
    }
}

/// One factor as it arrives from JSON
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
struct FactorInput {
    gamma: Option<f64>,
    alpha: Option<f64>,
}

impl FactorInput {
    fn over(self, base: FactorWeight) -> FactorWeight {
        FactorWeight {
            gamma: self.gamma.unwrap_or(base.gamma),
            alpha: self.alpha.unwrap_or(base.alpha),
        }
    }
}

/// Parameters as they arrive from JSON; absent fields keep the defaults
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
struct ParametersInput {
    weight: FactorInput,
    condition: FactorInput,
    technique: FactorInput,
    draw_base: Option<f64>,
    draw_floor: Option<f64>,
    softness: Option<f64>,
    streak_penalty: Option<f64>,
}

impl From<ParametersInput> for ModelParameters {
    fn from(input: ParametersInput) -> Self {
        let base = ModelParameters::default();
        Self {
            weight: input.weight.over(base.weight),
            condition: input.condition.over(base.condition),
            technique: input.technique.over(base.technique),
            draw_base: input.draw_base.unwrap_or(base.draw_base),
            draw_floor: input.draw_floor.unwrap_or(base.draw_floor),
            softness: input.softness.unwrap_or(base.softness),
            streak_penalty: input.streak_penalty.unwrap_or(base.streak_penalty),
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn non_negative(value: f64) -> f64 {
    finite_or(value, 0.0).max(0.0)
}
