//! Competitor records and roster validation

use serde::{Deserialize, Serialize};
use crate::error::{OrderError, Side};

/// Largest roster the exhaustive searches accept (7! = 5040 orderings).
pub const MAX_ROSTER_SIZE: usize = 7;

/// Midpoint of the 1-10 scale, used when condition or technique is not given.
pub const DEFAULT_RATING: f64 = 5.0;

fn default_rating() -> f64 {
    DEFAULT_RATING
}

/// One member of a team
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    /// Body weight in kg
    pub weight: f64,
    /// Current condition, 1-10
    #[serde(default = "default_rating")]
    pub condition: f64,
    /// Technique, 1-10
    #[serde(default = "default_rating")]
    pub technique: f64,
}

impl Competitor {
    pub fn new(name: impl Into<String>, weight: f64, condition: f64, technique: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            condition,
            technique,
        }
    }
}

/// Parse a JSON array of competitors.
pub fn roster_from_json(json: &str) -> Result<Vec<Competitor>, OrderError> {
    Ok(serde_json::from_str(json)?)
}

/// Reject rosters too large for exhaustive enumeration.
pub fn check_roster_size(side: Side, roster: &[Competitor]) -> Result<(), OrderError> {
    if roster.len() > MAX_ROSTER_SIZE {
        return Err(OrderError::RosterTooLarge {
            side,
            len: roster.len(),
            max: MAX_ROSTER_SIZE,
        });
    }
    Ok(())
}

/// Competitors of `roster` in the sequence given by `order`.
///
/// # Panics
/// If any index in `order` is out of range for `roster`. Orderings from
/// `Permutations::new(roster.len())` always satisfy this.
pub fn roster_at(roster: &[Competitor], order: &[usize]) -> Vec<Competitor> {
    order.iter().map(|&i| roster[i].clone()).collect()
}

/// Names in mat order, for display.
///
/// # Panics
/// If any index in `order` is out of range for `roster`.
pub fn describe_order(roster: &[Competitor], order: &[usize]) -> Vec<String> {
    order.iter().map(|&i| roster[i].name.clone()).collect()
}
