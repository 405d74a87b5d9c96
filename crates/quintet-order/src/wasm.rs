//! WASM bindings for the lineup planner frontend

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{
    best_opponent_response, evaluate_outcome, expected_net_wins, outcome_matrix,
    roster_from_json, search_our_order, search_our_order_with_first,
    Competitor, ModelParameters, SearchMode,
};

fn parse_competitor(json: &str) -> Result<Competitor, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid competitor: {}", e)))
}

fn parse_roster(json: &str, which: &str) -> Result<Vec<Competitor>, JsError> {
    roster_from_json(json).map_err(|e| JsError::new(&format!("Invalid {} roster: {}", which, e)))
}

/// Empty string means default parameters.
fn parse_params(json: &str) -> Result<ModelParameters, JsError> {
    if json.trim().is_empty() {
        return Ok(ModelParameters::default());
    }
    ModelParameters::from_json(json).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_mode(mode: &str) -> Result<SearchMode, JsError> {
    match mode {
        "exploit" | "Exploit" => Ok(SearchMode::Exploit),
        "robust" | "Robust" => Ok(SearchMode::Robust),
        _ => Err(JsError::new(&format!("Unknown search mode: {}", mode))),
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Default model parameters as JSON, for seeding the parameter sliders
#[wasm_bindgen]
pub fn default_parameters() -> Result<String, JsError> {
    serde_json::to_string(&ModelParameters::default())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Win/draw/lose probabilities of one bout
#[wasm_bindgen]
pub fn bout_outcome(
    competitor_a_json: &str,
    competitor_b_json: &str,
    params_json: &str,
    streak_a: u32,
    streak_b: u32,
) -> Result<JsValue, JsError> {
    let a = parse_competitor(competitor_a_json)?;
    let b = parse_competitor(competitor_b_json)?;
    let params = parse_params(params_json)?;
    to_js(&evaluate_outcome(&a, &b, &params, streak_a, streak_b))
}

/// Fresh pairwise probabilities for the matchup grid
#[wasm_bindgen]
pub fn matchup_grid(ours_json: &str, theirs_json: &str, params_json: &str) -> Result<JsValue, JsError> {
    let ours = parse_roster(ours_json, "our")?;
    let theirs = parse_roster(theirs_json, "opponent")?;
    let params = parse_params(params_json)?;
    to_js(&outcome_matrix(&ours, &theirs, &params))
}

/// Expected net wins of two lineups, both already in mat order
#[wasm_bindgen]
pub fn lineup_value(ours_json: &str, theirs_json: &str, params_json: &str) -> Result<f64, JsError> {
    let ours = parse_roster(ours_json, "our")?;
    let theirs = parse_roster(theirs_json, "opponent")?;
    let params = parse_params(params_json)?;
    Ok(expected_net_wins(&ours, &theirs, &params))
}

/// Best order plus the top five
///
/// # Returns
/// `{best: {order, ev} | null, top: [{order, ev}]}`
#[wasm_bindgen]
pub fn find_best_order(
    mode: &str,
    ours_json: &str,
    opponent_json: &str,
    params_json: &str,
) -> Result<JsValue, JsError> {
    let mode = parse_mode(mode)?;
    let ours = parse_roster(ours_json, "our")?;
    let opponent = parse_roster(opponent_json, "opponent")?;
    let params = parse_params(params_json)?;

    let result = search_our_order(mode, &ours, &opponent, &params)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&result)
}

/// Best order that opens with roster index `first`
#[wasm_bindgen]
pub fn find_best_order_with_first(
    mode: &str,
    ours_json: &str,
    opponent_json: &str,
    params_json: &str,
    first: usize,
) -> Result<JsValue, JsError> {
    let mode = parse_mode(mode)?;
    let ours = parse_roster(ours_json, "our")?;
    let opponent = parse_roster(opponent_json, "opponent")?;
    let params = parse_params(params_json)?;

    let best = search_our_order_with_first(mode, &ours, &opponent, &params, first)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&best)
}

/// Opponent's strongest counter-order to our lineup
#[wasm_bindgen]
pub fn find_opponent_response(
    our_lineup_json: &str,
    opponent_json: &str,
    params_json: &str,
) -> Result<JsValue, JsError> {
    let lineup = parse_roster(our_lineup_json, "our")?;
    let opponent = parse_roster(opponent_json, "opponent")?;
    let params = parse_params(params_json)?;

    let reply = best_opponent_response(&lineup, &opponent, &params)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&reply)
}
