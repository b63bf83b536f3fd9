use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::StarScore;

/// Justification becomes mandatory at or below this overall score.
pub const JUSTIFICATION_THRESHOLD: f32 = 3.0;

/// Aggregates derived from the current criteria scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedScores {
    pub overall: f32,
    pub condo: f32,
}

impl DerivedScores {
    pub fn justification_required(&self) -> bool {
        justification_required(self.overall)
    }
}

/// Recompute both averages from scratch.
///
/// `overall` only ever covers `standard`; `condo` covers the condominium set
/// when it is active and is `0.0` otherwise. Unscored criteria count as zero.
pub fn derive_scores(
    scores: &BTreeMap<String, StarScore>,
    standard: &[&str],
    condominium: Option<&[&str]>,
) -> DerivedScores {
    DerivedScores {
        overall: mean_of(scores, standard),
        condo: condominium.map_or(0.0, |criteria| mean_of(scores, criteria)),
    }
}

pub fn all_scored(scores: &BTreeMap<String, StarScore>, criteria: &[&str]) -> bool {
    criteria.iter().all(|criterion| scores.contains_key(*criterion))
}

pub fn justification_required(overall: f32) -> bool {
    overall > 0.0 && overall <= JUSTIFICATION_THRESHOLD
}

pub fn round_one_decimal(value: f64) -> f32 {
    ((value * 10.0).round() / 10.0) as f32
}

fn mean_of(scores: &BTreeMap<String, StarScore>, criteria: &[&str]) -> f32 {
    if criteria.is_empty() {
        return 0.0;
    }

    let total: u32 = criteria
        .iter()
        .map(|criterion| {
            scores
                .get(*criterion)
                .map_or(0, |score| u32::from(score.value()))
        })
        .sum();

    round_one_decimal(f64::from(total) / criteria.len() as f64)
}
