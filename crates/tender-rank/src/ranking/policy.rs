use super::config::{ConfidenceBands, LabelRules, ScoringWeights};
use super::domain::{Confidence, FactorScores};
use super::rules::SCORE_CEILING;

/// Clamp a raw score into `0.0..=100.0`; non-finite values collapse to zero.
pub(crate) fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, SCORE_CEILING)
}

pub(crate) fn overall_score(scores: &FactorScores, weights: &ScoringWeights) -> f64 {
    sanitise(weights.weighted(scores))
}

/// Confidence tier for a ranked entry.
///
/// Only the score decides the tier today; `rank` and `total` are accepted so a relative
/// confidence model can be introduced without changing callers.
pub(crate) fn confidence_for(
    score: f64,
    _rank: usize,
    _total: usize,
    bands: &ConfidenceBands,
) -> Confidence {
    if score >= bands.high {
        Confidence::High
    } else if score >= bands.medium {
        Confidence::Medium
    } else if score >= bands.low {
        Confidence::Low
    } else {
        Confidence::VeryLow
    }
}

pub(crate) fn strengths(scores: &FactorScores, labels: &LabelRules) -> Vec<String> {
    let mut strengths: Vec<String> = scores
        .entries()
        .into_iter()
        .filter(|(_, score)| *score >= labels.strength_threshold)
        .map(|(factor, _)| labels.strengths.get(factor).to_string())
        .collect();

    if strengths.is_empty() {
        strengths.push(labels.fallback_strength.clone());
    }

    strengths
}

pub(crate) fn concerns(scores: &FactorScores, labels: &LabelRules) -> Vec<String> {
    scores
        .entries()
        .into_iter()
        .filter(|(_, score)| *score <= labels.concern_threshold)
        .map(|(factor, _)| labels.concerns.get(factor).to_string())
        .collect()
}
