//! Proposal ranking engine.
//!
//! Scoring, aggregation, ranking and annotation are pure functions of the solicitation and its
//! proposals. All weights, thresholds and keyword tables come from an injected
//! [`RankingConfig`]; nothing here holds process-wide state.

mod config;
pub mod domain;
mod policy;
mod rules;
mod scorer;
mod summary;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;

pub use config::{
    BudgetBand, BudgetRules, CategoryRule, CommunicationRules, ConfidenceBands, FactorLabels,
    KeywordTable, KeywordWeight, LabelRules, LengthBand, ProfileError, QualityRules,
    RankingConfig, ReputationRules, ScoringRules, ScoringWeights, TechnicalRules, TimelineRules,
    TimelineUnit, TokenTier,
};
pub use domain::{
    Confidence, Factor, FactorScores, Proposal, ProposalId, ProposalStatus, RankedProposal,
    Solicitation, SolicitationId, SolicitationStatus,
};
pub use scorer::{HeuristicScorer, ProposalScorer};
pub use summary::{ConfidenceCount, RankingSummary};

use tracing::debug;

/// Rank proposals with the default rubric.
pub fn rank(proposals: &[Proposal], solicitation: &Solicitation) -> Vec<RankedProposal> {
    RankingEngine::new(RankingConfig::default()).rank(proposals, solicitation)
}

/// Stateless engine combining a scorer with the aggregation, ranking and labelling rubric.
#[derive(Debug, Clone)]
pub struct RankingEngine<S = HeuristicScorer> {
    scorer: S,
    weights: ScoringWeights,
    labels: LabelRules,
    confidence: ConfidenceBands,
}

impl RankingEngine<HeuristicScorer> {
    pub fn new(config: RankingConfig) -> Self {
        let RankingConfig {
            weights,
            rules,
            labels,
            confidence,
        } = config;

        Self {
            scorer: HeuristicScorer::new(rules),
            weights,
            labels,
            confidence,
        }
    }
}

impl Default for RankingEngine<HeuristicScorer> {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

struct ScoredProposal<'a> {
    proposal: &'a Proposal,
    scores: FactorScores,
    overall: f64,
}

impl<S: ProposalScorer> RankingEngine<S> {
    /// Swap in an alternative scorer; the scoring tables in `config.rules` are not used.
    pub fn with_scorer(scorer: S, config: RankingConfig) -> Self {
        Self {
            scorer,
            weights: config.weights,
            labels: config.labels,
            confidence: config.confidence,
        }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Factor scores for a single proposal, clamped into `0.0..=100.0`.
    pub fn factor_scores(&self, proposal: &Proposal, solicitation: &Solicitation) -> FactorScores {
        self.scorer
            .score(proposal, solicitation)
            .map(policy::sanitise)
    }

    pub fn overall_score(&self, scores: &FactorScores) -> f64 {
        policy::overall_score(scores, &self.weights)
    }

    pub fn confidence(&self, score: f64, rank: usize, total: usize) -> Confidence {
        policy::confidence_for(score, rank, total, &self.confidence)
    }

    pub fn strengths(&self, scores: &FactorScores) -> Vec<String> {
        policy::strengths(scores, &self.labels)
    }

    pub fn concerns(&self, scores: &FactorScores) -> Vec<String> {
        policy::concerns(scores, &self.labels)
    }

    /// Score, order and annotate `proposals`.
    ///
    /// Proposals are not filtered by solicitation id. Equal overall scores keep their input
    /// order and still receive distinct consecutive ranks.
    pub fn rank(&self, proposals: &[Proposal], solicitation: &Solicitation) -> Vec<RankedProposal> {
        if proposals.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredProposal<'_>> = proposals
            .iter()
            .map(|proposal| {
                let scores = self.factor_scores(proposal, solicitation);
                let overall = self.overall_score(&scores);
                ScoredProposal {
                    proposal,
                    scores,
                    overall,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.overall.partial_cmp(&a.overall).unwrap_or(Ordering::Equal));

        let total = scored.len();
        debug!(
            solicitation = %solicitation.id.0,
            scorer = self.scorer.name(),
            total,
            "ranked proposals"
        );

        scored
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let rank = index + 1;
                RankedProposal {
                    proposal: entry.proposal.clone(),
                    overall_score: entry.overall,
                    rank,
                    confidence: self.confidence(entry.overall, rank, total),
                    strengths: self.strengths(&entry.scores),
                    concerns: self.concerns(&entry.scores),
                    scores: entry.scores,
                }
            })
            .collect()
    }
}
