use serde::Serialize;

use super::domain::{Confidence, ProposalId, RankedProposal};

/// Count of ranked proposals per confidence tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfidenceCount {
    pub confidence: Confidence,
    pub label: &'static str,
    pub proposals: usize,
}

/// Reviewer-facing digest of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<ProposalId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f64>,
    /// Distance between the best and the worst overall score.
    pub score_spread: f64,
    /// Highest tier first; tiers with no proposals are omitted.
    pub confidence: Vec<ConfidenceCount>,
}

impl RankingSummary {
    pub fn from_ranked(ranked: &[RankedProposal]) -> Self {
        let leader = ranked.iter().find(|entry| entry.rank == 1);
        let bounds = ranked.iter().fold(None, |bounds, entry| {
            let score = entry.overall_score;
            Some(match bounds {
                None => (score, score),
                Some((min, max)) => (f64::min(min, score), f64::max(max, score)),
            })
        });
        let (min, max) = bounds.unwrap_or((0.0, 0.0));

        let confidence = [
            Confidence::High,
            Confidence::Medium,
            Confidence::Low,
            Confidence::VeryLow,
        ]
        .into_iter()
        .filter_map(|tier| {
            let proposals = ranked
                .iter()
                .filter(|entry| entry.confidence == tier)
                .count();
            (proposals > 0).then_some(ConfidenceCount {
                confidence: tier,
                label: tier.label(),
                proposals,
            })
        })
        .collect();

        Self {
            total: ranked.len(),
            leader: leader.map(|entry| entry.proposal.id.clone()),
            top_score: leader.map(|entry| entry.overall_score),
            score_spread: max - min,
            confidence,
        }
    }
}
