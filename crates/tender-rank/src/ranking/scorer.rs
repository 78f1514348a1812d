use super::config::ScoringRules;
use super::domain::{FactorScores, Proposal, Solicitation};
use super::rules;

/// Produces the six factor scores for one proposal.
///
/// Implementations must be pure: identical inputs yield identical scores, and no input may
/// cause a failure. The engine sanitises every score into `0.0..=100.0` afterwards, so an
/// alternative model only needs to stay finite to keep the ranking invariants intact.
pub trait ProposalScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, proposal: &Proposal, solicitation: &Solicitation) -> FactorScores;
}

/// Deterministic keyword and range heuristics driven by [`ScoringRules`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicScorer {
    rules: ScoringRules,
}

impl HeuristicScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    /// Position of the proposed amount inside the solicitation's budget range.
    pub fn budget(&self, proposal: &Proposal, solicitation: &Solicitation) -> f64 {
        rules::budget_score(proposal, solicitation, &self.rules.budget)
    }

    /// Company structure, stated tenure and delivery track record.
    pub fn reputation(&self, proposal: &Proposal) -> f64 {
        rules::reputation_score(proposal, &self.rules.reputation)
    }

    /// Category-specific vocabulary plus qualification indicators.
    pub fn technical(&self, proposal: &Proposal, solicitation: &Solicitation) -> f64 {
        rules::technical_score(proposal, solicitation, &self.rules.technical)
    }

    /// Field completeness, description depth and professional vocabulary.
    pub fn quality(&self, proposal: &Proposal) -> f64 {
        rules::quality_score(proposal, &self.rules.quality)
    }

    pub fn timeline(&self, proposal: &Proposal) -> f64 {
        rules::timeline_score(proposal, &self.rules.timeline)
    }

    pub fn communication(&self, proposal: &Proposal) -> f64 {
        rules::communication_score(proposal, &self.rules.communication)
    }
}

impl ProposalScorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn score(&self, proposal: &Proposal, solicitation: &Solicitation) -> FactorScores {
        rules::score_proposal(proposal, solicitation, &self.rules)
    }
}
