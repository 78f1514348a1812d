use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for solicitations (requests for proposals).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolicitationId(pub String);

/// Identifier wrapper for submitted proposals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl std::fmt::Display for SolicitationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The request for proposals being bid on.
///
/// Budgets and the deadline are kept as the free text the organization typed; the scorer
/// parses budgets leniently and never fails on them. A blank id is assigned on publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitation {
    #[serde(default)]
    pub id: SolicitationId,
    #[serde(default)]
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub deadline: String,
    pub minimum_budget: String,
    pub maximum_budget: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub status: SolicitationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One vendor's bid against a solicitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default)]
    pub id: ProposalId,
    #[serde(default)]
    pub solicitation_id: SolicitationId,
    #[serde(default)]
    pub vendor_email: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub proposed_budget: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub status: ProposalStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Publication state of a solicitation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolicitationStatus {
    #[default]
    Active,
    Closed,
    Draft,
    Pending,
}

impl SolicitationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SolicitationStatus::Active => "active",
            SolicitationStatus::Closed => "closed",
            SolicitationStatus::Draft => "draft",
            SolicitationStatus::Pending => "pending",
        }
    }
}

/// Review decision recorded against a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }
}

/// The six independent sub-scores, each within `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub budget: f64,
    pub reputation: f64,
    pub technical: f64,
    pub quality: f64,
    pub timeline: f64,
    pub communication: f64,
}

impl FactorScores {
    /// Uniform scores, mostly useful when probing label thresholds.
    pub const fn uniform(score: f64) -> Self {
        Self {
            budget: score,
            reputation: score,
            technical: score,
            quality: score,
            timeline: score,
            communication: score,
        }
    }

    /// Scores paired with their factor, in the fixed reporting order.
    pub fn entries(&self) -> [(Factor, f64); 6] {
        Factor::ALL.map(|factor| (factor, self.get(factor)))
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Budget => self.budget,
            Factor::Reputation => self.reputation,
            Factor::Technical => self.technical,
            Factor::Quality => self.quality,
            Factor::Timeline => self.timeline,
            Factor::Communication => self.communication,
        }
    }

    pub(crate) fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            budget: f(self.budget),
            reputation: f(self.reputation),
            technical: f(self.technical),
            quality: f(self.quality),
            timeline: f(self.timeline),
            communication: f(self.communication),
        }
    }
}

/// Criteria contributing to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Budget,
    Reputation,
    Technical,
    Quality,
    Timeline,
    Communication,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Budget,
        Factor::Reputation,
        Factor::Technical,
        Factor::Quality,
        Factor::Timeline,
        Factor::Communication,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Factor::Budget => "budget",
            Factor::Reputation => "reputation",
            Factor::Technical => "technical",
            Factor::Quality => "quality",
            Factor::Timeline => "timeline",
            Factor::Communication => "communication",
        }
    }
}

/// Coarse qualitative bucket derived from the overall score.
///
/// Variants are declared lowest first so the derived ordering reads as "more confident".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Confidence::VeryLow => "Very Low",
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ranking output for a single proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProposal {
    pub proposal: Proposal,
    pub overall_score: f64,
    pub rank: usize,
    pub confidence: Confidence,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub scores: FactorScores,
}
