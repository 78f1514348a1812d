use crate::ranking::domain::{
    Proposal, ProposalId, ProposalStatus, Solicitation, SolicitationId, SolicitationStatus,
};
use crate::ranking::{HeuristicScorer, RankingConfig, RankingEngine};

pub(super) fn solicitation(category: &str, minimum: &str, maximum: &str) -> Solicitation {
    Solicitation {
        id: SolicitationId("sol-001".to_string()),
        title: "Citizen portal rebuild".to_string(),
        category: category.to_string(),
        location: "Des Moines, IA".to_string(),
        deadline: "2025-11-30".to_string(),
        minimum_budget: minimum.to_string(),
        maximum_budget: maximum.to_string(),
        description: "Replace the legacy permit portal.".to_string(),
        requirements: "Accessibility audit, data migration.".to_string(),
        status: SolicitationStatus::Active,
        created_at: None,
    }
}

pub(super) fn it_solicitation() -> Solicitation {
    solicitation("IT Services", "50000", "75000")
}

/// Proposal with every free-text field empty.
pub(super) fn blank_proposal(suffix: &str) -> Proposal {
    Proposal {
        id: ProposalId(format!("prop-{suffix}")),
        solicitation_id: SolicitationId("sol-001".to_string()),
        vendor_email: String::new(),
        vendor_name: String::new(),
        company_name: String::new(),
        contact_person: String::new(),
        email: String::new(),
        phone: String::new(),
        title: String::new(),
        proposed_budget: String::new(),
        timeline: String::new(),
        description: String::new(),
        experience: String::new(),
        attachments: Vec::new(),
        status: ProposalStatus::Pending,
        submitted_at: None,
    }
}

pub(super) fn with_budget(suffix: &str, budget: &str) -> Proposal {
    let mut proposal = blank_proposal(suffix);
    proposal.proposed_budget = budget.to_string();
    proposal
}

pub(super) fn padded(text: &str, length: usize) -> String {
    let mut padded = text.to_string();
    while padded.chars().count() < length {
        padded.push('.');
    }
    padded
}

/// Strong bid for the IT solicitation: budget 85, reputation 85, technical 65, quality 99,
/// timeline 90, communication 93.
pub(super) fn strong_proposal() -> Proposal {
    Proposal {
        id: ProposalId("prop-northwind".to_string()),
        solicitation_id: SolicitationId("sol-001".to_string()),
        vendor_email: "dana@northwind.io".to_string(),
        vendor_name: "Dana Reyes".to_string(),
        company_name: "Northwind Digital".to_string(),
        contact_person: "Dana Reyes".to_string(),
        email: "dana@northwind.io".to_string(),
        phone: "+1-515-555-0100".to_string(),
        title: "Permit portal modernisation".to_string(),
        proposed_budget: "65000".to_string(),
        timeline: "3 months".to_string(),
        description: padded(
            "We ensure quality across software development, database design, cloud hosting and \
             mobile releases. We look forward to working together.",
            600,
        ),
        experience: "Over 10 years of experience; delivered project work for regional agencies."
            .to_string(),
        attachments: vec!["portfolio.pdf".to_string()],
        status: ProposalStatus::Pending,
        submitted_at: None,
    }
}

/// Weaker bid: over budget, thin description, one week timeline, no phone.
pub(super) fn weak_proposal() -> Proposal {
    let mut proposal = blank_proposal("bob");
    proposal.company_name = "Bob".to_string();
    proposal.proposed_budget = "80000".to_string();
    proposal.timeline = "1 week".to_string();
    proposal.description = "Short note.".to_string();
    proposal.email = "bob".to_string();
    proposal
}

pub(super) fn scorer() -> HeuristicScorer {
    HeuristicScorer::default()
}

pub(super) fn engine() -> RankingEngine {
    RankingEngine::new(RankingConfig::default())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
