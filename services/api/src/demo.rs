use crate::infra::{read_json, InMemoryProposalRepository, InMemoryStatusNotifier};
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use std::sync::Arc;
use tender_rank::config::RankingProfileConfig;
use tender_rank::error::AppError;
use tender_rank::{
    Proposal, ProposalCsvImporter, ProposalId, ProposalReviewService, ProposalStatus,
    RankedProposal, RankingEngine, RankingSummary, Solicitation, SolicitationId,
    SolicitationStatus, SolicitationUpdate,
};

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("proposal_source")
        .required(true)
        .args(["proposals_csv", "proposals_json"])
))]
pub(crate) struct RankArgs {
    /// Solicitation JSON document
    #[arg(long)]
    pub(crate) solicitation: PathBuf,
    /// Proposal CSV export (named header columns)
    #[arg(long)]
    pub(crate) proposals_csv: Option<PathBuf>,
    /// JSON array of proposals
    #[arg(long)]
    pub(crate) proposals_json: Option<PathBuf>,
    /// Ranking profile JSON overriding the built-in weights and rules
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    /// Print the six factor scores for every proposal
    #[arg(long)]
    pub(crate) show_scores: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the six factor scores for every proposal
    #[arg(long)]
    pub(crate) show_scores: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        solicitation,
        proposals_csv,
        proposals_json,
        profile,
        show_scores,
    } = args;

    let solicitation: Solicitation = read_json(solicitation)?;
    let proposals = load_proposals(proposals_csv, proposals_json, &solicitation.id)?;
    let config = RankingProfileConfig {
        profile_path: profile,
    }
    .load()?;

    let engine = RankingEngine::new(config);
    let ranked = engine.rank(&proposals, &solicitation);
    render_ranking(&solicitation, &ranked, show_scores);
    Ok(())
}

pub(crate) fn load_proposals(
    proposals_csv: Option<PathBuf>,
    proposals_json: Option<PathBuf>,
    solicitation_id: &SolicitationId,
) -> Result<Vec<Proposal>, AppError> {
    match (proposals_csv, proposals_json) {
        (Some(path), _) => {
            ProposalCsvImporter::from_path(path, solicitation_id).map_err(AppError::from)
        }
        (None, Some(path)) => read_json(path),
        (None, None) => Ok(Vec::new()),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Proposal ranking demo");

    let repository = Arc::new(InMemoryProposalRepository::default());
    let notifier = Arc::new(InMemoryStatusNotifier::default());
    let service = ProposalReviewService::new(
        repository,
        notifier.clone(),
        RankingProfileConfig::default().load()?,
    );

    let solicitation = service.publish_solicitation(demo_solicitation())?;
    println!(
        "- Published {} '{}' ({} to {}, {})",
        solicitation.id,
        solicitation.title,
        solicitation.minimum_budget,
        solicitation.maximum_budget,
        solicitation.category
    );

    let solicitation = service.update_solicitation(
        &solicitation.id,
        SolicitationUpdate {
            deadline: Some("2026-03-13".to_string()),
            ..SolicitationUpdate::default()
        },
    )?;
    println!("- Extended the deadline to {}", solicitation.deadline);

    for announcement in notifier.announcements() {
        println!("  > {}: {}", announcement.headline, announcement.message);
    }

    for proposal in demo_proposals(&solicitation.id) {
        let stored = service.submit_proposal(proposal)?;
        println!(
            "- Received {} from {} bidding {}",
            stored.id, stored.company_name, stored.proposed_budget
        );
    }

    let ranking = service.rank_solicitation(&solicitation.id)?;
    println!();
    render_ranking(&solicitation, &ranking.proposals, args.show_scores);
    render_summary(&ranking.summary);

    let mut decisions: Vec<(ProposalId, ProposalStatus)> = Vec::new();
    for entry in &ranking.proposals {
        let status = if entry.rank == 1 {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Rejected
        };
        decisions.push((entry.proposal.id.clone(), status));
    }
    for (id, status) in decisions {
        service.update_status(&id, status)?;
    }

    let notices = notifier.notices();
    if notices.is_empty() {
        println!("\nVendor notifications: none dispatched");
    } else {
        println!("\nVendor notifications:");
        for notice in notices {
            println!(
                "  - {} [{}] {}",
                notice.vendor_email,
                notice.status.label(),
                notice.message
            );
        }
    }

    Ok(())
}

pub(crate) fn render_ranking(
    solicitation: &Solicitation,
    ranked: &[RankedProposal],
    show_scores: bool,
) {
    println!(
        "Ranking for {} '{}' ({} proposals)",
        solicitation.id,
        solicitation.title,
        ranked.len()
    );
    if ranked.is_empty() {
        println!("  No proposals to rank.");
        return;
    }

    for entry in ranked {
        println!(
            "  #{} {:<28} {:>6.2}  {}",
            entry.rank,
            display_name(&entry.proposal),
            entry.overall_score,
            entry.confidence
        );
        println!("     strengths: {}", entry.strengths.join(", "));
        if !entry.concerns.is_empty() {
            println!("     concerns:  {}", entry.concerns.join(", "));
        }
        if show_scores {
            let breakdown: Vec<String> = entry
                .scores
                .entries()
                .iter()
                .map(|(factor, score)| format!("{} {:.1}", factor.label(), score))
                .collect();
            println!("     scores:    {}", breakdown.join(" | "));
        }
    }
}

fn render_summary(summary: &RankingSummary) {
    if let (Some(leader), Some(top)) = (&summary.leader, summary.top_score) {
        println!(
            "Leader {} at {:.2}; spread {:.2} across {} proposals",
            leader, top, summary.score_spread, summary.total
        );
    }
    let mix: Vec<String> = summary
        .confidence
        .iter()
        .map(|tier| format!("{} x{}", tier.label, tier.proposals))
        .collect();
    if !mix.is_empty() {
        println!("Confidence mix: {}", mix.join(", "));
    }
}

fn display_name(proposal: &Proposal) -> String {
    if !proposal.company_name.trim().is_empty() {
        proposal.company_name.clone()
    } else if !proposal.vendor_name.trim().is_empty() {
        proposal.vendor_name.clone()
    } else {
        proposal.id.to_string()
    }
}

fn demo_solicitation() -> Solicitation {
    Solicitation {
        id: SolicitationId(String::new()),
        title: "Permit portal modernisation".to_string(),
        category: "IT Services".to_string(),
        location: "Des Moines, IA".to_string(),
        deadline: "2026-02-27".to_string(),
        minimum_budget: "$50,000".to_string(),
        maximum_budget: "$75,000".to_string(),
        description: "Replace the resident permit portal and migrate ten years of records."
            .to_string(),
        requirements: "WCAG 2.1 AA, single sign-on, data migration plan".to_string(),
        status: SolicitationStatus::Active,
        created_at: None,
    }
}

fn demo_proposals(solicitation_id: &SolicitationId) -> Vec<Proposal> {
    let base = Proposal {
        id: ProposalId(String::new()),
        solicitation_id: solicitation_id.clone(),
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
    };

    vec![
        Proposal {
            vendor_email: "dana@northwind.example".to_string(),
            vendor_name: "Dana Reyes".to_string(),
            company_name: "Northwind Digital LLC".to_string(),
            contact_person: "Dana Reyes".to_string(),
            email: "dana@northwind.example".to_string(),
            phone: "+1-515-555-0100".to_string(),
            title: "Portal rebuild on a managed cloud stack".to_string(),
            proposed_budget: "$65,000".to_string(),
            timeline: "3 months including a two week contingency".to_string(),
            description: "Our certified team handles software development, database design and \
                          cloud hosting for civic web application projects. We ensure quality \
                          through automated accessibility testing, a documented data migration \
                          rehearsal and weekly demos with permit staff. We look forward to \
                          working with you and welcome any questions."
                .to_string(),
            experience: "12 years of experience; delivered portfolio projects for three \
                         Iowa counties."
                .to_string(),
            attachments: vec!["portfolio.pdf".to_string(), "pricing.xlsx".to_string()],
            ..base.clone()
        },
        Proposal {
            vendor_email: "ops@brightline.example".to_string(),
            vendor_name: "Sam Ortiz".to_string(),
            company_name: "Brightline".to_string(),
            contact_person: "Sam Ortiz".to_string(),
            email: "ops@brightline.example".to_string(),
            title: "Portal refresh".to_string(),
            proposed_budget: "$52,500".to_string(),
            timeline: "6 weeks".to_string(),
            description: "Website refresh and hosting. Thank you for considering us.".to_string(),
            experience: "5 years of experience".to_string(),
            ..base.clone()
        },
        Proposal {
            vendor_email: "bids@stackhouse.example".to_string(),
            vendor_name: "Lee Park".to_string(),
            company_name: "Stackhouse Inc".to_string(),
            contact_person: "Lee Park".to_string(),
            email: "bids@stackhouse.example".to_string(),
            phone: "515-555-0188".to_string(),
            title: "Enterprise permit platform".to_string(),
            proposed_budget: "$92,000".to_string(),
            timeline: "1 week".to_string(),
            description: "Turnkey platform license.".to_string(),
            ..base
        },
    ]
}
