use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::repository::{
    AnnouncementKind, NotifyError, ProposalRepository, RepositoryError,
    SolicitationAnnouncement, StatusNotice, StatusNotifier,
};
use crate::ranking::{
    Proposal, ProposalId, ProposalStatus, RankedProposal, RankingConfig, RankingEngine,
    RankingSummary, Solicitation, SolicitationId, SolicitationStatus,
};

/// Service composing the repository, the ranking engine and vendor notifications.
pub struct ProposalReviewService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: Arc<RankingEngine>,
}

static SOLICITATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_solicitation_id() -> SolicitationId {
    let id = SOLICITATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SolicitationId(format!("sol-{id:06}"))
}

fn next_proposal_id() -> ProposalId {
    let id = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProposalId(format!("prop-{id:06}"))
}

/// Ranked proposals for one solicitation plus a reviewer digest.
#[derive(Debug, Clone, Serialize)]
pub struct SolicitationRanking {
    pub solicitation_id: SolicitationId,
    pub summary: RankingSummary,
    pub proposals: Vec<RankedProposal>,
}

impl SolicitationRanking {
    fn new(solicitation_id: SolicitationId, proposals: Vec<RankedProposal>) -> Self {
        let summary = RankingSummary::from_ranked(&proposals);
        Self {
            solicitation_id,
            summary,
            proposals,
        }
    }
}

/// Edits applied to a stored solicitation; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolicitationUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub minimum_budget: Option<String>,
    pub maximum_budget: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub status: Option<SolicitationStatus>,
}

impl SolicitationUpdate {
    fn apply(self, solicitation: &mut Solicitation) {
        let Self {
            title,
            category,
            location,
            deadline,
            minimum_budget,
            maximum_budget,
            description,
            requirements,
            status,
        } = self;

        replace(&mut solicitation.title, title);
        replace(&mut solicitation.category, category);
        replace(&mut solicitation.location, location);
        replace(&mut solicitation.deadline, deadline);
        replace(&mut solicitation.minimum_budget, minimum_budget);
        replace(&mut solicitation.maximum_budget, maximum_budget);
        replace(&mut solicitation.description, description);
        replace(&mut solicitation.requirements, requirements);
        replace(&mut solicitation.status, status);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Title, deadline, description and requirements are mandatory on a published solicitation.
fn ensure_complete(solicitation: &Solicitation) -> Result<(), ReviewServiceError> {
    let fields = [
        ("title", &solicitation.title),
        ("deadline", &solicitation.deadline),
        ("description", &solicitation.description),
        ("requirements", &solicitation.requirements),
    ];
    match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(ReviewServiceError::BlankField(field)),
        None => Ok(()),
    }
}

impl<R, N> ProposalReviewService<R, N>
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: RankingConfig) -> Self {
        Self {
            repository,
            notifier,
            engine: Arc::new(RankingEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    /// Store a new solicitation, assigning an id when the caller left it blank.
    pub fn publish_solicitation(
        &self,
        mut solicitation: Solicitation,
    ) -> Result<Solicitation, ReviewServiceError> {
        ensure_complete(&solicitation)?;
        if solicitation.id.0.trim().is_empty() {
            solicitation.id = next_solicitation_id();
        }
        if solicitation.created_at.is_none() {
            solicitation.created_at = Some(Utc::now());
        }

        let stored = self.repository.insert_solicitation(solicitation)?;
        info!(solicitation = %stored.id, category = %stored.category, "solicitation published");
        self.announce(&stored, AnnouncementKind::Published);
        Ok(stored)
    }

    /// Apply edits to a stored solicitation and tell vendors when it is open for bids.
    pub fn update_solicitation(
        &self,
        solicitation_id: &SolicitationId,
        update: SolicitationUpdate,
    ) -> Result<Solicitation, ReviewServiceError> {
        let mut solicitation = self.solicitation(solicitation_id)?;
        update.apply(&mut solicitation);
        ensure_complete(&solicitation)?;

        self.repository.update_solicitation(solicitation.clone())?;
        info!(
            solicitation = %solicitation.id,
            status = solicitation.status.label(),
            "solicitation updated"
        );
        self.announce(&solicitation, AnnouncementKind::Updated);
        Ok(solicitation)
    }

    /// Accept a vendor proposal against an active solicitation.
    pub fn submit_proposal(&self, mut proposal: Proposal) -> Result<Proposal, ReviewServiceError> {
        let solicitation = self.solicitation(&proposal.solicitation_id)?;
        if solicitation.status != SolicitationStatus::Active {
            return Err(ReviewServiceError::SolicitationNotOpen {
                id: solicitation.id,
                status: solicitation.status,
            });
        }

        if proposal.id.0.trim().is_empty() {
            proposal.id = next_proposal_id();
        }
        proposal.status = ProposalStatus::Pending;
        if proposal.submitted_at.is_none() {
            proposal.submitted_at = Some(Utc::now());
        }

        let stored = self.repository.insert_proposal(proposal)?;
        info!(
            proposal = %stored.id,
            solicitation = %stored.solicitation_id,
            "proposal submitted"
        );
        Ok(stored)
    }

    /// Rank a caller-supplied batch without touching the repository.
    pub fn rank_batch(
        &self,
        solicitation: &Solicitation,
        proposals: &[Proposal],
    ) -> SolicitationRanking {
        let ranked = self.engine.rank(proposals, solicitation);
        SolicitationRanking::new(solicitation.id.clone(), ranked)
    }

    /// Rank every stored proposal for the solicitation.
    pub fn rank_solicitation(
        &self,
        solicitation_id: &SolicitationId,
    ) -> Result<SolicitationRanking, ReviewServiceError> {
        let solicitation = self.solicitation(solicitation_id)?;
        let proposals = self.repository.proposals_for(solicitation_id)?;

        let ranking = self.rank_batch(&solicitation, &proposals);
        info!(
            solicitation = %solicitation_id,
            proposals = ranking.proposals.len(),
            "solicitation ranked"
        );
        Ok(ranking)
    }

    /// Proposals a vendor has submitted across every solicitation.
    pub fn vendor_proposals(
        &self,
        vendor_email: &str,
    ) -> Result<Vec<Proposal>, ReviewServiceError> {
        let vendor_email = vendor_email.trim();
        if vendor_email.is_empty() {
            return Err(ReviewServiceError::BlankField("vendor_email"));
        }
        Ok(self.repository.proposals_by_vendor(vendor_email)?)
    }

    pub fn proposal(&self, proposal_id: &ProposalId) -> Result<Proposal, ReviewServiceError> {
        self.repository
            .fetch_proposal(proposal_id)?
            .ok_or_else(|| ReviewServiceError::UnknownProposal(proposal_id.clone()))
    }

    /// Record a review decision and notify the vendor when the status actually changes.
    ///
    /// A decision the vendor could not be told about is rolled back, so retrying the same
    /// update notifies again instead of hitting the unchanged-status path.
    pub fn update_status(
        &self,
        proposal_id: &ProposalId,
        status: ProposalStatus,
    ) -> Result<Proposal, ReviewServiceError> {
        let previous = self.proposal(proposal_id)?;
        if previous.status == status {
            return Ok(previous);
        }

        let solicitation = self.solicitation(&previous.solicitation_id)?;
        let mut proposal = previous.clone();
        proposal.status = status;
        self.repository.update_proposal(proposal.clone())?;

        let notice = StatusNotice::new(&proposal, &solicitation);
        if let Err(err) = self.notifier.publish(notice) {
            warn!(proposal = %proposal.id, error = %err, "vendor notification failed");
            if let Err(rollback) = self.repository.update_proposal(previous) {
                warn!(proposal = %proposal.id, error = %rollback, "status rollback failed");
            }
            return Err(err.into());
        }

        info!(proposal = %proposal.id, status = status.label(), "proposal status updated");
        Ok(proposal)
    }

    /// Broadcasts are best effort: a failed delivery is logged and never undoes the write.
    fn announce(&self, solicitation: &Solicitation, kind: AnnouncementKind) {
        if solicitation.status != SolicitationStatus::Active {
            return;
        }
        let announcement = SolicitationAnnouncement::new(solicitation, kind);
        if let Err(err) = self.notifier.announce(announcement) {
            warn!(
                solicitation = %solicitation.id,
                kind = kind.label(),
                error = %err,
                "vendor announcement failed"
            );
        }
    }

    fn solicitation(&self, id: &SolicitationId) -> Result<Solicitation, ReviewServiceError> {
        self.repository
            .fetch_solicitation(id)?
            .ok_or_else(|| ReviewServiceError::UnknownSolicitation(id.clone()))
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("solicitation {0} not found")]
    UnknownSolicitation(SolicitationId),
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("solicitation {id} is {} and not accepting proposals", .status.label())]
    SolicitationNotOpen {
        id: SolicitationId,
        status: SolicitationStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
