use serde::{Deserialize, Serialize};

use crate::ranking::{Proposal, ProposalId, ProposalStatus, Solicitation, SolicitationId};

/// Storage abstraction so the review service can be exercised in isolation.
///
/// `proposals_for` and `proposals_by_vendor` must return proposals in submission order; the
/// ranking keeps that order for equal scores.
pub trait ProposalRepository: Send + Sync {
    fn insert_solicitation(&self, solicitation: Solicitation)
        -> Result<Solicitation, RepositoryError>;
    fn update_solicitation(&self, solicitation: Solicitation) -> Result<(), RepositoryError>;
    fn fetch_solicitation(&self, id: &SolicitationId)
        -> Result<Option<Solicitation>, RepositoryError>;
    fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal, RepositoryError>;
    fn update_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError>;
    fn fetch_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError>;
    fn proposals_for(&self, id: &SolicitationId) -> Result<Vec<Proposal>, RepositoryError>;
    /// Every proposal submitted by the vendor, matched case-insensitively on e-mail.
    fn proposals_by_vendor(&self, vendor_email: &str) -> Result<Vec<Proposal>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook informing vendors about solicitations and review decisions (push, e-mail, ...).
pub trait StatusNotifier: Send + Sync {
    /// Deliver a review decision to the vendor who submitted the proposal.
    fn publish(&self, notice: StatusNotice) -> Result<(), NotifyError>;

    /// Broadcast a published or edited solicitation to every registered vendor.
    fn announce(&self, announcement: SolicitationAnnouncement) -> Result<(), NotifyError>;
}

/// Vendor-facing notification emitted when a proposal changes status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub proposal_id: ProposalId,
    pub solicitation_id: SolicitationId,
    pub solicitation_title: String,
    pub vendor_email: String,
    pub status: ProposalStatus,
    pub message: String,
}

impl StatusNotice {
    pub fn new(proposal: &Proposal, solicitation: &Solicitation) -> Self {
        Self {
            proposal_id: proposal.id.clone(),
            solicitation_id: solicitation.id.clone(),
            solicitation_title: solicitation.title.clone(),
            vendor_email: proposal.vendor_email.clone(),
            status: proposal.status,
            message: status_message(proposal.status, &solicitation.title),
        }
    }
}

pub(crate) fn status_message(status: ProposalStatus, title: &str) -> String {
    match status {
        ProposalStatus::Pending => format!(
            "Thank you for your proposal submission for '{title}'. We are currently reviewing \
             your application and will update you on our decision."
        ),
        ProposalStatus::Accepted => format!(
            "We are pleased to inform you that your proposal for '{title}' has been accepted. \
             We look forward to working with you on this project."
        ),
        ProposalStatus::Rejected => format!(
            "Thank you for your interest in '{title}'. After careful consideration, we have \
             decided to proceed with another vendor for this project. We appreciate your time \
             and effort in preparing your proposal."
        ),
    }
}

/// Why vendors are being told about a solicitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    Published,
    Updated,
}

impl AnnouncementKind {
    pub const fn label(self) -> &'static str {
        match self {
            AnnouncementKind::Published => "published",
            AnnouncementKind::Updated => "updated",
        }
    }
}

/// Vendor-wide broadcast emitted when a solicitation opens or changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitationAnnouncement {
    pub solicitation_id: SolicitationId,
    pub solicitation_title: String,
    pub category: String,
    pub kind: AnnouncementKind,
    pub headline: String,
    pub message: String,
}

impl SolicitationAnnouncement {
    pub fn new(solicitation: &Solicitation, kind: AnnouncementKind) -> Self {
        let (headline, message) = match kind {
            AnnouncementKind::Published => (
                "New Tender Available",
                format!(
                    "A new tender '{}' has been published in {}",
                    solicitation.title, solicitation.category
                ),
            ),
            AnnouncementKind::Updated => (
                "Tender Updated",
                format!(
                    "The tender '{}' has been updated. Check the latest details!",
                    solicitation.title
                ),
            ),
        };
        Self {
            solicitation_id: solicitation.id.clone(),
            solicitation_title: solicitation.title.clone(),
            category: solicitation.category.clone(),
            kind,
            headline: headline.to_string(),
            message,
        }
    }
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
