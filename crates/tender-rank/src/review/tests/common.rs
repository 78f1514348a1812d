use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::ranking::{
    Proposal, ProposalId, ProposalStatus, RankingConfig, Solicitation, SolicitationId,
    SolicitationStatus,
};
use crate::review::repository::{
    NotifyError, ProposalRepository, RepositoryError, SolicitationAnnouncement, StatusNotice,
    StatusNotifier,
};
use crate::review::{review_router, ProposalReviewService};

pub(super) fn solicitation() -> Solicitation {
    Solicitation {
        id: SolicitationId("sol-portal".to_string()),
        title: "Citizen portal rebuild".to_string(),
        category: "IT Services".to_string(),
        location: "Des Moines, IA".to_string(),
        deadline: "2025-11-30".to_string(),
        minimum_budget: "$50,000".to_string(),
        maximum_budget: "$75,000".to_string(),
        description: "Replace the legacy permit portal.".to_string(),
        requirements: "Accessibility audit, data migration.".to_string(),
        status: SolicitationStatus::Active,
        created_at: None,
    }
}

pub(super) fn proposal(suffix: &str, budget: &str) -> Proposal {
    Proposal {
        id: ProposalId(format!("prop-{suffix}")),
        solicitation_id: solicitation().id,
        vendor_email: format!("{suffix}@vendors.example"),
        vendor_name: suffix.to_string(),
        company_name: format!("{suffix} Consulting LLC"),
        contact_person: suffix.to_string(),
        email: format!("{suffix}@vendors.example"),
        phone: "515-555-0101".to_string(),
        title: "Portal proposal".to_string(),
        proposed_budget: budget.to_string(),
        timeline: "3 months".to_string(),
        description: "Web application and database design with agile delivery.".to_string(),
        experience: "8 years of experience".to_string(),
        attachments: Vec::new(),
        status: ProposalStatus::Pending,
        submitted_at: None,
    }
}

pub(super) fn build_service() -> (
    ProposalReviewService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ProposalReviewService::new(
        repository.clone(),
        notifier.clone(),
        RankingConfig::default(),
    );
    (service, repository, notifier)
}

pub(super) fn seeded_service() -> (
    ProposalReviewService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let (service, repository, notifier) = build_service();
    service
        .publish_solicitation(solicitation())
        .expect("publish solicitation");
    (service, repository, notifier)
}

#[derive(Default)]
struct Store {
    solicitations: Vec<Solicitation>,
    proposals: Vec<Proposal>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryRepository {
    pub(super) fn stored_proposal(&self, id: &ProposalId) -> Option<Proposal> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        guard.proposals.iter().find(|p| &p.id == id).cloned()
    }
}

impl ProposalRepository for MemoryRepository {
    fn insert_solicitation(
        &self,
        solicitation: Solicitation,
    ) -> Result<Solicitation, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.solicitations.iter().any(|s| s.id == solicitation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.solicitations.push(solicitation.clone());
        Ok(solicitation)
    }

    fn update_solicitation(&self, solicitation: Solicitation) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        let slot = guard
            .solicitations
            .iter_mut()
            .find(|s| s.id == solicitation.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = solicitation;
        Ok(())
    }

    fn fetch_solicitation(
        &self,
        id: &SolicitationId,
    ) -> Result<Option<Solicitation>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.solicitations.iter().find(|s| &s.id == id).cloned())
    }

    fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.proposals.iter().any(|p| p.id == proposal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.proposals.push(proposal.clone());
        Ok(proposal)
    }

    fn update_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        let slot = guard
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = proposal;
        Ok(())
    }

    fn fetch_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        Ok(self.stored_proposal(id))
    }

    fn proposals_for(&self, id: &SolicitationId) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .proposals
            .iter()
            .filter(|p| &p.solicitation_id == id)
            .cloned()
            .collect())
    }

    fn proposals_by_vendor(&self, vendor_email: &str) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .proposals
            .iter()
            .filter(|p| p.vendor_email.eq_ignore_ascii_case(vendor_email))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<StatusNotice>>>,
    announcements: Arc<Mutex<Vec<SolicitationAnnouncement>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<StatusNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn announcements(&self) -> Vec<SolicitationAnnouncement> {
        self.announcements
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

impl StatusNotifier for MemoryNotifier {
    fn publish(&self, notice: StatusNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }

    fn announce(&self, announcement: SolicitationAnnouncement) -> Result<(), NotifyError> {
        self.announcements
            .lock()
            .expect("notifier mutex poisoned")
            .push(announcement);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl StatusNotifier for OfflineNotifier {
    fn publish(&self, _notice: StatusNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }

    fn announce(&self, _announcement: SolicitationAnnouncement) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("push gateway offline".to_string()))
    }
}

/// Drops the first status notice, then delivers like [`MemoryNotifier`].
#[derive(Default)]
pub(super) struct FlakyNotifier {
    attempts: AtomicUsize,
    delivered: MemoryNotifier,
}

impl FlakyNotifier {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(super) fn notices(&self) -> Vec<StatusNotice> {
        self.delivered.notices()
    }
}

impl StatusNotifier for FlakyNotifier {
    fn publish(&self, notice: StatusNotice) -> Result<(), NotifyError> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(NotifyError::Transport("connection reset".to_string()));
        }
        self.delivered.publish(notice)
    }

    fn announce(&self, announcement: SolicitationAnnouncement) -> Result<(), NotifyError> {
        self.delivered.announce(announcement)
    }
}

pub(super) struct UnavailableRepository;

impl ProposalRepository for UnavailableRepository {
    fn insert_solicitation(
        &self,
        _solicitation: Solicitation,
    ) -> Result<Solicitation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_solicitation(&self, _solicitation: Solicitation) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_solicitation(
        &self,
        _id: &SolicitationId,
    ) -> Result<Option<Solicitation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_proposal(&self, _proposal: Proposal) -> Result<Proposal, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_proposal(&self, _proposal: Proposal) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_proposal(&self, _id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn proposals_for(&self, _id: &SolicitationId) -> Result<Vec<Proposal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn proposals_by_vendor(&self, _vendor_email: &str) -> Result<Vec<Proposal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: ProposalReviewService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    review_router(Arc::new(service))
}
