use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tender_rank::error::AppError;
use tender_rank::review::NotifyError;
use tender_rank::{
    Proposal, ProposalId, ProposalRepository, RepositoryError, Solicitation,
    SolicitationAnnouncement, SolicitationId, StatusNotice, StatusNotifier,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Records {
    solicitations: Vec<Solicitation>,
    proposals: Vec<Proposal>,
}

/// Process-local storage; proposals stay in submission order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProposalRepository {
    records: Arc<Mutex<Records>>,
}

impl ProposalRepository for InMemoryProposalRepository {
    fn insert_solicitation(
        &self,
        solicitation: Solicitation,
    ) -> Result<Solicitation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.solicitations.iter().any(|s| s.id == solicitation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.solicitations.push(solicitation.clone());
        Ok(solicitation)
    }

    fn update_solicitation(&self, solicitation: Solicitation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.solicitations.iter_mut().find(|s| s.id == solicitation.id) {
            Some(slot) => {
                *slot = solicitation;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_solicitation(
        &self,
        id: &SolicitationId,
    ) -> Result<Option<Solicitation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.solicitations.iter().find(|s| &s.id == id).cloned())
    }

    fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.proposals.iter().any(|p| p.id == proposal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.proposals.push(proposal.clone());
        Ok(proposal)
    }

    fn update_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.proposals.iter_mut().find(|p| p.id == proposal.id) {
            Some(slot) => {
                *slot = proposal;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.proposals.iter().find(|p| &p.id == id).cloned())
    }

    fn proposals_for(&self, id: &SolicitationId) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .proposals
            .iter()
            .filter(|p| &p.solicitation_id == id)
            .cloned()
            .collect())
    }

    fn proposals_by_vendor(&self, vendor_email: &str) -> Result<Vec<Proposal>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .proposals
            .iter()
            .filter(|p| p.vendor_email.eq_ignore_ascii_case(vendor_email))
            .cloned()
            .collect())
    }
}

/// Keeps every notice and logs it; stands in for the vendor mailer and push gateway.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStatusNotifier {
    notices: Arc<Mutex<Vec<StatusNotice>>>,
    announcements: Arc<Mutex<Vec<SolicitationAnnouncement>>>,
}

impl StatusNotifier for InMemoryStatusNotifier {
    fn publish(&self, notice: StatusNotice) -> Result<(), NotifyError> {
        info!(
            proposal = %notice.proposal_id,
            vendor = %notice.vendor_email,
            status = notice.status.label(),
            "vendor notified"
        );
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }

    fn announce(&self, announcement: SolicitationAnnouncement) -> Result<(), NotifyError> {
        info!(
            solicitation = %announcement.solicitation_id,
            kind = announcement.kind.label(),
            headline = %announcement.headline,
            "vendors notified"
        );
        let mut guard = self.announcements.lock().expect("notifier mutex poisoned");
        guard.push(announcement);
        Ok(())
    }
}

impl InMemoryStatusNotifier {
    pub(crate) fn notices(&self) -> Vec<StatusNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub(crate) fn announcements(&self) -> Vec<SolicitationAnnouncement> {
        self.announcements
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

/// Read a JSON document from disk; parse failures surface as I/O errors.
pub(crate) fn read_json<T, P>(path: P) -> Result<T, AppError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|err| AppError::Io(std::io::Error::from(err)))
}
