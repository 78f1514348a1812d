//! Solicitation intake and edits, vendor announcements, proposal submission, ranking on
//! demand and review decisions.
//!
//! Storage and vendor notification sit behind traits so the service can run against
//! in-memory adapters in tests and in the demo binary.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    AnnouncementKind, NotifyError, ProposalRepository, RepositoryError,
    SolicitationAnnouncement, StatusNotice, StatusNotifier,
};
pub use router::{review_router, RankingRequest, StatusUpdate};
pub use service::{
    ProposalReviewService, ReviewServiceError, SolicitationRanking, SolicitationUpdate,
};
