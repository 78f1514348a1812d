//! Proposal ranking for solicitations: scoring, ranking, reviewer annotations and the
//! intake workflow around them.

pub mod config;
pub mod error;
pub mod import;
pub mod ranking;
pub mod review;
pub mod telemetry;

pub use error::AppError;
pub use import::{ProposalCsvImporter, ProposalImportError};
pub use ranking::{
    rank, Confidence, Factor, FactorScores, HeuristicScorer, ProfileError, Proposal, ProposalId,
    ProposalScorer, ProposalStatus, RankedProposal, RankingConfig, RankingEngine, RankingSummary,
    Solicitation, SolicitationId, SolicitationStatus,
};
pub use review::{
    review_router, AnnouncementKind, ProposalRepository, ProposalReviewService, RepositoryError,
    ReviewServiceError, SolicitationAnnouncement, SolicitationRanking, SolicitationUpdate,
    StatusNotice, StatusNotifier,
};
