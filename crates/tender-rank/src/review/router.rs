use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{ProposalRepository, RepositoryError, StatusNotifier};
use super::service::{ProposalReviewService, ReviewServiceError, SolicitationUpdate};
use crate::ranking::{Proposal, ProposalId, ProposalStatus, Solicitation, SolicitationId};

/// Payload for stateless ranking requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingRequest {
    pub solicitation: Solicitation,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
}

/// Payload for review decisions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusUpdate {
    pub status: ProposalStatus,
}

/// Router builder exposing solicitation intake and edits, proposal submission, vendor bid
/// listings and ranking.
pub fn review_router<R, N>(service: Arc<ProposalReviewService<R, N>>) -> Router
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    Router::new()
        .route("/api/v1/rankings", post(rank_batch_handler::<R, N>))
        .route("/api/v1/solicitations", post(publish_handler::<R, N>))
        .route(
            "/api/v1/solicitations/:solicitation_id",
            put(update_solicitation_handler::<R, N>),
        )
        .route(
            "/api/v1/solicitations/:solicitation_id/proposals",
            post(submit_handler::<R, N>),
        )
        .route(
            "/api/v1/solicitations/:solicitation_id/rankings",
            get(rankings_handler::<R, N>),
        )
        .route(
            "/api/v1/proposals/:proposal_id/status",
            put(status_handler::<R, N>),
        )
        .route(
            "/api/v1/vendors/:vendor_email/proposals",
            get(vendor_proposals_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn rank_batch_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    axum::Json(request): axum::Json<RankingRequest>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    let ranking = service.rank_batch(&request.solicitation, &request.proposals);
    (StatusCode::OK, axum::Json(ranking)).into_response()
}

pub(crate) async fn publish_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    axum::Json(solicitation): axum::Json<Solicitation>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.publish_solicitation(solicitation) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_solicitation_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    Path(solicitation_id): Path<String>,
    axum::Json(update): axum::Json<SolicitationUpdate>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.update_solicitation(&SolicitationId(solicitation_id), update) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    Path(solicitation_id): Path<String>,
    axum::Json(mut proposal): axum::Json<Proposal>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    proposal.solicitation_id = SolicitationId(solicitation_id);
    match service.submit_proposal(proposal) {
        Ok(stored) => (StatusCode::ACCEPTED, axum::Json(stored)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn rankings_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    Path(solicitation_id): Path<String>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.rank_solicitation(&SolicitationId(solicitation_id)) {
        Ok(ranking) => (StatusCode::OK, axum::Json(ranking)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    Path(proposal_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.update_status(&ProposalId(proposal_id), update.status) {
        Ok(proposal) => (StatusCode::OK, axum::Json(proposal)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn vendor_proposals_handler<R, N>(
    State(service): State<Arc<ProposalReviewService<R, N>>>,
    Path(vendor_email): Path<String>,
) -> Response
where
    R: ProposalRepository + 'static,
    N: StatusNotifier + 'static,
{
    match service.vendor_proposals(&vendor_email) {
        Ok(proposals) => (StatusCode::OK, axum::Json(proposals)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) fn status_for(error: &ReviewServiceError) -> StatusCode {
    match error {
        ReviewServiceError::UnknownSolicitation(_)
        | ReviewServiceError::UnknownProposal(_)
        | ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::BlankField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewServiceError::SolicitationNotOpen { .. }
        | ReviewServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ReviewServiceError::Notify(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: &ReviewServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(error), axum::Json(payload)).into_response()
}
