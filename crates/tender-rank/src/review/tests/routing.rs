use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::ranking::{ProposalStatus, RankingConfig};
use crate::review::router::{rankings_handler, status_handler, StatusUpdate};
use crate::review::ProposalReviewService;

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("encode payload")))
        .expect("request builds")
}

#[tokio::test]
async fn rankings_route_ranks_a_posted_batch() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let payload = json!({
        "solicitation": solicitation(),
        "proposals": [proposal("over", "95000"), proposal("fair", "70000")],
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/rankings", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["solicitation_id"], json!("sol-portal"));
    assert_eq!(body["proposals"][0]["proposal"]["id"], json!("prop-fair"));
    assert_eq!(body["proposals"][0]["rank"], json!(1));
    assert_eq!(body["proposals"][1]["rank"], json!(2));
    assert!(body["proposals"][0]["confidence"].is_string());
    assert_eq!(body["summary"]["total"], json!(2));
}

#[tokio::test]
async fn solicitation_lifecycle_over_http() {
    let (service, _, notifier) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/solicitations",
            &json!(solicitation()),
        ))
        .await
        .expect("publish executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut submitted = proposal("http", "70000");
    submitted.solicitation_id.0 = "ignored".to_string();
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/solicitations/sol-portal/proposals",
            &json!(submitted),
        ))
        .await
        .expect("submit executes");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["solicitation_id"], json!("sol-portal"));
    assert_eq!(body["status"], json!("pending"));

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/solicitations/sol-portal/rankings")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("rankings execute");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["proposals"][0]["proposal"]["id"], json!("prop-http"));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/proposals/prop-http/status",
            &json!({ "status": "rejected" }),
        ))
        .await
        .expect("status executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], json!("rejected"));
    assert_eq!(notifier.notices().len(), 1);
}

#[tokio::test]
async fn submitting_to_unknown_solicitation_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/solicitations/missing/proposals",
            &json!(proposal("lost", "60000")),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("missing"));
}

#[tokio::test]
async fn duplicate_solicitation_is_conflict() {
    let (service, _, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/solicitations",
            &json!(solicitation()),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn rankings_handler_maps_repository_outage() {
    let service = Arc::new(ProposalReviewService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        RankingConfig::default(),
    ));

    let response = rankings_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        Path("sol-portal".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn status_handler_maps_notification_failure() {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(ProposalReviewService::new(
        repository,
        Arc::new(OfflineNotifier),
        RankingConfig::default(),
    ));
    service
        .publish_solicitation(solicitation())
        .expect("publish");
    let stored = service
        .submit_proposal(proposal("quiet", "60000"))
        .expect("submit");

    let response = status_handler::<MemoryRepository, OfflineNotifier>(
        State(service),
        Path(stored.id.0.clone()),
        axum::Json(StatusUpdate {
            status: ProposalStatus::Accepted,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn submissions_without_identifiers_are_accepted() {
    let (service, _, _) = seeded_service();
    let router = router_with_service(service);
    let payload = json!({
        "company_name": "Acme Inc",
        "proposed_budget": "65000",
        "timeline": "3 months",
    });

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/solicitations/sol-portal/proposals",
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert!(body["id"]
        .as_str()
        .unwrap_or_default()
        .starts_with("prop-"));
    assert_eq!(body["solicitation_id"], json!("sol-portal"));
    assert_eq!(body["status"], json!("pending"));
}

#[tokio::test]
async fn solicitations_publish_without_an_identifier() {
    let (service, _, notifier) = build_service();
    let router = router_with_service(service);
    let mut payload = json!(solicitation());
    if let Some(fields) = payload.as_object_mut() {
        fields.remove("id");
    }

    let response = router
        .oneshot(json_request("POST", "/api/v1/solicitations", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert!(body["id"].as_str().unwrap_or_default().starts_with("sol-"));
    assert_eq!(notifier.announcements().len(), 1);
}

#[tokio::test]
async fn solicitation_edits_over_http() {
    let (service, _, notifier) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/solicitations/sol-portal",
            &json!({ "deadline": "2025-12-31", "status": "closed" }),
        ))
        .await
        .expect("update executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["deadline"], json!("2025-12-31"));
    assert_eq!(body["status"], json!("closed"));
    assert_eq!(body["title"], json!("Citizen portal rebuild"));
    assert_eq!(notifier.announcements().len(), 1);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/solicitations/sol-portal",
            &json!({ "description": "" }),
        ))
        .await
        .expect("update executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("description must not be blank"));
}

#[tokio::test]
async fn editing_an_unknown_solicitation_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/solicitations/missing",
            &json!({ "title": "Renamed" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vendor_bids_are_listed_by_email() {
    let (service, _, _) = seeded_service();
    service
        .submit_proposal(proposal("mine", "60000"))
        .expect("submit");
    service
        .submit_proposal(proposal("theirs", "61000"))
        .expect("submit");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/vendors/mine@vendors.example/proposals")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let bids = body.as_array().cloned().unwrap_or_default();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0]["id"], json!("prop-mine"));
}
