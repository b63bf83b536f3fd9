use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::criteria;
use super::domain::{ReviewId, RevieweeIdentifier, Role};
use super::navigator::SessionCommand;
use super::repository::{RepositoryError, ReviewRepository};
use super::service::{ReviewService, ReviewServiceError, SessionId};
use super::verification::{DocumentDescriptor, DocumentVerifier};

/// Router builder exposing the review sessions and public profiles.
pub fn review_router<R, V>(service: Arc<ReviewService<R, V>>) -> Router
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    Router::new()
        .route("/api/v1/reviews/criteria", get(criteria_handler))
        .route("/api/v1/reviews/sessions", post(start_handler::<R, V>))
        .route(
            "/api/v1/reviews/sessions/:session_id",
            get(session_handler::<R, V>).delete(end_session_handler::<R, V>),
        )
        .route(
            "/api/v1/reviews/sessions/:session_id/commands",
            post(command_handler::<R, V>),
        )
        .route(
            "/api/v1/reviews/sessions/:session_id/document",
            post(document_handler::<R, V>),
        )
        .route(
            "/api/v1/reviews/reviews/:review_id",
            get(review_handler::<R, V>),
        )
        .route(
            "/api/v1/reviews/profiles/:identifier",
            get(profile_handler::<R, V>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CriteriaQuery {
    pub reviewer: Role,
    pub reviewee: Option<Role>,
}

#[derive(Debug, Serialize)]
struct CriteriaGroup {
    reviewee: Role,
    criteria: criteria::CriteriaSet,
}

pub(crate) async fn criteria_handler(Query(query): Query<CriteriaQuery>) -> Response {
    let reviewees = match query.reviewee {
        Some(reviewee) if !criteria::is_counterpart(query.reviewer, reviewee) => {
            let payload = json!({
                "error": format!("a {} cannot review a {}", query.reviewer, reviewee),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
        Some(reviewee) => vec![reviewee],
        None => criteria::counterpart_roles(query.reviewer).to_vec(),
    };

    let groups: Vec<CriteriaGroup> = reviewees
        .into_iter()
        .map(|reviewee| CriteriaGroup {
            reviewee,
            criteria: criteria::criteria_for(query.reviewer, reviewee),
        })
        .collect();
    let condominium = criteria::condominium_available(query.reviewer)
        .then(criteria::condominium_criteria);

    let payload = json!({
        "reviewer": query.reviewer,
        "groups": groups,
        "condominium_criteria": condominium,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartSessionRequest {
    #[serde(default)]
    pub identifier: Option<String>,
}

pub(crate) async fn start_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    axum::Json(request): axum::Json<StartSessionRequest>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    let started = match request.identifier {
        Some(identifier) => service.start_review(&identifier),
        None => Ok(service.start_session()),
    };

    match started {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn end_session_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    match service.end_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn command_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(session_id): Path<String>,
    axum::Json(command): axum::Json<SessionCommand>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    match service.command(&SessionId(session_id), command) {
        Ok(response) => {
            let status = if response.submitted.is_some() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn document_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(session_id): Path<String>,
    axum::Json(document): axum::Json<DocumentDescriptor>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    match service
        .upload_document(&SessionId(session_id), document)
        .await
    {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn review_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(review_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    match service.review(&ReviewId(review_id)) {
        Ok(review) => (StatusCode::OK, axum::Json(review)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<R, V>(
    State(service): State<Arc<ReviewService<R, V>>>,
    Path(identifier): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    let Some(reviewee) = RevieweeIdentifier::parse(&identifier) else {
        let payload = json!({
            "error": "enter a CPF or CNPJ",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.reputation(&reviewee) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReviewServiceError) -> Response {
    let status = match &err {
        ReviewServiceError::SessionNotFound(_)
        | ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Navigation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReviewServiceError::Verification(_) => StatusCode::BAD_GATEWAY,
        ReviewServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
