use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::reviews::domain::{
    ReviewId, RevieweeIdentifier, Role, StarScore, SubmittedReview,
};
use crate::workflows::reviews::repository::{RepositoryError, ReviewRepository};
use crate::workflows::reviews::service::ReviewService;
use crate::workflows::reviews::submission::{ReviewFlow, ReviewStep};
use crate::workflows::reviews::verification::{
    DocumentDescriptor, DocumentVerifier, SimulatedVerifier, VerificationError,
    VerificationResult,
};

pub(super) const CPF: &str = "123.456.789-09";

pub(super) fn star(value: u8) -> StarScore {
    StarScore::new(value).expect("valid star")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn reviewee() -> RevieweeIdentifier {
    RevieweeIdentifier::parse(CPF).expect("identifier")
}

pub(super) fn contract_pdf() -> DocumentDescriptor {
    DocumentDescriptor::new("lease-2023.pdf", "application/pdf")
}

pub(super) fn contract_photo() -> DocumentDescriptor {
    DocumentDescriptor::new("lease-page-1.jpg", "image/jpeg")
}

pub(super) fn word_document() -> DocumentDescriptor {
    DocumentDescriptor::new(
        "lease.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    )
}

/// Verifier that completes on the next poll.
pub(super) fn instant_verifier() -> SimulatedVerifier {
    SimulatedVerifier::new(Duration::ZERO)
}

/// Drive a fresh flow for `reviewer` through the first two steps.
pub(super) fn flow_at_scoring(reviewer: Role, reviewee_role: Role) -> ReviewFlow {
    let mut flow = ReviewFlow::new(reviewee(), reviewer);
    flow.select_reviewee(reviewee_role).expect("counterpart");
    flow.advance().expect("target complete");
    flow.set_contract_start(date(2023, 1, 1)).expect("period step");
    flow.set_contract_end(date(2024, 1, 1)).expect("period step");
    flow.advance().expect("period complete");
    assert_eq!(flow.step(), Some(ReviewStep::Scoring));
    flow
}

pub(super) fn score_in_order(flow: &mut ReviewFlow, criteria: &[&str], values: &[u8]) {
    for (criterion, value) in criteria.iter().zip(values) {
        flow.score(criterion, star(*value)).expect("active criterion");
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) reviews: Arc<Mutex<Vec<SubmittedReview>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<SubmittedReview> {
        self.reviews.lock().expect("repository mutex poisoned").clone()
    }
}

impl ReviewRepository for MemoryRepository {
    fn insert(&self, review: SubmittedReview) -> Result<SubmittedReview, RepositoryError> {
        let mut guard = self.reviews.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == review.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(review.clone());
        Ok(review)
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<SubmittedReview>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|review| &review.id == id).cloned())
    }

    fn for_reviewee(
        &self,
        reviewee: &RevieweeIdentifier,
    ) -> Result<Vec<SubmittedReview>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|review| &review.reviewee == reviewee)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl ReviewRepository for ConflictRepository {
    fn insert(&self, _review: SubmittedReview) -> Result<SubmittedReview, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ReviewId) -> Result<Option<SubmittedReview>, RepositoryError> {
        Ok(None)
    }

    fn for_reviewee(
        &self,
        _reviewee: &RevieweeIdentifier,
    ) -> Result<Vec<SubmittedReview>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Store that reports a conflict on the first insert and accepts later ones.
#[derive(Default)]
pub(super) struct ConflictOnceRepository {
    conflicted: AtomicBool,
    pub(super) inner: MemoryRepository,
}

impl ReviewRepository for ConflictOnceRepository {
    fn insert(&self, review: SubmittedReview) -> Result<SubmittedReview, RepositoryError> {
        if !self.conflicted.swap(true, Ordering::SeqCst) {
            return Err(RepositoryError::Conflict);
        }
        self.inner.insert(review)
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<SubmittedReview>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_reviewee(
        &self,
        reviewee: &RevieweeIdentifier,
    ) -> Result<Vec<SubmittedReview>, RepositoryError> {
        self.inner.for_reviewee(reviewee)
    }
}

pub(super) struct UnavailableRepository;

impl ReviewRepository for UnavailableRepository {
    fn insert(&self, _review: SubmittedReview) -> Result<SubmittedReview, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReviewId) -> Result<Option<SubmittedReview>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_reviewee(
        &self,
        _reviewee: &RevieweeIdentifier,
    ) -> Result<Vec<SubmittedReview>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineVerifier;

impl DocumentVerifier for OfflineVerifier {
    fn verify(
        &self,
        _document: &DocumentDescriptor,
    ) -> impl Future<Output = Result<VerificationResult, VerificationError>> + Send {
        async { Err(VerificationError::Unavailable("scanner offline".to_string())) }
    }
}

pub(super) struct RejectingVerifier;

impl DocumentVerifier for RejectingVerifier {
    fn verify(
        &self,
        _document: &DocumentDescriptor,
    ) -> impl Future<Output = Result<VerificationResult, VerificationError>> + Send {
        async {
            Ok(VerificationResult::Rejected {
                reason: "signature page missing".to_string(),
            })
        }
    }
}

pub(super) fn build_service() -> (
    ReviewService<MemoryRepository, SimulatedVerifier>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReviewService::new(repository.clone(), Arc::new(instant_verifier()));
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(method: Method, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("serialize payload"),
        ))
        .expect("request")
}
