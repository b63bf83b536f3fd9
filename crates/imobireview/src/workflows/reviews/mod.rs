//! Review intake: relationship verification, the five-step submission wizard,
//! and the screen router tying them to the public site.
//!
//! Everything below the service layer is synchronous and side-effect free apart
//! from tracing; the only asynchronous seam is [`DocumentVerifier`], which the
//! service awaits without holding any session lock.

pub mod criteria;
pub mod domain;
pub mod navigator;
pub mod rating;
pub mod repository;
pub mod reputation;
pub mod router;
pub mod scoring;
pub mod service;
pub mod signup;
pub mod submission;
pub mod verification;

#[cfg(test)]
mod tests;

pub use criteria::{criteria_for, CriteriaSet};
pub use domain::{
    ContractPeriod, CriterionScore, ReviewId, RevieweeIdentifier, Role, ScoreOutOfRange,
    StarScore, SubmittedReview, UnknownRole,
};
pub use navigator::{
    CommandOutcome, NavigationError, Navigator, Page, Screen, ScreenKind, ScreenView,
    SessionCommand,
};
pub use rating::{RatingInput, RatingMode, StarCell};
pub use repository::{RepositoryError, ReviewRepository};
pub use reputation::{CriterionAverage, ReputationSummary, ReviewCard};
pub use router::review_router;
pub use scoring::{derive_scores, DerivedScores, JUSTIFICATION_THRESHOLD};
pub use service::{
    CommandResponse, ReviewService, ReviewServiceError, SessionId, SessionView, UploadResponse,
};
pub use signup::{Registration, SignUpError, SignUpForm, SignUpView};
pub use submission::{
    FlowError, FlowState, ReviewDraft, ReviewFlow, ReviewFlowView, ReviewStep, ReviewSummary,
    Transition,
};
pub use verification::{
    DocumentDescriptor, DocumentError, DocumentVerifier, PendingScan, ScanOutcome, ScanStatus,
    ScanTicket, SimulatedVerifier, ValidationError, ValidationFlow, ValidationOutcome,
    ValidationStage, VerificationError, VerificationResult,
};
