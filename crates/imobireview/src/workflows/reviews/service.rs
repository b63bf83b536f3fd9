use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{ReviewId, RevieweeIdentifier, SubmittedReview};
use super::navigator::{NavigationError, Navigator, ScreenView, SessionCommand};
use super::reputation::ReputationSummary;
use super::repository::{RepositoryError, ReviewRepository};
use super::signup::Registration;
use super::verification::{
    DocumentDescriptor, DocumentVerifier, ScanOutcome, VerificationError, VerificationResult,
};

/// Identifier wrapper for browser sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("ses-{id:06}"))
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub screen: ScreenView,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<SubmittedReview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<Registration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub session: SessionView,
    pub scan: ScanOutcome,
}

/// Service owning live sessions and the review store.
pub struct ReviewService<R, V> {
    repository: Arc<R>,
    verifier: Arc<V>,
    sessions: Mutex<HashMap<SessionId, Navigator>>,
}

impl<R, V> ReviewService<R, V>
where
    R: ReviewRepository + 'static,
    V: DocumentVerifier + 'static,
{
    pub fn new(repository: Arc<R>, verifier: Arc<V>) -> Self {
        Self {
            repository,
            verifier,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Navigator>> {
        self.sessions.lock().expect("session mutex poisoned")
    }

    /// Open a session on the landing screen.
    pub fn start_session(&self) -> SessionView {
        let session_id = next_session_id();
        let navigator = Navigator::new();
        let view = SessionView {
            session_id: session_id.clone(),
            screen: navigator.view(),
        };
        self.sessions().insert(session_id.clone(), navigator);
        debug!(session = %session_id, "session started");
        view
    }

    /// Open a session that starts directly on the verification screen for
    /// `identifier`; nothing is registered when the identifier is blank.
    pub fn start_review(&self, identifier: &str) -> Result<SessionView, ReviewServiceError> {
        let mut navigator = Navigator::new();
        navigator.start_validation(identifier)?;

        let session_id = next_session_id();
        let view = SessionView {
            session_id: session_id.clone(),
            screen: navigator.view(),
        };
        self.sessions().insert(session_id.clone(), navigator);
        debug!(session = %session_id, "review session started");
        Ok(view)
    }

    pub fn session(&self, session_id: &SessionId) -> Result<SessionView, ReviewServiceError> {
        let sessions = self.sessions();
        let navigator = sessions
            .get(session_id)
            .ok_or_else(|| ReviewServiceError::SessionNotFound(session_id.clone()))?;
        Ok(SessionView {
            session_id: session_id.clone(),
            screen: navigator.view(),
        })
    }

    pub fn end_session(&self, session_id: &SessionId) -> Result<(), ReviewServiceError> {
        self.sessions()
            .remove(session_id)
            .ok_or_else(|| ReviewServiceError::SessionNotFound(session_id.clone()))?;
        debug!(session = %session_id, "session ended");
        Ok(())
    }

    /// Apply a user event; a completed wizard is persisted before returning.
    ///
    /// The command runs against a staged copy of the session, which replaces
    /// the live one only once any submitted review has been stored.
    pub fn command(
        &self,
        session_id: &SessionId,
        command: SessionCommand,
    ) -> Result<CommandResponse, ReviewServiceError> {
        let mut sessions = self.sessions();
        let navigator = sessions
            .get_mut(session_id)
            .ok_or_else(|| ReviewServiceError::SessionNotFound(session_id.clone()))?;

        let mut staged = navigator.clone();
        let outcome = staged.apply(command)?;
        let submitted = match outcome.submitted {
            Some(review) => {
                let stored = self.repository.insert(review).inspect_err(|err| {
                    warn!(session = %session_id, error = %err, "review not stored");
                })?;
                info!(session = %session_id, review_id = %stored.id.0, "review stored");
                Some(stored)
            }
            None => None,
        };

        *navigator = staged;
        let session = SessionView {
            session_id: session_id.clone(),
            screen: navigator.view(),
        };
        drop(sessions);

        Ok(CommandResponse {
            session,
            submitted,
            registration: outcome.registration,
        })
    }

    /// Upload a document to the active screen and wait for the verifier.
    ///
    /// The session lock is released while the verifier runs, so the session
    /// can be observed in its scanning state meanwhile.
    pub async fn upload_document(
        &self,
        session_id: &SessionId,
        document: DocumentDescriptor,
    ) -> Result<UploadResponse, ReviewServiceError> {
        let pending = {
            let mut sessions = self.sessions();
            let navigator = sessions
                .get_mut(session_id)
                .ok_or_else(|| ReviewServiceError::SessionNotFound(session_id.clone()))?;
            navigator.begin_upload(document)?
        };

        let verdict = self.verifier.verify(&pending.document).await;
        let result = match &verdict {
            Ok(result) => result.clone(),
            Err(err) => VerificationResult::Rejected {
                reason: err.to_string(),
            },
        };

        let mut sessions = self.sessions();
        let Some(navigator) = sessions.get_mut(session_id) else {
            debug!(session = %session_id, "session ended before scan completed");
            verdict?;
            return Err(ReviewServiceError::SessionNotFound(session_id.clone()));
        };
        let scan = navigator.finish_upload(pending.ticket, &result);
        let session = SessionView {
            session_id: session_id.clone(),
            screen: navigator.view(),
        };
        drop(sessions);

        verdict?;
        Ok(UploadResponse { session, scan })
    }

    /// A stored review by id.
    pub fn review(&self, review_id: &ReviewId) -> Result<SubmittedReview, ReviewServiceError> {
        self.repository
            .fetch(review_id)?
            .ok_or(ReviewServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn reputation(
        &self,
        reviewee: &RevieweeIdentifier,
    ) -> Result<ReputationSummary, ReviewServiceError> {
        let reviews = self.repository.for_reviewee(reviewee)?;
        Ok(ReputationSummary::from_reviews(reviewee.clone(), &reviews))
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("session '{0}' not found")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}
