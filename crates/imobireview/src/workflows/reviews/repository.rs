use super::domain::{ReviewId, RevieweeIdentifier, SubmittedReview};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReviewRepository: Send + Sync {
    fn insert(&self, review: SubmittedReview) -> Result<SubmittedReview, RepositoryError>;
    fn fetch(&self, id: &ReviewId) -> Result<Option<SubmittedReview>, RepositoryError>;
    /// Reviews about one reviewee, oldest first.
    fn for_reviewee(
        &self,
        reviewee: &RevieweeIdentifier,
    ) -> Result<Vec<SubmittedReview>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
