use chrono::NaiveDate;
use imobireview::workflows::reviews::{
    RepositoryError, ReviewId, ReviewRepository, RevieweeIdentifier, Role, StarScore,
    SubmittedReview,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local review store; reviews are kept in submission order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    reviews: Arc<Mutex<Vec<SubmittedReview>>>,
}

impl ReviewRepository for InMemoryReviewRepository {
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

pub(crate) fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>().map_err(|err| err.to_string())
}

pub(crate) fn parse_star(raw: &str) -> Result<StarScore, String> {
    let value = raw
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("failed to parse '{raw}' as a star score ({err})"))?;
    StarScore::new(value).map_err(|err| err.to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_is_case_insensitive() {
        assert_eq!(parse_role(" LANDLORD "), Ok(Role::Landlord));
        assert!(parse_role("broker")
            .expect_err("unknown role")
            .contains("broker"));
    }

    #[test]
    fn parse_star_enforces_five_point_scale() {
        assert_eq!(parse_star(" 4 ").map(|score| score.value()), Ok(4));
        assert!(parse_star("0").is_err());
        assert!(parse_star("five").is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert_eq!(
            parse_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap day"))
        );
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn repository_returns_reviews_for_one_identifier() {
        let repository = InMemoryReviewRepository::default();
        let identifier = RevieweeIdentifier::parse("987.654.321-00").expect("identifier");

        assert!(repository
            .for_reviewee(&identifier)
            .expect("available")
            .is_empty());
        assert!(repository
            .fetch(&ReviewId("rev-000001".to_string()))
            .expect("available")
            .is_none());
    }
}
