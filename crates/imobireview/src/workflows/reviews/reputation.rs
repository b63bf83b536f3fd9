use serde::Serialize;

use super::domain::{RevieweeIdentifier, Role, StarScore, SubmittedReview};
use super::scoring::round_one_decimal;

/// Average score for one criterion across a reviewee's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionAverage {
    pub subject: String,
    pub score: f32,
    pub full_mark: u8,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewCard {
    pub author: String,
    pub reviewer_role: Role,
    pub overall_score: f32,
    pub title: String,
    pub comment: String,
    pub contract_period: String,
}

/// Public reputation of a reviewee, built from published reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputationSummary {
    pub reviewee: RevieweeIdentifier,
    pub total_reviews: usize,
    pub overall_reputation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condominium_reputation: Option<f32>,
    pub criteria_averages: Vec<CriterionAverage>,
    pub recent_reviews: Vec<ReviewCard>,
}

const RECENT_REVIEW_LIMIT: usize = 5;

impl ReputationSummary {
    pub fn from_reviews(reviewee: RevieweeIdentifier, reviews: &[SubmittedReview]) -> Self {
        let overall_reputation = average(reviews.iter().map(|review| f64::from(review.overall_score)));
        let condo: Vec<f64> = reviews
            .iter()
            .filter_map(|review| review.condo_score.map(f64::from))
            .collect();

        // first-seen order keeps the registry's criterion ordering stable
        let mut totals: Vec<(String, u32, usize)> = Vec::new();
        for criterion in reviews.iter().flat_map(|review| review.criteria.iter()) {
            let value = u32::from(criterion.score.value());
            match totals.iter_mut().find(|(name, _, _)| *name == criterion.criterion) {
                Some((_, sum, count)) => {
                    *sum += value;
                    *count += 1;
                }
                None => totals.push((criterion.criterion.clone(), value, 1)),
            }
        }

        let criteria_averages = totals
            .into_iter()
            .map(|(subject, sum, count)| CriterionAverage {
                subject,
                score: round_one_decimal(f64::from(sum) / count as f64),
                full_mark: StarScore::MAX,
                reviews: count,
            })
            .collect();

        let recent_reviews = reviews
            .iter()
            .rev()
            .take(RECENT_REVIEW_LIMIT)
            .map(|review| ReviewCard {
                author: review.author_label(),
                reviewer_role: review.reviewer_role,
                overall_score: review.overall_score,
                title: review.title.clone(),
                comment: review.comment.clone(),
                contract_period: format!(
                    "{} - {}",
                    review.contract.start.format("%b %Y"),
                    review.contract.end.format("%b %Y")
                ),
            })
            .collect();

        Self {
            reviewee,
            total_reviews: reviews.len(),
            overall_reputation,
            condominium_reputation: (!condo.is_empty()).then(|| average(condo.into_iter())),
            criteria_averages,
            recent_reviews,
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f32 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        round_one_decimal(sum / count as f64)
    }
}
