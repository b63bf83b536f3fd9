//! Five-step review wizard: target, period, scoring, narrative, summary.

mod draft;
mod step;

pub use draft::ReviewDraft;
pub use step::ReviewStep;

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::criteria;
use super::domain::{
    ContractPeriod, CriterionScore, ReviewId, RevieweeIdentifier, Role, StarScore,
    SubmittedReview,
};
use super::rating::{RatingInput, StarCell};
use super::scoring::DerivedScores;

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("rev-{id:06}"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("step {0} is incomplete")]
    StepIncomplete(ReviewStep),
    #[error("{action} is only available on step {step}")]
    WrongStep {
        action: &'static str,
        step: ReviewStep,
    },
    #[error("a {reviewer} cannot review a {reviewee}")]
    NotACounterpart { reviewer: Role, reviewee: Role },
    #[error("'{0}' is not an active criterion for this review")]
    UnknownCriterion(String),
    #[error("condominium criteria are only available to tenants, not {0}")]
    CondominiumUnavailable(Role),
    #[error("the review flow has already finished")]
    Finished,
}

/// Where the wizard currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum FlowState {
    InProgress { step: ReviewStep },
    Success { review_id: ReviewId },
    Cancelled,
}

/// Result of a navigation action.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved(ReviewStep),
    Submitted(Box<SubmittedReview>),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ReviewFlow {
    reviewee: RevieweeIdentifier,
    draft: ReviewDraft,
    state: FlowState,
}

impl ReviewFlow {
    /// Start a fresh draft for a reviewer whose role has been verified.
    pub fn new(reviewee: RevieweeIdentifier, reviewer_role: Role) -> Self {
        Self {
            reviewee,
            draft: ReviewDraft::new(reviewer_role),
            state: FlowState::InProgress {
                step: ReviewStep::Target,
            },
        }
    }

    pub fn reviewee(&self) -> &RevieweeIdentifier {
        &self.reviewee
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn step(&self) -> Option<ReviewStep> {
        match self.state {
            FlowState::InProgress { step } => Some(step),
            FlowState::Success { .. } | FlowState::Cancelled => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step().is_none()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == FlowState::Cancelled
    }

    pub fn scores(&self) -> DerivedScores {
        self.draft.scores()
    }

    pub fn reviewee_options(&self) -> [Role; 2] {
        criteria::counterpart_roles(self.draft.reviewer_role)
    }

    pub fn condominium_available(&self) -> bool {
        criteria::condominium_available(self.draft.reviewer_role)
    }

    pub fn select_reviewee(&mut self, reviewee: Role) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Target, "choosing who to review")?;
        let reviewer = self.draft.reviewer_role;
        if !criteria::is_counterpart(reviewer, reviewee) {
            return Err(FlowError::NotACounterpart { reviewer, reviewee });
        }
        self.draft.reviewee_role = Some(reviewee);
        Ok(())
    }

    pub fn set_contract_start(&mut self, date: NaiveDate) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Period, "setting the contract start")?;
        self.draft.contract_start = Some(date);
        Ok(())
    }

    pub fn set_contract_end(&mut self, date: NaiveDate) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Period, "setting the contract end")?;
        self.draft.contract_end = Some(date);
        Ok(())
    }

    pub fn score(&mut self, criterion: &str, score: StarScore) -> Result<DerivedScores, FlowError> {
        self.ensure_step(ReviewStep::Scoring, "scoring")?;
        if !self.draft.is_active_criterion(criterion) {
            return Err(FlowError::UnknownCriterion(criterion.to_string()));
        }
        self.draft
            .criteria_scores
            .insert(criterion.to_string(), score);
        let scores = self.draft.scores();
        debug!(
            criterion,
            score = score.value(),
            overall = scores.overall,
            condo = scores.condo,
            "criterion scored"
        );
        Ok(scores)
    }

    /// Toggle the condominium section. Entered scores survive toggling off and on.
    pub fn set_in_condo(&mut self, enabled: bool) -> Result<DerivedScores, FlowError> {
        self.ensure_step(ReviewStep::Scoring, "toggling the condominium section")?;
        if !self.condominium_available() {
            return Err(FlowError::CondominiumUnavailable(self.draft.reviewer_role));
        }
        self.draft.is_in_condo = enabled;
        Ok(self.draft.scores())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Narrative, "editing the title")?;
        self.draft.title = title.into();
        Ok(())
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Narrative, "editing the comment")?;
        self.draft.comment = comment.into();
        Ok(())
    }

    pub fn set_justification(&mut self, justification: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Narrative, "editing the justification")?;
        self.draft.justification = justification.into();
        Ok(())
    }

    pub fn set_anonymous(&mut self, anonymous: bool) -> Result<(), FlowError> {
        self.ensure_step(ReviewStep::Summary, "choosing anonymity")?;
        self.draft.is_anonymous = anonymous;
        Ok(())
    }

    /// Completeness predicate for the current step; drives the advance control.
    pub fn can_advance(&self) -> bool {
        match self.step() {
            Some(step) => self.step_complete(step),
            None => false,
        }
    }

    fn step_complete(&self, step: ReviewStep) -> bool {
        match step {
            ReviewStep::Target => self.draft.reviewee_role.is_some(),
            ReviewStep::Period => self.draft.period_complete(),
            ReviewStep::Scoring => self.draft.scoring_complete(),
            ReviewStep::Narrative => self.draft.narrative_complete(),
            ReviewStep::Summary => true,
        }
    }

    /// Move forward, or submit from the summary step.
    pub fn advance(&mut self) -> Result<Transition, FlowError> {
        let step = self.step().ok_or(FlowError::Finished)?;
        if !self.step_complete(step) {
            return Err(FlowError::StepIncomplete(step));
        }

        match step.next() {
            Some(next) => {
                self.state = FlowState::InProgress { step: next };
                debug!(from = ?step, to = ?next, "review step advanced");
                Ok(Transition::Moved(next))
            }
            None => {
                let review = self.submit()?;
                Ok(Transition::Submitted(Box::new(review)))
            }
        }
    }

    /// Backward navigation is never validated; from the first step it cancels.
    pub fn back(&mut self) -> Result<Transition, FlowError> {
        let step = self.step().ok_or(FlowError::Finished)?;
        match step.previous() {
            Some(previous) => {
                self.state = FlowState::InProgress { step: previous };
                Ok(Transition::Moved(previous))
            }
            None => {
                self.cancel();
                Ok(Transition::Cancelled)
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.is_finished() {
            return;
        }
        debug!(reviewee = %self.reviewee, "review flow cancelled");
        self.draft = ReviewDraft::new(self.draft.reviewer_role);
        self.state = FlowState::Cancelled;
    }

    fn submit(&mut self) -> Result<SubmittedReview, FlowError> {
        let reviewer_role = self.draft.reviewer_role;
        let draft = mem::replace(&mut self.draft, ReviewDraft::new(reviewer_role));

        let reviewee_role = draft
            .reviewee_role
            .ok_or(FlowError::StepIncomplete(ReviewStep::Target))?;
        let contract = match (draft.contract_start, draft.contract_end) {
            (Some(start), Some(end)) => ContractPeriod { start, end },
            _ => return Err(FlowError::StepIncomplete(ReviewStep::Period)),
        };

        let scores = draft.scores();
        let condo_criteria = draft.active_condominium_criteria();
        let mut criteria = Vec::new();
        for (names, condominium) in [
            (Some(draft.standard_criteria()), false),
            (condo_criteria, true),
        ] {
            for name in names.unwrap_or_default() {
                let score = draft
                    .score_for(name)
                    .ok_or(FlowError::StepIncomplete(ReviewStep::Scoring))?;
                criteria.push(CriterionScore {
                    criterion: (*name).to_string(),
                    score,
                    condominium,
                });
            }
        }

        let justification = draft.justification.trim();
        let review = SubmittedReview {
            id: next_review_id(),
            reviewee: self.reviewee.clone(),
            reviewer_role,
            reviewee_role,
            contract,
            criteria,
            overall_score: scores.overall,
            condo_score: condo_criteria.map(|_| scores.condo),
            title: draft.title.trim().to_string(),
            comment: draft.comment.trim().to_string(),
            justification: (!justification.is_empty()).then(|| justification.to_string()),
            is_anonymous: draft.is_anonymous,
            submitted_at: Utc::now(),
        };

        info!(
            review_id = %review.id.0,
            reviewee = %review.reviewee,
            reviewer = %reviewer_role,
            overall = review.overall_score,
            "review submitted"
        );
        self.state = FlowState::Success {
            review_id: review.id.clone(),
        };
        Ok(review)
    }

    /// Read-only recap shown on the final step.
    pub fn summary(&self) -> ReviewSummary {
        let scores = self.draft.scores();
        ReviewSummary {
            reviewee: self.reviewee.clone(),
            reviewee_role: self.draft.reviewee_role,
            contract_start: self.draft.contract_start,
            contract_end: self.draft.contract_end,
            overall_score: scores.overall,
            overall_stars: RatingInput::display().render(scores.overall),
            condo_score: self.draft.active_condominium_criteria().map(|_| scores.condo),
            title: self.draft.title.clone(),
            comment: self.draft.comment.clone(),
            justification: self.draft.justification.clone(),
            is_anonymous: self.draft.is_anonymous,
        }
    }

    pub fn view(&self) -> ReviewFlowView {
        let scores = self.draft.scores();
        let rows = |names: &[&str]| -> Vec<CriterionRow> {
            names
                .iter()
                .map(|name| {
                    let score = self.draft.score_for(name);
                    CriterionRow {
                        criterion: (*name).to_string(),
                        score: score.map(StarScore::value),
                        stars: RatingInput::input()
                            .render(score.map_or(0.0, |score| f32::from(score.value()))),
                    }
                })
                .collect()
        };

        ReviewFlowView {
            state: self.state.clone(),
            step_label: self.step().map(ReviewStep::label),
            reviewer_role: self.draft.reviewer_role,
            reviewee_options: self.reviewee_options(),
            reviewee_role: self.draft.reviewee_role,
            criteria: rows(self.draft.standard_criteria()),
            condominium_available: self.condominium_available(),
            is_in_condo: self.draft.is_in_condo,
            condominium_criteria: self
                .draft
                .active_condominium_criteria()
                .map(rows)
                .unwrap_or_default(),
            scores,
            justification_required: scores.justification_required(),
            can_advance: self.can_advance(),
            summary: (self.step() == Some(ReviewStep::Summary)).then(|| self.summary()),
        }
    }

    fn ensure_step(&self, step: ReviewStep, action: &'static str) -> Result<(), FlowError> {
        match self.step() {
            Some(current) if current == step => Ok(()),
            Some(_) => Err(FlowError::WrongStep { action, step }),
            None => Err(FlowError::Finished),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub reviewee: RevieweeIdentifier,
    pub reviewee_role: Option<Role>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub overall_score: f32,
    pub overall_stars: [StarCell; 5],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condo_score: Option<f32>,
    pub title: String,
    pub comment: String,
    pub justification: String,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionRow {
    pub criterion: String,
    pub score: Option<u8>,
    pub stars: [StarCell; 5],
}

/// Serializable snapshot of the wizard for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewFlowView {
    pub state: FlowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_label: Option<&'static str>,
    pub reviewer_role: Role,
    pub reviewee_options: [Role; 2],
    pub reviewee_role: Option<Role>,
    pub criteria: Vec<CriterionRow>,
    pub condominium_available: bool,
    pub is_in_condo: bool,
    pub condominium_criteria: Vec<CriterionRow>,
    pub scores: DerivedScores,
    pub justification_required: bool,
    pub can_advance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReviewSummary>,
}
