use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::workflows::reviews::criteria::{self, CriteriaSet};
use crate::workflows::reviews::domain::{Role, StarScore};
use crate::workflows::reviews::scoring::{self, DerivedScores};

/// In-memory review being assembled by the wizard.
///
/// Derived scores are never stored; every read recomputes them from
/// `criteria_scores` and the active criteria sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub(super) reviewer_role: Role,
    pub(super) reviewee_role: Option<Role>,
    pub(super) contract_start: Option<NaiveDate>,
    pub(super) contract_end: Option<NaiveDate>,
    pub(super) criteria_scores: BTreeMap<String, StarScore>,
    pub(super) title: String,
    pub(super) comment: String,
    pub(super) justification: String,
    pub(super) is_anonymous: bool,
    pub(super) is_in_condo: bool,
}

impl ReviewDraft {
    pub fn new(reviewer_role: Role) -> Self {
        Self {
            reviewer_role,
            reviewee_role: None,
            contract_start: None,
            contract_end: None,
            criteria_scores: BTreeMap::new(),
            title: String::new(),
            comment: String::new(),
            justification: String::new(),
            is_anonymous: false,
            is_in_condo: false,
        }
    }

    pub fn reviewer_role(&self) -> Role {
        self.reviewer_role
    }

    pub fn reviewee_role(&self) -> Option<Role> {
        self.reviewee_role
    }

    pub fn contract_start(&self) -> Option<NaiveDate> {
        self.contract_start
    }

    pub fn contract_end(&self) -> Option<NaiveDate> {
        self.contract_end
    }

    pub fn criteria_scores(&self) -> &BTreeMap<String, StarScore> {
        &self.criteria_scores
    }

    pub fn score_for(&self, criterion: &str) -> Option<StarScore> {
        self.criteria_scores.get(criterion).copied()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    pub fn is_in_condo(&self) -> bool {
        self.is_in_condo
    }

    pub fn standard_criteria(&self) -> CriteriaSet {
        match self.reviewee_role {
            Some(reviewee) => criteria::criteria_for(self.reviewer_role, reviewee),
            None => &[],
        }
    }

    /// Condominium criteria, when the toggle is on for a tenant reviewer.
    pub fn active_condominium_criteria(&self) -> Option<CriteriaSet> {
        if self.is_in_condo && criteria::condominium_available(self.reviewer_role) {
            Some(criteria::condominium_criteria())
        } else {
            None
        }
    }

    pub fn is_active_criterion(&self, criterion: &str) -> bool {
        self.standard_criteria().contains(&criterion)
            || self
                .active_condominium_criteria()
                .is_some_and(|condo| condo.contains(&criterion))
    }

    pub fn scores(&self) -> DerivedScores {
        scoring::derive_scores(
            &self.criteria_scores,
            self.standard_criteria(),
            self.active_condominium_criteria(),
        )
    }

    pub fn period_complete(&self) -> bool {
        self.contract_start.is_some() && self.contract_end.is_some()
    }

    pub fn scoring_complete(&self) -> bool {
        let standard = self.standard_criteria();
        let standard_complete =
            !standard.is_empty() && scoring::all_scored(&self.criteria_scores, standard);

        match self.active_condominium_criteria() {
            Some(condo) => standard_complete && scoring::all_scored(&self.criteria_scores, condo),
            None => standard_complete,
        }
    }

    pub fn justification_required(&self) -> bool {
        self.scores().justification_required()
    }

    pub fn narrative_complete(&self) -> bool {
        let base = !self.title.trim().is_empty() && !self.comment.trim().is_empty();
        if self.justification_required() {
            base && !self.justification.trim().is_empty()
        } else {
            base
        }
    }
}
