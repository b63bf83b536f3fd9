use super::common::*;

use crate::workflows::reviews::criteria::{condominium_criteria, criteria_for};
use crate::workflows::reviews::domain::Role;
use crate::workflows::reviews::submission::{
    FlowError, FlowState, ReviewFlow, ReviewStep, Transition,
};

fn tenant_agency_criteria() -> &'static [&'static str] {
    criteria_for(Role::Tenant, Role::Agency)
}

#[test]
fn target_step_offers_only_counterparts() {
    let mut flow = ReviewFlow::new(reviewee(), Role::Landlord);

    assert_eq!(flow.reviewee_options(), [Role::Tenant, Role::Agency]);
    assert!(!flow.can_advance());
    match flow.select_reviewee(Role::Landlord) {
        Err(FlowError::NotACounterpart { reviewer, reviewee }) => {
            assert_eq!(reviewer, Role::Landlord);
            assert_eq!(reviewee, Role::Landlord);
        }
        other => panic!("expected counterpart error, got {other:?}"),
    }
    match flow.advance() {
        Err(FlowError::StepIncomplete(ReviewStep::Target)) => {}
        other => panic!("expected incomplete target, got {other:?}"),
    }
}

#[test]
fn period_step_requires_both_dates() {
    let mut flow = ReviewFlow::new(reviewee(), Role::Tenant);
    flow.select_reviewee(Role::Landlord).expect("counterpart");
    flow.advance().expect("target complete");

    flow.set_contract_start(date(2022, 3, 1)).expect("period step");
    assert!(!flow.can_advance());
    // ordering of the two dates is not validated
    flow.set_contract_end(date(2021, 3, 1)).expect("period step");
    assert!(flow.can_advance());
}

#[test]
fn scoring_all_four_criteria_yields_average() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);

    score_in_order(&mut flow, tenant_agency_criteria(), &[5, 4, 5, 4]);

    assert_eq!(flow.scores().overall, 4.5);
    assert!(!flow.scores().justification_required());
    assert!(flow.can_advance());
}

#[test]
fn live_average_counts_unscored_criteria_as_zero() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);

    let scores = flow
        .score(tenant_agency_criteria()[0], star(5))
        .expect("active criterion");

    assert_eq!(scores.overall, 1.3);
    assert!(!flow.can_advance());
}

#[test]
fn condominium_section_averages_separately() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);
    score_in_order(&mut flow, tenant_agency_criteria(), &[5, 4, 5, 4]);

    flow.set_in_condo(true).expect("tenants may rate the building");
    assert!(!flow.can_advance(), "condominium criteria must be scored too");
    score_in_order(&mut flow, condominium_criteria(), &[3, 3, 3, 3]);

    let scores = flow.scores();
    assert_eq!(scores.overall, 4.5);
    assert_eq!(scores.condo, 3.0);
    assert!(flow.can_advance());
}

#[test]
fn condominium_scores_survive_toggling() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Landlord);
    flow.set_in_condo(true).expect("tenant");
    score_in_order(&mut flow, condominium_criteria(), &[4, 2, 5, 1]);
    assert_eq!(flow.scores().condo, 3.0);

    let off = flow.set_in_condo(false).expect("tenant");
    assert_eq!(off.condo, 0.0);
    match flow.score(condominium_criteria()[0], star(5)) {
        Err(FlowError::UnknownCriterion(name)) => assert_eq!(name, "Building Management"),
        other => panic!("expected inactive criterion, got {other:?}"),
    }

    let on = flow.set_in_condo(true).expect("tenant");
    assert_eq!(on.condo, 3.0);
    assert_eq!(
        flow.draft().score_for("Fee Fairness").map(|score| score.value()),
        Some(1)
    );
}

#[test]
fn condominium_toggle_controls_the_scoring_gate() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Landlord);
    score_in_order(
        &mut flow,
        criteria_for(Role::Tenant, Role::Landlord),
        &[5, 4, 5, 4],
    );
    assert!(flow.can_advance());

    flow.set_in_condo(true).expect("tenant");
    assert!(!flow.can_advance());
    score_in_order(&mut flow, condominium_criteria(), &[2, 4]);
    assert!(!flow.can_advance());

    flow.set_in_condo(false).expect("tenant");
    assert!(flow.can_advance());

    flow.set_in_condo(true).expect("tenant");
    assert!(!flow.can_advance());
    assert_eq!(
        flow.draft().score_for("Building Management").map(|score| score.value()),
        Some(2)
    );
    assert_eq!(
        flow.draft().score_for("Common Area Upkeep").map(|score| score.value()),
        Some(4)
    );
    assert_eq!(flow.draft().score_for("Security"), None);
    match flow.advance() {
        Err(FlowError::StepIncomplete(ReviewStep::Scoring)) => {}
        other => panic!("expected scoring to stay incomplete, got {other:?}"),
    }
}

#[test]
fn condominium_toggle_is_tenant_only() {
    let mut flow = flow_at_scoring(Role::Landlord, Role::Agency);

    assert!(!flow.condominium_available());
    match flow.set_in_condo(true) {
        Err(FlowError::CondominiumUnavailable(Role::Landlord)) => {}
        other => panic!("expected condominium unavailable, got {other:?}"),
    }
    assert!(!flow.draft().is_in_condo());
}

#[test]
fn low_overall_requires_justification() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);
    score_in_order(&mut flow, tenant_agency_criteria(), &[3, 2, 3, 2]);
    assert_eq!(flow.scores().overall, 2.5);
    flow.advance().expect("scoring complete");

    flow.set_title("Slow to respond").expect("narrative step");
    flow.set_comment("Repairs took weeks.").expect("narrative step");
    assert!(flow.draft().justification_required());
    assert!(!flow.can_advance());
    match flow.advance() {
        Err(FlowError::StepIncomplete(ReviewStep::Narrative)) => {}
        other => panic!("expected incomplete narrative, got {other:?}"),
    }

    flow.set_justification("   ").expect("narrative step");
    assert!(!flow.can_advance(), "whitespace is not a justification");
    flow.set_justification("Three open tickets ignored for a month.")
        .expect("narrative step");
    assert!(flow.can_advance());
}

#[test]
fn high_overall_skips_justification() {
    let mut flow = flow_at_scoring(Role::Agency, Role::Tenant);
    score_in_order(
        &mut flow,
        criteria_for(Role::Agency, Role::Tenant),
        &[4, 4, 4, 4],
    );
    flow.advance().expect("scoring complete");

    flow.set_title("Great tenant").expect("narrative step");
    flow.set_comment("Always paid on time.").expect("narrative step");
    assert!(flow.can_advance());
}

#[test]
fn inputs_are_bound_to_their_step() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);

    match flow.set_title("Too early") {
        Err(FlowError::WrongStep { step, .. }) => assert_eq!(step, ReviewStep::Narrative),
        other => panic!("expected wrong step, got {other:?}"),
    }
    match flow.select_reviewee(Role::Landlord) {
        Err(FlowError::WrongStep { step, .. }) => assert_eq!(step, ReviewStep::Target),
        other => panic!("expected wrong step, got {other:?}"),
    }
}

#[test]
fn back_keeps_draft_and_cancels_from_first_step() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);
    flow.score(tenant_agency_criteria()[1], star(2)).expect("active");

    assert_eq!(flow.back(), Ok(Transition::Moved(ReviewStep::Period)));
    assert_eq!(flow.back(), Ok(Transition::Moved(ReviewStep::Target)));
    assert_eq!(flow.draft().reviewee_role(), Some(Role::Agency));
    assert_eq!(flow.draft().criteria_scores().len(), 1);

    assert_eq!(flow.back(), Ok(Transition::Cancelled));
    assert!(flow.is_cancelled());
    assert_eq!(flow.draft().reviewee_role(), None);
}

#[test]
fn full_walkthrough_submits_and_clears_draft() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Agency);
    score_in_order(&mut flow, tenant_agency_criteria(), &[5, 4, 5, 4]);
    flow.set_in_condo(true).expect("tenant");
    score_in_order(&mut flow, condominium_criteria(), &[3, 3, 3, 3]);
    flow.advance().expect("scoring complete");
    flow.set_title("  Responsive agency ").expect("narrative");
    flow.set_comment("Fixed the boiler within a day.").expect("narrative");
    assert_eq!(flow.advance(), Ok(Transition::Moved(ReviewStep::Summary)));

    flow.set_anonymous(true).expect("summary step");
    let summary = flow.summary();
    assert_eq!(summary.overall_score, 4.5);
    assert_eq!(summary.condo_score, Some(3.0));
    assert_eq!(summary.overall_stars.iter().filter(|cell| cell.filled).count(), 5);

    let review = match flow.advance() {
        Ok(Transition::Submitted(review)) => *review,
        other => panic!("expected submission, got {other:?}"),
    };

    assert_eq!(review.reviewee, reviewee());
    assert_eq!(review.reviewer_role, Role::Tenant);
    assert_eq!(review.reviewee_role, Role::Agency);
    assert_eq!(review.title, "Responsive agency");
    assert_eq!(review.overall_score, 4.5);
    assert_eq!(review.condo_score, Some(3.0));
    assert_eq!(review.criteria.len(), 8);
    assert_eq!(
        review.criteria.iter().filter(|entry| entry.condominium).count(),
        4
    );
    assert_eq!(review.justification, None);
    assert_eq!(review.author_label(), "Anonymous");

    assert_eq!(
        flow.state(),
        &FlowState::Success {
            review_id: review.id.clone()
        }
    );
    assert!(flow.draft().criteria_scores().is_empty());
    assert_eq!(flow.advance(), Err(FlowError::Finished));
}

#[test]
fn view_exposes_gating_and_rows() {
    let mut flow = flow_at_scoring(Role::Tenant, Role::Landlord);
    flow.score("Flexibility", star(2)).expect("active");

    let view = flow.view();
    assert_eq!(view.criteria.len(), 4);
    assert_eq!(view.criteria[3].criterion, "Flexibility");
    assert_eq!(view.criteria[3].score, Some(2));
    assert_eq!(view.criteria[3].stars.iter().filter(|cell| cell.filled).count(), 2);
    assert!(view.condominium_available);
    assert!(view.condominium_criteria.is_empty());
    assert!(!view.can_advance);
    assert_eq!(view.step_label, Some(ReviewStep::Scoring.label()));
    assert!(view.summary.is_none());
}
