use super::common::*;

use crate::workflows::reviews::criteria::criteria_for;
use crate::workflows::reviews::domain::Role;
use crate::workflows::reviews::navigator::{
    NavigationError, Navigator, Page, Screen, ScreenKind, SessionCommand,
};
use crate::workflows::reviews::submission::{FlowError, ReviewStep};
use crate::workflows::reviews::verification::{ScanOutcome, VerificationResult};

fn apply(navigator: &mut Navigator, command: SessionCommand) {
    navigator
        .apply(command)
        .unwrap_or_else(|err| panic!("command failed: {err}"));
}

fn verified_navigator(role: Role) -> Navigator {
    let mut navigator = Navigator::new();
    navigator.start_validation(CPF).expect("identifier");
    apply(&mut navigator, SessionCommand::SelectReviewerRole { role });
    apply(&mut navigator, SessionCommand::Next);
    let pending = navigator.begin_upload(contract_pdf()).expect("upload screen");
    assert_eq!(
        navigator.finish_upload(pending.ticket, &VerificationResult::Verified),
        ScanOutcome::Verified
    );
    navigator
}

#[test]
fn search_opens_validation_for_trimmed_identifier() {
    let mut navigator = Navigator::new();

    navigator.start_validation("  123.456.789-09 ").expect("identifier");

    match navigator.screen() {
        Screen::Validation { identifier, .. } => assert_eq!(identifier.as_str(), CPF),
        other => panic!("expected validation screen, got {other:?}"),
    }
}

#[test]
fn blank_search_stays_on_landing() {
    let mut navigator = Navigator::new();

    assert_eq!(
        navigator.start_validation("   "),
        Err(NavigationError::BlankIdentifier)
    );
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn confirmed_validation_opens_review_wizard() {
    let mut navigator = verified_navigator(Role::Landlord);

    apply(&mut navigator, SessionCommand::ConfirmValidation);

    match navigator.screen() {
        Screen::CreateReview { flow } => {
            assert_eq!(flow.reviewee().as_str(), CPF);
            assert_eq!(flow.draft().reviewer_role(), Role::Landlord);
            assert_eq!(flow.step(), Some(ReviewStep::Target));
        }
        other => panic!("expected review wizard, got {other:?}"),
    }
}

#[test]
fn success_without_role_silently_resets() {
    let mut navigator = verified_navigator(Role::Tenant);

    assert!(!navigator.validation_succeeded(None));
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn success_outside_validation_resets() {
    let mut navigator = Navigator::new();
    navigator.navigate(Page::About);

    assert!(!navigator.validation_succeeded(Some(Role::Tenant)));
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn cancel_from_any_screen_returns_home() {
    let mut navigator = verified_navigator(Role::Tenant);
    apply(&mut navigator, SessionCommand::ConfirmValidation);

    apply(&mut navigator, SessionCommand::Cancel);

    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn back_from_first_review_step_returns_home() {
    let mut navigator = verified_navigator(Role::Tenant);
    apply(&mut navigator, SessionCommand::ConfirmValidation);

    apply(&mut navigator, SessionCommand::Back);

    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn back_twice_from_upload_cancels_validation() {
    let mut navigator = Navigator::new();
    navigator.start_validation(CPF).expect("identifier");
    apply(&mut navigator, SessionCommand::SelectReviewerRole { role: Role::Tenant });
    apply(&mut navigator, SessionCommand::Next);

    apply(&mut navigator, SessionCommand::Back);
    assert_eq!(navigator.kind(), ScreenKind::Validation);
    apply(&mut navigator, SessionCommand::Back);
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn scan_results_for_abandoned_screens_are_stale() {
    let mut navigator = Navigator::new();
    navigator.start_validation(CPF).expect("identifier");
    apply(&mut navigator, SessionCommand::SelectReviewerRole { role: Role::Tenant });
    apply(&mut navigator, SessionCommand::Next);
    let pending = navigator.begin_upload(contract_pdf()).expect("upload screen");

    navigator.navigate(Page::Privacy);

    assert_eq!(
        navigator.finish_upload(pending.ticket, &VerificationResult::Verified),
        ScanOutcome::Stale
    );
    assert_eq!(navigator.kind(), ScreenKind::Privacy);
}

#[test]
fn review_commands_are_unavailable_on_landing() {
    let mut navigator = Navigator::new();

    match navigator.apply(SessionCommand::SetTitle {
        title: "Hello".to_string(),
    }) {
        Err(NavigationError::Unavailable { screen, .. }) => {
            assert_eq!(screen, ScreenKind::Landing)
        }
        other => panic!("expected unavailable command, got {other:?}"),
    }
}

#[test]
fn command_driven_review_reports_submission() {
    let mut navigator = verified_navigator(Role::Landlord);
    apply(&mut navigator, SessionCommand::ConfirmValidation);
    apply(&mut navigator, SessionCommand::SelectReviewee { role: Role::Tenant });
    apply(&mut navigator, SessionCommand::Next);
    apply(
        &mut navigator,
        SessionCommand::SetContractStart {
            date: date(2022, 2, 1),
        },
    );
    apply(
        &mut navigator,
        SessionCommand::SetContractEnd {
            date: date(2023, 2, 1),
        },
    );
    apply(&mut navigator, SessionCommand::Next);

    match navigator.apply(SessionCommand::SetInCondo { enabled: true }) {
        Err(NavigationError::Review(FlowError::CondominiumUnavailable(Role::Landlord))) => {}
        other => panic!("expected condominium unavailable, got {other:?}"),
    }

    for criterion in criteria_for(Role::Landlord, Role::Tenant) {
        apply(
            &mut navigator,
            SessionCommand::Score {
                criterion: (*criterion).to_string(),
                score: star(5),
            },
        );
    }
    apply(&mut navigator, SessionCommand::Next);
    apply(
        &mut navigator,
        SessionCommand::SetTitle {
            title: "Model tenant".to_string(),
        },
    );
    apply(
        &mut navigator,
        SessionCommand::SetComment {
            comment: "Left the flat spotless.".to_string(),
        },
    );
    apply(&mut navigator, SessionCommand::Next);

    let outcome = navigator.apply(SessionCommand::Next).expect("submits");
    let review = outcome.submitted.expect("review produced");
    assert_eq!(review.overall_score, 5.0);
    assert_eq!(review.author_label(), "Verified Landlord");
    assert_eq!(navigator.kind(), ScreenKind::CreateReview);

    apply(&mut navigator, SessionCommand::Finish);
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}

#[test]
fn header_links_replace_current_screen() {
    let mut navigator = verified_navigator(Role::Tenant);

    apply(&mut navigator, SessionCommand::Navigate { page: Page::Auth });
    assert_eq!(navigator.kind(), ScreenKind::Auth);
    apply(&mut navigator, SessionCommand::Navigate { page: Page::Home });
    assert_eq!(navigator.kind(), ScreenKind::Landing);
}
