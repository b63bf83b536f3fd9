//! Screen-level state machine composing the verification and review flows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{RevieweeIdentifier, Role, StarScore, SubmittedReview};
use super::signup::{Registration, SignUpError, SignUpForm, SignUpView};
use super::submission::{FlowError, ReviewFlow, ReviewFlowView, Transition};
use super::verification::{
    DocumentDescriptor, PendingScan, ScanOutcome, ScanTicket, ValidationError, ValidationFlow,
    ValidationStage, ValidationView, VerificationResult,
};

/// Pure navigation targets reachable from headers and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Auth,
    Profile,
    About,
    Contact,
    Privacy,
    Terms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Landing,
    Validation,
    CreateReview,
    Auth,
    Profile,
    About,
    Contact,
    Privacy,
    Terms,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Landing => "landing",
            Self::Validation => "validation",
            Self::CreateReview => "create review",
            Self::Auth => "sign-up",
            Self::Profile => "profile",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
        };
        f.write_str(label)
    }
}

/// Current screen together with the draft it owns.
#[derive(Debug, Clone)]
pub enum Screen {
    Landing,
    Validation {
        identifier: RevieweeIdentifier,
        flow: ValidationFlow,
    },
    CreateReview {
        flow: ReviewFlow,
    },
    Auth {
        form: SignUpForm,
    },
    Profile,
    About,
    Contact,
    Privacy,
    Terms,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Landing => ScreenKind::Landing,
            Self::Validation { .. } => ScreenKind::Validation,
            Self::CreateReview { .. } => ScreenKind::CreateReview,
            Self::Auth { .. } => ScreenKind::Auth,
            Self::Profile => ScreenKind::Profile,
            Self::About => ScreenKind::About,
            Self::Contact => ScreenKind::Contact,
            Self::Privacy => ScreenKind::Privacy,
            Self::Terms => ScreenKind::Terms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("cannot {action} from the {screen} screen")]
    Unavailable {
        action: &'static str,
        screen: ScreenKind,
    },
    #[error("enter a CPF or CNPJ to start a review")]
    BlankIdentifier,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Review(#[from] FlowError),
    #[error(transparent)]
    SignUp(#[from] SignUpError),
}

/// User events accepted by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SessionCommand {
    Navigate { page: Page },
    StartValidation { identifier: String },
    Cancel,
    SelectReviewerRole { role: Role },
    ConfirmValidation,
    SelectReviewee { role: Role },
    SetContractStart { date: NaiveDate },
    SetContractEnd { date: NaiveDate },
    Score { criterion: String, score: StarScore },
    SetInCondo { enabled: bool },
    SetTitle { title: String },
    SetComment { comment: String },
    SetJustification { justification: String },
    SetAnonymous { anonymous: bool },
    Next,
    Back,
    Finish,
    SelectAccountRole { role: Role },
    SetEmail { email: String },
    SetPassword { password: String },
    SetPasswordConfirmation { confirmation: String },
    AcceptTerms { accepted: bool },
    SubmitSignUp,
}

/// Side results of a command that the caller may need to persist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    pub submitted: Option<SubmittedReview>,
    pub registration: Option<Registration>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    screen: Screen,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            screen: Screen::Landing,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    /// Drop every draft and return to the landing screen.
    pub fn reset(&mut self) {
        debug!(from = %self.kind(), "navigation reset");
        self.screen = Screen::Landing;
    }

    pub fn navigate(&mut self, page: Page) {
        self.screen = match page {
            Page::Home => Screen::Landing,
            Page::Auth => Screen::Auth {
                form: SignUpForm::new(),
            },
            Page::Profile => Screen::Profile,
            Page::About => Screen::About,
            Page::Contact => Screen::Contact,
            Page::Privacy => Screen::Privacy,
            Page::Terms => Screen::Terms,
        };
    }

    /// Search entry point; the identifier is free text and only trimmed.
    pub fn start_validation(&mut self, identifier: &str) -> Result<(), NavigationError> {
        let identifier =
            RevieweeIdentifier::parse(identifier).ok_or(NavigationError::BlankIdentifier)?;
        debug!(%identifier, "validation started");
        self.screen = Screen::Validation {
            identifier,
            flow: ValidationFlow::new(),
        };
        Ok(())
    }

    /// Hand-off from verification to the review wizard.
    ///
    /// Without a verified role or a reviewee to attach it to, the whole flow
    /// silently resets to the landing screen. Returns whether the wizard opened.
    pub fn validation_succeeded(&mut self, reviewer_role: Option<Role>) -> bool {
        let identifier = match &self.screen {
            Screen::Validation { identifier, .. } => Some(identifier.clone()),
            _ => None,
        };

        match (identifier, reviewer_role) {
            (Some(identifier), Some(role)) => {
                self.screen = Screen::CreateReview {
                    flow: ReviewFlow::new(identifier, role),
                };
                true
            }
            _ => {
                warn!(screen = %self.kind(), "review requested without a verified role");
                self.reset();
                false
            }
        }
    }

    pub fn begin_upload(
        &mut self,
        document: DocumentDescriptor,
    ) -> Result<PendingScan, NavigationError> {
        match &mut self.screen {
            Screen::Validation { flow, .. } => Ok(flow.upload(document)?),
            Screen::Auth { form } => Ok(form.upload_creci(document)?),
            other => Err(NavigationError::Unavailable {
                action: "upload a document",
                screen: other.kind(),
            }),
        }
    }

    /// Apply a verification result; results for screens since left are ignored.
    pub fn finish_upload(&mut self, ticket: ScanTicket, result: &VerificationResult) -> ScanOutcome {
        match &mut self.screen {
            Screen::Validation { flow, .. } => flow.finish_scan(ticket, result),
            Screen::Auth { form } => form.finish_creci_scan(ticket, result),
            _ => ScanOutcome::Stale,
        }
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<CommandOutcome, NavigationError> {
        let mut outcome = CommandOutcome::default();

        match command {
            SessionCommand::Navigate { page } => self.navigate(page),
            SessionCommand::StartValidation { identifier } => self.start_validation(&identifier)?,
            SessionCommand::Cancel => self.reset(),
            SessionCommand::SelectReviewerRole { role } => {
                self.validation_flow("select a role")?.select_role(role)?
            }
            SessionCommand::ConfirmValidation => {
                let confirmed = self.validation_flow("confirm the document")?.confirm()?;
                self.validation_succeeded(Some(confirmed.reviewer_role));
            }
            SessionCommand::SelectReviewee { role } => {
                self.review_flow("choose who to review")?.select_reviewee(role)?
            }
            SessionCommand::SetContractStart { date } => {
                self.review_flow("set the contract period")?.set_contract_start(date)?
            }
            SessionCommand::SetContractEnd { date } => {
                self.review_flow("set the contract period")?.set_contract_end(date)?
            }
            SessionCommand::Score { criterion, score } => {
                self.review_flow("score a criterion")?.score(&criterion, score)?;
            }
            SessionCommand::SetInCondo { enabled } => {
                self.review_flow("toggle the condominium section")?.set_in_condo(enabled)?;
            }
            SessionCommand::SetTitle { title } => {
                self.review_flow("edit the title")?.set_title(title)?
            }
            SessionCommand::SetComment { comment } => {
                self.review_flow("edit the comment")?.set_comment(comment)?
            }
            SessionCommand::SetJustification { justification } => self
                .review_flow("edit the justification")?
                .set_justification(justification)?,
            SessionCommand::SetAnonymous { anonymous } => {
                self.review_flow("choose anonymity")?.set_anonymous(anonymous)?
            }
            SessionCommand::Next => match &mut self.screen {
                Screen::Validation { flow, .. } => {
                    flow.proceed()?;
                }
                Screen::CreateReview { flow } => {
                    if let Transition::Submitted(review) = flow.advance()? {
                        outcome.submitted = Some(*review);
                    }
                }
                other => {
                    return Err(NavigationError::Unavailable {
                        action: "continue",
                        screen: other.kind(),
                    })
                }
            },
            SessionCommand::Back => match &mut self.screen {
                Screen::Validation { flow, .. } => {
                    flow.back();
                }
                Screen::CreateReview { flow } => {
                    flow.back()?;
                }
                _ => self.reset(),
            },
            SessionCommand::Finish => self.reset(),
            SessionCommand::SelectAccountRole { role } => {
                self.signup_form("choose an account type")?.select_role(role)
            }
            SessionCommand::SetEmail { email } => {
                self.signup_form("enter an e-mail")?.set_email(email)
            }
            SessionCommand::SetPassword { password } => {
                self.signup_form("enter a password")?.set_password(password)
            }
            SessionCommand::SetPasswordConfirmation { confirmation } => self
                .signup_form("confirm the password")?
                .set_password_confirmation(confirmation),
            SessionCommand::AcceptTerms { accepted } => {
                self.signup_form("accept the terms")?.accept_terms(accepted)
            }
            SessionCommand::SubmitSignUp => {
                let registration = self.signup_form("create an account")?.submit()?;
                outcome.registration = Some(registration);
                self.reset();
            }
        }

        self.settle();
        Ok(outcome)
    }

    /// Cancelled flows hand control back to the landing screen.
    fn settle(&mut self) {
        let cancelled = match &self.screen {
            Screen::Validation { flow, .. } => flow.stage() == ValidationStage::Cancelled,
            Screen::CreateReview { flow } => flow.is_cancelled(),
            _ => false,
        };
        if cancelled {
            self.reset();
        }
    }

    fn validation_flow(
        &mut self,
        action: &'static str,
    ) -> Result<&mut ValidationFlow, NavigationError> {
        match &mut self.screen {
            Screen::Validation { flow, .. } => Ok(flow),
            other => Err(NavigationError::Unavailable {
                action,
                screen: other.kind(),
            }),
        }
    }

    fn review_flow(&mut self, action: &'static str) -> Result<&mut ReviewFlow, NavigationError> {
        match &mut self.screen {
            Screen::CreateReview { flow } => Ok(flow),
            other => Err(NavigationError::Unavailable {
                action,
                screen: other.kind(),
            }),
        }
    }

    fn signup_form(&mut self, action: &'static str) -> Result<&mut SignUpForm, NavigationError> {
        match &mut self.screen {
            Screen::Auth { form } => Ok(form),
            other => Err(NavigationError::Unavailable {
                action,
                screen: other.kind(),
            }),
        }
    }

    pub fn view(&self) -> ScreenView {
        match &self.screen {
            Screen::Landing => ScreenView::Landing,
            Screen::Validation { identifier, flow } => ScreenView::Validation {
                identifier: identifier.clone(),
                validation: flow.view(),
            },
            Screen::CreateReview { flow } => ScreenView::CreateReview {
                identifier: flow.reviewee().clone(),
                review: Box::new(flow.view()),
            },
            Screen::Auth { form } => ScreenView::Auth {
                signup: form.view(),
            },
            Screen::Profile => ScreenView::Profile,
            Screen::About => ScreenView::About,
            Screen::Contact => ScreenView::Contact,
            Screen::Privacy => ScreenView::Privacy,
            Screen::Terms => ScreenView::Terms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "screen")]
pub enum ScreenView {
    Landing,
    Validation {
        identifier: RevieweeIdentifier,
        validation: ValidationView,
    },
    CreateReview {
        identifier: RevieweeIdentifier,
        review: Box<ReviewFlowView>,
    },
    Auth {
        signup: SignUpView,
    },
    Profile,
    About,
    Contact,
    Privacy,
    Terms,
}
