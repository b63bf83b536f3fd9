use serde::Serialize;
use tracing::{debug, info};

use super::domain::Role;
use super::verification::{
    DocumentDescriptor, DocumentError, DocumentSlot, PendingScan, ScanOutcome, ScanStatus,
    ScanTicket, VerificationResult,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpError {
    #[error("choose whether you are a tenant, landlord, or agency")]
    RoleRequired,
    #[error("enter a valid e-mail address")]
    InvalidEmail,
    #[error("choose a password")]
    PasswordRequired,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("accept the terms of service to continue")]
    TermsNotAccepted,
    #[error("agencies must upload a verified CRECI registration")]
    CreciRequired,
    #[error("CRECI registration only applies to agencies, not {0}")]
    CreciNotApplicable(Role),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Account created by a completed sign-up form. The password stays in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub role: Role,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creci_document: Option<DocumentDescriptor>,
}

/// Account creation draft. Agencies additionally prove their CRECI registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    role: Option<Role>,
    email: String,
    password: String,
    password_confirmation: String,
    terms_accepted: bool,
    creci: DocumentSlot,
}

impl SignUpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn creci_status(&self) -> ScanStatus {
        self.creci.status()
    }

    /// Switching away from Agency discards any CRECI upload.
    pub fn select_role(&mut self, role: Role) {
        if role != Role::Agency {
            self.creci.clear();
        }
        self.role = Some(role);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_password_confirmation(&mut self, confirmation: impl Into<String>) {
        self.password_confirmation = confirmation.into();
    }

    pub fn accept_terms(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn upload_creci(&mut self, document: DocumentDescriptor) -> Result<PendingScan, SignUpError> {
        match self.role {
            Some(Role::Agency) => Ok(self.creci.accept(document)?),
            Some(other) => Err(SignUpError::CreciNotApplicable(other)),
            None => Err(SignUpError::RoleRequired),
        }
    }

    pub fn finish_creci_scan(
        &mut self,
        ticket: ScanTicket,
        result: &VerificationResult,
    ) -> ScanOutcome {
        self.creci.finish(ticket, result)
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn submit(&self) -> Result<Registration, SignUpError> {
        let role = self.validate()?;
        let registration = Registration {
            role,
            email: self.email.trim().to_string(),
            creci_document: self.creci.document().cloned(),
        };
        info!(role = %role, "account registered");
        Ok(registration)
    }

    fn validate(&self) -> Result<Role, SignUpError> {
        let role = self.role.ok_or(SignUpError::RoleRequired)?;

        let email = self.email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(SignUpError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(SignUpError::PasswordRequired);
        }
        if self.password != self.password_confirmation {
            return Err(SignUpError::PasswordMismatch);
        }
        if !self.terms_accepted {
            return Err(SignUpError::TermsNotAccepted);
        }
        if role == Role::Agency && !self.creci.is_verified() {
            debug!(status = ?self.creci.status(), "agency sign-up blocked on CRECI");
            return Err(SignUpError::CreciRequired);
        }

        Ok(role)
    }

    pub fn view(&self) -> SignUpView {
        SignUpView {
            role: self.role,
            email: self.email.clone(),
            terms_accepted: self.terms_accepted,
            creci_required: self.role == Some(Role::Agency),
            creci_status: self.creci.status(),
            creci_document: self.creci.document().map(|doc| doc.name.clone()),
            blocking_reason: self.validate().err().map(|err| err.to_string()),
            can_submit: self.can_submit(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpView {
    pub role: Option<Role>,
    pub email: String,
    pub terms_accepted: bool,
    pub creci_required: bool,
    pub creci_status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creci_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_reason: Option<String>,
    pub can_submit: bool,
}
