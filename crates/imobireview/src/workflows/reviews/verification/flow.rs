use serde::Serialize;
use tracing::{debug, info};

use super::document::{
    DocumentDescriptor, DocumentError, DocumentSlot, PendingScan, ScanOutcome, ScanStatus,
    ScanTicket,
};
use super::verifier::{DocumentVerifier, VerificationError, VerificationResult};
use crate::workflows::reviews::domain::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    RoleSelect,
    DocumentUpload,
    Confirmed,
    Cancelled,
}

impl ValidationStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RoleSelect => "Identify Your Role",
            Self::DocumentUpload => "Upload Contract Document",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select your role before continuing")]
    RoleRequired,
    #[error("the contract document has not been verified yet")]
    DocumentNotVerified,
    #[error("cannot {action} while in the '{}' stage", .stage.label())]
    InvalidStage {
        action: &'static str,
        stage: ValidationStage,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Handed to the review wizard once the relationship is proven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub reviewer_role: Role,
    pub document: DocumentDescriptor,
}

/// Two-step check: the reviewer declares a role, then uploads a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFlow {
    stage: ValidationStage,
    reviewer_role: Option<Role>,
    document: DocumentSlot,
}

impl Default for ValidationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationFlow {
    pub fn new() -> Self {
        Self {
            stage: ValidationStage::RoleSelect,
            reviewer_role: None,
            document: DocumentSlot::default(),
        }
    }

    pub fn stage(&self) -> ValidationStage {
        self.stage
    }

    pub fn reviewer_role(&self) -> Option<Role> {
        self.reviewer_role
    }

    pub fn document_status(&self) -> ScanStatus {
        self.document.status()
    }

    pub fn document(&self) -> Option<&DocumentDescriptor> {
        self.document.document()
    }

    pub fn select_role(&mut self, role: Role) -> Result<(), ValidationError> {
        self.ensure_stage(ValidationStage::RoleSelect, "select a role")?;
        self.reviewer_role = Some(role);
        Ok(())
    }

    pub fn proceed(&mut self) -> Result<ValidationStage, ValidationError> {
        self.ensure_stage(ValidationStage::RoleSelect, "proceed")?;
        if self.reviewer_role.is_none() {
            return Err(ValidationError::RoleRequired);
        }
        self.stage = ValidationStage::DocumentUpload;
        Ok(self.stage)
    }

    /// Step back to role selection, or cancel when already there.
    pub fn back(&mut self) -> ValidationStage {
        match self.stage {
            ValidationStage::DocumentUpload => self.stage = ValidationStage::RoleSelect,
            ValidationStage::RoleSelect => self.cancel(),
            ValidationStage::Confirmed | ValidationStage::Cancelled => {}
        }
        self.stage
    }

    pub fn upload(&mut self, document: DocumentDescriptor) -> Result<PendingScan, ValidationError> {
        self.ensure_stage(ValidationStage::DocumentUpload, "upload a document")?;
        Ok(self.document.accept(document)?)
    }

    pub fn finish_scan(&mut self, ticket: ScanTicket, result: &VerificationResult) -> ScanOutcome {
        if self.stage != ValidationStage::DocumentUpload {
            return ScanOutcome::Stale;
        }
        self.document.finish(ticket, result)
    }

    /// Accept the file and await the verifier in one call.
    pub async fn upload_and_verify<V>(
        &mut self,
        verifier: &V,
        document: DocumentDescriptor,
    ) -> Result<ScanOutcome, ValidationError>
    where
        V: DocumentVerifier,
    {
        let pending = self.upload(document)?;
        let result = match verifier.verify(&pending.document).await {
            Ok(result) => result,
            Err(err) => {
                self.finish_scan(
                    pending.ticket,
                    &VerificationResult::Rejected {
                        reason: err.to_string(),
                    },
                );
                return Err(err.into());
            }
        };
        Ok(self.finish_scan(pending.ticket, &result))
    }

    /// The confirm action is enabled only with a role and a verified document.
    pub fn can_confirm(&self) -> bool {
        self.stage == ValidationStage::DocumentUpload
            && self.reviewer_role.is_some()
            && self.document.is_verified()
    }

    pub fn confirm(&mut self) -> Result<ValidationOutcome, ValidationError> {
        self.ensure_stage(ValidationStage::DocumentUpload, "confirm")?;
        let reviewer_role = self.reviewer_role.ok_or(ValidationError::RoleRequired)?;
        let document = match self.document.document() {
            Some(document) if self.document.is_verified() => document.clone(),
            _ => return Err(ValidationError::DocumentNotVerified),
        };

        self.stage = ValidationStage::Confirmed;
        info!(role = %reviewer_role, document = %document.name, "relationship verified");
        Ok(ValidationOutcome {
            reviewer_role,
            document,
        })
    }

    /// Abort from any stage; the draft is discarded and pending scans go stale.
    pub fn cancel(&mut self) {
        debug!(stage = ?self.stage, "validation cancelled");
        self.reviewer_role = None;
        self.document.clear();
        self.stage = ValidationStage::Cancelled;
    }

    pub fn view(&self) -> ValidationView {
        ValidationView {
            stage: self.stage,
            stage_label: self.stage.label(),
            reviewer_role: self.reviewer_role,
            document_name: self.document.document().map(|doc| doc.name.clone()),
            document_status: self.document.status(),
            last_rejection: self.document.last_rejection().map(str::to_string),
            can_confirm: self.can_confirm(),
        }
    }

    fn ensure_stage(
        &self,
        expected: ValidationStage,
        action: &'static str,
    ) -> Result<(), ValidationError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ValidationError::InvalidStage {
                action,
                stage: self.stage,
            })
        }
    }
}

/// Serializable snapshot for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationView {
    pub stage: ValidationStage,
    pub stage_label: &'static str,
    pub reviewer_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    pub document_status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rejection: Option<String>,
    pub can_confirm: bool,
}
