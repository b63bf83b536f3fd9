use mime::Mime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::verifier::VerificationResult;

/// Uploaded file as seen by the workflows: its name and declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    pub content_type: String,
}

impl DocumentDescriptor {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
        }
    }

    pub fn mime(&self) -> Option<Mime> {
        self.content_type.trim().parse().ok()
    }

    /// PDFs and images are the only accepted proofs.
    pub fn is_accepted(&self) -> bool {
        match self.mime() {
            Some(parsed) => {
                (parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::PDF)
                    || parsed.type_() == mime::IMAGE
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("unsupported file type '{content_type}': upload a PDF, JPG, or PNG")]
    InvalidFileType { content_type: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    #[default]
    Empty,
    Scanning,
    Verified,
}

/// Handle tying a verification result back to the upload that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanTicket(u64);

/// Accepted upload awaiting verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScan {
    pub ticket: ScanTicket,
    pub document: DocumentDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ScanOutcome {
    Verified,
    Rejected { reason: String },
    /// The upload was replaced or discarded before the result arrived.
    Stale,
}

/// Single-file uploader with scan tracking.
///
/// Every accepted upload or reset bumps the generation so results for an
/// older upload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSlot {
    document: Option<DocumentDescriptor>,
    status: ScanStatus,
    generation: u64,
    last_rejection: Option<String>,
}

impl DocumentSlot {
    pub fn document(&self) -> Option<&DocumentDescriptor> {
        self.document.as_ref()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn is_verified(&self) -> bool {
        self.status == ScanStatus::Verified
    }

    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }

    /// Accept a file and start scanning it. Rejected files leave the slot untouched.
    pub fn accept(&mut self, document: DocumentDescriptor) -> Result<PendingScan, DocumentError> {
        if !document.is_accepted() {
            warn!(
                name = %document.name,
                content_type = %document.content_type,
                "rejected document upload"
            );
            return Err(DocumentError::InvalidFileType {
                content_type: document.content_type,
            });
        }

        self.generation += 1;
        self.status = ScanStatus::Scanning;
        self.last_rejection = None;
        self.document = Some(document.clone());
        debug!(name = %document.name, generation = self.generation, "document scan started");

        Ok(PendingScan {
            ticket: ScanTicket(self.generation),
            document,
        })
    }

    pub fn finish(&mut self, ticket: ScanTicket, result: &VerificationResult) -> ScanOutcome {
        if ticket.0 != self.generation || self.status != ScanStatus::Scanning {
            debug!(ticket = ticket.0, generation = self.generation, "ignoring stale scan result");
            return ScanOutcome::Stale;
        }

        match result {
            VerificationResult::Verified => {
                self.status = ScanStatus::Verified;
                ScanOutcome::Verified
            }
            VerificationResult::Rejected { reason } => {
                self.document = None;
                self.status = ScanStatus::Empty;
                self.last_rejection = Some(reason.clone());
                ScanOutcome::Rejected {
                    reason: reason.clone(),
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.document = None;
        self.status = ScanStatus::Empty;
        self.last_rejection = None;
    }
}
