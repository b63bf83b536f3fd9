//! Proof-of-relationship check that gates entry into the review wizard.

mod document;
mod flow;
mod verifier;

pub use document::{
    DocumentDescriptor, DocumentError, DocumentSlot, PendingScan, ScanOutcome, ScanStatus,
    ScanTicket,
};
pub use flow::{ValidationError, ValidationFlow, ValidationOutcome, ValidationStage, ValidationView};
pub use verifier::{DocumentVerifier, SimulatedVerifier, VerificationError, VerificationResult};
