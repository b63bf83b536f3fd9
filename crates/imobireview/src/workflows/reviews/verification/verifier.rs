use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::DocumentDescriptor;
use crate::config::VerificationConfig;

/// Verdict returned by a verification backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum VerificationResult {
    Verified,
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("verification backend unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous capability that inspects an uploaded document.
///
/// Workflows never call a backend directly; they hand out a `PendingScan`
/// and accept whatever result the injected verifier produces.
pub trait DocumentVerifier: Send + Sync {
    fn verify(
        &self,
        document: &DocumentDescriptor,
    ) -> impl Future<Output = Result<VerificationResult, VerificationError>> + Send;
}

/// Stand-in backend: waits a fixed delay, then accepts every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedVerifier {
    delay: Duration,
}

impl SimulatedVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.scan_delay)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedVerifier {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::default())
    }
}

impl DocumentVerifier for SimulatedVerifier {
    fn verify(
        &self,
        document: &DocumentDescriptor,
    ) -> impl Future<Output = Result<VerificationResult, VerificationError>> + Send {
        let delay = self.delay;
        let name = document.name.clone();
        async move {
            tokio::time::sleep(delay).await;
            debug!(%name, delay_ms = delay.as_millis() as u64, "simulated scan complete");
            Ok(VerificationResult::Verified)
        }
    }
}
