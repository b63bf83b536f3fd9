//! Identity-linked review workflows for the ImobiReview platform.
//!
//! The crate models the reviewer journey end to end: proving a contractual
//! relationship, scoring the counterpart on role-specific criteria, and
//! publishing the review so it feeds the reviewee's reputation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
