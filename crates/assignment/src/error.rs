//! Engine error taxonomy
//!
//! Empty outcomes (no eligible candidate, a clean conflict report, no plan
//! available) are ordinary `Ok` values. Everything here is a real failure.

#![warn(missing_docs)]

use crate::store::StoreError;
use dronops_domain::{DomainError, ResourceRef, ValidationIssue};
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A record named by the request is malformed
    #[error("Validation error: {0}")]
    Validation(ValidationIssue),

    /// Commit-time re-validation failed; the caller must re-plan
    #[error("Stale state for {resource} on mission {mission_id}: {reason}")]
    StaleState {
        /// Resource the change targeted
        resource: ResourceRef,
        /// Mission the change targeted
        mission_id: String,
        /// What no longer holds
        reason: String,
    },

    /// No mission with this id in the snapshot
    #[error("Mission not found: {0}")]
    MissionNotFound(String),

    /// No pilot or drone with this id in the snapshot
    #[error("Resource not found: {0}")]
    ResourceNotFound(ResourceRef),

    /// The snapshot violates a cross-record contract
    #[error("Snapshot contract violation: {0}")]
    Domain(#[from] DomainError),

    /// The confirmation hash does not match the proposal
    #[error("Plan hash mismatch: expected {expected}, got {actual}")]
    PlanHashMismatch {
        /// Hash recomputed from the plan contents
        expected: String,
        /// Hash supplied by the caller
        actual: String,
    },

    /// Plan could not be serialized for hashing
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The snapshot store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
