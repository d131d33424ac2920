//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of record in a roster snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Pilot record
    Pilot,
    /// Drone record
    Drone,
    /// Mission record
    Mission,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Pilot => write!(f, "pilot"),
            EntityKind::Drone => write!(f, "drone"),
            EntityKind::Mission => write!(f, "mission"),
        }
    }
}

/// A malformed record found while validating a snapshot.
///
/// Issues are collected, not raised: the offending record is left out of the
/// computation and every other record still takes part.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Record kind
    pub entity: EntityKind,
    /// Record id as supplied (may be empty)
    pub id: String,
    /// Offending field
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl ValidationIssue {
    pub(crate) fn new(entity: EntityKind, id: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' field '{}': {}", self.entity, self.id, self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record references an id the snapshot does not contain
    #[error("Dangling reference: {entity} '{id}' field '{field}' names missing '{missing}'")]
    DanglingReference {
        entity: EntityKind,
        id: String,
        field: String,
        missing: String,
    },
}

pub type Result<T> = std::result::Result<T, DomainError>;
