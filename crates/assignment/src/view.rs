//! Validated, read-only view of one snapshot with its assignment relation.

use crate::error::{EngineError, Result};
use dronops_domain::{AssignmentSet, EntityKind, Mission, Snapshot, Validated};

/// Validated records plus the assignment relation derived from them.
///
/// Built once per request and dropped with it.
#[derive(Debug)]
pub struct RosterView<'a> {
    /// Usable records
    pub snapshot: &'a Snapshot,
    /// Derived pilot/drone-to-mission bookings
    pub assignments: AssignmentSet,
    validated: &'a Validated,
}

impl<'a> RosterView<'a> {
    /// Derive the assignment relation; fails on dangling references
    pub fn new(validated: &'a Validated) -> Result<Self> {
        Ok(Self {
            snapshot: &validated.snapshot,
            assignments: AssignmentSet::derive(validated)?,
            validated,
        })
    }

    /// Look up a mission the caller named explicitly.
    ///
    /// A mission dropped by validation reports its first issue instead of
    /// "not found".
    pub fn mission(&self, id: &str) -> Result<&'a Mission> {
        if let Some(mission) = self.snapshot.mission(id) {
            return Ok(mission);
        }
        if self.validated.is_rejected(EntityKind::Mission, id) {
            if let Some(issue) = self
                .validated
                .issues
                .iter()
                .find(|i| i.entity == EntityKind::Mission && i.id == id)
            {
                return Err(EngineError::Validation(issue.clone()));
            }
        }
        Err(EngineError::MissionNotFound(id.to_string()))
    }
}
