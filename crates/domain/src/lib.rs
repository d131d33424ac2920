//! Domain model for drone operations coordination
//!
//! This crate contains pure roster data with no I/O dependencies:
//! - Pilot, drone and mission records
//! - Inclusive date ranges and priority ordering
//! - Snapshot re-validation
//! - The derived pilot/drone-to-mission assignment relation

pub mod assignment;
pub mod entities;
pub mod error;
pub mod schedule;
pub mod snapshot;
pub mod validation;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use assignment::{Assignment, AssignmentSet};
pub use entities::{
    Drone, DroneStatus, Mission, Pilot, PilotStatus, Priority, ResourceKind, ResourceRef,
};
pub use error::{DomainError, EntityKind, Result, ValidationIssue};
pub use schedule::DateRange;
pub use snapshot::{Snapshot, Validated};
