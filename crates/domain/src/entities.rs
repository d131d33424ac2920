//! Roster entity records: pilots, drones and missions.
//!
//! These are plain data as handed over by the persistence collaborator.
//! Nothing here enforces cross-record invariants; see [`crate::snapshot`].

use crate::schedule::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Pilot duty status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PilotStatus {
    /// Free to take a mission
    Available,
    /// Holding a mission
    Assigned,
    /// On leave
    #[serde(rename = "On Leave")]
    OnLeave,
    /// Not deployable for any other reason
    Unavailable,
}

/// Drone fleet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    /// Ready for tasking
    Available,
    /// Deployed on a mission
    #[serde(rename = "In Use")]
    InUse,
    /// Grounded for maintenance
    Maintenance,
}

/// Mission priority. Declaration order is the rank: `Urgent > High > Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Routine work
    Standard,
    /// Elevated
    High,
    /// Must be staffed, even at the expense of lower priority missions
    Urgent,
}

impl Priority {
    /// Numeric rank, higher is more important
    pub fn rank(self) -> u8 {
        match self {
            Priority::Standard => 0,
            Priority::High => 1,
            Priority::Urgent => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Standard => write!(f, "Standard"),
            Priority::High => write!(f, "High"),
            Priority::Urgent => write!(f, "Urgent"),
        }
    }
}

/// Pilot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    /// Unique pilot id, e.g. "P001"
    pub id: String,
    /// Display name
    pub name: String,
    /// Duty status
    pub status: PilotStatus,
    /// Skills, e.g. "Mapping", "Inspection"
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// Certifications, e.g. "DGCA", "Night Ops"
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Base location
    pub location: String,
    /// First day the pilot can fly
    pub available_from: NaiveDate,
    /// Mission currently held, if any
    #[serde(default)]
    pub current_assignment: Option<String>,
}

/// Drone record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    /// Unique drone id, e.g. "D001"
    pub id: String,
    /// Airframe model
    pub model: String,
    /// Payload capabilities, e.g. "Thermal", "LiDAR"
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Fleet status
    pub status: DroneStatus,
    /// Current location
    pub location: String,
    /// Scheduled maintenance, if any
    #[serde(default)]
    pub maintenance_window: Option<DateRange>,
    /// Mission currently held, if any
    #[serde(default)]
    pub current_assignment: Option<String>,
}

/// Mission record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique mission id, e.g. "PRJ001"
    pub id: String,
    /// Skills the pilot must hold
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    /// Certifications the pilot must hold
    #[serde(default)]
    pub required_certifications: BTreeSet<String>,
    /// Capabilities the drone must carry
    #[serde(default)]
    pub required_capabilities: BTreeSet<String>,
    /// Where the mission is flown
    pub location: String,
    /// Priority
    pub priority: Priority,
    /// First day
    pub start_date: NaiveDate,
    /// Last day (inclusive)
    pub end_date: NaiveDate,
    /// Pilot staffed on the mission
    #[serde(default)]
    pub assigned_pilot: Option<String>,
    /// Drone staffed on the mission
    #[serde(default)]
    pub assigned_drone: Option<String>,
}

impl Mission {
    /// The mission's inclusive date range
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Resource currently filling the slot of the given kind
    pub fn assigned(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Pilot => self.assigned_pilot.as_deref(),
            ResourceKind::Drone => self.assigned_drone.as_deref(),
        }
    }
}

/// Pilot or drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A pilot
    Pilot,
    /// A drone
    Drone,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Pilot => write!(f, "pilot"),
            ResourceKind::Drone => write!(f, "drone"),
        }
    }
}

/// Typed reference to a pilot or drone by id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    /// Pilot id
    Pilot(String),
    /// Drone id
    Drone(String),
}

impl ResourceRef {
    /// Which kind of resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Pilot(_) => ResourceKind::Pilot,
            ResourceRef::Drone(_) => ResourceKind::Drone,
        }
    }

    /// The bare id
    pub fn id(&self) -> &str {
        match self {
            ResourceRef::Pilot(id) | ResourceRef::Drone(id) => id,
        }
    }

    /// Build a reference of the given kind
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        match kind {
            ResourceKind::Pilot => ResourceRef::Pilot(id.into()),
            ResourceKind::Drone => ResourceRef::Drone(id.into()),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}
