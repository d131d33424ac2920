//! Roster filters for operator queries
//!
//! Every filter is optional; an empty query returns the whole list. String
//! filters are exact matches, the same rule the matcher applies.

use dronops_domain::{Drone, DroneStatus, Mission, Pilot, PilotStatus, Priority};
use serde::{Deserialize, Serialize};

/// Pilot filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotQuery {
    /// Holds this skill
    pub skill: Option<String>,
    /// Holds this certification
    pub certification: Option<String>,
    /// Based here
    pub location: Option<String>,
    /// In this status
    pub status: Option<PilotStatus>,
}

impl PilotQuery {
    /// Whether a pilot passes every set filter
    pub fn matches(&self, pilot: &Pilot) -> bool {
        self.skill.as_ref().map_or(true, |s| pilot.skills.contains(s))
            && self
                .certification
                .as_ref()
                .map_or(true, |c| pilot.certifications.contains(c))
            && self.location.as_ref().map_or(true, |l| &pilot.location == l)
            && self.status.map_or(true, |s| pilot.status == s)
    }

    /// Matching pilots, in roster order
    pub fn apply(&self, pilots: &[Pilot]) -> Vec<Pilot> {
        pilots.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// Drone filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneQuery {
    /// Carries this capability
    pub capability: Option<String>,
    /// In this status
    pub status: Option<DroneStatus>,
    /// Located here
    pub location: Option<String>,
}

impl DroneQuery {
    /// Whether a drone passes every set filter
    pub fn matches(&self, drone: &Drone) -> bool {
        self.capability
            .as_ref()
            .map_or(true, |c| drone.capabilities.contains(c))
            && self.status.map_or(true, |s| drone.status == s)
            && self.location.as_ref().map_or(true, |l| &drone.location == l)
    }

    /// Matching drones, in fleet order
    pub fn apply(&self, drones: &[Drone]) -> Vec<Drone> {
        drones.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

/// Mission filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionQuery {
    /// With this priority
    pub priority: Option<Priority>,
    /// Flown here
    pub location: Option<String>,
}

impl MissionQuery {
    /// Whether a mission passes every set filter
    pub fn matches(&self, mission: &Mission) -> bool {
        self.priority.map_or(true, |p| mission.priority == p)
            && self.location.as_ref().map_or(true, |l| &mission.location == l)
    }

    /// Matching missions, in schedule order
    pub fn apply(&self, missions: &[Mission]) -> Vec<Mission> {
        missions.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}
