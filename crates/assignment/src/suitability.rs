//! Advisory suitability ranking.
//!
//! Unlike the matcher this does not drop candidates that fail soft criteria
//! (status, date, location). It scores every qualified candidate so an
//! operator can see near-misses alongside ready matches.

use crate::matcher::Candidate;
use dronops_domain::{Drone, DroneStatus, Mission, Pilot, PilotStatus, ResourceRef};
use serde::{Deserialize, Serialize};

const QUALIFIED_POINTS: u32 = 50;
const READY_POINTS: u32 = 30;
const SAME_LOCATION_POINTS: u32 = 20;
const EXTRA_SKILL_POINTS: u32 = 2;

const DRONE_AVAILABLE_POINTS: u32 = 40;
const DRONE_SAME_LOCATION_POINTS: u32 = 30;
const DRONE_CAPABLE_POINTS: u32 = 30;
const DRONE_NO_REQUIREMENT_POINTS: u32 = 20;

/// One scored candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityEntry {
    /// Candidate
    pub resource: ResourceRef,
    /// Higher is better
    pub score: u32,
    /// At the mission location
    pub same_location: bool,
    /// Status is Available
    pub is_available: bool,
    /// Operator-facing verdict
    pub recommendation: String,
}

fn recommendation(ready: bool, same_location: bool) -> &'static str {
    match (ready, same_location) {
        (true, true) => "Excellent match - Ready to deploy",
        (true, false) => "Good match - Different location",
        (false, _) => "Qualified but not available",
    }
}

fn sort_entries(entries: &mut [SuitabilityEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.resource.id().cmp(b.resource.id()))
    });
}

/// Score pilots holding every required skill and certification
pub fn rank_pilot_suitability(mission: &Mission, pilots: &[Pilot]) -> Vec<SuitabilityEntry> {
    let mut entries: Vec<SuitabilityEntry> = pilots
        .iter()
        .filter(|p| p.missing_requirements(mission).is_empty())
        .map(|p| {
            let is_available = p.status == PilotStatus::Available;
            let ready = is_available && p.available_from <= mission.start_date;
            let same_location = p.location == mission.location;

            let mut score = QUALIFIED_POINTS;
            if ready {
                score += READY_POINTS;
            }
            if same_location {
                score += SAME_LOCATION_POINTS;
            }
            score += EXTRA_SKILL_POINTS * p.extra_matches(mission) as u32;

            SuitabilityEntry {
                resource: p.resource_ref(),
                score,
                same_location,
                is_available,
                recommendation: recommendation(ready, same_location).to_string(),
            }
        })
        .collect();
    sort_entries(&mut entries);
    entries
}

/// Score drones that are not grounded for maintenance
pub fn rank_drone_suitability(mission: &Mission, drones: &[Drone]) -> Vec<SuitabilityEntry> {
    let mut entries: Vec<SuitabilityEntry> = drones
        .iter()
        .filter(|d| d.status != DroneStatus::Maintenance)
        .map(|d| {
            let is_available = d.status == DroneStatus::Available;
            let same_location = d.location == mission.location;

            let mut score = 0;
            if is_available {
                score += DRONE_AVAILABLE_POINTS;
            }
            if same_location {
                score += DRONE_SAME_LOCATION_POINTS;
            }
            if mission.required_capabilities.is_empty() {
                score += DRONE_NO_REQUIREMENT_POINTS;
            } else if d.missing_requirements(mission).is_empty() {
                score += DRONE_CAPABLE_POINTS;
            }

            SuitabilityEntry {
                resource: d.resource_ref(),
                score,
                same_location,
                is_available,
                recommendation: recommendation(is_available, same_location).to_string(),
            }
        })
        .collect();
    sort_entries(&mut entries);
    entries
}
