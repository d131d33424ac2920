//! Terse record builders for tests.

use crate::entities::{Drone, DroneStatus, Mission, Pilot, PilotStatus, Priority};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Calendar day; panics on an impossible date
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// String set from literals
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Available pilot with no skills, free from 2026-01-01
pub fn pilot(id: &str, location: &str) -> Pilot {
    Pilot {
        id: id.to_string(),
        name: format!("Pilot {id}"),
        status: PilotStatus::Available,
        skills: BTreeSet::new(),
        certifications: BTreeSet::new(),
        location: location.to_string(),
        available_from: day(2026, 1, 1),
        current_assignment: None,
    }
}

/// Available drone with no capabilities and no maintenance scheduled
pub fn drone(id: &str, location: &str) -> Drone {
    Drone {
        id: id.to_string(),
        model: "DJI M300".to_string(),
        capabilities: BTreeSet::new(),
        status: DroneStatus::Available,
        location: location.to_string(),
        maintenance_window: None,
        current_assignment: None,
    }
}

/// Unstaffed Standard mission over 2026-02-01..=2026-02-05
pub fn mission(id: &str, location: &str) -> Mission {
    Mission {
        id: id.to_string(),
        required_skills: BTreeSet::new(),
        required_certifications: BTreeSet::new(),
        required_capabilities: BTreeSet::new(),
        location: location.to_string(),
        priority: Priority::Standard,
        start_date: day(2026, 2, 1),
        end_date: day(2026, 2, 5),
        assigned_pilot: None,
        assigned_drone: None,
    }
}

/// Put `pilot` on `mission` consistently on both records
pub fn staff_pilot(pilot: &mut Pilot, mission: &mut Mission) {
    pilot.status = PilotStatus::Assigned;
    pilot.current_assignment = Some(mission.id.clone());
    mission.assigned_pilot = Some(pilot.id.clone());
}

/// Put `drone` on `mission` consistently on both records
pub fn staff_drone(drone: &mut Drone, mission: &mut Mission) {
    drone.status = DroneStatus::InUse;
    drone.current_assignment = Some(mission.id.clone());
    mission.assigned_drone = Some(drone.id.clone());
}
