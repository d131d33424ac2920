//! Defensive re-validation of records read from the external store.
//!
//! The store does not guarantee well-formed rows, so every snapshot is
//! checked before use. A bad record yields a [`ValidationIssue`] and is
//! dropped; the rest of the snapshot carries on.

use crate::entities::{Drone, DroneStatus, Mission, Pilot, PilotStatus};
use crate::error::{EntityKind, ValidationIssue};

fn require_text(
    issues: &mut Vec<ValidationIssue>,
    entity: EntityKind,
    id: &str,
    field: &str,
    value: &str,
) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::new(entity, id, field, "required field is empty"));
    }
}

/// Check one pilot record. An empty result means the record is usable.
pub fn validate_pilot(pilot: &Pilot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let kind = EntityKind::Pilot;
    require_text(&mut issues, kind, &pilot.id, "id", &pilot.id);
    require_text(&mut issues, kind, &pilot.id, "name", &pilot.name);
    require_text(&mut issues, kind, &pilot.id, "location", &pilot.location);

    if let (PilotStatus::Available, Some(mission_id)) = (pilot.status, &pilot.current_assignment) {
        issues.push(ValidationIssue::new(
            kind,
            &pilot.id,
            "status",
            format!("status is Available but current_assignment is '{mission_id}'"),
        ));
    }
    issues
}

/// Check one drone record.
pub fn validate_drone(drone: &Drone) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let kind = EntityKind::Drone;
    require_text(&mut issues, kind, &drone.id, "id", &drone.id);
    require_text(&mut issues, kind, &drone.id, "model", &drone.model);
    require_text(&mut issues, kind, &drone.id, "location", &drone.location);

    if let Some(window) = &drone.maintenance_window {
        if !window.is_well_formed() {
            issues.push(ValidationIssue::new(
                kind,
                &drone.id,
                "maintenance_window",
                format!("window {window} ends before it starts"),
            ));
        }
    }

    if let (DroneStatus::Available, Some(mission_id)) = (drone.status, &drone.current_assignment) {
        issues.push(ValidationIssue::new(
            kind,
            &drone.id,
            "status",
            format!("status is Available but current_assignment is '{mission_id}'"),
        ));
    }
    issues
}

/// Check one mission record.
pub fn validate_mission(mission: &Mission) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let kind = EntityKind::Mission;
    require_text(&mut issues, kind, &mission.id, "id", &mission.id);
    require_text(&mut issues, kind, &mission.id, "location", &mission.location);

    if mission.end_date < mission.start_date {
        issues.push(ValidationIssue::new(
            kind,
            &mission.id,
            "end_date",
            format!(
                "end_date {} is before start_date {}",
                mission.end_date, mission.start_date
            ),
        ));
    }
    issues
}
