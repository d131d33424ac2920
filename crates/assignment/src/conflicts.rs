//! Conflict detection over a roster snapshot
//!
//! Detection is a pure scan of the whole snapshot on every call. It reports:
//! - **double_bookings**: a pilot or drone booked on two missions whose date
//!   ranges overlap (inclusive)
//! - **skill_mismatches**: an assigned pilot lacking a required skill
//! - **certification_gaps**: an assigned pilot lacking a required certification
//! - **location_mismatches**: pilot or drone not at the mission location, or
//!   pilot and drone of the same mission in different places
//! - **maintenance_conflicts**: an assigned drone whose maintenance window
//!   overlaps the mission, or which is grounded in Maintenance status
//!
//! Malformed records are skipped and listed in [`ConflictReport::skipped`].

#![warn(missing_docs)]

use crate::error::Result;
use crate::view::RosterView;
use dronops_domain::{Assignment, DroneStatus, ResourceRef, Snapshot, ValidationIssue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Machine-readable conflict reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Two overlapping missions on one resource
    DoubleBooking,
    /// Pilot lacks a required skill
    MissingSkills,
    /// Pilot lacks a required certification
    MissingCertifications,
    /// Pilot is not at the mission location
    PilotLocationMismatch,
    /// Drone is not at the mission location
    DroneLocationMismatch,
    /// Pilot and drone of one mission are in different places
    PilotDroneLocationMismatch,
    /// Maintenance window overlaps the mission
    MaintenanceWindowOverlap,
    /// Drone is in Maintenance status while booked
    DroneInMaintenance,
}

impl ConflictReason {
    /// Reason code string
    pub fn code(&self) -> &'static str {
        match self {
            ConflictReason::DoubleBooking => "double_booking",
            ConflictReason::MissingSkills => "missing_skills",
            ConflictReason::MissingCertifications => "missing_certifications",
            ConflictReason::PilotLocationMismatch => "pilot_location_mismatch",
            ConflictReason::DroneLocationMismatch => "drone_location_mismatch",
            ConflictReason::PilotDroneLocationMismatch => "pilot_drone_location_mismatch",
            ConflictReason::MaintenanceWindowOverlap => "maintenance_window_overlap",
            ConflictReason::DroneInMaintenance => "drone_in_maintenance",
        }
    }

    /// Default severity of this kind of conflict
    pub fn severity(&self) -> Severity {
        match self {
            ConflictReason::DoubleBooking
            | ConflictReason::MissingCertifications
            | ConflictReason::MaintenanceWindowOverlap
            | ConflictReason::DroneInMaintenance => Severity::High,
            ConflictReason::MissingSkills
            | ConflictReason::PilotLocationMismatch
            | ConflictReason::DroneLocationMismatch => Severity::Medium,
            ConflictReason::PilotDroneLocationMismatch => Severity::Low,
        }
    }
}

/// How urgently a conflict needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or easily worked around
    Low,
    /// Should be fixed before the mission
    Medium,
    /// Blocks the mission
    High,
}

/// One detected conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Reason code
    pub reason: ConflictReason,
    /// Severity
    pub severity: Severity,
    /// Offending pilot(s)/drone(s)
    pub resources: Vec<ResourceRef>,
    /// Missions involved, ascending
    pub mission_ids: Vec<String>,
    /// Human-readable explanation
    pub detail: String,
}

impl Conflict {
    fn new(reason: ConflictReason, resources: Vec<ResourceRef>, mission_ids: Vec<String>, detail: String) -> Self {
        Self {
            reason,
            severity: reason.severity(),
            resources,
            mission_ids,
            detail,
        }
    }
}

/// Result of a full conflict scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Overlapping bookings
    pub double_bookings: Vec<Conflict>,
    /// Pilots missing required skills
    pub skill_mismatches: Vec<Conflict>,
    /// Pilots missing required certifications
    pub certification_gaps: Vec<Conflict>,
    /// Location disagreements
    pub location_mismatches: Vec<Conflict>,
    /// Maintenance clashes
    pub maintenance_conflicts: Vec<Conflict>,
    /// Records left out of the scan because they are malformed
    pub skipped: Vec<ValidationIssue>,
}

impl ConflictReport {
    /// Total number of conflicts across all categories
    pub fn total(&self) -> usize {
        self.double_bookings.len()
            + self.skill_mismatches.len()
            + self.certification_gaps.len()
            + self.location_mismatches.len()
            + self.maintenance_conflicts.len()
    }

    /// No conflicts found
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    fn sort(&mut self) {
        for list in [
            &mut self.double_bookings,
            &mut self.skill_mismatches,
            &mut self.certification_gaps,
            &mut self.location_mismatches,
            &mut self.maintenance_conflicts,
        ] {
            list.sort_by(|a, b| {
                (&a.resources, &a.mission_ids, a.reason).cmp(&(&b.resources, &b.mission_ids, b.reason))
            });
        }
    }
}

/// Scan a snapshot for conflicts.
///
/// Fails only on a snapshot contract violation (a reference to a record that
/// does not exist). Malformed records are skipped and reported.
pub fn detect_conflicts(snapshot: &Snapshot) -> Result<ConflictReport> {
    let validated = snapshot.validated();
    for issue in &validated.issues {
        warn!(%issue, "Skipping malformed record in conflict scan");
    }
    let view = RosterView::new(&validated)?;

    let mut report = ConflictReport {
        skipped: validated.issues.clone(),
        ..ConflictReport::default()
    };
    report.double_bookings = double_bookings(&view);
    scan_pilots(&view, &mut report);
    scan_drones(&view, &mut report);
    report.location_mismatches.extend(pilot_drone_mismatches(&view));
    report.sort();

    debug!(
        total = report.total(),
        double_bookings = report.double_bookings.len(),
        skill_mismatches = report.skill_mismatches.len(),
        certification_gaps = report.certification_gaps.len(),
        location_mismatches = report.location_mismatches.len(),
        maintenance_conflicts = report.maintenance_conflicts.len(),
        skipped = report.skipped.len(),
        "Conflict scan complete"
    );
    Ok(report)
}

fn double_bookings(view: &RosterView<'_>) -> Vec<Conflict> {
    let all: Vec<&Assignment> = view.assignments.iter().collect();
    let mut found = Vec::new();

    // Assignments are ordered by resource, so each resource is a contiguous run.
    for run in all.chunk_by(|a, b| a.resource == b.resource) {
        for (i, a) in run.iter().enumerate() {
            for b in &run[i + 1..] {
                if a.range.overlaps(&b.range) {
                    found.push(Conflict::new(
                        ConflictReason::DoubleBooking,
                        vec![a.resource.clone()],
                        vec![a.mission_id.clone(), b.mission_id.clone()],
                        format!(
                            "{} booked on {} {} and {} {}",
                            a.resource, a.mission_id, a.range, b.mission_id, b.range
                        ),
                    ));
                }
            }
        }
    }
    found
}

fn scan_pilots(view: &RosterView<'_>, report: &mut ConflictReport) {
    for assignment in view.assignments.iter() {
        let ResourceRef::Pilot(pilot_id) = &assignment.resource else { continue };
        let (Some(pilot), Some(mission)) = (
            view.snapshot.pilot(pilot_id),
            view.snapshot.mission(&assignment.mission_id),
        ) else {
            continue;
        };
        let resources = vec![assignment.resource.clone()];
        let missions = vec![mission.id.clone()];

        let missing: Vec<&str> = mission
            .required_skills
            .difference(&pilot.skills)
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            report.skill_mismatches.push(Conflict::new(
                ConflictReason::MissingSkills,
                resources.clone(),
                missions.clone(),
                format!("pilot {} lacks skills: {}", pilot.id, missing.join(", ")),
            ));
        }

        let missing: Vec<&str> = mission
            .required_certifications
            .difference(&pilot.certifications)
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            report.certification_gaps.push(Conflict::new(
                ConflictReason::MissingCertifications,
                resources.clone(),
                missions.clone(),
                format!("pilot {} lacks certifications: {}", pilot.id, missing.join(", ")),
            ));
        }

        if pilot.location != mission.location {
            report.location_mismatches.push(Conflict::new(
                ConflictReason::PilotLocationMismatch,
                resources,
                missions,
                format!(
                    "pilot {} is in {}, mission {} is in {}",
                    pilot.id, pilot.location, mission.id, mission.location
                ),
            ));
        }
    }
}

fn scan_drones(view: &RosterView<'_>, report: &mut ConflictReport) {
    for assignment in view.assignments.iter() {
        let ResourceRef::Drone(drone_id) = &assignment.resource else { continue };
        let (Some(drone), Some(mission)) = (
            view.snapshot.drone(drone_id),
            view.snapshot.mission(&assignment.mission_id),
        ) else {
            continue;
        };
        let resources = vec![assignment.resource.clone()];
        let missions = vec![mission.id.clone()];

        if drone.location != mission.location {
            report.location_mismatches.push(Conflict::new(
                ConflictReason::DroneLocationMismatch,
                resources.clone(),
                missions.clone(),
                format!(
                    "drone {} is in {}, mission {} is in {}",
                    drone.id, drone.location, mission.id, mission.location
                ),
            ));
        }

        if let Some(window) = &drone.maintenance_window {
            if window.overlaps(&mission.range()) {
                report.maintenance_conflicts.push(Conflict::new(
                    ConflictReason::MaintenanceWindowOverlap,
                    resources.clone(),
                    missions.clone(),
                    format!(
                        "drone {} maintenance {} overlaps mission {} {}",
                        drone.id,
                        window,
                        mission.id,
                        mission.range()
                    ),
                ));
            }
        }

        if drone.status == DroneStatus::Maintenance {
            report.maintenance_conflicts.push(Conflict::new(
                ConflictReason::DroneInMaintenance,
                resources,
                missions,
                format!("drone {} is in Maintenance but booked on {}", drone.id, mission.id),
            ));
        }
    }
}

fn pilot_drone_mismatches(view: &RosterView<'_>) -> Vec<Conflict> {
    let mut found = Vec::new();
    for mission in &view.snapshot.missions {
        let booked: Vec<&Assignment> = view.assignments.for_mission(&mission.id).collect();
        for p in booked.iter().filter(|a| matches!(a.resource, ResourceRef::Pilot(_))) {
            for d in booked.iter().filter(|a| matches!(a.resource, ResourceRef::Drone(_))) {
                let (Some(pilot), Some(drone)) = (
                    view.snapshot.pilot(p.resource.id()),
                    view.snapshot.drone(d.resource.id()),
                ) else {
                    continue;
                };
                if pilot.location != drone.location {
                    found.push(Conflict::new(
                        ConflictReason::PilotDroneLocationMismatch,
                        vec![p.resource.clone(), d.resource.clone()],
                        vec![mission.id.clone()],
                        format!(
                            "pilot {} ({}) and drone {} ({}) on {} are in different places",
                            pilot.id, pilot.location, drone.id, drone.location, mission.id
                        ),
                    ));
                }
            }
        }
    }
    found
}
